#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Path Defence levels headlessly.

mod headless;
mod level;
mod session;
mod settings;

use std::{cell::RefCell, path::PathBuf, rc::Rc};

use anyhow::{Context, Result};
use clap::Parser;
use path_defence_core::TilePosition;
use path_defence_rendering::{Color, Presentation, RenderingBackend, Scene};
use path_defence_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::{headless::HeadlessBackend, level::Level, session::Session, settings::Settings};

/// Runs a Path Defence level without a window and reports the outcome.
#[derive(Debug, Parser)]
#[command(name = "path-defence", version, about)]
struct CliArgs {
    /// Tiled JSON level to load; the bundled level is used when omitted.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,
    /// TOML settings file overriding the built-in defaults.
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Frames per second of the simulation clock.
    #[arg(long)]
    fps: Option<u32>,
    /// Seed for the enemy wave.
    #[arg(long)]
    seed: Option<u64>,
    /// Tile to build a tower on, as `column,row`. May be repeated.
    #[arg(long = "tower", value_name = "COLUMN,ROW", value_parser = parse_tile)]
    towers: Vec<TilePosition>,
    /// Tracing filter directive; `RUST_LOG` is used when omitted.
    #[arg(long, value_name = "FILTER")]
    log_filter: Option<String>,
}

fn parse_tile(value: &str) -> Result<TilePosition, String> {
    let (column, row) = value
        .split_once(',')
        .ok_or_else(|| format!("expected COLUMN,ROW but found `{value}`"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|error| format!("invalid tile coordinate `{part}`: {error}"))
    };
    Ok(TilePosition::new(parse(column)?, parse(row)?))
}

fn init_tracing(directive: Option<&str>) {
    let filter = match directive {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Entry point for the Path Defence command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_filter.as_deref());

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(fps) = args.fps.filter(|fps| *fps > 0) {
        settings.fps = fps;
    }
    if let Some(seed) = args.seed {
        settings.seed = seed;
    }

    let level = Level::load(args.level.as_deref(), &settings).context("failed to load level")?;
    let session = Session::new(&level, &settings).context("failed to prepare session")?;
    println!("{}", query::welcome_banner(session.world()));
    info!(
        columns = level.columns,
        rows = level.rows,
        waypoints = level.path.len(),
        seed = settings.seed,
        "level loaded"
    );

    let script = session.placement_script(&args.towers);
    let presentation = Presentation::new(
        "Path Defence",
        Color::from_rgb_u8(0, 0, 0),
        Scene::default(),
    );

    let shared = Rc::new(RefCell::new(session));
    let frame_session = Rc::clone(&shared);
    HeadlessBackend::new(args.ticks, settings.fps, script).run(
        presentation,
        move |_, input, scene| {
            let mut session = frame_session.borrow_mut();
            session.frame(input);
            session.refresh(input, scene);
            !session.finished()
        },
    )?;

    let session = shared.borrow();
    let ledger = session.ledger();
    info!(
        frames = query::tick_index(session.world()),
        remaining = query::enemy_count(session.world()),
        "run complete"
    );
    println!(
        "towers: {}  spawned: {}  killed: {}  leaked: {}  gold: {}",
        ledger.towers, ledger.spawned, ledger.kills, ledger.leaks, ledger.gold
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_arguments_parse_column_then_row() {
        assert_eq!(parse_tile("3,7"), Ok(TilePosition::new(3, 7)));
        assert_eq!(parse_tile(" 4 , 2 "), Ok(TilePosition::new(4, 2)));
        assert!(parse_tile("3").is_err());
        assert!(parse_tile("a,1").is_err());
    }

    #[test]
    fn arguments_accept_repeated_towers() {
        let args = CliArgs::try_parse_from([
            "path-defence",
            "--ticks",
            "10",
            "--tower",
            "5,8",
            "--tower",
            "9,6",
        ])
        .expect("valid arguments");
        assert_eq!(args.ticks, 10);
        assert_eq!(
            args.towers,
            vec![TilePosition::new(5, 8), TilePosition::new(9, 6)]
        );
        assert!(args.level.is_none());
    }
}
