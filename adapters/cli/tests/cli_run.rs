use std::process::Command;

fn run(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_path-defence"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch path-defence binary")
}

#[test]
fn headless_run_reports_summary() {
    let output = run(&["--ticks", "120", "--tower", "5,8", "--seed", "3"]);
    assert!(output.status.success(), "path-defence should exit cleanly");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome to Path Defence."));
    assert!(stdout.contains("towers: 1"), "unexpected summary: {stdout}");
}

#[test]
fn malformed_tower_argument_is_rejected() {
    let output = run(&["--tower", "five"]);
    assert!(!output.status.success());
}

#[test]
fn missing_level_file_fails_with_context() {
    let output = run(&["--level", "does/not/exist.tmj", "--ticks", "1"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to load level"), "stderr: {stderr}");
}
