//! Rendering backend that drives scenes without opening a window.

use std::{collections::VecDeque, time::Duration};

use anyhow::Result;
use path_defence_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use tracing::debug;

/// Steps the update closure a fixed number of times with scripted input.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    frames: u64,
    frame_duration: Duration,
    inputs: VecDeque<FrameInput>,
}

impl HeadlessBackend {
    pub(crate) fn new(frames: u64, fps: u32, inputs: Vec<FrameInput>) -> Self {
        Self {
            frames,
            frame_duration: Duration::from_secs(1) / fps.max(1),
            inputs: inputs.into(),
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool + 'static,
    {
        let mut scene = presentation.scene;
        debug!(title = %presentation.window_title, frames = self.frames, "headless run");
        for frame in 0..self.frames {
            let input = self.inputs.pop_front().unwrap_or_default();
            if !update_scene(self.frame_duration, input, &mut scene) {
                debug!(frame, "scene requested exit");
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use path_defence_rendering::Color;
    use std::{cell::Cell, rc::Rc};

    fn presentation() -> Presentation {
        Presentation::new("test", Color::from_rgb_u8(0, 0, 0), Scene::default())
    }

    #[test]
    fn replays_inputs_then_defaults() {
        let clicks = Rc::new(Cell::new(0));
        let seen = Rc::clone(&clicks);
        let script = vec![FrameInput {
            cursor: Vec2::ONE,
            pressed: true,
            clicked: true,
        }];

        HeadlessBackend::new(3, 60, script)
            .run(presentation(), move |dt, input, _| {
                assert_eq!(dt, Duration::from_secs(1) / 60);
                seen.set(seen.get() + u32::from(input.clicked));
                true
            })
            .expect("headless run");

        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn stops_when_update_declines() {
        let frames = Rc::new(Cell::new(0));
        let seen = Rc::clone(&frames);

        HeadlessBackend::new(100, 30, Vec::new())
            .run(presentation(), move |_, _, _| {
                seen.set(seen.get() + 1);
                seen.get() < 5
            })
            .expect("headless run");

        assert_eq!(frames.get(), 5);
    }
}
