#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure shop system translating pointer input into placement, selection and upgrade commands.
//!
//! The shop panel sits to the right of the play area. Its buttons latch a
//! press until the pointer is released so holding the button down triggers a
//! single action. Clicks inside the play area always clear the current
//! selection first, then either place a tower (while placing) or select the
//! tower under the cursor.

use glam::Vec2;
use path_defence_core::{Command, Event, TilePosition, TowerId, TowerKind};

/// Horizontal distance between the play area's right edge and the buttons.
pub const PANEL_MARGIN: f32 = 30.0;
/// Width of a shop button in pixels.
pub const BUTTON_WIDTH: f32 = 128.0;
/// Height of a shop button in pixels.
pub const BUTTON_HEIGHT: f32 = 48.0;

const BUY_BUTTON_Y: f32 = 120.0;
const CANCEL_BUTTON_Y: f32 = 180.0;
const UPGRADE_BUTTON_Y: f32 = 240.0;

/// Axis-aligned screen rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ButtonRect {
    /// Top-left corner in pixels.
    pub origin: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
}

impl ButtonRect {
    /// Creates a rectangle anchored at its top-left corner.
    #[must_use]
    pub const fn new(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Reports whether the point lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.origin + self.size;
        point.x >= self.origin.x && point.y >= self.origin.y && point.x < max.x && point.y < max.y
    }
}

/// Pointer state sampled once per frame by the adapter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Cursor position in screen pixels.
    pub position: Vec2,
    /// Whether the primary button is held down.
    pub pressed: bool,
}

impl PointerState {
    /// Creates a new pointer descriptor.
    #[must_use]
    pub const fn new(position: Vec2, pressed: bool) -> Self {
        Self { position, pressed }
    }
}

/// Clickable shop button.
#[derive(Clone, Copy, Debug)]
pub struct Button {
    rect: ButtonRect,
    single_click: bool,
    latched: bool,
}

impl Button {
    /// Creates a button covering `rect`.
    ///
    /// Single-click buttons report one action per press; other buttons report
    /// an action every frame the pointer is held over them.
    #[must_use]
    pub const fn new(rect: ButtonRect, single_click: bool) -> Self {
        Self {
            rect,
            single_click,
            latched: false,
        }
    }

    /// Screen rectangle covered by the button.
    #[must_use]
    pub const fn rect(&self) -> ButtonRect {
        self.rect
    }

    /// Samples the pointer, reporting whether the button was activated this frame.
    pub fn poll(&mut self, pointer: PointerState) -> bool {
        let mut action = false;
        if self.rect.contains(pointer.position) && pointer.pressed && !self.latched {
            action = true;
            if self.single_click {
                self.latched = true;
            }
        }
        if !pointer.pressed {
            self.latched = false;
        }
        action
    }
}

/// Dimensions of the play area the shop panel is attached to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShopLayout {
    play_area: Vec2,
    tile_size: f32,
}

impl ShopLayout {
    /// Derives the layout for a map of `columns` by `rows` tiles.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tile_size: f32) -> Self {
        Self {
            play_area: Vec2::new(columns as f32 * tile_size, rows as f32 * tile_size),
            tile_size,
        }
    }

    /// Size of the play area in pixels.
    #[must_use]
    pub const fn play_area(&self) -> Vec2 {
        self.play_area
    }

    /// Reports whether the point lies inside the play area.
    #[must_use]
    pub fn in_play_area(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.y >= 0.0 && point.x < self.play_area.x && point.y < self.play_area.y
    }

    fn button_rect(&self, y: f32) -> ButtonRect {
        ButtonRect::new(
            Vec2::new(self.play_area.x + PANEL_MARGIN, y),
            Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT),
        )
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Pointer state for button polling.
    pub pointer: PointerState,
    /// Whether the primary button went down during this frame.
    pub clicked: bool,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(pointer: PointerState, clicked: bool) -> Self {
        Self { pointer, clicked }
    }

    /// Input describing a fresh press at `position`.
    #[must_use]
    pub const fn click(position: Vec2) -> Self {
        Self::new(PointerState::new(position, true), true)
    }

    /// Input describing a released pointer at `position`.
    #[must_use]
    pub const fn release(position: Vec2) -> Self {
        Self::new(PointerState::new(position, false), false)
    }
}

/// Shop system that tracks placing mode and the selected tower.
#[derive(Debug, Clone)]
pub struct Builder {
    layout: ShopLayout,
    kind: TowerKind,
    buy: Button,
    cancel: Button,
    upgrade: Button,
    placing: bool,
    selected: Option<TowerId>,
}

impl Builder {
    /// Creates a new shop attached to the provided layout.
    #[must_use]
    pub fn new(layout: ShopLayout) -> Self {
        Self {
            layout,
            kind: TowerKind::Basic,
            buy: Button::new(layout.button_rect(BUY_BUTTON_Y), true),
            cancel: Button::new(layout.button_rect(CANCEL_BUTTON_Y), true),
            upgrade: Button::new(layout.button_rect(UPGRADE_BUTTON_Y), true),
            placing: false,
            selected: None,
        }
    }

    /// Whether the next play-area click places a tower.
    #[must_use]
    pub const fn placing(&self) -> bool {
        self.placing
    }

    /// Tower the world last reported as selected.
    #[must_use]
    pub const fn selected(&self) -> Option<TowerId> {
        self.selected
    }

    /// Rectangles of the buy, cancel and upgrade buttons, in that order.
    #[must_use]
    pub const fn button_rects(&self) -> [ButtonRect; 3] {
        [self.buy.rect(), self.cancel.rect(), self.upgrade.rect()]
    }

    /// Consumes world events and frame input to emit shop commands.
    pub fn handle(&mut self, events: &[Event], input: BuilderInput, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::TowerSelected { tower } => self.selected = Some(*tower),
                Event::SelectionCleared | Event::LevelConfigured { .. } => self.selected = None,
                _ => {}
            }
        }

        let pointer = input.pointer;
        if self.buy.poll(pointer) {
            self.placing = true;
        }
        if self.placing && self.cancel.poll(pointer) {
            self.placing = false;
        }
        if let Some(tower) = self.selected {
            if self.upgrade.poll(pointer) {
                out.push(Command::UpgradeTower { tower });
            }
        }

        if !input.clicked || !self.layout.in_play_area(pointer.position) {
            return;
        }
        let Some(tile) = TilePosition::containing(pointer.position, self.layout.tile_size) else {
            return;
        };

        out.push(Command::ClearSelection);
        if self.placing {
            out.push(Command::PlaceTower {
                kind: self.kind,
                tile,
            });
        } else {
            out.push(Command::SelectTower { tile });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_click_button_latches_until_release() {
        let rect = ButtonRect::new(Vec2::new(10.0, 10.0), Vec2::new(20.0, 20.0));
        let mut button = Button::new(rect, true);
        let inside = Vec2::new(15.0, 15.0);

        assert!(button.poll(PointerState::new(inside, true)));
        assert!(!button.poll(PointerState::new(inside, true)));
        assert!(!button.poll(PointerState::new(inside, false)));
        assert!(button.poll(PointerState::new(inside, true)));
    }

    #[test]
    fn repeating_button_fires_every_held_frame() {
        let rect = ButtonRect::new(Vec2::ZERO, Vec2::splat(10.0));
        let mut button = Button::new(rect, false);
        let inside = Vec2::splat(5.0);

        assert!(button.poll(PointerState::new(inside, true)));
        assert!(button.poll(PointerState::new(inside, true)));
    }

    #[test]
    fn pressing_outside_does_not_activate() {
        let rect = ButtonRect::new(Vec2::ZERO, Vec2::splat(10.0));
        let mut button = Button::new(rect, true);
        assert!(!button.poll(PointerState::new(Vec2::splat(10.0), true)));
    }

    #[test]
    fn buttons_stack_beside_the_play_area() {
        let builder = Builder::new(ShopLayout::new(15, 15, 64.0));
        let [buy, cancel, upgrade] = builder.button_rects();
        assert_eq!(buy.origin, Vec2::new(990.0, 120.0));
        assert_eq!(cancel.origin, Vec2::new(990.0, 180.0));
        assert_eq!(upgrade.origin, Vec2::new(990.0, 240.0));
    }

    #[test]
    fn play_area_excludes_panel() {
        let layout = ShopLayout::new(2, 2, 64.0);
        assert!(layout.in_play_area(Vec2::new(127.0, 0.0)));
        assert!(!layout.in_play_area(Vec2::new(128.0, 0.0)));
        assert!(!layout.in_play_area(Vec2::new(-1.0, 0.0)));
    }
}
