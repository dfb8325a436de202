use crate::foundation::core::Point;

/// Pointer snapshot handed to the running scene each tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    /// Canvas-space position.
    pub position: Point,
    /// Button held.
    pub pressed: bool,
    /// A press started since the previous tick.
    pub just_pressed: bool,
}

/// Turns raw pointer samples into per-tick [`PointerState`]s.
#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    state: PointerState,
}

impl PointerTracker {
    /// Tracker with the pointer released at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample. A release-to-press edge sets `just_pressed` until
    /// the next [`Self::end_tick`], so a press released within one frame
    /// still counts.
    pub fn sample(&mut self, x: f64, y: f64, pressed: bool) {
        if pressed && !self.state.pressed {
            self.state.just_pressed = true;
        }
        self.state.position = Point::new(x, y);
        self.state.pressed = pressed;
    }

    /// Current snapshot.
    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Forget the press edge once a tick has seen it.
    pub fn end_tick(&mut self) {
        self.state.just_pressed = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/input.rs"]
mod tests;
