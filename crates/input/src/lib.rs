//! Keyboard input for the flight controls.
//!
//! Raw key events arrive asynchronously; the simulation reads a [`KeySnapshot`]
//! once at the start of each tick.

use std::collections::HashSet;

/// Logical controls the simulation understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// Nose up (W).
    PitchForward,
    /// Nose down (S).
    PitchBack,
    /// Bank and yaw left (A).
    RollLeft,
    /// Bank and yaw right (D).
    RollRight,
    /// Toggle the nose spotlight (F). Edge-triggered.
    Flashlight,
    /// Raise the speed multiplier (=). Edge-triggered.
    SpeedUp,
    /// Lower the speed multiplier (-). Edge-triggered.
    SpeedDown,
}

impl Control {
    pub const ALL: [Control; 7] = [
        Self::PitchForward,
        Self::PitchBack,
        Self::RollLeft,
        Self::RollRight,
        Self::Flashlight,
        Self::SpeedUp,
        Self::SpeedDown,
    ];

    /// Default key binding.
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(Self::PitchForward),
            KeyCode::KeyS => Some(Self::PitchBack),
            KeyCode::KeyA => Some(Self::RollLeft),
            KeyCode::KeyD => Some(Self::RollRight),
            KeyCode::KeyF => Some(Self::Flashlight),
            KeyCode::Equal | KeyCode::NumpadAdd => Some(Self::SpeedUp),
            KeyCode::Minus | KeyCode::NumpadSubtract => Some(Self::SpeedDown),
            _ => None,
        }
    }

    /// Parse a control from its config name (e.g. `"roll-left"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pitch-forward" => Some(Self::PitchForward),
            "pitch-back" => Some(Self::PitchBack),
            "roll-left" => Some(Self::RollLeft),
            "roll-right" => Some(Self::RollRight),
            "flashlight" => Some(Self::Flashlight),
            "speed-up" => Some(Self::SpeedUp),
            "speed-down" => Some(Self::SpeedDown),
            _ => None,
        }
    }
}

/// Held-state table plus the debounce latches for toggle-type controls.
#[derive(Debug, Default, Clone)]
pub struct KeyState {
    held: HashSet<Control>,
    /// Toggle controls that have already fired for the current hold.
    latched: HashSet<Control>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a keyboard event. Unbound keys are ignored.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) {
        if let Some(control) = Control::from_key(key) {
            self.set_held(control, state.is_pressed());
        }
    }

    pub fn set_held(&mut self, control: Control, held: bool) {
        if held {
            self.held.insert(control);
        } else {
            self.held.remove(&control);
        }
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held.contains(&control)
    }

    /// Edge-trigger a toggle control: returns true only on the first call while it is held.
    /// Releasing the control re-arms it.
    pub fn take_toggle(&mut self, control: Control) -> bool {
        if self.held.contains(&control) {
            if self.latched.contains(&control) {
                false
            } else {
                self.latched.insert(control);
                true
            }
        } else {
            self.latched.remove(&control);
            false
        }
    }

    /// Read the held table and consume toggle edges for this tick.
    pub fn snapshot(&mut self) -> KeySnapshot {
        KeySnapshot {
            pitch_forward: self.is_held(Control::PitchForward),
            pitch_back: self.is_held(Control::PitchBack),
            roll_left: self.is_held(Control::RollLeft),
            roll_right: self.is_held(Control::RollRight),
            flashlight_toggled: self.take_toggle(Control::Flashlight),
            speed_up: self.take_toggle(Control::SpeedUp),
            speed_down: self.take_toggle(Control::SpeedDown),
        }
    }
}

/// Per-tick view of the controls: level-triggered axes and edge-triggered actions.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeySnapshot {
    pub pitch_forward: bool,
    pub pitch_back: bool,
    pub roll_left: bool,
    pub roll_right: bool,
    pub flashlight_toggled: bool,
    pub speed_up: bool,
    pub speed_down: bool,
}

// Re-export for convenience
pub use winit::event::ElementState;
pub use winit::keyboard::KeyCode;
