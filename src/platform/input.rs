//! Keyboard and touch translation into simulation input
//!
//! The simulation only understands held directions and a fire flag. This
//! module turns raw key names and touch positions into that shape.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{MovementIntent, TickInput};

/// Touches starting this close to the ship steer it directly
pub const DIRECT_GRAB_RADIUS: f32 = 60.0;
/// Ship displacement per px of finger displacement in relative mode
pub const RELATIVE_GAIN: f32 = 1.5;
/// Per-axis distance under which the ship counts as on target
pub const INTENT_DEAD_ZONE: f32 = 4.0;

/// Held keyboard keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyboardState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

impl KeyboardState {
    /// Record a key press/release. Returns false for unbound keys so the
    /// caller can let the browser handle them.
    pub fn set_key(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowLeft" | "a" | "A" => &mut self.left,
            "ArrowRight" | "d" | "D" => &mut self.right,
            "ArrowUp" | "w" | "W" => &mut self.up,
            "ArrowDown" | "s" | "S" => &mut self.down,
            " " | "Spacebar" => &mut self.fire,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    pub fn intent(&self) -> MovementIntent {
        MovementIntent {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
        }
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// How a touch gesture steers the ship, fixed when the gesture starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControlMode {
    /// Ship heads for the finger
    Direct,
    /// Ship mirrors the finger's displacement from where it went down
    Relative,
}

/// An in-progress touch gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchGesture {
    pub mode: ControlMode,
    /// Finger position at gesture start
    pub origin: Vec2,
    /// Ship position at gesture start
    pub anchor: Vec2,
    /// Latest finger position
    pub current: Vec2,
}

impl TouchGesture {
    /// Where the ship should head
    pub fn target(&self) -> Vec2 {
        match self.mode {
            ControlMode::Direct => self.current,
            ControlMode::Relative => self.anchor + (self.current - self.origin) * RELATIVE_GAIN,
        }
    }
}

/// Tracks the single active touch gesture
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    gesture: Option<TouchGesture>,
}

impl TouchTracker {
    /// Start a gesture and decide its control mode
    pub fn begin(&mut self, touch: Vec2, player_pos: Vec2) -> ControlMode {
        let mode = if touch.distance(player_pos) <= DIRECT_GRAB_RADIUS {
            ControlMode::Direct
        } else {
            ControlMode::Relative
        };
        self.gesture = Some(TouchGesture {
            mode,
            origin: touch,
            anchor: player_pos,
            current: touch,
        });
        mode
    }

    pub fn move_to(&mut self, touch: Vec2) {
        if let Some(gesture) = self.gesture.as_mut() {
            gesture.current = touch;
        }
    }

    pub fn end(&mut self) {
        self.gesture = None;
    }

    pub fn gesture(&self) -> Option<&TouchGesture> {
        self.gesture.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.gesture.is_some()
    }

    /// Movement needed to bring the ship toward the gesture target
    pub fn intent(&self, player_pos: Vec2) -> MovementIntent {
        self.gesture
            .map(|g| intent_toward(player_pos, g.target()))
            .unwrap_or_default()
    }
}

/// Directions that move `from` toward `to`, ignoring small offsets
pub fn intent_toward(from: Vec2, to: Vec2) -> MovementIntent {
    let delta = to - from;
    MovementIntent {
        left: delta.x < -INTENT_DEAD_ZONE,
        right: delta.x > INTENT_DEAD_ZONE,
        up: delta.y < -INTENT_DEAD_ZONE,
        down: delta.y > INTENT_DEAD_ZONE,
    }
}

/// Combined keyboard + touch state owned by the host
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pub keyboard: KeyboardState,
    pub touch: TouchTracker,
}

impl InputState {
    /// Build the tick input. Keyboard and touch directions are merged; fire
    /// is held while the fire key is down or any touch is active.
    pub fn tick_input(&self, player_pos: Vec2, playfield: Vec2) -> TickInput {
        let keys = self.keyboard.intent();
        let touch = self.touch.intent(player_pos);
        TickInput {
            movement: MovementIntent {
                left: keys.left || touch.left,
                right: keys.right || touch.right,
                up: keys.up || touch.up,
                down: keys.down || touch.down,
            },
            fire: self.keyboard.fire || self.touch.is_active(),
            playfield,
        }
    }
}
