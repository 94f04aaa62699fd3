// THEORY:
// The `GestureClassifier` turns the five "finger up" flags reported by the hand
// tracker into one discrete `Action` per frame. It is the only place where the
// interaction mode and the active drawing color change.
//
// Key architectural principles:
// 1.  **Small Persistent State**: The classifier remembers exactly two things, the
//     current `Mode` and the current `PaletteColor`. Everything else is a pure
//     function of the incoming vector.
// 2.  **Ordered Rules**: Rules are evaluated top to bottom and the first match wins.
//     The open-palm rule (all five fingers) is checked first so it can never be
//     mistaken for a partial pose.
// 3.  **Fail Soft**: An empty vector means no hand. A vector of any other wrong
//     length is treated the same way. Neither is an error; both yield
//     `Action::None` and leave the state untouched.
// 4.  **Green Is Unreachable**: The palette has five entries but only four fingers
//     select colors (the index finger is reserved for drawing). Green therefore
//     cannot be chosen by gesture.

use crate::core_modules::config::DEFAULT_COLOR;
use crate::core_modules::palette::PaletteColor;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// `[thumb, index, middle, ring, pinky]`, or empty when no hand is visible.
pub type FingerVector = Vec<bool>;

pub const FINGER_COUNT: usize = 5;
pub const THUMB: usize = 0;
pub const INDEX: usize = 1;
pub const MIDDLE: usize = 2;
pub const RING: usize = 3;
pub const PINKY: usize = 4;

/// The per-frame result of classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    None,
    Draw,
    Erase,
    Clear,
    Color,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Draw => "DRAW",
            Self::Erase => "ERASE",
            Self::Clear => "CLEAR",
            Self::Color => "COLOR",
        }
    }

    /// Whether the fingertip should be fed to the drawing engine this frame.
    pub fn moves_pen(&self) -> bool {
        matches!(self, Self::Draw | Self::Erase)
    }
}

/// The persistent interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Draw,
    Erase,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draw => "DRAW",
            Self::Erase => "ERASE",
        }
    }
}

/// Maps finger vectors to actions and tracks the active mode and color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GestureClassifier {
    mode: Mode,
    current_color: PaletteColor,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureClassifier {
    pub fn new() -> Self {
        Self {
            mode: Mode::Draw,
            current_color: DEFAULT_COLOR,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn current_color(&self) -> PaletteColor {
        self.current_color
    }

    /// Classifies one frame's finger vector.
    pub fn detect(&mut self, fingers: &[bool]) -> Action {
        if fingers.len() != FINGER_COUNT {
            return Action::None;
        }

        let total = fingers.iter().filter(|up| **up).count();

        // Open palm wins over everything else.
        if total == FINGER_COUNT {
            return Action::Clear;
        }

        if total == 2 && fingers[INDEX] && fingers[MIDDLE] {
            self.set_mode(Mode::Erase);
            return Action::Erase;
        }

        if total == 1 {
            if fingers[INDEX] {
                self.set_mode(Mode::Draw);
                return Action::Draw;
            }

            let selected = match fingers.iter().position(|up| *up) {
                Some(THUMB) => PaletteColor::Red,
                Some(MIDDLE) => PaletteColor::Blue,
                Some(RING) => PaletteColor::Yellow,
                Some(PINKY) => PaletteColor::Purple,
                _ => return Action::None,
            };
            self.set_color(selected);
            return Action::Color;
        }

        Action::None
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            debug!(from = self.mode.as_str(), to = mode.as_str(), "mode changed");
            self.mode = mode;
        }
    }

    fn set_color(&mut self, color: PaletteColor) {
        if self.current_color != color {
            debug!(from = %self.current_color, to = %color, "color changed");
            self.current_color = color;
        }
    }
}
