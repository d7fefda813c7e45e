//! Keyboard to intent mapping
//!
//! Key events never touch the simulation directly. They set held flags and
//! queue a one-shot confirm that the next tick consumes.

use crate::settings::KeyBindings;
use crate::sim::{GamePhase, TickInput};

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Confirm,
}

#[derive(Debug, Clone, Default)]
pub struct Controls {
    bindings: KeyBindings,
    input: TickInput,
}

impl Controls {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            input: TickInput::default(),
        }
    }

    /// Resolve a `KeyboardEvent.key` value; arrow keys always steer
    pub fn map_key(&self, key: &str) -> Option<Key> {
        let b = &self.bindings;
        if key == b.confirm {
            Some(Key::Confirm)
        } else if key == b.left || key == "ArrowLeft" {
            Some(Key::Left)
        } else if key == b.right || key == "ArrowRight" {
            Some(Key::Right)
        } else {
            None
        }
    }

    /// Returns true if the key belongs to the game
    pub fn key_down(&mut self, key: &str, phase: GamePhase) -> bool {
        match self.map_key(key) {
            Some(Key::Left) => {
                if phase == GamePhase::Playing {
                    self.input.left = true;
                }
                true
            }
            Some(Key::Right) => {
                if phase == GamePhase::Playing {
                    self.input.right = true;
                }
                true
            }
            // Confirm acts on release
            Some(Key::Confirm) => true,
            None => false,
        }
    }

    /// Returns true if the key belongs to the game
    pub fn key_up(&mut self, key: &str, phase: GamePhase) -> bool {
        match self.map_key(key) {
            Some(Key::Confirm) => {
                self.input.confirm = true;
                if phase != GamePhase::Playing {
                    // Start the next run with nothing held
                    self.input.left = false;
                    self.input.right = false;
                }
                true
            }
            Some(Key::Left) => {
                if phase == GamePhase::Playing {
                    self.input.left = false;
                }
                true
            }
            Some(Key::Right) => {
                if phase == GamePhase::Playing {
                    self.input.right = false;
                }
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    fn input(&self) -> &TickInput {
        &self.input
    }

    /// Intent for the next tick; clears one-shot commands
    pub fn consume(&mut self) -> TickInput {
        let input = self.input.clone();
        self.input.confirm = false;
        input
    }
}
