//! Keyboard and pointer mapping to movement intents

use crate::sim::MoveIntent;

/// One-shot commands produced by key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a run, or restart once the cooldown has passed
    Start,
    /// Toggle pause
    Pause,
}

/// Held-input state fed into every tick
#[derive(Debug, Clone, Default)]
pub struct InputState {
    key_left: bool,
    key_right: bool,
    /// Active pointer id and the side it is on (`true` = right half)
    pointer: Option<(i32, bool)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press. Returns a command for start/pause keys.
    pub fn key_down(&mut self, key: &str) -> Option<Command> {
        match normalize_key(key).as_str() {
            "a" | "arrowleft" => self.key_left = true,
            "d" | "arrowright" => self.key_right = true,
            " " | "space" | "spacebar" => return Some(Command::Start),
            "escape" | "esc" => return Some(Command::Pause),
            _ => {}
        }
        None
    }

    pub fn key_up(&mut self, key: &str) {
        match normalize_key(key).as_str() {
            "a" | "arrowleft" => self.key_left = false,
            "d" | "arrowright" => self.key_right = false,
            _ => {}
        }
    }

    /// Whether the key drives movement (the page should not scroll on it)
    pub fn is_movement_key(key: &str) -> bool {
        matches!(
            normalize_key(key).as_str(),
            "a" | "arrowleft" | "d" | "arrowright" | " " | "space" | "spacebar"
        )
    }

    /// Pointer pressed at `x` on a surface `width` wide. A new pointer
    /// takes over from any previous one.
    pub fn pointer_down(&mut self, id: i32, x: f32, width: f32) {
        self.pointer = Some((id, x >= width * 0.5));
    }

    /// Dragging across the midpoint switches sides
    pub fn pointer_move(&mut self, id: i32, x: f32, width: f32) {
        if let Some((active, _)) = self.pointer
            && active == id
        {
            self.pointer = Some((id, x >= width * 0.5));
        }
    }

    /// Release or cancel of the active pointer clears its intent
    pub fn pointer_up(&mut self, id: i32) {
        if matches!(self.pointer, Some((active, _)) if active == id) {
            self.pointer = None;
        }
    }

    /// Drop everything held, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    /// Combined intent from keys and pointer
    pub fn intent(&self) -> MoveIntent {
        let (pointer_left, pointer_right) = match self.pointer {
            Some((_, right)) => (!right, right),
            None => (false, false),
        };
        MoveIntent {
            left: self.key_left || pointer_left,
            right: self.key_right || pointer_right,
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.to_ascii_lowercase()
}
