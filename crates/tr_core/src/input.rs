//! Keyboard state with level-triggered and edge-triggered queries.
//!
//! - `is_held(key)` is true every tick the key is down (movement).
//! - `is_just_pressed(key)` is true only until `end_frame()` (toggles, exit).
//!   The main loop calls `end_frame()` after the first fixed step that sees the
//!   press, so a press landing on a frame with zero steps is not lost.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    A,
    D,
    Escape,
    F3,
}

#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    /// Horizontal intent from the arrow keys or A/D: -1, 0 or 1.
    pub fn horizontal_axis(&self) -> i32 {
        let mut axis = 0;
        if self.is_held(Key::Left) || self.is_held(Key::A) {
            axis -= 1;
        }
        if self.is_held(Key::Right) || self.is_held(Key::D) {
            axis += 1;
        }
        axis
    }

    /// Drop all held keys, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
    }
}
