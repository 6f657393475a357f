//! Keyboard state tracking with both edge-triggered and level-triggered queries.
//!
//! - **Level-triggered (held):** `is_held(key)` returns true every frame the key
//!   is physically down. Used for continuous steering.
//!
//! - **Edge-triggered (just_pressed):** True only during the frame the
//!   transition happened. Cleared by `end_frame()`, which the main loop calls
//!   only after at least one fixed simulation step has consumed them, so a
//!   press landing on a zero-step frame is not silently lost.
//!
//! Pointer input is deliberately absent: menu buttons are owned by the egui
//! layer, which consumes mouse events before they reach the game.

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Enter,
    W,
    A,
    S,
    D,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
}

impl Key {
    /// The digit value for model-switch keys, None for everything else.
    pub fn digit(self) -> Option<u8> {
        match self {
            Key::Digit1 => Some(1),
            Key::Digit2 => Some(2),
            Key::Digit3 => Some(3),
            Key::Digit4 => Some(4),
            Key::Digit5 => Some(5),
            _ => None,
        }
    }
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    /// First model-switch digit pressed this frame, if any.
    pub fn just_pressed_digit(&self) -> Option<u8> {
        self.just_pressed.iter().find_map(|k| k.digit())
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_down_sets_held_and_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));
    }

    #[test]
    fn key_up_clears_held_sets_just_released() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
        assert!(input.is_just_released(Key::A));
    }

    #[test]
    fn key_repeat_does_not_double_just_pressed() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.end_frame();
        // OS key-repeat delivers another down for a key that is already held;
        // it must not re-arm the edge.
        input.key_down(Key::Left);
        assert!(input.is_held(Key::Left));
        assert!(!input.is_just_pressed(Key::Left));
    }

    #[test]
    fn key_up_without_down_is_no_op() {
        let mut input = InputState::new();
        input.key_up(Key::A);
        assert!(!input.is_just_released(Key::A));
        assert!(!input.is_held(Key::A));
    }

    #[test]
    fn end_frame_clears_transient_state_keeps_held() {
        let mut input = InputState::new();
        input.key_down(Key::Up);
        input.key_down(Key::Enter);
        input.end_frame();
        assert!(!input.is_just_pressed(Key::Up));
        assert!(!input.is_just_pressed(Key::Enter));
        assert!(input.is_held(Key::Up));
        assert!(input.is_held(Key::Enter));
    }

    #[test]
    fn digit_query_maps_model_keys() {
        let mut input = InputState::new();
        assert_eq!(input.just_pressed_digit(), None);
        input.key_down(Key::Digit3);
        assert_eq!(input.just_pressed_digit(), Some(3));
        input.end_frame();
        assert_eq!(input.just_pressed_digit(), None);
    }

    #[test]
    fn multiple_keys_tracked_independently() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        input.key_down(Key::D);
        input.key_up(Key::A);
        assert!(!input.is_held(Key::A));
        assert!(input.is_held(Key::D));
        assert!(input.is_just_released(Key::A));
        assert!(!input.is_just_released(Key::D));
    }
}
