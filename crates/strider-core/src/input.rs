//! Logical input bindings and the input-to-command handler.
//!
//! Physical keys are mapped to logical [`Binding`]s by a [`KeyMap`]; the
//! [`InputHandler`] reads which bindings are actuated from an
//! [`InputDeviceSource`] and turns them into [`Command`]s.
//!
//! # Opposing Inputs
//!
//! Holding both bindings of an axis (left and right, or up and down) cancels
//! movement on that axis. Cancellation is applied to the whole frame's
//! snapshot before any command is produced, so the answer for a binding does
//! not depend on the order bindings are queried in.
//!
//! # Example
//!
//! ```
//! use strider_core::command::Command;
//! use strider_core::input::{Binding, InputHandler, KeyCode, KeyMap, KeyboardState};
//!
//! let mut keyboard = KeyboardState::new(KeyMap::default());
//! keyboard.press(KeyCode::LEFT);
//! keyboard.press(KeyCode::RIGHT);
//! keyboard.press(KeyCode::UP);
//!
//! let handler = InputHandler::new(keyboard);
//! assert_eq!(handler.handle_input(Binding::MoveLeft), None);
//! assert_eq!(handler.handle_input(Binding::MoveUp), Some(Command::MoveUp));
//! assert_eq!(handler.poll(), vec![Command::MoveUp]);
//! ```

use std::collections::{HashMap, HashSet};
use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::ports::InputDeviceSource;

// =============================================================================
// Bindings
// =============================================================================

/// A logical input action, independent of the key producing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Binding {
    /// Move left.
    MoveLeft,
    /// Move right.
    MoveRight,
    /// Move up.
    MoveUp,
    /// Move down.
    MoveDown,
    /// Attack.
    Attack,
}

impl Binding {
    /// Every binding, in polling order.
    pub const ALL: [Binding; 5] = [
        Binding::MoveLeft,
        Binding::MoveRight,
        Binding::MoveUp,
        Binding::MoveDown,
        Binding::Attack,
    ];

    /// The binding on the other end of this binding's axis.
    #[must_use]
    pub const fn opposite(self) -> Option<Self> {
        match self {
            Self::MoveLeft => Some(Self::MoveRight),
            Self::MoveRight => Some(Self::MoveLeft),
            Self::MoveUp => Some(Self::MoveDown),
            Self::MoveDown => Some(Self::MoveUp),
            Self::Attack => None,
        }
    }

    /// Command dispatched when this binding is actuated.
    #[must_use]
    pub const fn command(self) -> Command {
        match self {
            Self::MoveLeft => Command::MoveLeft,
            Self::MoveRight => Command::MoveRight,
            Self::MoveUp => Command::MoveUp,
            Self::MoveDown => Command::MoveDown,
            Self::Attack => Command::Attack,
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.command(), f)
    }
}

bitflags! {
    /// Set of actuated bindings for one frame.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct BindingSet: u8 {
        /// Move left is held.
        const MOVE_LEFT = 1 << 0;
        /// Move right is held.
        const MOVE_RIGHT = 1 << 1;
        /// Move up is held.
        const MOVE_UP = 1 << 2;
        /// Move down is held.
        const MOVE_DOWN = 1 << 3;
        /// Attack is held.
        const ATTACK = 1 << 4;

        /// Both horizontal bindings.
        const HORIZONTAL = Self::MOVE_LEFT.bits() | Self::MOVE_RIGHT.bits();
        /// Both vertical bindings.
        const VERTICAL = Self::MOVE_UP.bits() | Self::MOVE_DOWN.bits();
    }
}

impl From<Binding> for BindingSet {
    fn from(binding: Binding) -> Self {
        match binding {
            Binding::MoveLeft => Self::MOVE_LEFT,
            Binding::MoveRight => Self::MOVE_RIGHT,
            Binding::MoveUp => Self::MOVE_UP,
            Binding::MoveDown => Self::MOVE_DOWN,
            Binding::Attack => Self::ATTACK,
        }
    }
}

impl BindingSet {
    /// Reads every binding from `device` once.
    #[must_use]
    pub fn snapshot<D: InputDeviceSource + ?Sized>(device: &D) -> Self {
        Binding::ALL
            .into_iter()
            .filter(|binding| device.is_actuated(*binding))
            .map(Self::from)
            .collect()
    }

    /// Whether `binding` is in the set.
    #[must_use]
    pub fn has(self, binding: Binding) -> bool {
        self.contains(Self::from(binding))
    }

    /// This set with every fully held axis removed.
    #[must_use]
    pub fn without_conflicts(self) -> Self {
        let mut resolved = self;
        for axis in [Self::HORIZONTAL, Self::VERTICAL] {
            if self.contains(axis) {
                resolved.remove(axis);
            }
        }
        resolved
    }

    /// Command for `binding` if it is in the set.
    #[must_use]
    pub fn command_for(self, binding: Binding) -> Option<Command> {
        self.has(binding).then_some(binding.command())
    }

    /// Commands for every binding in the set, in polling order.
    pub fn commands(self) -> impl Iterator<Item = Command> {
        Binding::ALL
            .into_iter()
            .filter_map(move |binding| self.command_for(binding))
    }
}

// =============================================================================
// Input Handler
// =============================================================================

/// Maps logical bindings to commands for the current frame.
#[derive(Debug, Clone)]
pub struct InputHandler<D> {
    device: D,
}

impl<D: InputDeviceSource> InputHandler<D> {
    /// Creates a handler reading from `device`.
    #[must_use]
    pub fn new(device: D) -> Self {
        Self { device }
    }

    /// The underlying device.
    #[must_use]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutable access to the underlying device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// The frame's actuated bindings with opposing pairs cancelled.
    #[must_use]
    pub fn resolved(&self) -> BindingSet {
        BindingSet::snapshot(&self.device).without_conflicts()
    }

    /// Command for `binding` if it is actuated this frame.
    ///
    /// A movement binding whose opposite is also actuated yields `None`.
    #[must_use]
    pub fn handle_input(&self, binding: Binding) -> Option<Command> {
        self.resolved().command_for(binding)
    }

    /// Every command for this frame, in polling order.
    #[must_use]
    pub fn poll(&self) -> Vec<Command> {
        self.resolved().commands().collect()
    }
}

// =============================================================================
// Keyboard
// =============================================================================

/// Physical key code (USB HID usage id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyCode(pub u32);

impl KeyCode {
    /// Space bar.
    pub const SPACE: Self = Self(0x2C);
    /// Right arrow.
    pub const RIGHT: Self = Self(0x4F);
    /// Left arrow.
    pub const LEFT: Self = Self(0x50);
    /// Down arrow.
    pub const DOWN: Self = Self(0x51);
    /// Up arrow.
    pub const UP: Self = Self(0x52);
    /// Letter A.
    pub const A: Self = Self(0x04);
    /// Letter D.
    pub const D: Self = Self(0x07);
    /// Letter S.
    pub const S: Self = Self(0x16);
    /// Letter W.
    pub const W: Self = Self(0x1A);
}

/// Which physical keys actuate each binding.
///
/// The default map uses the arrow keys for movement and space to attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyMap {
    keys: HashMap<Binding, Vec<KeyCode>>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let keys = HashMap::from([
            (Binding::MoveLeft, vec![KeyCode::LEFT]),
            (Binding::MoveRight, vec![KeyCode::RIGHT]),
            (Binding::MoveUp, vec![KeyCode::UP]),
            (Binding::MoveDown, vec![KeyCode::DOWN]),
            (Binding::Attack, vec![KeyCode::SPACE]),
        ]);
        Self { keys }
    }
}

impl KeyMap {
    /// A map with no keys bound.
    #[must_use]
    pub fn empty() -> Self {
        Self { keys: HashMap::new() }
    }

    /// Adds `key` as a trigger for `binding`.
    #[must_use]
    pub fn bind(mut self, binding: Binding, key: KeyCode) -> Self {
        let keys = self.keys.entry(binding).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
        self
    }

    /// Keys bound to `binding`.
    #[must_use]
    pub fn keys_for(&self, binding: Binding) -> &[KeyCode] {
        self.keys.get(&binding).map(Vec::as_slice).unwrap_or_default()
    }
}

/// Keyboard state as a set of held keys, read through a [`KeyMap`].
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    map: KeyMap,
    held: HashSet<KeyCode>,
}

impl KeyboardState {
    /// Creates a keyboard with no keys held.
    #[must_use]
    pub fn new(map: KeyMap) -> Self {
        Self {
            map,
            held: HashSet::new(),
        }
    }

    /// Marks `key` as held.
    pub fn press(&mut self, key: KeyCode) {
        self.held.insert(key);
    }

    /// Marks `key` as released.
    pub fn release(&mut self, key: KeyCode) {
        self.held.remove(&key);
    }

    /// Releases every key.
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Whether `key` is held.
    #[must_use]
    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }
}

impl InputDeviceSource for KeyboardState {
    fn is_actuated(&self, binding: Binding) -> bool {
        self.map.keys_for(binding).iter().any(|key| self.held.contains(key))
    }
}

impl InputDeviceSource for BindingSet {
    fn is_actuated(&self, binding: Binding) -> bool {
        self.has(binding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(held: BindingSet) -> InputHandler<BindingSet> {
        InputHandler::new(held)
    }

    #[test]
    fn nothing_held_yields_nothing() {
        let handler = handler(BindingSet::empty());
        for binding in Binding::ALL {
            assert_eq!(handler.handle_input(binding), None);
        }
        assert!(handler.poll().is_empty());
    }

    #[test]
    fn single_binding_yields_its_command() {
        for binding in Binding::ALL {
            let handler = handler(BindingSet::from(binding));
            assert_eq!(handler.handle_input(binding), Some(binding.command()));
            assert_eq!(handler.poll(), vec![binding.command()]);
        }
    }

    #[test]
    fn opposing_pairs_cancel() {
        let handler = handler(BindingSet::HORIZONTAL | BindingSet::MOVE_DOWN);
        assert_eq!(handler.handle_input(Binding::MoveLeft), None);
        assert_eq!(handler.handle_input(Binding::MoveRight), None);
        assert_eq!(handler.poll(), vec![Command::MoveDown]);

        let handler = handler_all_movement();
        assert!(handler.poll().is_empty());
    }

    fn handler_all_movement() -> InputHandler<BindingSet> {
        handler(BindingSet::HORIZONTAL | BindingSet::VERTICAL)
    }

    #[test]
    fn attack_is_never_cancelled() {
        let handler = handler(BindingSet::VERTICAL | BindingSet::ATTACK);
        assert_eq!(handler.poll(), vec![Command::Attack]);
    }

    #[test]
    fn answer_does_not_depend_on_query_order() {
        let handler = handler(BindingSet::MOVE_RIGHT | BindingSet::MOVE_UP);
        let forward: Vec<_> = Binding::ALL.iter().map(|b| handler.handle_input(*b)).collect();
        let backward: Vec<_> = Binding::ALL.iter().rev().map(|b| handler.handle_input(*b)).collect();
        let mut backward = backward;
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn keyboard_reads_through_key_map() {
        let map = KeyMap::default().bind(Binding::MoveLeft, KeyCode::A);
        let mut keyboard = KeyboardState::new(map);
        keyboard.press(KeyCode::A);
        assert!(keyboard.is_actuated(Binding::MoveLeft));
        assert!(!keyboard.is_actuated(Binding::MoveRight));

        keyboard.release(KeyCode::A);
        assert!(!keyboard.is_actuated(Binding::MoveLeft));
    }

    #[test]
    fn unbound_binding_is_never_actuated() {
        let mut keyboard = KeyboardState::new(KeyMap::empty());
        keyboard.press(KeyCode::SPACE);
        assert!(!keyboard.is_actuated(Binding::Attack));
        assert!(keyboard.is_held(KeyCode::SPACE));
    }

    #[test]
    fn key_map_deserializes_from_json() {
        let json = r#"{"MoveLeft": [4, 80], "Attack": [44]}"#;
        let map: KeyMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.keys_for(Binding::MoveLeft), &[KeyCode::A, KeyCode::LEFT]);
        assert_eq!(map.keys_for(Binding::Attack), &[KeyCode::SPACE]);
        assert!(map.keys_for(Binding::MoveUp).is_empty());
    }

    #[test]
    fn bind_does_not_duplicate_keys() {
        let map = KeyMap::empty()
            .bind(Binding::MoveUp, KeyCode::W)
            .bind(Binding::MoveUp, KeyCode::W);
        assert_eq!(map.keys_for(Binding::MoveUp), &[KeyCode::W]);
    }
}
