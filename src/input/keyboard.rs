//! Keyboard binding management
//!
//! Handles keyboard key bindings to named actions.

use std::collections::BTreeMap;

/// Modifier keys a binding requires to be held when it triggers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        alt: false,
        shift: false,
    };

    /// True when no modifier is required
    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift)
    }
}

/// A keyboard binding that maps a key code to an action name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    /// Name of the action to perform
    pub action: String,
    /// Ctrl must be held on trigger
    pub ctrl: bool,
    /// Alt must be held on trigger
    pub alt: bool,
    /// Shift must be held on trigger
    pub shift: bool,
    /// Whether the key was held on the previous tick
    pub down_last_frame: bool,
}

impl KeyBinding {
    /// Create a new key binding; the key starts out released
    pub fn new(action: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            action: action.into(),
            ctrl: modifiers.ctrl,
            alt: modifiers.alt,
            shift: modifiers.shift,
            down_last_frame: false,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        Modifiers {
            ctrl: self.ctrl,
            alt: self.alt,
            shift: self.shift,
        }
    }
}

/// Keyboard binding manager
///
/// Key code → bindings, iterated in ascending key-code order and in insertion
/// order within one code. The same code may be bound any number of times.
#[derive(Debug, Default, Clone)]
pub struct KeyboardBindings {
    by_code: BTreeMap<i32, Vec<KeyBinding>>,
}

impl KeyboardBindings {
    /// Create a new empty keyboard binding manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key binding. Existing bindings on the same code are kept.
    pub fn add_binding(&mut self, keycode: i32, binding: KeyBinding) {
        self.by_code.entry(keycode).or_default().push(binding);
    }

    /// Get all bindings for a keycode, in insertion order
    pub fn get_bindings(&self, keycode: i32) -> &[KeyBinding] {
        self.by_code
            .get(&keycode)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Check if a keycode has any bindings
    pub fn has_bindings(&self, keycode: i32) -> bool {
        self.by_code.contains_key(&keycode)
    }

    /// Get total number of bindings
    pub fn binding_count(&self) -> usize {
        self.by_code.values().map(Vec::len).sum()
    }

    /// Iterate every binding with its key code
    pub fn iter(&self) -> impl Iterator<Item = (i32, &KeyBinding)> {
        self.by_code
            .iter()
            .flat_map(|(&code, bindings)| bindings.iter().map(move |b| (code, b)))
    }

    /// Iterate every binding mutably with its key code
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (i32, &mut KeyBinding)> {
        self.by_code
            .iter_mut()
            .flat_map(|(&code, bindings)| bindings.iter_mut().map(move |b| (code, b)))
    }

    /// Clear all bindings
    pub fn clear(&mut self) {
        self.by_code.clear();
    }
}
