//! Gamepad input handling
//!
//! Handles controller button bindings per controller slot.

use std::collections::BTreeMap;

/// Number of controller slots polled each tick
pub const SLOT_COUNT: usize = 4;

/// Controller buttons, in the order bindings are matched and evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
    Start,
    Back,
    LeftThumb,
    RightThumb,
    LeftShoulder,
    RightShoulder,
    A,
    B,
    X,
    Y,
}

impl GamepadButton {
    /// Every button in evaluation order.
    ///
    /// `Back` precedes `B` so `X0_BACK` is never read as a `B` binding.
    pub const ALL: [GamepadButton; 14] = [
        GamepadButton::DpadUp,
        GamepadButton::DpadDown,
        GamepadButton::DpadLeft,
        GamepadButton::DpadRight,
        GamepadButton::Start,
        GamepadButton::Back,
        GamepadButton::LeftThumb,
        GamepadButton::RightThumb,
        GamepadButton::LeftShoulder,
        GamepadButton::RightShoulder,
        GamepadButton::A,
        GamepadButton::B,
        GamepadButton::X,
        GamepadButton::Y,
    ];

    /// Bit of this button in a controller button mask
    pub const fn mask(self) -> u16 {
        match self {
            GamepadButton::DpadUp => 0x0001,
            GamepadButton::DpadDown => 0x0002,
            GamepadButton::DpadLeft => 0x0004,
            GamepadButton::DpadRight => 0x0008,
            GamepadButton::Start => 0x0010,
            GamepadButton::Back => 0x0020,
            GamepadButton::LeftThumb => 0x0040,
            GamepadButton::RightThumb => 0x0080,
            GamepadButton::LeftShoulder => 0x0100,
            GamepadButton::RightShoulder => 0x0200,
            GamepadButton::A => 0x1000,
            GamepadButton::B => 0x2000,
            GamepadButton::X => 0x4000,
            GamepadButton::Y => 0x8000,
        }
    }

    /// Symbol used for this button in key files
    pub const fn name(self) -> &'static str {
        match self {
            GamepadButton::DpadUp => "DPAD_UP",
            GamepadButton::DpadDown => "DPAD_DOWN",
            GamepadButton::DpadLeft => "DPAD_LEFT",
            GamepadButton::DpadRight => "DPAD_RIGHT",
            GamepadButton::Start => "START",
            GamepadButton::Back => "BACK",
            GamepadButton::LeftThumb => "LEFT_THUMB",
            GamepadButton::RightThumb => "RIGHT_THUMB",
            GamepadButton::LeftShoulder => "LEFT_SHOULDER",
            GamepadButton::RightShoulder => "RIGHT_SHOULDER",
            GamepadButton::A => "A",
            GamepadButton::B => "B",
            GamepadButton::X => "X",
            GamepadButton::Y => "Y",
        }
    }
}

/// One controller's state as reported by the device layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GamepadState {
    /// Increases whenever the hardware state changes
    pub packet_number: u32,
    /// Held buttons as a bitmask of [`GamepadButton::mask`] values
    pub buttons: u16,
}

impl GamepadState {
    pub fn new(packet_number: u32, buttons: u16) -> Self {
        Self {
            packet_number,
            buttons,
        }
    }

    pub fn is_held(&self, button: GamepadButton) -> bool {
        self.buttons & button.mask() != 0
    }
}

/// Button bindings for all controller slots
///
/// Per slot: button mask → action names in insertion order.
#[derive(Debug, Default, Clone)]
pub struct ButtonBindings {
    slots: [BTreeMap<u16, Vec<String>>; SLOT_COUNT],
}

impl ButtonBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an action for a button on a slot; out-of-range slots are ignored
    pub fn add_binding(&mut self, slot: usize, button: GamepadButton, action: impl Into<String>) -> bool {
        let Some(map) = self.slots.get_mut(slot) else {
            return false;
        };
        map.entry(button.mask()).or_default().push(action.into());
        true
    }

    /// Actions bound to a button on a slot, in insertion order
    pub fn actions_for(&self, slot: usize, button: GamepadButton) -> &[String] {
        self.slots
            .get(slot)
            .and_then(|map| map.get(&button.mask()))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Iterate `(slot, mask, action)` for every binding
    pub fn iter(&self) -> impl Iterator<Item = (usize, u16, &str)> {
        self.slots.iter().enumerate().flat_map(|(slot, map)| {
            map.iter()
                .flat_map(move |(&mask, actions)| actions.iter().map(move |a| (slot, mask, a.as_str())))
        })
    }

    pub fn binding_count(&self) -> usize {
        self.slots
            .iter()
            .map(|map| map.values().map(Vec::len).sum::<usize>())
            .sum()
    }

    pub fn clear(&mut self) {
        for map in &mut self.slots {
            map.clear();
        }
    }
}
