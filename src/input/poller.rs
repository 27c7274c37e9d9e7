//! Per-tick input polling
//!
//! Reads live device state through [`InputDevices`], compares it with the
//! state seen on the previous tick, and reports qualifying transitions:
//!
//! - keyboard bindings trigger when the key is **released**
//! - gamepad bindings trigger when the button is **pressed**

use super::gamepad::{ButtonBindings, GamepadButton, GamepadState, SLOT_COUNT};
use super::keyboard::{KeyboardBindings, Modifiers};
use super::keys::{VK_CONTROL, VK_MENU, VK_SHIFT};

/// Live device queries supplied by the platform layer.
///
/// Every query must return immediately; the poller calls them on the host's
/// main loop.
pub trait InputDevices {
    /// Whether the foreground top-level window belongs to this process
    fn owns_foreground_window(&self) -> bool;

    /// Whether the key with this virtual-key code is currently held
    fn is_key_down(&self, code: i32) -> bool;

    /// Current state of the controller in `slot`, or `None` if absent
    fn gamepad_state(&self, slot: usize) -> Option<GamepadState>;
}

/// Run the keyboard pass over every binding.
///
/// `down_last_frame` is refreshed for every binding on every call, including
/// bindings whose release was suppressed for a missing modifier.
pub fn poll_keyboard(
    bindings: &mut KeyboardBindings,
    devices: &dyn InputDevices,
    dispatch: &mut dyn FnMut(&str),
) {
    for (code, binding) in bindings.iter_mut() {
        let down_this_frame = devices.is_key_down(code);
        if binding.down_last_frame
            && !down_this_frame
            && modifiers_held(binding.modifiers(), devices)
        {
            log::info!("Action triggered: {}", binding.action);
            dispatch(&binding.action);
        }
        binding.down_last_frame = down_this_frame;
    }
}

fn modifiers_held(required: Modifiers, devices: &dyn InputDevices) -> bool {
    (!required.ctrl || devices.is_key_down(VK_CONTROL))
        && (!required.alt || devices.is_key_down(VK_MENU))
        && (!required.shift || devices.is_key_down(VK_SHIFT))
}

/// Run the gamepad pass over every controller slot.
///
/// A slot whose device is absent keeps its snapshot. A slot whose packet
/// number has not moved is not re-evaluated.
pub fn poll_gamepads(
    bindings: &ButtonBindings,
    snapshots: &mut [GamepadState; SLOT_COUNT],
    devices: &dyn InputDevices,
    dispatch: &mut dyn FnMut(&str),
) {
    for (slot, previous) in snapshots.iter_mut().enumerate() {
        let Some(current) = devices.gamepad_state(slot) else {
            continue;
        };
        if current.packet_number == previous.packet_number {
            continue;
        }

        for button in GamepadButton::ALL {
            if current.is_held(button) && !previous.is_held(button) {
                for action in bindings.actions_for(slot, button) {
                    log::info!("Action triggered: {} (pad {} {})", action, slot, button.name());
                    dispatch(action);
                }
            }
        }

        *previous = current;
    }
}
