//! Input binding and action dispatch
//!
//! This module turns keyboard and gamepad input into named overlay actions.
//!
//! # Architecture
//!
//! - Key files are parsed line by line into bindings ([`parser`])
//! - Bindings from all layered key files accumulate in a [`BindingRegistry`]
//! - Each tick the [`poller`] compares live device state with the previous
//!   tick and reports keyboard releases and gamepad presses
//! - Triggered action names are looked up in the host's [`ActionTable`]
//!
//! [`KeyActions`] ties these together. A C host reaches it through [`ffi`].
//!
//! # Thread Safety
//!
//! The engine itself takes `&mut self` for every mutating call. The C
//! surface keeps a single engine behind a mutex.

pub mod actions;
pub mod engine;
pub mod ffi;
pub mod gamepad;
pub mod keyboard;
pub mod keys;
pub mod loader;
pub mod parser;
pub mod poller;
pub mod registry;

pub use actions::{ActionHandler, ActionTable};
pub use engine::{KeyActions, KeyActionsError, KeyActionsResult, Report};
pub use gamepad::{ButtonBindings, GamepadButton, GamepadState, SLOT_COUNT};
pub use keyboard::{KeyBinding, KeyboardBindings, Modifiers};
pub use keys::{KeyTable, VK_CONTROL, VK_MENU, VK_SHIFT};
pub use loader::{ConfigDir, KeyFiles, PathResolver};
pub use parser::{BindingParser, ModifierScan, ParsedBinding};
pub use poller::InputDevices;
pub use registry::BindingRegistry;
