//! Key action engine
//!
//! [`KeyActions`] owns everything the overlay needs to turn input into
//! actions: the loaded bindings, the action table and the last seen state of
//! every controller slot. The host builds one at startup, loads key files
//! into it and calls [`KeyActions::process_io`] once per frame.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::actions::ActionTable;
use super::gamepad::{GamepadState, SLOT_COUNT};
use super::loader::{self, KeyFiles, PathResolver};
use super::parser::BindingParser;
use super::poller::{self, InputDevices};
use super::registry::BindingRegistry;

/// Errors from key action operations
#[derive(Debug, Error)]
pub enum KeyActionsError {
    /// A key file exists but could not be read
    #[error("failed to read key file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for key action operations
pub type KeyActionsResult<T> = Result<T, KeyActionsError>;

/// Input binding and action dispatch engine
#[derive(Debug)]
pub struct KeyActions {
    registry: BindingRegistry,
    actions: ActionTable,
    pads: [GamepadState; SLOT_COUNT],
    parser: BindingParser,
}

impl Default for KeyActions {
    fn default() -> Self {
        Self::new(ActionTable::default())
    }
}

impl KeyActions {
    /// Create an engine with no bindings that dispatches into `actions`
    pub fn new(actions: ActionTable) -> Self {
        Self {
            registry: BindingRegistry::new(),
            actions,
            pads: [GamepadState::default(); SLOT_COUNT],
            parser: BindingParser::default(),
        }
    }

    /// Use a different parser for subsequent loads
    pub fn with_parser(mut self, parser: BindingParser) -> Self {
        self.parser = parser;
        self
    }

    /// Load the layered key files. Returns the number of bindings added.
    pub fn load(&mut self, resolver: &dyn PathResolver, files: &KeyFiles) -> usize {
        loader::load_layered(&mut self.registry, &self.parser, resolver, files)
    }

    /// Add the bindings in one key file's text
    pub fn load_str(&mut self, text: &str) -> usize {
        self.registry.load_str(&self.parser, text)
    }

    /// Add the bindings in one key file; a missing file adds none
    pub fn load_file(&mut self, path: &Path) -> KeyActionsResult<usize> {
        self.registry.load_file(&self.parser, path)
    }

    /// Poll input once and dispatch every triggered action.
    ///
    /// Does nothing while another process owns the foreground window. The
    /// keyboard pass runs before the gamepad pass.
    pub fn process_io(&mut self, devices: &dyn InputDevices) {
        let actions = &mut self.actions;
        Self::poll_passes(&mut self.registry, &mut self.pads, devices, &mut |name| {
            actions.perform(name);
        });
    }

    /// Poll input once and return the triggered action names in dispatch
    /// order without running them.
    ///
    /// Binding state advances exactly as in [`process_io`](Self::process_io),
    /// so the caller owns dispatch of the returned names.
    pub fn poll(&mut self, devices: &dyn InputDevices) -> Vec<String> {
        let mut triggered = Vec::new();
        Self::poll_passes(&mut self.registry, &mut self.pads, devices, &mut |name| {
            triggered.push(name.to_string());
        });
        triggered
    }

    fn poll_passes(
        registry: &mut BindingRegistry,
        pads: &mut [GamepadState; SLOT_COUNT],
        devices: &dyn InputDevices,
        dispatch: &mut dyn FnMut(&str),
    ) {
        if !devices.owns_foreground_window() {
            return;
        }

        poller::poll_keyboard(registry.keyboard_mut(), devices, dispatch);
        poller::poll_gamepads(registry.buttons(), pads, devices, dispatch);
    }

    /// Run the action registered under `name`; unknown names do nothing.
    pub fn perform_action(&mut self, name: &str) -> bool {
        self.actions.perform(name)
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn parser(&self) -> &BindingParser {
        &self.parser
    }

    /// Last stored state for a controller slot
    pub fn gamepad_snapshot(&self, slot: usize) -> Option<GamepadState> {
        self.pads.get(slot).copied()
    }

    /// Drop every binding and forget all controller state
    pub fn clear_bindings(&mut self) {
        self.registry.clear();
        self.pads = [GamepadState::default(); SLOT_COUNT];
    }

    /// Snapshot of the loaded bindings and the known names
    pub fn report(&self) -> Report {
        Report {
            key_bindings: self
                .registry
                .keyboard()
                .iter()
                .map(|(code, b)| (code, b.action.clone()))
                .collect(),
            button_bindings: self
                .registry
                .buttons()
                .iter()
                .map(|(slot, mask, action)| (slot, mask, action.to_string()))
                .collect(),
            actions: self.actions.names().map(str::to_string).collect(),
            keys: self.parser.keys().names().collect(),
        }
    }

    /// Write the report to the log
    pub fn log_report(&self) {
        self.report().log();
    }
}

/// Loaded bindings and known names, in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// `(key code, action)`
    pub key_bindings: Vec<(i32, String)>,
    /// `(slot, button mask, action)`
    pub button_bindings: Vec<(usize, u16, String)>,
    pub actions: Vec<String>,
    pub keys: Vec<&'static str>,
}

const SECTION_END: &str = "=============";

impl Report {
    /// The loaded key and button bindings
    pub fn bindings_section(&self) -> String {
        let mut out = String::from("= Loaded Keybindings:\n");
        for (code, action) in &self.key_bindings {
            out.push_str(&format!(" - {:#04x} => {}\n", code, action));
        }
        out.push_str("= Loaded Button bindings:\n");
        for (slot, mask, action) in &self.button_bindings {
            out.push_str(&format!(" - {} : {:#06x} => {}\n", slot, mask, action));
        }
        out.push_str(SECTION_END);
        out.push('\n');
        out
    }

    /// Every registered action name and every key symbol
    pub fn names_section(&self) -> String {
        format!(
            "= Possible Actions:\n{}\n{end}\n= Possible Keys:\n{}\n{end}\n",
            self.actions.join(", "),
            self.keys.join(", "),
            end = SECTION_END,
        )
    }

    /// Bindings at info, name lists at debug
    pub fn log(&self) {
        for line in self.bindings_section().lines() {
            log::info!("{}", line);
        }
        for line in self.names_section().lines() {
            log::debug!("{}", line);
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bindings_section())?;
        f.write_str(&self.names_section())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::gamepad::GamepadButton;
    use crate::input::keys::{KeyTable, VK_SHIFT};
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct Devices {
        focused: bool,
        held: HashSet<i32>,
        pads: [Option<GamepadState>; SLOT_COUNT],
    }

    impl InputDevices for Devices {
        fn owns_foreground_window(&self) -> bool {
            self.focused
        }

        fn is_key_down(&self, code: i32) -> bool {
            self.held.contains(&code)
        }

        fn gamepad_state(&self, slot: usize) -> Option<GamepadState> {
            self.pads[slot]
        }
    }

    fn recording_engine(names: &[&'static str]) -> (KeyActions, Arc<Mutex<Vec<&'static str>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut table = ActionTable::new();
        for &name in names {
            let log = Arc::clone(&log);
            table.register(name, move || log.lock().unwrap().push(name));
        }
        (KeyActions::new(table), log)
    }

    #[test]
    fn test_focus_gate_freezes_state() {
        let (mut engine, fired) = recording_engine(&["toggleHUD", "pad"]);
        engine.load_str("toggleHUD VK_F1\npad X0_A\n");
        let mut devices = Devices {
            focused: true,
            ..Default::default()
        };

        devices.held.insert(0x70);
        engine.process_io(&devices);

        // Released and pressed while unfocused: nothing is observed
        devices.focused = false;
        devices.held.clear();
        devices.pads[0] = Some(GamepadState::new(1, GamepadButton::A.mask()));
        engine.process_io(&devices);
        assert!(fired.lock().unwrap().is_empty());
        assert_eq!(engine.gamepad_snapshot(0), Some(GamepadState::default()));
        assert!(engine.registry().keyboard().get_bindings(0x70)[0].down_last_frame);

        devices.focused = true;
        engine.process_io(&devices);
        assert_eq!(*fired.lock().unwrap(), ["toggleHUD", "pad"]);
    }

    #[test]
    fn test_keyboard_pass_runs_before_gamepad_pass() {
        let (mut engine, fired) = recording_engine(&["key", "pad"]);
        engine.load_str("pad X0_START\nkey VK_F1\n");
        let mut devices = Devices {
            focused: true,
            ..Default::default()
        };
        devices.held.insert(0x70);
        engine.process_io(&devices);

        devices.held.clear();
        devices.pads[0] = Some(GamepadState::new(1, GamepadButton::Start.mask()));
        engine.process_io(&devices);
        assert_eq!(*fired.lock().unwrap(), ["key", "pad"]);
    }

    #[test]
    fn test_unknown_action_in_binding_is_harmless() {
        let (mut engine, fired) = recording_engine(&["known"]);
        engine.load_str("removedAction VK_F1\nknown VK_F1\n");
        let mut devices = Devices {
            focused: true,
            ..Default::default()
        };
        devices.held.insert(0x70);
        engine.process_io(&devices);
        devices.held.clear();
        engine.process_io(&devices);
        assert_eq!(*fired.lock().unwrap(), ["known"]);
    }

    #[test]
    fn test_poll_returns_names_without_running_them() {
        let (mut engine, fired) = recording_engine(&["key", "pad"]);
        engine.load_str("pad X0_START\nkey VK_F1\nunbound VK_F1\n");
        let mut devices = Devices {
            focused: true,
            ..Default::default()
        };
        devices.held.insert(0x70);
        assert!(engine.poll(&devices).is_empty());

        devices.held.clear();
        devices.pads[0] = Some(GamepadState::new(1, GamepadButton::Start.mask()));
        assert_eq!(engine.poll(&devices), ["key", "unbound", "pad"]);
        assert!(fired.lock().unwrap().is_empty());

        // State advanced: the same transitions do not trigger again
        assert!(engine.poll(&devices).is_empty());

        devices.focused = false;
        devices.pads[0] = Some(GamepadState::new(2, 0));
        assert!(engine.poll(&devices).is_empty());
        assert_eq!(engine.gamepad_snapshot(0), Some(GamepadState::new(1, GamepadButton::Start.mask())));
    }

    #[test]
    fn test_perform_action() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&count);
        let mut engine = KeyActions::new(ActionTable::new().with("toggleHUD", move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));

        assert!(engine.perform_action("toggleHUD"));
        assert!(!engine.perform_action("nope"));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_shift_binding_via_engine() {
        let (mut engine, fired) = recording_engine(&["shifted"]);
        engine.load_str("shifted - VK_F5\n");
        let mut devices = Devices {
            focused: true,
            ..Default::default()
        };
        devices.held.extend([0x74, VK_SHIFT]);
        engine.process_io(&devices);
        devices.held.remove(&0x74);
        engine.process_io(&devices);
        assert_eq!(*fired.lock().unwrap(), ["shifted"]);
    }

    #[test]
    fn test_clear_bindings() {
        let mut engine = KeyActions::default();
        engine.load_str("a VK_F1\nb X0_A\n");
        engine.clear_bindings();
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn test_report() {
        let parser = BindingParser::new(KeyTable::new(&[("VK_F1", 0x70), ("VK_F2", 0x71)]));
        let mut engine = KeyActions::new(ActionTable::new().with("toggleHUD", || {}).with("shot", || {}))
            .with_parser(parser);
        engine.load_str("shot VK_F2\ntoggleHUD VK_F1\nshot X1_Y\n");

        let report = engine.report();
        assert_eq!(
            report.key_bindings,
            [(0x70, "toggleHUD".to_string()), (0x71, "shot".to_string())]
        );
        assert_eq!(report.button_bindings, [(1, 0x8000, "shot".to_string())]);

        let text = report.to_string();
        assert!(text.starts_with("= Loaded Keybindings:\n - 0x70 => toggleHUD\n - 0x71 => shot\n"));
        assert!(text.contains("= Loaded Button bindings:\n - 1 : 0x8000 => shot\n"));
        assert!(text.contains("= Possible Actions:\ntoggleHUD, shot\n"));
        assert!(text.contains("= Possible Keys:\nVK_F1, VK_F2\n"));
    }

    #[test]
    fn test_io_error_message_names_path() {
        let err = KeyActionsError::Io {
            path: PathBuf::from("cfg/Keys.ini"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("cfg/Keys.ini"));
    }
}
