//! C FFI bindings for the key action engine
//!
//! Exports C-compatible functions so the host can drive the engine. All
//! exported functions use the `rust_` prefix to avoid symbol conflicts with
//! the host's own symbols.
//!
//! One engine and the host's action handlers live behind a process-wide
//! mutex. Handlers are looked up under the mutex and called after it is
//! released, so a handler may call back into any of these functions.

use std::ffi::{c_void, CStr};
use std::path::Path;
use std::sync::LazyLock;

use libc::{c_char, c_int};
use parking_lot::Mutex;

use super::actions::ActionTable;
use super::engine::KeyActions;
use super::gamepad::{GamepadState, SLOT_COUNT};
use super::loader::{ConfigDir, KeyFiles};
use super::poller::InputDevices;
use crate::logging::{self, LogLevel};

/// Engine plus the host handlers it dispatches to
#[derive(Default)]
struct HostKeyActions {
    engine: Option<KeyActions>,
    handlers: Vec<(String, ActionCallback)>,
}

impl HostKeyActions {
    fn engine_mut(&mut self) -> &mut KeyActions {
        self.engine.get_or_insert_with(|| KeyActions::new(ActionTable::new()))
    }

    /// First handler registered under `name`
    fn handler(&self, name: &str) -> Option<ActionCallback> {
        let found = self
            .handlers
            .iter()
            .find(|(registered, _)| registered == name)
            .map(|&(_, handler)| handler);
        if found.is_none() {
            log::debug!("No handler for action '{}'", name);
        }
        found
    }

    fn log_report(&self) {
        if let Some(engine) = &self.engine {
            let mut report = engine.report();
            report.actions = self.handlers.iter().map(|(name, _)| name.clone()).collect();
            report.log();
        }
    }
}

static KEY_ACTIONS: LazyLock<Mutex<HostKeyActions>> = LazyLock::new(Mutex::default);

/// Controller state as filled in by the host.
/// Must match the OverlayPadState struct in the host header
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayPadState {
    pub packet_number: u32,
    pub buttons: u16,
}

pub type FocusCallback = unsafe extern "C" fn(user_data: *mut c_void) -> c_int;
pub type KeyDownCallback = unsafe extern "C" fn(user_data: *mut c_void, code: c_int) -> c_int;
/// Returns nonzero and fills `out` when a controller is connected in `slot`
pub type PadStateCallback =
    unsafe extern "C" fn(user_data: *mut c_void, slot: c_int, out: *mut OverlayPadState) -> c_int;
pub type ActionCallback = extern "C" fn();

/// Device queries supplied by the host for one poll.
///
/// A missing callback reads as "not focused", "not held" or "absent".
#[repr(C)]
pub struct OverlayHostInput {
    pub user_data: *mut c_void,
    pub owns_foreground_window: Option<FocusCallback>,
    pub is_key_down: Option<KeyDownCallback>,
    pub gamepad_state: Option<PadStateCallback>,
}

impl InputDevices for OverlayHostInput {
    fn owns_foreground_window(&self) -> bool {
        match self.owns_foreground_window {
            Some(f) => unsafe { f(self.user_data) != 0 },
            None => false,
        }
    }

    fn is_key_down(&self, code: i32) -> bool {
        match self.is_key_down {
            Some(f) => unsafe { f(self.user_data, code) != 0 },
            None => false,
        }
    }

    fn gamepad_state(&self, slot: usize) -> Option<GamepadState> {
        let f = self.gamepad_state?;
        let mut out = OverlayPadState::default();
        let present = unsafe { f(self.user_data, slot as c_int, &mut out) != 0 };
        present.then(|| GamepadState::new(out.packet_number, out.buttons))
    }
}

/// Borrow a C string argument; `None` (and a warning) for null or non-UTF-8
unsafe fn str_arg<'a>(ptr: *const c_char, what: &str) -> Option<&'a str> {
    if ptr.is_null() {
        log::warn!("Key actions: {} is null", what);
        return None;
    }
    match CStr::from_ptr(ptr).to_str() {
        Ok(s) => Some(s),
        Err(_) => {
            log::warn!("Key actions: {} is not valid UTF-8", what);
            None
        }
    }
}

/// Initialize the engine and load the layered key files
///
/// `game` may be null, in which case only the general key files load.
/// Calling this again reloads the bindings and keeps registered actions.
/// Returns the number of bindings loaded, or -1 on invalid arguments.
///
/// # Safety
/// Non-null arguments must be valid null-terminated C strings
#[no_mangle]
pub unsafe extern "C" fn rust_KeyActions_Init(
    config_dir: *const c_char,
    prefix: *const c_char,
    game: *const c_char,
) -> c_int {
    let Some(config_dir) = str_arg(config_dir, "config_dir") else {
        return -1;
    };
    let Some(prefix) = str_arg(prefix, "prefix") else {
        return -1;
    };
    let game = if game.is_null() {
        None
    } else {
        match str_arg(game, "game") {
            Some(game) => Some(game),
            None => return -1,
        }
    };

    let mut state = KEY_ACTIONS.lock();
    let engine = state.engine_mut();
    engine.clear_bindings();
    let loaded = engine.load(&ConfigDir::new(config_dir), &KeyFiles::new(prefix, game));
    state.log_report();
    c_int::try_from(loaded).unwrap_or(c_int::MAX)
}

/// Drop the engine with all bindings and actions
#[no_mangle]
pub extern "C" fn rust_KeyActions_Uninit() {
    *KEY_ACTIONS.lock() = HostKeyActions::default();
}

/// Register a handler for an action name
///
/// Actions may be registered before or after `rust_KeyActions_Init`.
/// Returns 0 on success, -1 on invalid arguments.
///
/// # Safety
/// `name` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn rust_KeyActions_RegisterAction(
    name: *const c_char,
    handler: Option<ActionCallback>,
) -> c_int {
    let Some(name) = str_arg(name, "action name") else {
        return -1;
    };
    let Some(handler) = handler else {
        log::warn!("Key actions: null handler for '{}'", name);
        return -1;
    };

    let mut state = KEY_ACTIONS.lock();
    // Registering counts as initializing
    state.engine_mut();
    state.handlers.push((name.to_string(), handler));
    0
}

/// Poll input once and run every triggered action
///
/// Handlers run in trigger order after the engine lock is released.
/// Returns 0 on success, -1 if `input` is null or the engine is not
/// initialized.
///
/// # Safety
/// `input` must point to a valid `OverlayHostInput` whose callbacks are safe
/// to call with its `user_data`
#[no_mangle]
pub unsafe extern "C" fn rust_KeyActions_ProcessIO(input: *const OverlayHostInput) -> c_int {
    let Some(input) = input.as_ref() else {
        return -1;
    };
    let handlers: Vec<ActionCallback> = {
        let mut state = KEY_ACTIONS.lock();
        let Some(engine) = state.engine.as_mut() else {
            return -1;
        };
        let triggered = engine.poll(input);
        triggered.iter().filter_map(|name| state.handler(name)).collect()
    };
    for handler in handlers {
        handler();
    }
    0
}

/// Run the action registered under `name`
///
/// Returns 1 if a handler ran, 0 if no handler has that name, -1 on invalid
/// arguments or when the engine is not initialized.
///
/// # Safety
/// `name` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn rust_KeyActions_PerformAction(name: *const c_char) -> c_int {
    let Some(name) = str_arg(name, "action name") else {
        return -1;
    };
    let handler = {
        let state = KEY_ACTIONS.lock();
        if state.engine.is_none() {
            return -1;
        }
        state.handler(name)
    };
    match handler {
        Some(handler) => {
            handler();
            1
        }
        None => 0,
    }
}

/// Log the loaded bindings and the known names
#[no_mangle]
pub extern "C" fn rust_KeyActions_Report() -> c_int {
    let state = KEY_ACTIONS.lock();
    if state.engine.is_none() {
        return -1;
    }
    state.log_report();
    0
}

/// Number of loaded bindings, or -1 when the engine is not initialized
#[no_mangle]
pub extern "C" fn rust_KeyActions_GetBindingCount() -> c_int {
    match KEY_ACTIONS.lock().engine.as_ref() {
        Some(engine) => c_int::try_from(engine.registry().binding_count()).unwrap_or(c_int::MAX),
        None => -1,
    }
}

/// Install the log sink, writing to `path` or to stderr when null
///
/// Returns 0 on success, -1 if the log file cannot be created.
///
/// # Safety
/// A non-null `path` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn rust_KeyActions_InitLogging(level: c_int, path: *const c_char) -> c_int {
    let path = if path.is_null() {
        None
    } else {
        match str_arg(path, "log path") {
            Some(p) => Some(Path::new(p)),
            None => return -1,
        }
    };
    match logging::init_logging(LogLevel::from_i32(level), path) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("rust_KeyActions_InitLogging: {}", e);
            -1
        }
    }
}

/// Change log verbosity (0 = nothing .. 6 = all)
#[no_mangle]
pub extern "C" fn rust_KeyActions_SetLogLevel(level: c_int) {
    logging::set_level(LogLevel::from_i32(level));
}

/// Number of controller slots the host should be prepared to report
#[no_mangle]
pub extern "C" fn rust_KeyActions_GetSlotCount() -> c_int {
    SLOT_COUNT as c_int
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::ffi::CString;
    use std::fs;
    use std::ptr;
    use std::sync::atomic::{AtomicI32, AtomicU32, AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;
    use tempfile::tempdir;

    static HUD_CALLS: AtomicUsize = AtomicUsize::new(0);
    static SHOT_CALLS: AtomicUsize = AtomicUsize::new(0);
    static HELD_KEY: AtomicI32 = AtomicI32::new(0);
    static PAD_PACKET: AtomicU32 = AtomicU32::new(0);
    static PAD_BUTTONS: AtomicU32 = AtomicU32::new(0);
    static INNER_CALLS: AtomicUsize = AtomicUsize::new(0);
    static NESTED_RESULT: AtomicI32 = AtomicI32::new(0);

    extern "C" fn toggle_hud() {
        HUD_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    extern "C" fn take_screenshot() {
        SHOT_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    extern "C" fn inner() {
        INNER_CALLS.fetch_add(1, Ordering::SeqCst);
    }

    /// Handler that calls back into the C surface
    extern "C" fn outer() {
        let name = CString::new("inner").unwrap();
        let result = unsafe { rust_KeyActions_PerformAction(name.as_ptr()) };
        NESTED_RESULT.store(result, Ordering::SeqCst);
    }

    /// Run `f` on another thread and fail instead of hanging if it blocks
    fn within_timeout(f: impl FnOnce() + Send + 'static) {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            f();
            let _ = tx.send(());
        });
        rx.recv_timeout(Duration::from_secs(5))
            .expect("call into the C surface did not return");
    }

    unsafe extern "C" fn focused(_: *mut c_void) -> c_int {
        1
    }

    unsafe extern "C" fn key_down(_: *mut c_void, code: c_int) -> c_int {
        c_int::from(code != 0 && HELD_KEY.load(Ordering::SeqCst) == code)
    }

    unsafe extern "C" fn pad_state(_: *mut c_void, slot: c_int, out: *mut OverlayPadState) -> c_int {
        if slot != 0 {
            return 0;
        }
        *out = OverlayPadState {
            packet_number: PAD_PACKET.load(Ordering::SeqCst),
            buttons: PAD_BUTTONS.load(Ordering::SeqCst) as u16,
        };
        1
    }

    fn host_input() -> OverlayHostInput {
        OverlayHostInput {
            user_data: ptr::null_mut(),
            owns_foreground_window: Some(focused),
            is_key_down: Some(key_down),
            gamepad_state: Some(pad_state),
        }
    }

    fn reset() {
        rust_KeyActions_Uninit();
        HUD_CALLS.store(0, Ordering::SeqCst);
        SHOT_CALLS.store(0, Ordering::SeqCst);
        HELD_KEY.store(0, Ordering::SeqCst);
        PAD_PACKET.store(0, Ordering::SeqCst);
        PAD_BUTTONS.store(0, Ordering::SeqCst);
        INNER_CALLS.store(0, Ordering::SeqCst);
        NESTED_RESULT.store(0, Ordering::SeqCst);
    }

    fn cstr(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    #[test]
    #[serial]
    fn test_ffi_init_process_uninit() {
        reset();
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("TestKeys.ini"), "toggleHUD VK_F1\ntakeScreenshot X0_A\n").unwrap();
        let dir_c = cstr(dir.path().to_str().unwrap());
        let prefix = cstr("Test");

        unsafe {
            assert_eq!(rust_KeyActions_RegisterAction(cstr("toggleHUD").as_ptr(), Some(toggle_hud)), 0);
            assert_eq!(
                rust_KeyActions_RegisterAction(cstr("takeScreenshot").as_ptr(), Some(take_screenshot)),
                0
            );
            assert_eq!(rust_KeyActions_Init(dir_c.as_ptr(), prefix.as_ptr(), ptr::null()), 2);
        }
        assert_eq!(rust_KeyActions_GetBindingCount(), 2);

        let input = host_input();
        HELD_KEY.store(0x70, Ordering::SeqCst);
        unsafe { assert_eq!(rust_KeyActions_ProcessIO(&input), 0) };
        HELD_KEY.store(0, Ordering::SeqCst);
        PAD_PACKET.store(1, Ordering::SeqCst);
        PAD_BUTTONS.store(0x1000, Ordering::SeqCst);
        unsafe { assert_eq!(rust_KeyActions_ProcessIO(&input), 0) };

        assert_eq!(HUD_CALLS.load(Ordering::SeqCst), 1);
        assert_eq!(SHOT_CALLS.load(Ordering::SeqCst), 1);

        rust_KeyActions_Uninit();
        assert_eq!(rust_KeyActions_GetBindingCount(), -1);
        unsafe { assert_eq!(rust_KeyActions_ProcessIO(&input), -1) };
    }

    #[test]
    #[serial]
    fn test_ffi_reinit_reloads() {
        reset();
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Keys.ini"), "toggleHUD VK_F1\n").unwrap();
        let dir_c = cstr(dir.path().to_str().unwrap());
        let prefix = cstr("");

        unsafe {
            assert_eq!(rust_KeyActions_Init(dir_c.as_ptr(), prefix.as_ptr(), ptr::null()), 1);
            assert_eq!(rust_KeyActions_Init(dir_c.as_ptr(), prefix.as_ptr(), ptr::null()), 1);
        }
        assert_eq!(rust_KeyActions_GetBindingCount(), 1);
        reset();
    }

    #[test]
    #[serial]
    fn test_ffi_game_specific_files() {
        reset();
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("game")).unwrap();
        fs::write(dir.path().join("Keys.ini"), "a VK_F1\n").unwrap();
        fs::write(dir.path().join("game").join("Keys.ini"), "b VK_F1\n").unwrap();
        let dir_c = cstr(dir.path().to_str().unwrap());

        unsafe {
            let loaded = rust_KeyActions_Init(dir_c.as_ptr(), cstr("").as_ptr(), cstr("game").as_ptr());
            assert_eq!(loaded, 2);
        }
        reset();
    }

    #[test]
    #[serial]
    fn test_ffi_perform_action() {
        reset();
        unsafe {
            assert_eq!(rust_KeyActions_PerformAction(cstr("toggleHUD").as_ptr()), -1);
            rust_KeyActions_RegisterAction(cstr("toggleHUD").as_ptr(), Some(toggle_hud));
            assert_eq!(rust_KeyActions_PerformAction(cstr("toggleHUD").as_ptr()), 1);
            assert_eq!(rust_KeyActions_PerformAction(cstr("unknown").as_ptr()), 0);
        }
        assert_eq!(HUD_CALLS.load(Ordering::SeqCst), 1);
        reset();
    }

    #[test]
    #[serial]
    fn test_ffi_handler_may_perform_another_action() {
        reset();
        unsafe {
            rust_KeyActions_RegisterAction(cstr("outer").as_ptr(), Some(outer));
            rust_KeyActions_RegisterAction(cstr("inner").as_ptr(), Some(inner));
        }

        within_timeout(|| unsafe {
            assert_eq!(rust_KeyActions_PerformAction(cstr("outer").as_ptr()), 1);
        });
        assert_eq!(NESTED_RESULT.load(Ordering::SeqCst), 1);
        assert_eq!(INNER_CALLS.load(Ordering::SeqCst), 1);
        reset();
    }

    #[test]
    #[serial]
    fn test_ffi_handler_may_reenter_from_process_io() {
        reset();
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Keys.ini"), "outer VK_F1
").unwrap();
        let dir_c = cstr(dir.path().to_str().unwrap());
        unsafe {
            rust_KeyActions_RegisterAction(cstr("outer").as_ptr(), Some(outer));
            rust_KeyActions_RegisterAction(cstr("inner").as_ptr(), Some(inner));
            assert_eq!(rust_KeyActions_Init(dir_c.as_ptr(), cstr("").as_ptr(), ptr::null()), 1);
        }

        HELD_KEY.store(0x70, Ordering::SeqCst);
        unsafe { assert_eq!(rust_KeyActions_ProcessIO(&host_input()), 0) };
        HELD_KEY.store(0, Ordering::SeqCst);
        within_timeout(|| unsafe {
            assert_eq!(rust_KeyActions_ProcessIO(&host_input()), 0);
        });

        assert_eq!(NESTED_RESULT.load(Ordering::SeqCst), 1);
        assert_eq!(INNER_CALLS.load(Ordering::SeqCst), 1);
        reset();
    }

    #[test]
    #[serial]
    fn test_ffi_invalid_arguments() {
        reset();
        unsafe {
            assert_eq!(rust_KeyActions_Init(ptr::null(), cstr("").as_ptr(), ptr::null()), -1);
            assert_eq!(rust_KeyActions_Init(cstr(".").as_ptr(), ptr::null(), ptr::null()), -1);
            assert_eq!(rust_KeyActions_RegisterAction(ptr::null(), Some(toggle_hud)), -1);
            assert_eq!(rust_KeyActions_RegisterAction(cstr("x").as_ptr(), None), -1);
            assert_eq!(rust_KeyActions_PerformAction(ptr::null()), -1);
            assert_eq!(rust_KeyActions_ProcessIO(ptr::null()), -1);

            let bad = [0xFFu8 as c_char, 0];
            assert_eq!(rust_KeyActions_PerformAction(bad.as_ptr()), -1);
        }
        assert_eq!(rust_KeyActions_Report(), -1);
    }

    #[test]
    fn test_missing_callbacks_read_as_idle() {
        let input = OverlayHostInput {
            user_data: ptr::null_mut(),
            owns_foreground_window: None,
            is_key_down: None,
            gamepad_state: None,
        };
        assert!(!input.owns_foreground_window());
        assert!(!input.is_key_down(0x70));
        assert_eq!(input.gamepad_state(0), None);
    }

    #[test]
    fn test_slot_count() {
        assert_eq!(rust_KeyActions_GetSlotCount(), 4);
    }
}
