//! Key file line parser
//!
//! Turns the lines of one key file into binding entries. Two line forms are
//! recognized, tried in this order:
//!
//! ```text
//! takeScreenshot ~ VK_SNAPSHOT     keyboard: action, markers, key symbol
//! toggleHUD X0_BACK                gamepad:  action, X<slot>_<button>
//! ```
//!
//! The action is always the first whitespace-delimited token of the line.
//! Lines starting with `#`, blank lines and lines matching neither form are
//! skipped without error.

use std::sync::LazyLock;

use regex::Regex;

use super::gamepad::GamepadButton;
use super::keyboard::Modifiers;
use super::keys::KeyTable;

/// Routine deriving a keyboard binding's required modifiers from its line.
pub type ModifierScan = fn(&str) -> Modifiers;

/// One binding recognized on a key file line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedBinding {
    Key {
        code: i32,
        action: String,
        modifiers: Modifiers,
    },
    Button {
        slot: usize,
        button: GamepadButton,
        action: String,
    },
}

/// One compiled pattern per button, in [`GamepadButton::ALL`] order
static BUTTON_PATTERNS: LazyLock<Vec<(GamepadButton, Regex)>> = LazyLock::new(|| {
    GamepadButton::ALL
        .into_iter()
        .map(|button| {
            let pattern = format!("X([0-3])_{}", button.name());
            let regex = Regex::new(&pattern).expect("button pattern is a valid regex");
            (button, regex)
        })
        .collect()
});

/// Modifier markers scanned over the entire line.
///
/// `~` requires Ctrl, `+` requires Alt, `-` requires Shift. A marker anywhere
/// on the line counts, including inside the action name (`zoom-in VK_ADD`
/// therefore requires Shift). Existing key files rely on this, so it is the
/// default.
pub fn whole_line_modifiers(line: &str) -> Modifiers {
    Modifiers {
        ctrl: line.contains('~'),
        alt: line.contains('+'),
        shift: line.contains('-'),
    }
}

/// Modifier markers scanned only in the tokens after the action name.
///
/// Only whole tokens made of marker characters count, so neither the action
/// name nor the key symbol can set a modifier.
pub fn field_scoped_modifiers(line: &str) -> Modifiers {
    let mut modifiers = Modifiers::NONE;
    for token in line.split_whitespace().skip(1) {
        if !token.chars().all(|c| matches!(c, '~' | '+' | '-')) {
            continue;
        }
        modifiers.ctrl |= token.contains('~');
        modifiers.alt |= token.contains('+');
        modifiers.shift |= token.contains('-');
    }
    modifiers
}

/// Parser for key file lines
#[derive(Debug, Clone, Copy)]
pub struct BindingParser {
    keys: KeyTable,
    modifier_scan: ModifierScan,
}

impl Default for BindingParser {
    fn default() -> Self {
        Self::new(KeyTable::default())
    }
}

impl BindingParser {
    /// Create a parser over a key symbol table, using whole-line modifiers
    pub fn new(keys: KeyTable) -> Self {
        Self {
            keys,
            modifier_scan: whole_line_modifiers,
        }
    }

    /// Replace the modifier scanning routine
    pub fn with_modifier_scan(mut self, scan: ModifierScan) -> Self {
        self.modifier_scan = scan;
        self
    }

    pub fn keys(&self) -> &KeyTable {
        &self.keys
    }

    /// Parse one line; `None` for comments, blanks and unrecognized lines
    pub fn parse_line(&self, line: &str) -> Option<ParsedBinding> {
        if line.starts_with('#') || line.trim().is_empty() {
            return None;
        }

        if let Some(code) = self.match_key(line) {
            let action = first_token(line)?;
            return Some(ParsedBinding::Key {
                code,
                action: action.to_string(),
                modifiers: (self.modifier_scan)(line),
            });
        }

        let (slot, button) = match_button(line)?;
        let action = first_token(line)?;
        Some(ParsedBinding::Button {
            slot,
            button,
            action: action.to_string(),
        })
    }

    /// Parse every line of one key file
    pub fn parse_source<'a>(&'a self, text: &'a str) -> impl Iterator<Item = ParsedBinding> + 'a {
        text.lines().filter_map(move |line| self.parse_line(line))
    }

    /// First key symbol, in table order, standing as a whole word in the line
    fn match_key(&self, line: &str) -> Option<i32> {
        self.keys
            .iter()
            .find(|&(name, _)| symbol_terminates(line, name))
            .map(|(_, code)| code)
    }
}

/// Whether the first occurrence of `symbol` in `line` ends the word.
///
/// Only the first occurrence is inspected; the character after it must be
/// a line break, a space or the end of the line. This keeps `VK_F1` from
/// matching inside `VK_F10`.
fn symbol_terminates(line: &str, symbol: &str) -> bool {
    let Some(pos) = line.find(symbol) else {
        return false;
    };
    matches!(
        line.as_bytes().get(pos + symbol.len()),
        None | Some(b'\r' | b'\n' | b' ')
    )
}

/// First `X<slot>_<button>` pattern, in button order, found in the line
fn match_button(line: &str) -> Option<(usize, GamepadButton)> {
    BUTTON_PATTERNS.iter().find_map(|(button, regex)| {
        let caps = regex.captures(line)?;
        let slot = caps.get(1)?.as_str().parse().ok()?;
        Some((slot, *button))
    })
}

fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}
