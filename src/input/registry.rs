//! Binding registry
//!
//! Owns every keyboard and gamepad binding loaded from key files. Loading is
//! additive: a key or button bound in several files keeps every binding, in
//! the order the files were loaded.

use std::fs;
use std::io;
use std::path::Path;

use super::engine::{KeyActionsError, KeyActionsResult};
use super::gamepad::ButtonBindings;
use super::keyboard::{KeyBinding, KeyboardBindings};
use super::parser::{BindingParser, ParsedBinding};

#[derive(Debug, Default, Clone)]
pub struct BindingRegistry {
    keyboard: KeyboardBindings,
    buttons: ButtonBindings,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one parsed binding
    pub fn insert(&mut self, binding: ParsedBinding) {
        match binding {
            ParsedBinding::Key {
                code,
                action,
                modifiers,
            } => self.keyboard.add_binding(code, KeyBinding::new(action, modifiers)),
            ParsedBinding::Button {
                slot,
                button,
                action,
            } => {
                self.buttons.add_binding(slot, button, action);
            }
        }
    }

    /// Parse one key file's contents and add its bindings.
    ///
    /// Returns the number of bindings added.
    pub fn load_str(&mut self, parser: &BindingParser, text: &str) -> usize {
        let mut added = 0;
        for binding in parser.parse_source(text) {
            self.insert(binding);
            added += 1;
        }
        added
    }

    /// Load one key file. A missing file contributes no bindings.
    pub fn load_file(&mut self, parser: &BindingParser, path: &Path) -> KeyActionsResult<usize> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("Key file {} not found, skipping", path.display());
                return Ok(0);
            }
            Err(source) => {
                return Err(KeyActionsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        let added = self.load_str(parser, &text);
        log::debug!("Loaded {} bindings from {}", added, path.display());
        Ok(added)
    }

    pub fn keyboard(&self) -> &KeyboardBindings {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut KeyboardBindings {
        &mut self.keyboard
    }

    pub fn buttons(&self) -> &ButtonBindings {
        &self.buttons
    }

    pub fn binding_count(&self) -> usize {
        self.keyboard.binding_count() + self.buttons.binding_count()
    }

    pub fn is_empty(&self) -> bool {
        self.binding_count() == 0
    }

    pub fn clear(&mut self) {
        self.keyboard.clear();
        self.buttons.clear();
    }
}
