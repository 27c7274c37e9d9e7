use anyhow::{Context, Result};

use crate::input::loader::{ConfigDir, KeyFiles};
use crate::input::parser::{field_scoped_modifiers, whole_line_modifiers, BindingParser, ModifierScan};
use crate::logging::LogLevel;

/// Key file prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "GeDoSaTo";

/// How modifier markers are read from a keyboard binding line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModifierMode {
    /// A marker anywhere on the line counts
    #[default]
    WholeLine,
    /// Only marker tokens after the action name count
    FieldScoped,
}

/// Options that can be set via CLI or by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Directory the logical key file names resolve against
    pub config_dir: Option<String>,
    /// Prepended to `Keys.ini` / `Keys_user.ini`
    pub prefix: String,
    /// Game whose subdirectory holds the game-specific key files
    pub game: Option<String>,
    pub log_level: LogLevel,
    pub log_file: Option<String>,
    pub modifier_mode: ModifierMode,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            config_dir: None,
            prefix: DEFAULT_PREFIX.to_string(),
            game: None,
            log_level: LogLevel::Info,
            log_file: None,
            modifier_mode: ModifierMode::WholeLine,
        }
    }
}

impl Options {
    /// The key files to load, in load order
    pub fn key_files(&self) -> KeyFiles {
        KeyFiles::new(&self.prefix, self.game.as_deref())
    }

    /// Resolver for the configured directory, or the working directory
    pub fn resolver(&self) -> ConfigDir {
        ConfigDir::new(self.config_dir.as_deref().unwrap_or("."))
    }

    /// Line parser using the configured modifier mode
    pub fn parser(&self) -> BindingParser {
        let scan: ModifierScan = match self.modifier_mode {
            ModifierMode::WholeLine => whole_line_modifiers,
            ModifierMode::FieldScoped => field_scoped_modifiers,
        };
        BindingParser::default().with_modifier_scan(scan)
    }
}

/// Parse a log level name or number (0-6)
pub fn parse_log_level(s: &str) -> Result<LogLevel> {
    s.parse::<LogLevel>()
        .map_err(anyhow::Error::msg)
        .context("Invalid log level")
}

/// Parse a modifier mode name
pub fn parse_modifier_mode(s: &str) -> Result<ModifierMode> {
    match s.to_ascii_lowercase().as_str() {
        "line" | "whole-line" => Ok(ModifierMode::WholeLine),
        "field" | "field-scoped" | "strict" => Ok(ModifierMode::FieldScoped),
        _ => anyhow::bail!("Modifier mode must be 'line' or 'field', got '{}'", s),
    }
}
