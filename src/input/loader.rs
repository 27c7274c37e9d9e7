//! Layered key file loading
//!
//! Bindings come from up to four key files, always read in the same order:
//!
//! 1. `<prefix>Keys.ini`
//! 2. `<prefix>Keys_user.ini`
//! 3. `<game>/<prefix>Keys.ini`
//! 4. `<game>/<prefix>Keys_user.ini`
//!
//! Each file only adds bindings; nothing loaded earlier is replaced.

use std::path::{Path, PathBuf};

use super::parser::BindingParser;
use super::registry::BindingRegistry;

/// Maps a logical key file name to a filesystem path
pub trait PathResolver {
    fn resolve(&self, logical: &str) -> PathBuf;
}

/// Resolves logical names relative to a configuration directory.
///
/// Both `/` and `\` separate path components in logical names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir(pub PathBuf);

impl ConfigDir {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self(dir.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl PathResolver for ConfigDir {
    fn resolve(&self, logical: &str) -> PathBuf {
        logical
            .split(['/', '\\'])
            .filter(|part| !part.is_empty())
            .fold(self.0.clone(), |path, part| path.join(part))
    }
}

impl<F> PathResolver for F
where
    F: Fn(&str) -> PathBuf,
{
    fn resolve(&self, logical: &str) -> PathBuf {
        self(logical)
    }
}

/// One step of the layered load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFile {
    /// Shown in log output
    pub label: &'static str,
    /// Logical name handed to the [`PathResolver`]
    pub name: String,
}

/// The ordered set of key files for one prefix and optional game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFiles {
    files: Vec<KeyFile>,
}

impl KeyFiles {
    /// Key files for `prefix`; the game-specific pair is omitted when `game`
    /// is `None` or empty.
    pub fn new(prefix: &str, game: Option<&str>) -> Self {
        let mut files = vec![
            KeyFile {
                label: "general",
                name: format!("{prefix}Keys.ini"),
            },
            KeyFile {
                label: "user",
                name: format!("{prefix}Keys_user.ini"),
            },
        ];
        if let Some(game) = game.filter(|g| !g.is_empty()) {
            files.push(KeyFile {
                label: "game-specific",
                name: format!("{game}/{prefix}Keys.ini"),
            });
            files.push(KeyFile {
                label: "game-specific user",
                name: format!("{game}/{prefix}Keys_user.ini"),
            });
        }
        Self { files }
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyFile> {
        self.files.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Load every key file in order into `registry`.
///
/// A file that exists but cannot be read is logged and skipped; the
/// remaining files still load. Returns the number of bindings added.
pub fn load_layered(
    registry: &mut BindingRegistry,
    parser: &BindingParser,
    resolver: &dyn PathResolver,
    files: &KeyFiles,
) -> usize {
    let mut total = 0;
    for file in files.iter() {
        log::info!("Loading {} key bindings from {}", file.label, file.name);
        let path = resolver.resolve(&file.name);
        match registry.load_file(parser, &path) {
            Ok(added) => total += added,
            Err(e) => log::warn!("Skipping {} key bindings: {}", file.label, e),
        }
    }
    log::debug!("{} key bindings loaded in total", total);
    total
}
