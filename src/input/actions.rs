//! Action table
//!
//! Named, zero-argument handlers supplied by the embedding system. The table
//! is filled once at startup and looked up by exact, case-sensitive name.

use std::fmt;

/// A zero-argument action handler
pub type ActionHandler = Box<dyn FnMut() + Send>;

/// Registration table of named action handlers
#[derive(Default)]
pub struct ActionTable {
    entries: Vec<(String, ActionHandler)>,
}

impl fmt::Debug for ActionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTable")
            .field("actions", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl ActionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Entries are searched in registration order, so a
    /// later entry with a duplicate name is never reached.
    pub fn register<F>(&mut self, name: impl Into<String>, handler: F) -> &mut Self
    where
        F: FnMut() + Send + 'static,
    {
        self.entries.push((name.into(), Box::new(handler)));
        self
    }

    /// Builder form of [`ActionTable::register`]
    pub fn with<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.register(name, handler);
        self
    }

    /// Run the first handler registered under `name`.
    ///
    /// Returns `false`, and does nothing else, when no handler has that name.
    pub fn perform(&mut self, name: &str) -> bool {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => {
                (entry.1)();
                true
            }
            None => {
                log::debug!("No handler for action '{}'", name);
                false
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Action names in table order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build an [`ActionTable`](crate::input::ActionTable) from a declarative list.
///
/// Each entry is an action name written as an identifier and the handler
/// to run for it:
///
/// ```
/// use overlay_keys::actions;
///
/// let mut table = actions! {
///     toggleHUD => || println!("hud"),
///     takeScreenshot => || println!("shot"),
/// };
/// assert!(table.perform("toggleHUD"));
/// ```
#[macro_export]
macro_rules! actions {
    ($($name:ident => $handler:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut table = $crate::input::ActionTable::new();
        $( table.register(stringify!($name), $handler); )*
        table
    }};
}
