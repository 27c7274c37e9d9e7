// Overlay key action library
// Input bindings and action dispatch for an overlay embedded in a host process

pub mod cli;
pub mod config;
pub mod input;
pub mod logging;

pub use cli::Cli;
pub use config::Options;
pub use input::{ActionTable, KeyActions};
pub use logging::LogLevel;
