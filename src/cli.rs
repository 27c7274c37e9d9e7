use crate::config::{parse_log_level, parse_modifier_mode, ModifierMode, Options};
use anyhow::{Context, Result};
use clap::Parser;

/// Overlay key binding checker
#[derive(Parser, Debug, Default)]
#[command(name = "overlay-keys")]
#[command(version)]
#[command(about = "Load overlay key files and report the resulting bindings", long_about = None)]
pub struct Cli {
    /// Configuration directory holding the key files
    #[arg(short, long, value_name = "CONFIGDIR")]
    pub configdir: Option<String>,

    /// Key file name prefix (e.g. GeDoSaTo for GeDoSaToKeys.ini)
    #[arg(short, long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Game subdirectory with game-specific key files
    #[arg(short, long, value_name = "GAME")]
    pub game: Option<String>,

    /// Log verbosity (nothing, user, error, warning, info, debug, all or 0-6)
    #[arg(short = 'v', long = "loglevel", value_name = "LEVEL")]
    pub loglevel: Option<String>,

    /// Log file path
    #[arg(short, long, value_name = "FILE")]
    pub logfile: Option<String>,

    /// Modifier marker scanning (line, field)
    #[arg(short, long, value_name = "MODE")]
    pub modifiers: Option<String>,

    /// Only count markers that stand as their own token
    #[arg(long = "strict-modifiers")]
    pub strict_modifiers: bool,

    /// List every known key symbol and exit
    #[arg(long)]
    pub keys: bool,

    /// List every known gamepad button symbol and exit
    #[arg(long)]
    pub buttons: bool,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref dir) = self.configdir {
            opts.config_dir = Some(dir.clone());
        }
        if let Some(ref prefix) = self.prefix {
            opts.prefix = prefix.clone();
        }
        if let Some(ref game) = self.game {
            opts.game = Some(game.clone());
        }
        if let Some(ref level) = self.loglevel {
            opts.log_level = parse_log_level(level)?;
        }
        if let Some(ref file) = self.logfile {
            opts.log_file = Some(file.clone());
        }
        if let Some(ref mode) = self.modifiers {
            opts.modifier_mode = parse_modifier_mode(mode).context("Invalid --modifiers value")?;
        }
        if self.strict_modifiers {
            opts.modifier_mode = ModifierMode::FieldScoped;
        }

        Ok(opts)
    }
}
