use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;

use overlay_keys::input::{GamepadButton, KeyActions, KeyTable, PathResolver};
use overlay_keys::{logging, Cli, Options};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.merge_into_options(Options::default())?;

    logging::init_logging(options.log_level, options.log_file.as_deref().map(Path::new))
        .with_context(|| format!("Failed to open log file {:?}", options.log_file))?;

    if cli.keys {
        for (name, code) in KeyTable::default().iter() {
            println!("{:<20} {:#04x}", name, code);
        }
        return Ok(());
    }
    if cli.buttons {
        for button in GamepadButton::ALL {
            println!("X<slot>_{:<16} {:#06x}", button.name(), button.mask());
        }
        return Ok(());
    }

    let resolver = options.resolver();
    let files = options.key_files();
    println!("Key files under {}", resolver.path().display());
    for file in files.iter() {
        let path = resolver.resolve(&file.name);
        let state = if path.is_file() { "found" } else { "missing" };
        println!("{:<20} {} ({})", file.label, path.display(), state);
    }

    let mut engine = KeyActions::default().with_parser(options.parser());
    let loaded = engine.load(&resolver, &files);

    print!("{}", engine.report().bindings_section());
    println!("{} bindings loaded", loaded);
    Ok(())
}
