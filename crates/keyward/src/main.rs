// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! keyward - a local, encrypted credential vault with fuzzy search.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod clipboard;
mod commands;
mod logging;
mod render;
mod tui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use keyward_config::KeywardConfig;
use keyward_core::KeywardError;
use tracing::error;

/// keyward - a local, encrypted credential vault with fuzzy search.
#[derive(Parser, Debug)]
#[command(name = "keyward", version, about, long_about = None)]
struct Cli {
    /// Load configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Open the vault in the terminal UI (default).
    Open,
    /// Merge a legacy plaintext TOML map into the vault.
    Import {
        /// File of `"<source> <username>" = "<password>"` entries.
        file: PathBuf,
        /// Delete the legacy file after a successful import.
        #[arg(long)]
        remove_source: bool,
    },
    /// Unlock the vault, verify the search index, and report counts.
    Check,
}

fn load_config(path: Option<&std::path::Path>) -> KeywardConfig {
    let loaded = match path {
        Some(path) => keyward_config::load_and_validate_path(path),
        None => keyward_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            keyward_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli, config: KeywardConfig) -> Result<(), KeywardError> {
    match cli.command.unwrap_or(Commands::Open) {
        Commands::Open => tui::run(config),
        Commands::Import {
            file,
            remove_source,
        } => {
            let report =
                commands::import(&config, &file, remove_source, commands::prompt_passphrase)?;
            commands::print_import(&report);
            Ok(())
        }
        Commands::Check => {
            let passphrase = commands::prompt_passphrase(false)?;
            let report = commands::check(&config, &passphrase)?;
            commands::print_check(&report);
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let guard = match logging::init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("keyward: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli, config) {
        error!(error = %e, "keyward exited with an error");
        eprintln!("keyward: {e}");
        // `exit` skips destructors; flush the log writer first.
        drop(guard);
        std::process::exit(1);
    }
}
