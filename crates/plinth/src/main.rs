// SPDX-FileCopyrightText: 2026 Plinth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plinth - plugin runtime inspection tool.

mod inspect;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use plinth_config::PlinthConfig;
use plinth_core::{Class, PluginType};

/// Plinth - inspect installed plugins.
#[derive(Parser, Debug)]
#[command(name = "plinth", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the descriptor of the plugin in a directory.
    Inspect {
        /// Plugin directory containing plugin.json.
        dir: PathBuf,
        /// Class to assign (defaults to plugins.default_class).
        #[arg(long)]
        class: Option<Class>,
        /// Output JSON.
        #[arg(long)]
        json: bool,
        /// Disable colors.
        #[arg(long)]
        plain: bool,
    },
    /// List every plugin under a root directory.
    List {
        /// Root directory (defaults to plugins.dir).
        root: Option<PathBuf>,
        /// Only list plugins of this type.
        #[arg(long = "type")]
        plugin_type: Option<PluginType>,
        /// Output JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => plinth_config::load_and_validate_path(path),
        None => plinth_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            plinth_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log.level);

    let result = match cli.command {
        Commands::Inspect {
            dir,
            class,
            json,
            plain,
        } => inspect::run_inspect(&config, &dir, class, json, plain),
        Commands::List {
            root,
            plugin_type,
            json,
        } => inspect::run_list(&config, root.as_deref(), plugin_type, json),
        Commands::Config => print_config(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn print_config(config: &PlinthConfig) -> Result<(), plinth_core::PluginError> {
    let rendered = toml::to_string_pretty(config)
        .map_err(|e| plinth_core::PluginError::Internal(format!("failed to render config: {e}")))?;
    print!("{rendered}");
    Ok(())
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("plinth={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
