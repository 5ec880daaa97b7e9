use std::path::Path;

use clap::{Parser, Subcommand};

use ac_cli::commands::{config_ops, replay_ops};

#[derive(Parser)]
#[command(name = "actool", about = "Autocomplete overlay diagnostics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON interaction script and print the state after each step
    Replay {
        /// Path to the script file
        script: String,
        /// Settings TOML (defaults to the embedded settings)
        #[arg(long)]
        config: Option<String>,
        /// Input surface identifier
        #[arg(long)]
        surface: Option<String>,
        /// Emit one JSON report per line
        #[arg(long)]
        json: bool,
        /// Directory for the JSONL trace (requires the trace feature)
        #[arg(long)]
        log_dir: Option<String>,
    },
    /// Print the default settings TOML
    SettingsExport,
    /// Validate a settings TOML file
    SettingsValidate {
        /// Path to the settings file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            script,
            config,
            surface,
            json,
            log_dir,
        } => {
            if let Some(dir) = log_dir {
                if !ac_engine::init_tracing(Path::new(&dir)) {
                    eprintln!("warning: tracing unavailable (build with --features trace)");
                }
            }
            replay_ops::replay(&script, config.as_deref(), surface.as_deref(), json);
        }
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
