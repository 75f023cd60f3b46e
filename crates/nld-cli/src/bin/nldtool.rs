use clap::{Parser, Subcommand};

use nld_cli::commands::{parse_ops, settings_ops, simulate_ops};

#[derive(Parser)]
#[command(name = "nldtool", about = "Inline date trigger diagnostics")]
struct Cli {
    /// Settings TOML to use instead of the built-in defaults
    #[arg(long, global = true)]
    config: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Export default settings as TOML
    SettingsExport,
    /// Validate a custom settings TOML file
    SettingsValidate {
        /// Path to the TOML file
        file: String,
    },
    /// Run trigger recognition on a single line
    Parse {
        /// Line text
        line: String,
        /// Cursor column in characters (default: end of line)
        #[arg(long)]
        cursor: Option<usize>,
        /// Trigger phrase (default: from settings)
        #[arg(long)]
        phrase: Option<String>,
        /// Let the phrase abut any character
        #[arg(long)]
        trigger_happy: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List suggestions for a query with their resolved dates
    Suggest {
        /// Query text typed after the trigger phrase
        #[arg(default_value = "")]
        query: String,
        /// Holiday locale (default: from settings)
        #[arg(long)]
        locale: Option<String>,
    },
    /// Replay a key script against an in-memory editor
    Simulate {
        /// Path to the script file
        script: String,
        /// Holiday locale (default: from settings)
        #[arg(long)]
        locale: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Some(path) = &cli.config {
        let content = std::fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        });
        if let Err(e) = nld_core::settings::init_custom(content) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }

    match cli.command {
        Command::SettingsExport => settings_ops::settings_export(),
        Command::SettingsValidate { file } => settings_ops::settings_validate(&file),
        Command::Parse {
            line,
            cursor,
            phrase,
            trigger_happy,
            json,
        } => parse_ops::parse(&line, cursor, phrase.as_deref(), trigger_happy, json),
        Command::Suggest { query, locale } => parse_ops::suggest(&query, locale.as_deref()),
        Command::Simulate { script, locale } => {
            simulate_ops::simulate(&script, locale.as_deref())
        }
    }
}
