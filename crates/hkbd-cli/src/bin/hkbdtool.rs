use std::path::Path;

use clap::{Parser, Subcommand};

use hkbd_cli::commands::{apply_settings, config_ops, simulate_ops, suggest_ops};
use hkbd_engine::suggest::CorrectionMode;

#[derive(Parser)]
#[command(name = "hkbdtool", about = "Keyboard suggestion diagnostics")]
struct Cli {
    /// Settings TOML overriding the built-in defaults
    #[arg(long, global = true)]
    settings: Option<String>,
    /// Directory for the JSON trace log (needs the `trace` feature)
    #[arg(long, global = true)]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank suggestions for a typed word
    Suggest {
        /// Word list (`word<TAB>frequency` per line)
        words_file: String,
        /// Word as typed
        typed: String,
        /// Previous word, for bigram ranking
        #[arg(long)]
        prev: Option<String>,
        /// Extra word list, may hold bigram lines (`prev<TAB>next<TAB>frequency`)
        #[arg(long)]
        bigrams: Option<String>,
        /// none, basic, full or full_bigram
        #[arg(long, default_value = "full_bigram")]
        mode: CorrectionMode,
        /// Maximum number of suggestions
        #[arg(short, long, default_value = "12")]
        n: usize,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replay keystrokes through an input session (`<` is backspace)
    Simulate {
        /// Word list (`word<TAB>frequency` per line)
        words_file: String,
        /// Keys to type
        text: String,
        /// Extra word list, may hold bigram lines
        #[arg(long)]
        bigrams: Option<String>,
        /// none, basic, full or full_bigram
        #[arg(long, default_value = "full_bigram")]
        mode: CorrectionMode,
        /// Candidates to show per step
        #[arg(short, long, default_value = "4")]
        n: usize,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the default settings TOML
    SettingsExport,
    /// Check a settings TOML file
    SettingsValidate {
        /// Settings file
        file: String,
    },
}

macro_rules! die {
    ($result:expr, $($arg:tt)*) => {
        $result.unwrap_or_else(|e| {
            eprintln!($($arg)*, e);
            std::process::exit(1);
        })
    };
}

fn main() {
    let cli = Cli::parse();

    if let Some(dir) = cli.log_dir.as_deref() {
        hkbd_engine::init_tracing(Path::new(dir));
    }
    die!(apply_settings(cli.settings.as_deref()), "Error: {}");

    match cli.command {
        Command::Suggest {
            words_file,
            typed,
            prev,
            bigrams,
            mode,
            n,
            json,
        } => suggest_ops::suggest_cmd(
            &words_file,
            &typed,
            prev.as_deref(),
            bigrams.as_deref(),
            mode,
            n,
            json,
        ),
        Command::Simulate {
            words_file,
            text,
            bigrams,
            mode,
            n,
            json,
        } => simulate_ops::simulate_cmd(&words_file, &text, bigrams.as_deref(), mode, n, json),
        Command::SettingsExport => config_ops::settings_export(),
        Command::SettingsValidate { file } => config_ops::settings_validate(&file),
    }
}
