//! piece CLI: render a view into its layout from the command line.
//!
//! Useful for previewing views, for shell-driven static page generation and
//! as a CGI entry point (`--cgi` writes a status header block first).

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "piece",
    about = "Render views into their layout templates",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the settings file (.yaml, .yml or .json)
    #[arg(long, short, global = true, default_value = "piece.yaml")]
    config: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a view and print the markup
    Render {
        #[command(flatten)]
        input: ViewArgs,

        /// Status code to report with --cgi
        #[arg(long)]
        status: Option<u16>,

        /// Write a CGI header block before the markup
        #[arg(long)]
        cgi: bool,
    },

    /// Render a view and report the files involved, without printing markup
    Check {
        #[command(flatten)]
        input: ViewArgs,
    },
}

#[derive(clap::Args, Debug)]
struct ViewArgs {
    /// View name, relative to the views folder, without extension
    view: String,

    /// Parameters as a JSON object
    #[arg(long, short)]
    params: Option<String>,

    /// Read parameters from a JSON file
    #[arg(long, conflicts_with = "params")]
    params_file: Option<PathBuf>,

    /// Template engine used for both passes
    #[arg(long, value_enum, default_value_t = EngineChoice::Minijinja)]
    engine: EngineChoice,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum EngineChoice {
    /// Full Jinja syntax
    Minijinja,
    /// `{{ name }}` substitution only
    Simple,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render { input, status, cgi } => {
            let stdout = std::io::stdout();
            commands::render(&cli.config, &input, status, cgi, stdout.lock())
        }
        Commands::Check { input } => {
            let stdout = std::io::stdout();
            commands::check(&cli.config, &input, stdout.lock())
        }
    }
}
