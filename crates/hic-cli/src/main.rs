use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::{
    design::{self, DesignArgs},
    parse_system::{self, ParseSystemArgs},
    show::{self, ShowArgs},
    validate::{self, ValidateArgs},
};
use hic_config::{init_logging, Workdir};
use tracing::debug;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "hic", about = "Heavy-ion collision calibration project tool")]
struct Cli {
    /// Working directory holding the `cache` subdirectory (overrides WORKDIR).
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse collision system identifiers such as PbPb5020.
    ParseSystem(ParseSystemArgs),
    /// Summarise a project file.
    Show(ShowArgs),
    /// Resolve a project file and report whether it is consistent.
    Validate(ValidateArgs),
    /// Materialize the design matrix into the cache directory.
    Design(DesignArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let level = init_logging()?;
    let workdir = cli.workdir.map(Workdir::new).unwrap_or_else(Workdir::from_env);
    let cache = workdir.ensure()?;
    debug!(%level, cache = %cache.display(), "startup complete");
    match cli.command {
        Command::ParseSystem(args) => parse_system::run(&args),
        Command::Show(args) => show::run(&args, &workdir),
        Command::Validate(args) => validate::run(&args, &workdir),
        Command::Design(args) => design::run(&args, &workdir),
    }
}
