use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    evaluate::{self, EvaluateArgs},
    extended::{self, ExtendedArgs},
    falsify::{self, FalsifyArgs},
    formulas::{self, FormulasArgs},
    version::{self, VersionArgs},
};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "flavor-sim",
    about = "Generation hierarchy predictions for flavor mixing, judged against measured data"
)]
struct Cli {
    /// Log pipeline progress at info level.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compare all predictions, print the verdict and write the report.
    Evaluate(EvaluateArgs),
    /// Print the nine formulas and their exact relations.
    Formulas(FormulasArgs),
    /// Print the exploratory predictions beyond the mixing matrices.
    Extended(ExtendedArgs),
    /// Print the falsification criteria of a policy.
    Falsify(FalsifyArgs),
    /// Print version information.
    Version(VersionArgs),
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        None => evaluate::run(&EvaluateArgs::default()),
        Some(Command::Evaluate(args)) => evaluate::run(&args),
        Some(Command::Formulas(args)) => formulas::run(&args),
        Some(Command::Extended(args)) => extended::run(&args),
        Some(Command::Falsify(args)) => falsify::run(&args),
        Some(Command::Version(args)) => version::run(&args),
    }
}
