use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use flavor_thy::compare_extended;

use super::{load_table, rule};

#[derive(Args, Debug)]
pub struct ExtendedArgs {
    /// YAML comparison table replacing the embedded PDG 2024 values.
    #[arg(long)]
    pub table: Option<PathBuf>,
}

/// Prints the exploratory predictions. They are never part of the verdict.
pub fn run(args: &ExtendedArgs) -> Result<(), Box<dyn Error>> {
    let table = load_table(args.table.as_deref())?;
    let comparisons = compare_extended(&table)?;
    println!("{}", rule(96, '='));
    println!("EXPLORATORY PREDICTIONS vs {} (not judged)", table.version);
    println!("{}", rule(96, '='));
    for comparison in &comparisons {
        println!(
            "{:<26} {:>10} {:>12.6} {:>12.6} {:>8.3}%",
            comparison.label,
            comparison.predicted_exact.to_string(),
            comparison.predicted,
            comparison.observed,
            comparison.percent_deviation
        );
        println!("{:<26} {}", "", comparison.formula);
    }
    Ok(())
}
