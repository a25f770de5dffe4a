use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use flavor_rules::GenerationHierarchy;
use flavor_thy::FAIL_COUNT_LIMIT;

use super::{load_policy, rule};

#[derive(Args, Debug)]
pub struct FalsifyArgs {
    /// YAML policy overriding thresholds and experiment windows.
    #[arg(long)]
    pub policy: Option<PathBuf>,
}

pub fn run(args: &FalsifyArgs) -> Result<(), Box<dyn Error>> {
    let policy = load_policy(args.policy.as_deref())?;
    let hierarchy = GenerationHierarchy::standard();

    println!("{}", rule(72, '='));
    println!("FALSIFICATION CRITERIA");
    println!("{}", rule(72, '='));
    println!("A parameter fails beyond {:.1}σ.", policy.sigma_threshold);
    println!("The hypothesis is falsified if:");
    println!("  - {FAIL_COUNT_LIMIT} or more parameters fail");
    println!("  - the average deviation reaches {:.1}%", policy.average_percent_max);
    println!(
        "A systematic bias ({} or more same-sign deviations) is reported, never decisive alone.",
        policy.bias_majority
    );

    if policy.windows.is_empty() {
        return Ok(());
    }
    println!("{}", rule(72, '-'));
    println!("Experiment windows:");
    for window in &policy.windows {
        let predicted = hierarchy.evaluate(window.parameter)?.value();
        let state = if window.active { "active" } else { "pending" };
        println!(
            "  {:<6} {} in [{}, {}] ({state}); predicted {:.6} {}",
            window.experiment,
            window.parameter,
            window.interval.min,
            window.interval.max,
            predicted,
            if window.interval.contains(predicted) { "inside" } else { "outside" }
        );
        if let Some(precision) = window.precision {
            println!("         expected precision ±{precision}");
        }
        if let Some(measurement) = &window.measurement {
            println!(
                "         measured {} ± {}",
                measurement.central, measurement.uncertainty
            );
        }
    }
    Ok(())
}
