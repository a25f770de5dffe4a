use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use flavor_core::errors::{ErrorInfo, FlavorError};
use flavor_thy::serde::to_canonical_json_pretty;
use flavor_thy::{assess, comparisons_to_csv, FlavorReport};

use super::{load_policy, load_table, rule};

/// Default report location, relative to the working directory.
pub const DEFAULT_REPORT: &str = "flavor_report.json";

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// Where to write the JSON report.
    #[arg(long, default_value = DEFAULT_REPORT)]
    pub out: PathBuf,
    /// YAML comparison table replacing the embedded PDG 2024 values.
    #[arg(long)]
    pub table: Option<PathBuf>,
    /// YAML policy overriding thresholds and experiment windows.
    #[arg(long)]
    pub policy: Option<PathBuf>,
    /// Also write the comparison table as CSV.
    #[arg(long)]
    pub csv: Option<PathBuf>,
    /// Skip the printed summary.
    #[arg(long)]
    pub quiet: bool,
}

impl Default for EvaluateArgs {
    fn default() -> Self {
        Self {
            out: PathBuf::from(DEFAULT_REPORT),
            table: None,
            policy: None,
            csv: None,
            quiet: false,
        }
    }
}

/// An output written next to its destination, awaiting rename.
struct Staged<'a> {
    partial: PathBuf,
    dest: &'a Path,
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

fn partial_path(dest: &Path) -> Result<PathBuf, FlavorError> {
    if dest.is_dir() {
        return Err(FlavorError::Io(
            ErrorInfo::new("output-is-directory", format!("cannot write '{}'", dest.display()))
                .with_context("path", display(dest))
                .with_hint("pass a file path, not a directory"),
        ));
    }
    let name = dest.file_name().ok_or_else(|| {
        FlavorError::Io(
            ErrorInfo::new("output-path", format!("'{}' does not name a file", dest.display()))
                .with_context("path", display(dest)),
        )
    })?;
    let mut partial = name.to_os_string();
    partial.push(".partial");
    Ok(dest.with_file_name(partial))
}

fn stage<'a>(dest: &'a Path, bytes: &[u8]) -> Result<Staged<'a>, FlavorError> {
    let partial = partial_path(dest)?;
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| FlavorError::io("io-create-dir", "create directory", display(parent), &err))?;
        }
    }
    fs::write(&partial, bytes).map_err(|err| FlavorError::io("io-write", "write", display(&partial), &err))?;
    Ok(Staged { partial, dest })
}

fn discard(staged: &[Staged<'_>]) {
    for file in staged {
        let _ = fs::remove_file(&file.partial);
    }
}

/// Writes every output or none of them.
///
/// All files are first written under a `.partial` name; only when each one
/// succeeded are they renamed into place.
fn write_all(outputs: &[(&Path, &[u8])]) -> Result<(), FlavorError> {
    for (dest, _) in outputs {
        partial_path(dest)?;
    }
    let mut staged = Vec::with_capacity(outputs.len());
    for (dest, bytes) in outputs {
        match stage(dest, bytes) {
            Ok(file) => staged.push(file),
            Err(err) => {
                discard(&staged);
                return Err(err);
            }
        }
    }
    for (idx, file) in staged.iter().enumerate() {
        if let Err(err) = fs::rename(&file.partial, file.dest) {
            discard(&staged[idx..]);
            for done in &staged[..idx] {
                let _ = fs::remove_file(done.dest);
            }
            return Err(FlavorError::io("io-rename", "write", display(file.dest), &err));
        }
    }
    Ok(())
}

fn print_report(report: &FlavorReport) {
    let width = 100;
    println!("{}", rule(width, '='));
    println!("GENERATION HIERARCHY PREDICTIONS vs {}", report.provenance.table_version);
    println!("{}", rule(width, '='));
    println!(
        "{:<24} {:>8} {:>10} {:>10} {:>10} {:>8} {:>8}  {}",
        "Parameter", "Exact", "Predicted", "Observed", "Error", "Dev %", "Sigma", "Status"
    );
    println!("{}", rule(width, '-'));
    for (result, check) in report.comparisons.iter().zip(&report.verdict.checks) {
        println!(
            "{:<24} {:>8} {:>10.6} {:>10.6} {:>10.6} {:>8.3} {:>8.2}  {}",
            result.label,
            result.predicted_exact.to_string(),
            result.predicted,
            result.observed,
            result.uncertainty,
            result.deviation.percent,
            result.deviation.sigma,
            if check.pass { "pass" } else { "FAIL" }
        );
        if let (Some(predicted), Some(observed)) = (result.predicted_deg, result.observed_deg) {
            println!("{:<24} {:>19.2}° {:>9.2}°", "", predicted, observed);
        }
        if result.observation_source != report.provenance.table_version {
            println!("{:<24} measured by {}", "", result.observation_source);
        }
    }
    println!("{}", rule(width, '-'));

    let verdict = &report.verdict;
    println!(
        "Within threshold: {}/{}",
        report.comparisons.len() - verdict.fail_count,
        report.comparisons.len()
    );
    println!("Average deviation: {:.3}%", verdict.average_percent_deviation);
    println!(
        "Deviation signs: {} above, {} below",
        verdict.systematic_bias.positive, verdict.systematic_bias.negative
    );
    if let Some(relation) = &report.cross_relation {
        println!(
            "Cross-relation sin²θ₁₃(PMNS)/sinθ₁₃(CKM) = {} (expected {})",
            relation.ratio, relation.expected
        );
    }
    for note in &verdict.notes {
        println!("  - {note}");
    }
    println!("Verdict: {}", verdict.status.describe());
    println!("{}", rule(width, '='));
}

/// Runs the full assessment and persists the report.
///
/// Files are written only once the whole pipeline has succeeded.
pub fn run(args: &EvaluateArgs) -> Result<(), Box<dyn Error>> {
    let table = load_table(args.table.as_deref())?;
    let policy = load_policy(args.policy.as_deref())?;
    let report = assess(&table, &policy)?;
    let json = to_canonical_json_pretty(&report)?;
    let csv = match &args.csv {
        Some(_) => Some(comparisons_to_csv(&report.comparisons)?),
        None => None,
    };

    let mut outputs: Vec<(&Path, &[u8])> = vec![(args.out.as_path(), json.as_slice())];
    if let (Some(path), Some(bytes)) = (&args.csv, &csv) {
        outputs.push((path.as_path(), bytes.as_slice()));
    }
    write_all(&outputs)?;
    tracing::info!(path = %args.out.display(), hash = %report.analysis_hash, "report written");
    if let Some(path) = &args.csv {
        tracing::info!(path = %path.display(), "comparison table written");
    }

    if !args.quiet {
        print_report(&report);
        println!("Report: {}", args.out.display());
    }
    Ok(())
}
