use std::error::Error;
use std::fs;
use std::path::Path;

use flavor_core::errors::{ErrorInfo, FlavorError};
use flavor_rules::{pdg_2024, ParameterTable};
use flavor_thy::Policy;

pub mod evaluate;
pub mod extended;
pub mod falsify;
pub mod formulas;
pub mod version;

fn read_config(path: &Path, what: &str) -> Result<String, FlavorError> {
    fs::read_to_string(path).map_err(|err| {
        FlavorError::MalformedConfiguration(
            ErrorInfo::new("config-read", format!("cannot read {what} file"))
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}

/// Loads a comparison table from YAML, or the embedded PDG 2024 table.
pub fn load_table(path: Option<&Path>) -> Result<ParameterTable, Box<dyn Error>> {
    match path {
        Some(path) => {
            let text = read_config(path, "table")?;
            let table = ParameterTable::from_yaml_str(&text)?;
            tracing::info!(path = %path.display(), version = %table.version, "loaded table");
            Ok(table)
        }
        None => Ok(pdg_2024()?.clone()),
    }
}

/// Loads a policy from YAML, or the default thresholds.
pub fn load_policy(path: Option<&Path>) -> Result<Policy, Box<dyn Error>> {
    let policy = match path {
        Some(path) => {
            let text = read_config(path, "policy")?;
            let policy: Policy = serde_yaml::from_str(&text).map_err(|err| {
                FlavorError::MalformedConfiguration(
                    ErrorInfo::new("yaml-read", err.to_string())
                        .with_context("path", path.display().to_string()),
                )
            })?;
            tracing::info!(path = %path.display(), "loaded policy");
            policy
        }
        None => Policy::default(),
    };
    policy.validate()?;
    Ok(policy)
}

pub(crate) fn rule(width: usize, ch: char) -> String {
    std::iter::repeat(ch).take(width).collect()
}
