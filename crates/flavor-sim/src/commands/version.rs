use std::error::Error;
use std::process::Command;

use clap::Args;
use flavor_rules::pdg_2024;
use flavor_thy::assess::REPORT_SCHEMA;
use flavor_thy::serde::to_canonical_json_bytes;
use serde::Serialize;

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Emit extended metadata including the data table and toolchain.
    #[arg(long)]
    pub long: bool,
}

#[derive(Debug, Serialize)]
struct VersionInfo {
    version: String,
    report_schema: String,
    table_version: String,
    rustc: String,
}

pub fn run(args: &VersionArgs) -> Result<(), Box<dyn Error>> {
    if !args.long {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let rustc = Command::new("rustc")
        .arg("--version")
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_else(|| "rustc unavailable".into());
    let info = VersionInfo {
        version: env!("CARGO_PKG_VERSION").into(),
        report_schema: format!(
            "{}.{}.{}",
            REPORT_SCHEMA.major, REPORT_SCHEMA.minor, REPORT_SCHEMA.patch
        ),
        table_version: pdg_2024()?.version.clone(),
        rustc,
    };
    let json = to_canonical_json_bytes(&info)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}
