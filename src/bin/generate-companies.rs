/// Write a synthetic company hierarchy CSV
use std::path::PathBuf;

use anyhow::{Context, Result};
use sunburst_rs::data::generate::{generate, GeneratorConfig};
use sunburst_rs::data::save_records;

fn main() -> Result<()> {
    sunburst_rs::init_logging();

    let mut config = GeneratorConfig::default();
    let mut out = PathBuf::from("companies.csv");

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--seed" => {
                let value = iter.next().context("--seed needs a number")?;
                config.seed = value
                    .parse()
                    .with_context(|| format!("Invalid seed '{}'", value))?;
            }
            "--roots" => {
                let value = iter.next().context("--roots needs a number")?;
                config.roots = value
                    .parse()
                    .with_context(|| format!("Invalid root count '{}'", value))?;
            }
            "-h" | "--help" => {
                println!("Usage: generate-companies [OUT.csv] [--seed N] [--roots N]");
                return Ok(());
            }
            _ => out = PathBuf::from(arg),
        }
    }

    let records = generate(&config);
    save_records(&out, &records)?;
    println!("Wrote {} companies in {} groups to {}", records.len(), config.roots, out.display());
    Ok(())
}
