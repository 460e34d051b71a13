//! The `encode` command
//!
//! Debug view of the deterministic feature encoding, one named slot per
//! row. Useful for checking training/serving parity by eye.

use anyhow::Result;
use nutrition_engine::encoder::{FeatureEncoder, FEATURE_NAMES};
use nutrition_engine::PetProfileInput;
use tabled::Tabled;

use crate::output::OutputFormat;

#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Feature")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn run(profile: &PetProfileInput, format: OutputFormat) -> Result<()> {
    let encoder = FeatureEncoder::new();
    let features = encoder.encode(profile)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&features)?),
        OutputFormat::Table => {
            println!("Encoder version: {}", features.encoder_version);
            let rows: Vec<FeatureRow> = FEATURE_NAMES
                .iter()
                .zip(features.values.iter())
                .enumerate()
                .map(|(index, (name, value))| FeatureRow {
                    index,
                    name,
                    value: format!("{:.3}", value),
                })
                .collect();
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }
    Ok(())
}
