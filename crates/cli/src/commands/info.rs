//! The `engine-info` command

use anyhow::Result;
use nutrition_engine::EngineContext;
use tabled::Tabled;

use crate::output::OutputFormat;

#[derive(Tabled)]
struct InfoRow {
    #[tabled(rename = "Backend")]
    backend: String,
    #[tabled(rename = "Model Version")]
    model_version: String,
    #[tabled(rename = "Encoder Version")]
    encoder_version: String,
}

pub fn run(context: &EngineContext, format: OutputFormat) -> Result<()> {
    let info = context.engine_info();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&info)?),
        OutputFormat::Table => {
            let rows = vec![InfoRow {
                backend: info.backend_name,
                model_version: info.model_version,
                encoder_version: info.encoder_version,
            }];
            let table = tabled::Table::new(rows)
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }
    Ok(())
}
