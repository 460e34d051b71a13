//! The `predict` command

use anyhow::Result;
use nutrition_engine::{EngineContext, ModelOutput, PetProfileInput};
use tabled::Tabled;

use crate::output::{
    color_confidence, color_risk, format_calories, print_warning, OutputFormat,
};

/// Row of the prediction summary table
#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

/// Row of the risk table
#[derive(Tabled)]
struct RiskRow {
    #[tabled(rename = "Category")]
    category: &'static str,
    #[tabled(rename = "Level")]
    level: String,
}

pub async fn run(
    context: &EngineContext,
    profile: &PetProfileInput,
    pet_ref: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    match pet_ref {
        Some(pet_ref) => {
            let record = context.predict_recorded(&pet_ref, profile).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
                OutputFormat::Table => {
                    println!("Prediction for {}", record.pet_ref);
                    print_output_tables(&record.output);
                }
            }
        }
        None => {
            let output = context.predict(profile).await?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&output)?),
                OutputFormat::Table => print_output_tables(&output),
            }
        }
    }
    Ok(())
}

fn print_output_tables(output: &ModelOutput) {
    let summary = vec![
        SummaryRow {
            field: "Diet style",
            value: output.diet_style.as_str().to_string(),
        },
        SummaryRow {
            field: "Diet confidence",
            value: color_confidence(output.diet_style_confidence),
        },
        SummaryRow {
            field: "Calories",
            value: format_calories(
                output.calories_per_day,
                output.calorie_range_min,
                output.calorie_range_max,
            ),
        },
        SummaryRow {
            field: "Protein",
            value: format!("{:.0}%", output.protein_percent),
        },
        SummaryRow {
            field: "Fat",
            value: format!("{:.0}%", output.fat_percent),
        },
        SummaryRow {
            field: "Carbohydrate",
            value: format!("{:.0}%", output.carbohydrate_percent),
        },
        SummaryRow {
            field: "Feeding",
            value: format!(
                "{} meals/day, {} g/meal",
                output.meals_per_day, output.portion_size_grams
            ),
        },
        SummaryRow {
            field: "Overall confidence",
            value: color_confidence(output.confidence_score),
        },
        SummaryRow {
            field: "Model",
            value: output.model_version.clone(),
        },
    ];

    let table = tabled::Table::new(summary)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);

    let risks: Vec<RiskRow> = output
        .risks
        .iter()
        .map(|(category, level)| RiskRow {
            category: category.as_str(),
            level: color_risk(level.as_str()),
        })
        .collect();
    let table = tabled::Table::new(risks)
        .with(tabled::settings::Style::rounded())
        .to_string();
    println!("{}", table);

    if output.veterinary_consultation_recommended {
        print_warning("Veterinary consultation recommended");
    }
    for alert in &output.alert_messages {
        print_warning(alert);
    }
}
