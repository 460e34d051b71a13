//! OpenAI-compatible backend
//!
//! Delegates the whole assessment to a chat-completions endpoint and
//! parses the strict-JSON reply into the same [`ModelOutput`] the
//! proprietary pipeline produces. The LLM is not trusted with the output
//! invariants: every numeric field is re-clamped and the calorie range,
//! protein floor, and consultation flag are recomputed locally before the
//! output leaves this module.

use crate::encoder::FeatureEncoder;
use crate::engine::NutritionEngine;
use crate::error::{EngineError, Stage};
use crate::models::{DietStyle, EngineInfo, ModelOutput, PetProfileInput, RiskMap, Species};
use crate::predictor::{
    CALORIES_BOUNDS, CARB_BOUNDS, CAT_PROTEIN_FLOOR, FAT_BOUNDS, MACRO_SUM_TOLERANCE,
    PORTION_BOUNDS, PROTEIN_BOUNDS,
};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::EngineConfig;

/// Encoder version is local detail the remote model never sees; reported
/// info still carries it so telemetry labels stay comparable across
/// backends.
use crate::encoder::ENCODER_VERSION;

const SYSTEM_PROMPT: &str = r#"You are a veterinary nutrition assessment service. Given a pet profile as JSON, respond with ONLY a JSON object (no prose, no markdown) with exactly these fields:
{
  "calories_per_day": <integer kcal>,
  "protein_percent": <number>,
  "fat_percent": <number>,
  "carbohydrate_percent": <number>,
  "diet_style": <one of "maintenance_standard","weight_loss","weight_gain","high_protein_performance","senior_wellness","senior_wellness_kidney","growth_puppy","growth_kitten","digestive_sensitive","grain_free_high_protein">,
  "diet_style_confidence": <number 0..1>,
  "risks": {"weight_risk": <"low"|"medium"|"high">, "joint_risk": ..., "digestive_risk": ..., "metabolic_risk": ..., "kidney_risk": ..., "dental_risk": ...},
  "meals_per_day": <integer>,
  "portion_size_grams": <integer>,
  "confidence_score": <number 0..1>,
  "veterinary_consultation_recommended": <boolean>,
  "alert_messages": [<strings>]
}
Base calories on resting energy requirement (70 * kg^0.75) scaled for life stage, neuter status, activity, and goal."#;

/// The subset of the output contract the LLM is asked to produce
#[derive(Debug, Deserialize)]
struct LlmAssessment {
    calories_per_day: u32,
    protein_percent: f32,
    fat_percent: f32,
    carbohydrate_percent: f32,
    diet_style: DietStyle,
    diet_style_confidence: f32,
    risks: RiskMap,
    meals_per_day: u8,
    portion_size_grams: u32,
    #[serde(default)]
    confidence_score: Option<f32>,
    #[serde(default)]
    veterinary_consultation_recommended: bool,
    #[serde(default)]
    alert_messages: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

pub struct OpenAiEngine {
    client: reqwest::Client,
    completions_url: Url,
    api_key: String,
    model: String,
    timeout_ms: u64,
    consultation_confidence_threshold: f32,
    calorie_range_percent: f32,
}

// Hand-written so the api_key can never leak into logs or panic output.
impl std::fmt::Debug for OpenAiEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEngine")
            .field("completions_url", &self.completions_url.as_str())
            .field("model", &self.model)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl OpenAiEngine {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let api_key = config
            .openai
            .api_key
            .clone()
            .ok_or_else(|| EngineError::Config("openai backend requires an api_key".into()))?;

        // Url::join treats a path without a trailing slash as a file and
        // would drop the /v1 segment.
        let mut base_url = config.openai.base_url.clone();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let base: Url = base_url
            .parse()
            .map_err(|e| EngineError::Config(format!("invalid openai base_url: {}", e)))?;
        let completions_url = base
            .join("chat/completions")
            .map_err(|e| EngineError::Config(format!("invalid openai base_url: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.openai.timeout_ms))
            .build()
            .map_err(|e| EngineError::Config(format!("failed to build http client: {}", e)))?;

        Ok(Self {
            client,
            completions_url,
            api_key,
            model: config.openai.model.clone(),
            timeout_ms: config.openai.timeout_ms,
            consultation_confidence_threshold: config.consultation_confidence_threshold,
            calorie_range_percent: config.calorie_range_percent,
        })
    }

    fn model_version(&self) -> String {
        format!("openai:{}", self.model)
    }

    fn request_body(&self, profile: &PetProfileInput) -> Result<serde_json::Value, EngineError> {
        let profile_json = serde_json::to_string(profile)
            .map_err(|e| EngineError::prediction(Stage::Assembly, e))?;
        Ok(json!({
            "model": self.model,
            "temperature": 0.2,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": profile_json},
            ],
        }))
    }

    /// Re-impose the output invariants on whatever the LLM returned
    fn normalize(&self, assessment: LlmAssessment, profile: &PetProfileInput) -> ModelOutput {
        let calories = assessment
            .calories_per_day
            .clamp(CALORIES_BOUNDS.0, CALORIES_BOUNDS.1);
        let spread = ((calories as f32 * self.calorie_range_percent) as u32).max(1);

        let mut protein = assessment
            .protein_percent
            .clamp(PROTEIN_BOUNDS.0, PROTEIN_BOUNDS.1);
        if profile.species == Species::Cat && protein < CAT_PROTEIN_FLOOR {
            protein = CAT_PROTEIN_FLOOR;
        }

        let fat = assessment.fat_percent.clamp(FAT_BOUNDS.0, FAT_BOUNDS.1);
        let carbohydrate = assessment
            .carbohydrate_percent
            .clamp(CARB_BOUNDS.0, CARB_BOUNDS.1);

        let diet_confidence = assessment.diet_style_confidence.clamp(0.0, 1.0);
        let confidence = assessment
            .confidence_score
            .unwrap_or(diet_confidence)
            .clamp(0.0, 1.0);

        let consultation = assessment.veterinary_consultation_recommended
            || assessment.risks.any_high()
            || diet_confidence < self.consultation_confidence_threshold;

        // Clamping can push the macros away from 100%; flag it exactly
        // like the in-process pipeline does, never renormalize.
        let mut alerts = assessment.alert_messages;
        let macro_sum = protein + fat + carbohydrate;
        if (macro_sum - 100.0).abs() > MACRO_SUM_TOLERANCE {
            alerts.push(format!(
                "Macronutrient targets sum to {:.1}%, outside the expected 100% \u{00b1} {:.0}%; review before feeding.",
                macro_sum, MACRO_SUM_TOLERANCE
            ));
        }

        ModelOutput {
            calories_per_day: calories,
            calorie_range_min: calories - spread,
            calorie_range_max: calories + spread,
            protein_percent: protein,
            fat_percent: fat,
            carbohydrate_percent: carbohydrate,
            diet_style: assessment.diet_style,
            diet_style_confidence: diet_confidence,
            risks: assessment.risks,
            meals_per_day: assessment.meals_per_day.clamp(1, 4),
            portion_size_grams: assessment
                .portion_size_grams
                .clamp(PORTION_BOUNDS.0, PORTION_BOUNDS.1),
            model_version: self.model_version(),
            prediction_timestamp: Utc::now(),
            confidence_score: confidence,
            veterinary_consultation_recommended: consultation,
            alert_messages: alerts,
        }
    }
}

#[async_trait]
impl NutritionEngine for OpenAiEngine {
    async fn predict(&self, profile: &PetProfileInput) -> Result<ModelOutput, EngineError> {
        // Same input gate as the proprietary path: invalid profiles fail
        // identically regardless of backend.
        FeatureEncoder::validate(profile)?;

        let body = self.request_body(profile)?;
        let response = self
            .client
            .post(self.completions_url.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EngineError::Timeout {
                        backend: "openai",
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    EngineError::prediction(Stage::Assembly, e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(EngineError::prediction(
                Stage::Assembly,
                anyhow::anyhow!("openai request failed with {}: {}", status, detail),
            ));
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| EngineError::prediction(Stage::Assembly, e))?;
        let content = chat
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| {
                EngineError::prediction(Stage::Assembly, anyhow::anyhow!("empty choices in reply"))
            })?;

        debug!(bytes = content.len(), "Parsing LLM assessment");
        let assessment: LlmAssessment = serde_json::from_str(content).map_err(|e| {
            EngineError::prediction(
                Stage::Assembly,
                anyhow::anyhow!("malformed assessment JSON from LLM: {}", e),
            )
        })?;

        Ok(self.normalize(assessment, profile))
    }

    fn info(&self) -> EngineInfo {
        EngineInfo {
            backend_name: "openai".to_string(),
            model_version: self.model_version(),
            encoder_version: ENCODER_VERSION.to_string(),
        }
    }
}
