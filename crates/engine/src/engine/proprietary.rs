//! The in-process rule/ML engine
//!
//! Wraps the orchestrator and the optional loaded calorie regressor. No
//! I/O at predict time; model loading happens once at construction and a
//! failure there refuses to construct the engine at all.

use crate::artifact::{CalorieRegressor, ModelSlot};
use crate::config::EngineConfig;
use crate::encoder::ENCODER_VERSION;
use crate::engine::NutritionEngine;
use crate::error::EngineError;
use crate::models::{EngineInfo, ModelOutput, PetProfileInput};
use crate::predictor::{Orchestrator, OrchestratorSettings};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Model version reported when no trained artifact is loaded
pub const BASELINE_MODEL_VERSION: &str = "rules-v1";

pub struct ProprietaryEngine {
    orchestrator: Orchestrator,
    slot: Arc<ModelSlot>,
    /// Defensive bound on total orchestration time; the pipeline has no
    /// I/O so hitting this indicates a pathological input
    timeout: Duration,
}

impl std::fmt::Debug for ProprietaryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProprietaryEngine")
            .field("model_version", &self.model_version())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ProprietaryEngine {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        let slot = match &config.model_path {
            Some(path) => {
                let regressor = CalorieRegressor::load(path, config.model_checksum.as_deref())?;
                Arc::new(ModelSlot::loaded(regressor))
            }
            None => {
                info!("No model artifact configured, running rule baseline");
                Arc::new(ModelSlot::empty())
            }
        };

        let settings = OrchestratorSettings {
            consultation_confidence_threshold: config.consultation_confidence_threshold,
            calorie_range_percent: config.calorie_range_percent,
        };

        Ok(Self {
            orchestrator: Orchestrator::with_regressor(settings, Arc::clone(&slot)),
            slot,
            timeout: Duration::from_millis(config.proprietary_timeout_ms),
        })
    }

    /// Currently reported model version
    pub fn model_version(&self) -> String {
        self.slot
            .version()
            .unwrap_or_else(|| BASELINE_MODEL_VERSION.to_string())
    }

    /// Hot-reload a newer artifact by atomic slot swap
    ///
    /// In-flight predictions keep the version they started with.
    pub fn reload_model(
        &self,
        path: &Path,
        expected_checksum: Option<&str>,
    ) -> Result<String, EngineError> {
        let regressor = CalorieRegressor::load(path, expected_checksum)?;
        let version = regressor.version().to_string();
        let previous = self.slot.swap(regressor);
        info!(
            new_version = %version,
            previous_version = ?previous.map(|p| p.version().to_string()),
            "Model artifact swapped"
        );
        Ok(version)
    }
}

#[async_trait]
impl NutritionEngine for ProprietaryEngine {
    async fn predict(&self, profile: &PetProfileInput) -> Result<ModelOutput, EngineError> {
        let version = self.model_version();
        let run = async { self.orchestrator.run(profile, &version) };
        match tokio::time::timeout(self.timeout, run).await {
            Ok(result) => result,
            Err(_) => Err(EngineError::Timeout {
                backend: "proprietary",
                timeout_ms: self.timeout.as_millis() as u64,
            }),
        }
    }

    fn info(&self) -> EngineInfo {
        EngineInfo {
            backend_name: "proprietary".to_string(),
            model_version: self.model_version(),
            encoder_version: ENCODER_VERSION.to_string(),
        }
    }
}
