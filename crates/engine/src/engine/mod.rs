//! Prediction backends and the engine selection layer
//!
//! The backend set is closed: configuration selects one of the known
//! engines at startup and an unknown name fails there. Callers go through
//! [`EngineContext`], which owns metrics, structured logging, and the
//! optional explicit timeout fallback.

mod openai;
mod proprietary;

pub use openai::OpenAiEngine;
pub use proprietary::{ProprietaryEngine, BASELINE_MODEL_VERSION};

use crate::config::{Backend, EngineConfig};
use crate::error::EngineError;
use crate::models::{EngineInfo, ModelOutput, PetProfileInput, PredictionRecord};
use crate::observability::{EngineMetrics, StructuredLogger};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Instant;

/// Common surface every backend implements
#[async_trait]
pub trait NutritionEngine: Send + Sync {
    /// Produce a full nutritional assessment for one profile
    async fn predict(&self, profile: &PetProfileInput) -> Result<ModelOutput, EngineError>;

    /// Identity of this backend for logging and telemetry
    fn info(&self) -> EngineInfo;
}

/// The closed set of engines, resolved once from configuration
#[derive(Debug)]
pub enum Engine {
    Proprietary(ProprietaryEngine),
    OpenAi(OpenAiEngine),
}

impl Engine {
    pub fn from_config(config: &EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        match config.backend {
            Backend::Proprietary => Ok(Engine::Proprietary(ProprietaryEngine::from_config(
                config,
            )?)),
            Backend::OpenAi => Ok(Engine::OpenAi(OpenAiEngine::from_config(config)?)),
        }
    }

    pub fn backend(&self) -> Backend {
        match self {
            Engine::Proprietary(_) => Backend::Proprietary,
            Engine::OpenAi(_) => Backend::OpenAi,
        }
    }

    pub async fn predict(&self, profile: &PetProfileInput) -> Result<ModelOutput, EngineError> {
        match self {
            Engine::Proprietary(e) => e.predict(profile).await,
            Engine::OpenAi(e) => e.predict(profile).await,
        }
    }

    pub fn info(&self) -> EngineInfo {
        match self {
            Engine::Proprietary(e) => e.info(),
            Engine::OpenAi(e) => e.info(),
        }
    }
}

/// Entry point handed to callers: one resolved engine plus the ambient
/// concerns around it
pub struct EngineContext {
    engine: Engine,
    /// Populated only when fallback is explicitly enabled and the primary
    /// backend is remote
    fallback: Option<ProprietaryEngine>,
    metrics: EngineMetrics,
    logger: StructuredLogger,
}

impl EngineContext {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let engine = Engine::from_config(&config)?;

        let fallback = if config.fallback_on_timeout && config.backend == Backend::OpenAi {
            Some(ProprietaryEngine::from_config(&config)?)
        } else {
            None
        };

        let info = engine.info();
        let metrics = EngineMetrics::new();
        metrics.set_model_version(&info.backend_name, &info.model_version, &info.encoder_version);

        let logger = StructuredLogger::new(info.backend_name.clone());
        logger.log_engine_started(&info.model_version, &info.encoder_version);

        Ok(Self {
            engine,
            fallback,
            metrics,
            logger,
        })
    }

    /// Load configuration from the environment and construct the context
    pub fn from_env() -> Result<Self, EngineError> {
        Self::new(EngineConfig::load()?)
    }

    pub fn engine_info(&self) -> EngineInfo {
        self.engine.info()
    }

    /// Run a prediction through the selected engine
    ///
    /// A timeout on the primary engine is only rerouted when a fallback
    /// engine was configured, and the reroute is logged and counted; it
    /// never happens silently.
    pub async fn predict(&self, profile: &PetProfileInput) -> Result<ModelOutput, EngineError> {
        let start = Instant::now();

        let mut result = self.engine.predict(profile).await;
        if let (Err(EngineError::Timeout { backend, .. }), Some(fallback)) =
            (&result, &self.fallback)
        {
            self.logger
                .log_fallback(backend, "proprietary", "primary backend timed out");
            self.metrics.inc_fallbacks();
            result = fallback.predict(profile).await;
        }

        let elapsed = start.elapsed();
        self.metrics
            .observe_prediction_latency(elapsed.as_secs_f64());

        match result {
            Ok(output) => {
                self.metrics.inc_predictions();
                if output.veterinary_consultation_recommended {
                    self.metrics.inc_consultations_recommended();
                }
                self.logger.log_prediction(
                    profile.species.as_str(),
                    output.diet_style.as_str(),
                    output.calories_per_day,
                    output.confidence_score,
                    output.veterinary_consultation_recommended,
                    output.alert_messages.len(),
                    &output.model_version,
                    elapsed.as_millis() as u64,
                );
                Ok(output)
            }
            Err(e) => {
                self.metrics.inc_prediction_errors();
                self.logger.log_prediction_error(&e.to_string());
                Err(e)
            }
        }
    }

    /// Predict and wrap the result as a log row for the caller to persist
    pub async fn predict_recorded(
        &self,
        pet_ref: &str,
        profile: &PetProfileInput,
    ) -> Result<PredictionRecord, EngineError> {
        let output = self.predict(profile).await?;
        let info = self.engine_info();
        Ok(PredictionRecord {
            pet_ref: pet_ref.to_string(),
            input: profile.clone(),
            output: output.clone(),
            backend: info.backend_name,
            model_version: output.model_version.clone(),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Species;

    #[test]
    fn test_engine_resolution_follows_backend() {
        let engine = Engine::from_config(&EngineConfig::default()).unwrap();
        assert_eq!(engine.backend(), Backend::Proprietary);
        assert_eq!(engine.info().backend_name, "proprietary");
    }

    #[test]
    fn test_openai_without_key_fails_resolution() {
        let config = EngineConfig {
            backend: Backend::OpenAi,
            ..Default::default()
        };
        assert!(matches!(
            Engine::from_config(&config).unwrap_err(),
            EngineError::Config(_)
        ));
    }

    #[tokio::test]
    async fn test_context_predicts_with_defaults() {
        let context = EngineContext::new(EngineConfig::default()).unwrap();
        let profile = PetProfileInput::baseline(Species::Dog);
        let output = context.predict(&profile).await.unwrap();
        assert!(output.calories_per_day > 0);
        assert_eq!(output.model_version, BASELINE_MODEL_VERSION);
    }

    #[tokio::test]
    async fn test_context_builds_prediction_record() {
        let context = EngineContext::new(EngineConfig::default()).unwrap();
        let profile = PetProfileInput::baseline(Species::Cat);
        let record = context.predict_recorded("pet-42", &profile).await.unwrap();
        assert_eq!(record.pet_ref, "pet-42");
        assert_eq!(record.backend, "proprietary");
        assert_eq!(record.model_version, record.output.model_version);
    }

    #[test]
    fn test_no_fallback_without_opt_in() {
        let context = EngineContext::new(EngineConfig::default()).unwrap();
        assert!(context.fallback.is_none());
    }

    #[test]
    fn test_fallback_requires_remote_primary() {
        // fallback_on_timeout with the proprietary backend is a no-op:
        // there is nothing to fall back to.
        let config = EngineConfig {
            fallback_on_timeout: true,
            ..Default::default()
        };
        let context = EngineContext::new(config).unwrap();
        assert!(context.fallback.is_none());
    }
}
