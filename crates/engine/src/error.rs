//! Error taxonomy for the nutrition engine
//!
//! Component-level errors propagate up through the orchestrator without
//! being swallowed; a failed stage fails the whole prediction. There is
//! no partially-populated output path.

use thiserror::Error;

/// Orchestrator stages, used to attribute failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Independent stage: calorie estimate and risk assessment
    Independent,
    DietStyle,
    Macronutrients,
    Assembly,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Independent => "independent",
            Stage::DietStyle => "diet_style",
            Stage::Macronutrients => "macronutrients",
            Stage::Assembly => "assembly",
        };
        write!(f, "{}", name)
    }
}

/// Input profile failed domain validation
///
/// Surfaced to the caller immediately; never retried.
#[derive(Debug, Error, PartialEq)]
pub enum FeatureEncodingError {
    #[error("{field} = {value} is outside the valid range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("required field {field} is missing or empty")]
    MissingField { field: &'static str },
    #[error("{field} has unrecognized value '{value}' with no defined fallback")]
    UnknownValue { field: &'static str, value: String },
}

/// Top-level engine failure
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("feature encoding failed: {0}")]
    FeatureEncoding(#[from] FeatureEncodingError),

    /// The backend exceeded its deadline. Retryable by the caller, or
    /// routed to the configured fallback engine.
    #[error("engine '{backend}' timed out after {timeout_ms}ms")]
    Timeout { backend: &'static str, timeout_ms: u64 },

    /// Model artifact could not be loaded or validated. Fatal at engine
    /// construction; the process must not serve with a half-initialized
    /// engine.
    #[error("model load failed: {0}")]
    ModelLoad(String),

    /// A pipeline stage failed irrecoverably
    #[error("prediction failed at stage {stage}: {source}")]
    Prediction {
        stage: Stage,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid engine configuration: {0}")]
    Config(String),
}

impl EngineError {
    pub fn prediction(stage: Stage, source: impl Into<anyhow::Error>) -> Self {
        EngineError::Prediction {
            stage,
            source: source.into(),
        }
    }
}
