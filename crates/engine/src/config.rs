//! Engine configuration
//!
//! Loaded from the environment (prefix `NUTRITION`, `__` as nesting
//! separator). An unrecognized backend name is a fatal configuration
//! error at load time, never a silent fallback.

use crate::error::EngineError;
use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;

/// The closed set of prediction backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// Rule/ML pipeline running in-process
    Proprietary,
    /// Delegates the whole prediction to an OpenAI-compatible endpoint
    ///
    /// Spelled `openai` on the wire, matching [`Backend::as_str`] and
    /// `FromStr`; snake_case would split it into `open_ai`.
    #[serde(rename = "openai")]
    OpenAi,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Proprietary => "proprietary",
            Backend::OpenAi => "openai",
        }
    }
}

impl FromStr for Backend {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proprietary" => Ok(Backend::Proprietary),
            "openai" => Ok(Backend::OpenAi),
            other => Err(EngineError::Config(format!(
                "unknown backend '{}', expected 'proprietary' or 'openai'",
                other
            ))),
        }
    }
}

/// Settings for the OpenAI-compatible backend
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Overall request deadline; exceeding it is an EngineTimeout
    #[serde(default = "default_llm_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_ms: default_llm_timeout_ms(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}
fn default_llm_model() -> String {
    "gpt-4o-mini".to_string()
}
fn default_llm_timeout_ms() -> u64 {
    30_000
}

/// Top-level engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_backend")]
    pub backend: Backend,

    /// Path to the serialized calorie regressor; absent means the rule
    /// baseline runs alone
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Expected SHA256 of the artifact; a mismatch is fatal at startup
    #[serde(default)]
    pub model_checksum: Option<String>,

    /// Diet style confidence below this recommends a consultation
    #[serde(default = "default_confidence_threshold")]
    pub consultation_confidence_threshold: f32,

    /// Half-width of the calorie tolerance band
    #[serde(default = "default_range_percent")]
    pub calorie_range_percent: f32,

    /// Route a timed-out OpenAI call to the proprietary engine instead of
    /// failing. Off by default: fallback must be an explicit choice.
    #[serde(default)]
    pub fallback_on_timeout: bool,

    /// Defensive upper bound on proprietary orchestration time
    #[serde(default = "default_proprietary_timeout_ms")]
    pub proprietary_timeout_ms: u64,

    #[serde(default)]
    pub openai: OpenAiConfig,
}

fn default_backend() -> Backend {
    Backend::Proprietary
}
fn default_confidence_threshold() -> f32 {
    0.6
}
fn default_range_percent() -> f32 {
    0.10
}
fn default_proprietary_timeout_ms() -> u64 {
    2_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            model_path: None,
            model_checksum: None,
            consultation_confidence_threshold: default_confidence_threshold(),
            calorie_range_percent: default_range_percent(),
            fallback_on_timeout: false,
            proprietary_timeout_ms: default_proprietary_timeout_ms(),
            openai: OpenAiConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load from environment variables, e.g. `NUTRITION_BACKEND=openai`,
    /// `NUTRITION_OPENAI__API_KEY=...`
    pub fn load() -> Result<Self, EngineError> {
        let raw = config::Config::builder()
            .add_source(config::Environment::with_prefix("NUTRITION").separator("__"))
            .build()
            .map_err(|e| EngineError::Config(e.to_string()))?;

        let cfg: EngineConfig = raw
            .try_deserialize()
            .map_err(|e| EngineError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(0.0..=1.0).contains(&self.consultation_confidence_threshold) {
            return Err(EngineError::Config(format!(
                "consultation_confidence_threshold must be within 0..=1, got {}",
                self.consultation_confidence_threshold
            )));
        }
        if !(0.0..0.5).contains(&self.calorie_range_percent) {
            return Err(EngineError::Config(format!(
                "calorie_range_percent must be within 0..0.5, got {}",
                self.calorie_range_percent
            )));
        }
        if self.backend == Backend::OpenAi && self.openai.api_key.is_none() {
            return Err(EngineError::Config(
                "openai backend selected but no api_key configured".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parses_known_names() {
        assert_eq!(Backend::from_str("proprietary").unwrap(), Backend::Proprietary);
        assert_eq!(Backend::from_str("openai").unwrap(), Backend::OpenAi);
    }

    #[test]
    fn test_unknown_backend_is_fatal() {
        let err = Backend::from_str("magic").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_backend_deserializes_from_config_value() {
        let backend: Backend = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(backend, Backend::OpenAi);
        assert!(serde_json::from_str::<Backend>("\"magic\"").is_err());
        // One canonical spelling, identical across FromStr and serde
        assert!(serde_json::from_str::<Backend>("\"open_ai\"").is_err());
    }

    #[test]
    fn test_defaults_validate() {
        EngineConfig::default().validate().unwrap();
    }

    #[test]
    fn test_openai_requires_key() {
        let cfg = EngineConfig {
            backend: Backend::OpenAi,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_threshold_bounds_checked() {
        let cfg = EngineConfig {
            consultation_confidence_threshold: 1.5,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
