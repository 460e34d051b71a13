//! Pet nutrition prediction engine
//!
//! This crate provides the core functionality for:
//! - Deterministic feature encoding of pet profiles
//! - Rule-based risk assessment and diet style classification
//! - Calorie and macronutrient estimation
//! - Multi-stage prediction orchestration
//! - Swappable backends (in-process pipeline or OpenAI-compatible LLM)

pub mod artifact;
pub mod config;
pub mod encoder;
pub mod engine;
pub mod error;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod rules;

pub use config::{Backend, EngineConfig, OpenAiConfig};
pub use engine::{Engine, EngineContext, NutritionEngine, BASELINE_MODEL_VERSION};
pub use error::{EngineError, FeatureEncodingError, Stage};
pub use models::*;
pub use observability::{EngineMetrics, StructuredLogger};
