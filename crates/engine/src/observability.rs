//! Observability infrastructure for the nutrition engine
//!
//! Provides:
//! - Prometheus metrics (prediction latency, prediction counts, model version)
//! - Structured logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;
use tracing::{info, warn};

/// Histogram buckets for prediction latency (seconds). The proprietary
/// path should land well under 100ms; the LLM path can take seconds.
const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<EngineMetricsInner> = OnceLock::new();

struct EngineMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    prediction_errors_total: IntCounter,
    consultations_recommended_total: IntCounter,
    fallbacks_total: IntCounter,
    model_version_info: GaugeVec,
}

impl EngineMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "nutrition_engine_prediction_latency_seconds",
                "Time spent producing one nutritional assessment",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "nutrition_engine_predictions_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter!(
                "nutrition_engine_prediction_errors_total",
                "Total number of failed predictions"
            )
            .expect("Failed to register prediction_errors_total"),

            consultations_recommended_total: register_int_counter!(
                "nutrition_engine_consultations_recommended_total",
                "Predictions that carried a veterinary consultation flag"
            )
            .expect("Failed to register consultations_recommended_total"),

            fallbacks_total: register_int_counter!(
                "nutrition_engine_fallbacks_total",
                "Predictions served by the fallback engine after a timeout"
            )
            .expect("Failed to register fallbacks_total"),

            model_version_info: register_gauge_vec!(
                "nutrition_engine_model_version_info",
                "Information about the active backend and model",
                &["backend", "model_version", "encoder_version"]
            )
            .expect("Failed to register model_version_info"),
        }
    }
}

/// Lightweight handle to the global metrics instance
#[derive(Clone)]
pub struct EngineMetrics {
    _private: (),
}

impl Default for EngineMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(EngineMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &EngineMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_prediction_errors(&self) {
        self.inner().prediction_errors_total.inc();
    }

    pub fn inc_consultations_recommended(&self) {
        self.inner().consultations_recommended_total.inc();
    }

    pub fn inc_fallbacks(&self) {
        self.inner().fallbacks_total.inc();
    }

    pub fn set_model_version(&self, backend: &str, model_version: &str, encoder_version: &str) {
        self.inner().model_version_info.reset();
        self.inner()
            .model_version_info
            .with_label_values(&[backend, model_version, encoder_version])
            .set(1.0);
    }
}

/// Structured logger for engine events
#[derive(Clone)]
pub struct StructuredLogger {
    backend: String,
}

impl StructuredLogger {
    pub fn new(backend: impl Into<String>) -> Self {
        Self {
            backend: backend.into(),
        }
    }

    /// Log a completed prediction
    #[allow(clippy::too_many_arguments)]
    pub fn log_prediction(
        &self,
        species: &str,
        diet_style: &str,
        calories_per_day: u32,
        confidence_score: f32,
        consultation_recommended: bool,
        alert_count: usize,
        model_version: &str,
        duration_ms: u64,
    ) {
        info!(
            event = "prediction_generated",
            backend = %self.backend,
            species = %species,
            diet_style = %diet_style,
            calories_per_day = calories_per_day,
            confidence_score = confidence_score,
            consultation_recommended = consultation_recommended,
            alert_count = alert_count,
            model_version = %model_version,
            duration_ms = duration_ms,
            "Generated nutritional assessment"
        );
    }

    /// Log an explicit backend fallback after a timeout
    pub fn log_fallback(&self, from_backend: &str, to_backend: &str, reason: &str) {
        warn!(
            event = "backend_fallback",
            backend = %self.backend,
            from = %from_backend,
            to = %to_backend,
            reason = %reason,
            "Falling back to secondary engine"
        );
    }

    pub fn log_model_loaded(&self, model_version: &str, checksum: &str) {
        info!(
            event = "model_loaded",
            backend = %self.backend,
            model_version = %model_version,
            checksum = %checksum,
            "Model artifact loaded"
        );
    }

    pub fn log_engine_started(&self, model_version: &str, encoder_version: &str) {
        info!(
            event = "engine_started",
            backend = %self.backend,
            model_version = %model_version,
            encoder_version = %encoder_version,
            "Nutrition engine initialized"
        );
    }

    pub fn log_prediction_error(&self, error: &str) {
        warn!(
            event = "prediction_failed",
            backend = %self.backend,
            error = %error,
            "Prediction failed"
        );
    }
}
