//! Model artifact loading and hot reload
//!
//! The trained calorie regressor is a small ONNX graph loaded once at
//! engine construction via tract and held read-only for the process
//! lifetime. Replacing it with a newer version happens by pointer swap
//! behind the slot's lock: readers clone the Arc and keep running against
//! the version they started with.

use crate::encoder::{ENCODER_VERSION, NUM_FEATURES};
use crate::error::EngineError;
use crate::models::FeatureVector;
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Arc, RwLock};
use tract_onnx::prelude::*;
use tracing::info;

/// Values produced by the regressor: DER multiplier plus its confidence
const NUM_OUTPUTS: usize = 2;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// Regressor output for one profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegressorOutput {
    pub der_multiplier: f32,
    pub confidence: f32,
}

/// A loaded, immutable calorie regressor
pub struct CalorieRegressor {
    model: TractModel,
    version: String,
    checksum: String,
}

// The tract plan has no Debug impl; identify the model by its metadata.
impl std::fmt::Debug for CalorieRegressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalorieRegressor")
            .field("version", &self.version)
            .field("checksum", &self.checksum)
            .finish_non_exhaustive()
    }
}

impl CalorieRegressor {
    /// Parse and optimize an ONNX model from bytes
    pub fn from_bytes(bytes: &[u8], version: &str) -> Result<Self, EngineError> {
        let model = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(bytes))
            .context("Failed to parse ONNX model")
            .and_then(|m| {
                m.with_input_fact(0, f32::fact([1, NUM_FEATURES]).into())
                    .context("Failed to set input shape")
            })
            .and_then(|m| m.into_optimized().context("Failed to optimize model"))
            .and_then(|m| m.into_runnable().context("Failed to create runnable model"))
            .map_err(|e| EngineError::ModelLoad(format!("{:#}", e)))?;

        Ok(Self {
            model,
            version: version.to_string(),
            checksum: compute_checksum(bytes),
        })
    }

    /// Load from disk, optionally validating a SHA256 checksum first
    ///
    /// Any failure here is fatal at engine construction: the process must
    /// not serve proprietary-backend traffic with a half-initialized model.
    pub fn load(path: &Path, expected_checksum: Option<&str>) -> Result<Self, EngineError> {
        let bytes = std::fs::read(path)
            .map_err(|e| EngineError::ModelLoad(format!("failed to read {:?}: {}", path, e)))?;

        if let Some(expected) = expected_checksum {
            let computed = compute_checksum(&bytes);
            if computed != expected {
                return Err(EngineError::ModelLoad(format!(
                    "checksum mismatch for {:?}: expected {}, got {}",
                    path, expected, computed
                )));
            }
        }

        let version = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("unversioned")
            .to_string();

        let regressor = Self::from_bytes(&bytes, &version)?;
        info!(
            version = %regressor.version,
            checksum = %regressor.checksum,
            size = bytes.len(),
            "Loaded calorie regressor"
        );
        Ok(regressor)
    }

    /// Run the regressor on an encoded profile
    ///
    /// Rejects feature vectors from a different encoder version: an
    /// encoding-scheme mismatch must fail loudly, not degrade accuracy
    /// silently.
    pub fn run(&self, features: &FeatureVector) -> Result<RegressorOutput> {
        if features.encoder_version != ENCODER_VERSION {
            anyhow::bail!(
                "encoder version mismatch: model expects {}, got {}",
                ENCODER_VERSION,
                features.encoder_version
            );
        }
        if features.values.len() != NUM_FEATURES {
            anyhow::bail!(
                "feature vector has {} values, expected {}",
                features.values.len(),
                NUM_FEATURES
            );
        }

        let input: Tensor =
            tract_ndarray::Array2::from_shape_vec((1, NUM_FEATURES), features.values.clone())
                .context("Failed to shape input tensor")?
                .into();

        let result = self.model.run(tvec!(input.into()))?;
        let output = result.get(0).context("No output from model")?;
        let view = output.to_array_view::<f32>()?;
        let values: Vec<f32> = view.iter().copied().collect();

        if values.len() < NUM_OUTPUTS {
            anyhow::bail!(
                "model output has {} values, expected {}",
                values.len(),
                NUM_OUTPUTS
            );
        }

        Ok(RegressorOutput {
            der_multiplier: values[0],
            confidence: values[1].clamp(0.0, 1.0),
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

/// Shared slot holding the current regressor
///
/// Concurrent predictions read the same Arc without blocking each other;
/// a hot reload swaps the pointer under a short write lock and never
/// mutates a model another request may be reading.
pub struct ModelSlot {
    current: RwLock<Option<Arc<CalorieRegressor>>>,
}

impl ModelSlot {
    /// Slot with no model: callers fall back to the rule baseline
    pub fn empty() -> Self {
        Self {
            current: RwLock::new(None),
        }
    }

    pub fn loaded(model: CalorieRegressor) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(model))),
        }
    }

    /// Current model, if any
    pub fn get(&self) -> Option<Arc<CalorieRegressor>> {
        self.current.read().ok()?.clone()
    }

    /// Atomically replace the model, returning the previous one
    pub fn swap(&self, model: CalorieRegressor) -> Option<Arc<CalorieRegressor>> {
        match self.current.write() {
            Ok(mut guard) => guard.replace(Arc::new(model)),
            Err(poisoned) => poisoned.into_inner().replace(Arc::new(model)),
        }
    }

    pub fn version(&self) -> Option<String> {
        self.get().map(|m| m.version().to_string())
    }
}

/// Compute SHA256 checksum of data
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
