//! Daily calorie estimation
//!
//! Baseline is the standard veterinary formula: RER = 70 * kg^0.75, then
//! DER = RER * multiplier(life_stage, neutered, activity, health_goal).
//! A trained regressor, when loaded, supplies the DER multiplier instead,
//! but its output is clipped to a sane multiple of RER so a unit-confused
//! model can never produce a dangerous target.

use crate::artifact::ModelSlot;
use crate::models::{ActivityLevel, FeatureVector, HealthGoal, LifeStage, PetProfileInput};
use anyhow::Result;
use std::sync::Arc;
use tracing::warn;

/// Accepted DER band as a multiple of RER; predictions outside are clipped
pub const DER_GUARD_RAIL: (f32, f32) = (0.4, 4.0);

/// Hard output bounds in kcal/day
pub const CALORIES_BOUNDS: (u32, u32) = (50, 5000);

/// Certainty attributed to the deterministic formula path
const BASELINE_CERTAINTY: f32 = 0.85;

/// Resting Energy Requirement in kcal/day
pub fn resting_energy_requirement(weight_kg: f32) -> f32 {
    70.0 * weight_kg.powf(0.75)
}

/// Point estimate with tolerance band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalorieEstimate {
    pub calories_per_day: u32,
    pub range_min: u32,
    pub range_max: u32,
    pub certainty: f32,
}

/// Life-stage base factors, the first layer of the DER multiplier
fn life_stage_factor(stage: LifeStage, neutered: bool) -> f32 {
    match stage {
        LifeStage::Puppy | LifeStage::Kitten => 2.5,
        LifeStage::Junior => 1.8,
        LifeStage::Adult => {
            if neutered {
                1.6
            } else {
                1.8
            }
        }
        LifeStage::Senior => {
            if neutered {
                1.4
            } else {
                1.6
            }
        }
    }
}

fn activity_factor(level: ActivityLevel) -> f32 {
    match level {
        ActivityLevel::Sedentary => 0.8,
        ActivityLevel::Low => 0.9,
        ActivityLevel::Moderate => 1.0,
        ActivityLevel::High => 1.15,
        ActivityLevel::VeryHigh => 1.3,
    }
}

fn goal_factor(goal: HealthGoal) -> f32 {
    match goal {
        HealthGoal::WeightLoss => 0.8,
        HealthGoal::WeightGain => 1.2,
        HealthGoal::MuscleGain => 1.1,
        _ => 1.0,
    }
}

/// Calorie estimator: deterministic formula, optionally corrected by a
/// loaded regressor
pub struct CalorieEstimator {
    range_percent: f32,
    regressor: Option<Arc<ModelSlot>>,
}

impl CalorieEstimator {
    pub fn new(range_percent: f32) -> Self {
        Self {
            range_percent,
            regressor: None,
        }
    }

    pub fn with_regressor(range_percent: f32, slot: Arc<ModelSlot>) -> Self {
        Self {
            range_percent,
            regressor: Some(slot),
        }
    }

    /// The maintenance-equivalent multiplier, before any health-goal
    /// adjustment. Exposed so tests can compare against the baseline.
    pub fn maintenance_multiplier(profile: &PetProfileInput) -> f32 {
        life_stage_factor(profile.life_stage(), profile.neutered)
            * activity_factor(profile.activity_level)
    }

    pub fn estimate(
        &self,
        profile: &PetProfileInput,
        features: &FeatureVector,
    ) -> Result<CalorieEstimate> {
        let rer = resting_energy_requirement(profile.weight_kg);

        let (multiplier, certainty) = match self.loaded_multiplier(features)? {
            Some((m, c)) => (m, c),
            None => (
                Self::maintenance_multiplier(profile) * goal_factor(profile.health_goal),
                BASELINE_CERTAINTY,
            ),
        };

        // Guard rail: reject unit-confused or degenerate predictions
        let clipped = multiplier.clamp(DER_GUARD_RAIL.0, DER_GUARD_RAIL.1);
        if clipped != multiplier {
            warn!(
                multiplier = multiplier,
                clipped = clipped,
                "DER multiplier outside guard rail, clipping"
            );
        }

        let der = rer * clipped;
        let calories = (der.round() as u32).clamp(CALORIES_BOUNDS.0, CALORIES_BOUNDS.1);

        let spread = (calories as f32 * self.range_percent).round() as u32;
        // Strict ordering: min < value < max always holds
        let range_min = calories.saturating_sub(spread.max(1));
        let range_max = calories + spread.max(1);

        Ok(CalorieEstimate {
            calories_per_day: calories,
            range_min,
            range_max,
            certainty,
        })
    }

    /// Regressor-provided (multiplier, confidence), if a model is loaded
    fn loaded_multiplier(&self, features: &FeatureVector) -> Result<Option<(f32, f32)>> {
        let Some(slot) = &self.regressor else {
            return Ok(None);
        };
        let Some(model) = slot.get() else {
            return Ok(None);
        };
        let output = model.run(features)?;
        Ok(Some((output.der_multiplier, output.confidence)))
    }
}
