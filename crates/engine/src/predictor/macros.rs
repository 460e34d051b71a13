//! Macronutrient target estimation
//!
//! Deterministic lookup keyed by (diet style, species). Cats never go
//! below the obligate-carnivore protein floor. The orchestrator, not this
//! component, is responsible for flagging targets that stray from summing
//! to 100%.

use crate::models::{DietStyle, PetProfileInput, Species};

/// Minimum protein percent for cats
pub const CAT_PROTEIN_FLOOR: f32 = 26.0;

pub const PROTEIN_BOUNDS: (f32, f32) = (18.0, 50.0);
pub const FAT_BOUNDS: (f32, f32) = (8.0, 35.0);
pub const CARB_BOUNDS: (f32, f32) = (5.0, 50.0);

/// Protein/fat/carbohydrate percentage targets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroTargets {
    pub protein_percent: f32,
    pub fat_percent: f32,
    pub carbohydrate_percent: f32,
}

impl MacroTargets {
    pub fn sum(&self) -> f32 {
        self.protein_percent + self.fat_percent + self.carbohydrate_percent
    }
}

const fn targets(protein: f32, fat: f32, carb: f32) -> MacroTargets {
    MacroTargets {
        protein_percent: protein,
        fat_percent: fat,
        carbohydrate_percent: carb,
    }
}

/// The baseline lookup table
///
/// Rows sum to 98-99; the remainder is fiber and ash, which keeps every
/// row inside the orchestrator's 100% +/- 2 tolerance.
fn lookup(style: DietStyle, species: Species) -> MacroTargets {
    use DietStyle::*;
    use Species::*;
    match (style, species) {
        (MaintenanceStandard, Dog) => targets(30.0, 18.0, 50.0),
        (MaintenanceStandard, Cat) => targets(36.0, 22.0, 40.0),
        (WeightLoss, Dog) => targets(36.0, 12.0, 50.0),
        (WeightLoss, Cat) => targets(40.0, 14.0, 44.0),
        (WeightGain, Dog) => targets(30.0, 25.0, 44.0),
        (WeightGain, Cat) => targets(36.0, 26.0, 36.0),
        (HighProteinPerformance, Dog) => targets(40.0, 22.0, 36.0),
        (HighProteinPerformance, Cat) => targets(45.0, 24.0, 30.0),
        (SeniorWellness, Dog) => targets(34.0, 14.0, 50.0),
        (SeniorWellness, Cat) => targets(36.0, 18.0, 44.0),
        // Renal support: protein reduced, energy from fat
        (SeniorWellnessKidney, Dog) => targets(24.0, 24.0, 50.0),
        (SeniorWellnessKidney, Cat) => targets(26.0, 26.0, 46.0),
        (GrowthPuppy, _) => targets(32.0, 20.0, 46.0),
        (GrowthKitten, _) => targets(40.0, 24.0, 34.0),
        (DigestiveSensitive, Dog) => targets(32.0, 16.0, 50.0),
        (DigestiveSensitive, Cat) => targets(36.0, 20.0, 42.0),
        (GrainFreeHighProtein, Dog) => targets(38.0, 20.0, 40.0),
        (GrainFreeHighProtein, Cat) => targets(42.0, 22.0, 34.0),
    }
}

#[derive(Debug, Clone, Default)]
pub struct MacronutrientEstimator;

impl MacronutrientEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Look up targets for the diet style, clamped to the declared bounds
    ///
    /// Calories are context only: very high energy budgets get their fat
    /// raised to keep the food energy-dense enough to be feedable.
    pub fn estimate(
        &self,
        profile: &PetProfileInput,
        style: DietStyle,
        calories_per_day: u32,
    ) -> MacroTargets {
        let mut t = lookup(style, profile.species);

        if calories_per_day >= 2500 && t.fat_percent < 15.0 {
            t.fat_percent = 15.0;
        }

        t.protein_percent = t.protein_percent.clamp(PROTEIN_BOUNDS.0, PROTEIN_BOUNDS.1);
        t.fat_percent = t.fat_percent.clamp(FAT_BOUNDS.0, FAT_BOUNDS.1);
        t.carbohydrate_percent = t.carbohydrate_percent.clamp(CARB_BOUNDS.0, CARB_BOUNDS.1);

        if profile.species == Species::Cat && t.protein_percent < CAT_PROTEIN_FLOOR {
            t.protein_percent = CAT_PROTEIN_FLOOR;
        }

        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PetProfileInput;

    #[test]
    fn test_cat_protein_floor_holds_for_every_style() {
        let estimator = MacronutrientEstimator::new();
        let profile = PetProfileInput::baseline(Species::Cat);
        for style in [
            DietStyle::MaintenanceStandard,
            DietStyle::WeightLoss,
            DietStyle::WeightGain,
            DietStyle::HighProteinPerformance,
            DietStyle::SeniorWellness,
            DietStyle::SeniorWellnessKidney,
            DietStyle::GrowthKitten,
            DietStyle::DigestiveSensitive,
            DietStyle::GrainFreeHighProtein,
        ] {
            let t = estimator.estimate(&profile, style, 250);
            assert!(
                t.protein_percent >= CAT_PROTEIN_FLOOR,
                "{:?} gave {}",
                style,
                t.protein_percent
            );
        }
    }

    #[test]
    fn test_targets_within_bounds() {
        let estimator = MacronutrientEstimator::new();
        for species in [Species::Dog, Species::Cat] {
            let profile = PetProfileInput::baseline(species);
            for style in [
                DietStyle::MaintenanceStandard,
                DietStyle::WeightLoss,
                DietStyle::WeightGain,
                DietStyle::HighProteinPerformance,
                DietStyle::SeniorWellness,
                DietStyle::SeniorWellnessKidney,
                DietStyle::GrowthPuppy,
                DietStyle::GrowthKitten,
                DietStyle::DigestiveSensitive,
                DietStyle::GrainFreeHighProtein,
            ] {
                let t = estimator.estimate(&profile, style, 800);
                assert!(t.protein_percent >= PROTEIN_BOUNDS.0 && t.protein_percent <= PROTEIN_BOUNDS.1);
                assert!(t.fat_percent >= FAT_BOUNDS.0 && t.fat_percent <= FAT_BOUNDS.1);
                assert!(t.carbohydrate_percent >= CARB_BOUNDS.0 && t.carbohydrate_percent <= CARB_BOUNDS.1);
            }
        }
    }

    #[test]
    fn test_table_rows_near_one_hundred() {
        let estimator = MacronutrientEstimator::new();
        for species in [Species::Dog, Species::Cat] {
            let profile = PetProfileInput::baseline(species);
            let t = estimator.estimate(&profile, DietStyle::MaintenanceStandard, 800);
            assert!((t.sum() - 100.0).abs() <= 2.0, "sum was {}", t.sum());
        }
    }

    #[test]
    fn test_kidney_style_reduces_protein() {
        let estimator = MacronutrientEstimator::new();
        let profile = PetProfileInput::baseline(Species::Dog);
        let maintenance = estimator.estimate(&profile, DietStyle::MaintenanceStandard, 800);
        let renal = estimator.estimate(&profile, DietStyle::SeniorWellnessKidney, 800);
        assert!(renal.protein_percent < maintenance.protein_percent);
    }

    #[test]
    fn test_high_energy_budget_raises_fat() {
        let estimator = MacronutrientEstimator::new();
        let profile = PetProfileInput::baseline(Species::Dog);
        let t = estimator.estimate(&profile, DietStyle::WeightLoss, 3000);
        assert!(t.fat_percent >= 15.0);
    }
}
