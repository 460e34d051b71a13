//! Feature encoding shared between training and inference
//!
//! Converts a [`PetProfileInput`] into a fixed-shape numeric vector. The
//! exact same layout is consumed by the offline training pipeline and by
//! the online tensor path, which is the whole reason this lives in one
//! versioned module instead of being duplicated. Encoding is a pure
//! function: identical profiles produce bit-identical vectors.

use crate::error::FeatureEncodingError;
use crate::models::{
    ConditionTag, FeatureVector, LifeStage, PetProfileInput, Sex, TreatFrequency,
};

/// Version of the encoding scheme. Bumped whenever the layout or any
/// vocabulary changes, so a trained model can detect a mismatch instead
/// of silently regressing.
pub const ENCODER_VERSION: &str = "enc-v1";

/// Fixed breed vocabulary for index encoding
///
/// Breeds not in this list map to the unknown bucket (index = len).
pub const BREED_VOCABULARY: &[&str] = &[
    "Labrador Retriever",
    "Golden Retriever",
    "German Shepherd",
    "French Bulldog",
    "Poodle",
    "Beagle",
    "Dachshund",
    "Chihuahua",
    "Great Dane",
    "Border Collie",
    "Shiba Inu",
    "Siberian Husky",
    "Yorkshire Terrier",
    "Boxer",
    "Mixed Breed",
    "Domestic Shorthair",
    "Domestic Longhair",
    "Persian",
    "Maine Coon",
    "Siamese",
    "Ragdoll",
    "British Shorthair",
    "Bengal",
    "Scottish Fold",
];

/// Named slots of the feature vector, in layout order
pub const FEATURE_NAMES: &[&str] = &[
    "weight_kg",
    "age_years",
    "body_condition_score",
    "neutered",
    "sex_male",
    "species_dog",
    "species_cat",
    "life_stage_puppy",
    "life_stage_kitten",
    "life_stage_junior",
    "life_stage_adult",
    "life_stage_senior",
    "size_small",
    "size_medium",
    "size_large",
    "size_giant",
    "activity_sedentary",
    "activity_low",
    "activity_moderate",
    "activity_high",
    "activity_very_high",
    "environment_indoor",
    "environment_outdoor",
    "environment_mixed",
    "goal_maintenance",
    "goal_weight_loss",
    "goal_weight_gain",
    "goal_muscle_gain",
    "goal_coat_and_skin",
    "goal_digestive_health",
    "goal_joint_support",
    "goal_senior_support",
    "pref_no_preference",
    "pref_grain_free",
    "pref_high_protein",
    "pref_limited_ingredient",
    "pref_natural",
    "pref_organic",
    "pref_veterinary_prescribed",
    "food_dry",
    "food_wet",
    "food_mixed",
    "food_raw",
    "food_home_cooked",
    "satisfaction_low",
    "satisfaction_medium",
    "satisfaction_high",
    "treat_frequency_index",
    "climate_cold",
    "climate_temperate",
    "climate_hot",
    "climate_tropical",
    "breed_index",
    "cond_arthritis",
    "cond_ibd",
    "cond_diabetes",
    "cond_ckd",
    "cond_dental_disease",
    "cond_heart_disease",
    "cond_obesity",
    "cond_other",
    "allergy_count",
    "medication_count",
];

/// Number of input features produced by the encoder
pub const NUM_FEATURES: usize = FEATURE_NAMES.len();

pub const WEIGHT_KG_RANGE: (f32, f32) = (0.5, 100.0);
pub const AGE_YEARS_RANGE: (f32, f32) = (0.0, 25.0);
pub const BCS_RANGE: (u8, u8) = (1, 5);

/// Conditions with a dedicated feature slot; anything else sets `cond_other`
const NAMED_CONDITIONS: [ConditionTag; 7] = [
    ConditionTag::Arthritis,
    ConditionTag::InflammatoryBowelDisease,
    ConditionTag::Diabetes,
    ConditionTag::ChronicKidneyDisease,
    ConditionTag::DentalDisease,
    ConditionTag::HeartDisease,
    ConditionTag::Obesity,
];

/// Stateless profile-to-vector encoder
#[derive(Debug, Clone, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Validate the numeric domains of a profile
    ///
    /// Called before any backend runs, so a malformed profile is rejected
    /// identically regardless of which engine is configured.
    pub fn validate(profile: &PetProfileInput) -> Result<(), FeatureEncodingError> {
        check_range("weight_kg", profile.weight_kg, WEIGHT_KG_RANGE)?;
        check_range("age_years", profile.age_years, AGE_YEARS_RANGE)?;
        if profile.body_condition_score < BCS_RANGE.0 || profile.body_condition_score > BCS_RANGE.1
        {
            return Err(FeatureEncodingError::OutOfRange {
                field: "body_condition_score",
                value: profile.body_condition_score as f64,
                min: BCS_RANGE.0 as f64,
                max: BCS_RANGE.1 as f64,
            });
        }
        if profile.country.trim().is_empty() {
            return Err(FeatureEncodingError::MissingField { field: "country" });
        }
        Ok(())
    }

    /// Encode a profile into the fixed feature layout
    pub fn encode(&self, profile: &PetProfileInput) -> Result<FeatureVector, FeatureEncodingError> {
        Self::validate(profile)?;

        let mut values = Vec::with_capacity(NUM_FEATURES);
        values.push(profile.weight_kg);
        values.push(profile.age_years);
        values.push(profile.body_condition_score as f32);
        values.push(flag(profile.neutered));
        values.push(flag(profile.sex == Sex::Male));

        one_hot(&mut values, profile.species as usize, 2);
        one_hot(&mut values, life_stage_slot(profile.life_stage()), 5);
        one_hot(&mut values, profile.breed_size_category as usize, 4);
        one_hot(&mut values, profile.activity_level as usize, 5);
        one_hot(&mut values, profile.living_environment as usize, 3);
        one_hot(&mut values, profile.health_goal as usize, 8);
        one_hot(&mut values, profile.dietary_preference as usize, 7);
        one_hot(&mut values, profile.current_food_type as usize, 5);
        one_hot(&mut values, profile.food_satisfaction as usize, 3);

        values.push(treat_frequency_index(profile.treat_frequency));

        one_hot(&mut values, profile.climate_zone as usize, 4);

        values.push(breed_index(&profile.breed) as f32);

        for tag in NAMED_CONDITIONS {
            values.push(flag(profile.has_condition(tag)));
        }
        let has_other = profile
            .existing_conditions
            .iter()
            .any(|c| !NAMED_CONDITIONS.contains(c));
        values.push(flag(has_other));

        values.push(profile.food_allergies.len() as f32);
        values.push(profile.medications.len() as f32);

        debug_assert_eq!(values.len(), NUM_FEATURES);

        Ok(FeatureVector {
            encoder_version: ENCODER_VERSION.to_string(),
            values,
        })
    }
}

fn check_range(
    field: &'static str,
    value: f32,
    (min, max): (f32, f32),
) -> Result<(), FeatureEncodingError> {
    if value.is_nan() || value < min || value > max {
        return Err(FeatureEncodingError::OutOfRange {
            field,
            value: value as f64,
            min: min as f64,
            max: max as f64,
        });
    }
    Ok(())
}

fn flag(b: bool) -> f32 {
    if b {
        1.0
    } else {
        0.0
    }
}

fn one_hot(values: &mut Vec<f32>, index: usize, width: usize) {
    for i in 0..width {
        values.push(flag(i == index));
    }
}

fn life_stage_slot(stage: LifeStage) -> usize {
    match stage {
        LifeStage::Puppy => 0,
        LifeStage::Kitten => 1,
        LifeStage::Junior => 2,
        LifeStage::Adult => 3,
        LifeStage::Senior => 4,
    }
}

/// Ordinal 0..1 encoding of treat frequency
fn treat_frequency_index(freq: TreatFrequency) -> f32 {
    match freq {
        TreatFrequency::Never => 0.0,
        TreatFrequency::Rarely => 0.25,
        TreatFrequency::Weekly => 0.5,
        TreatFrequency::Daily => 0.75,
        TreatFrequency::MultipleDaily => 1.0,
    }
}

/// Index of a breed in the fixed vocabulary, unknown bucket last
///
/// Matching is case-insensitive; unseen breeds never error, they land in
/// the unknown bucket.
pub fn breed_index(breed: &str) -> usize {
    let needle = breed.trim();
    BREED_VOCABULARY
        .iter()
        .position(|b| b.eq_ignore_ascii_case(needle))
        .unwrap_or(BREED_VOCABULARY.len())
}
