//! Core data models for the nutrition engine
//!
//! Every type here is part of the JSON wire contract between the engine
//! and its callers. Field names and enum spellings are stable across
//! backend swaps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Supported species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Dog,
    Cat,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
        }
    }
}

/// Adult-size bucket for the breed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreedSizeCategory {
    Small,
    Medium,
    Large,
    Giant,
}

/// Species- and age-bucketed life stage
///
/// Derived from `age_years` (see [`LifeStage::derive`]) unless the caller
/// supplies one explicitly on the profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifeStage {
    Puppy,
    Kitten,
    Junior,
    Adult,
    Senior,
}

impl LifeStage {
    /// Bucket an age into a life stage
    ///
    /// Large and giant dog breeds reach senior earlier than small breeds.
    pub fn derive(species: Species, age_years: f32, size: BreedSizeCategory) -> Self {
        match species {
            Species::Dog => {
                if age_years < 1.0 {
                    LifeStage::Puppy
                } else if age_years < 2.0 {
                    LifeStage::Junior
                } else {
                    let senior_at = match size {
                        BreedSizeCategory::Giant => 6.0,
                        BreedSizeCategory::Large => 7.0,
                        _ => 8.0,
                    };
                    if age_years >= senior_at {
                        LifeStage::Senior
                    } else {
                        LifeStage::Adult
                    }
                }
            }
            Species::Cat => {
                if age_years < 1.0 {
                    LifeStage::Kitten
                } else if age_years < 2.0 {
                    LifeStage::Junior
                } else if age_years >= 10.0 {
                    LifeStage::Senior
                } else {
                    LifeStage::Adult
                }
            }
        }
    }

    /// True for the growth stages (puppy/kitten)
    pub fn is_growth(&self) -> bool {
        matches!(self, LifeStage::Puppy | LifeStage::Kitten)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Low,
    Moderate,
    High,
    VeryHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LivingEnvironment {
    Indoor,
    Outdoor,
    Mixed,
}

/// Pre-existing medical condition tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTag {
    Arthritis,
    InflammatoryBowelDisease,
    Diabetes,
    ChronicKidneyDisease,
    DentalDisease,
    HeartDisease,
    Obesity,
    Pancreatitis,
    Hyperthyroidism,
    SkinAllergy,
}

/// Food allergen tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergenTag {
    Chicken,
    Beef,
    Lamb,
    Dairy,
    Grain,
    Fish,
    Egg,
    Soy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodType {
    Dry,
    Wet,
    Mixed,
    Raw,
    HomeCooked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodSatisfaction {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreatFrequency {
    Never,
    Rarely,
    Weekly,
    Daily,
    MultipleDaily,
}

/// Owner-stated health goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthGoal {
    Maintenance,
    WeightLoss,
    WeightGain,
    MuscleGain,
    CoatAndSkin,
    DigestiveHealth,
    JointSupport,
    SeniorSupport,
}

/// Owner-stated dietary preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryPreference {
    NoPreference,
    GrainFree,
    HighProtein,
    LimitedIngredient,
    Natural,
    Organic,
    VeterinaryPrescribed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateZone {
    Cold,
    Temperate,
    Hot,
    Tropical,
}

/// Canonical fallback when the breed string is missing or unrecognized
pub const UNKNOWN_BREED: &str = "Mixed Breed";

/// Immutable pet profile, the sole input to prediction
///
/// Constructed once per request from whatever persistence layer the
/// surrounding application uses, validated by the feature encoder, and
/// discarded after the call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetProfileInput {
    pub species: Species,
    #[serde(default = "default_breed")]
    pub breed: String,
    #[serde(default = "default_breed_size")]
    pub breed_size_category: BreedSizeCategory,
    #[serde(default = "default_age_years")]
    pub age_years: f32,
    /// Explicit life stage; when absent it is derived from the age
    #[serde(default)]
    pub life_stage: Option<LifeStage>,
    #[serde(default = "default_weight_kg")]
    pub weight_kg: f32,
    /// Body condition score, 1 (emaciated) to 5 (obese)
    #[serde(default = "default_bcs")]
    pub body_condition_score: u8,
    #[serde(default = "default_sex")]
    pub sex: Sex,
    #[serde(default)]
    pub neutered: bool,
    #[serde(default = "default_activity")]
    pub activity_level: ActivityLevel,
    #[serde(default = "default_environment")]
    pub living_environment: LivingEnvironment,
    #[serde(default)]
    pub existing_conditions: BTreeSet<ConditionTag>,
    #[serde(default)]
    pub food_allergies: BTreeSet<AllergenTag>,
    #[serde(default)]
    pub medications: BTreeSet<String>,
    #[serde(default = "default_food_type")]
    pub current_food_type: FoodType,
    #[serde(default = "default_satisfaction")]
    pub food_satisfaction: FoodSatisfaction,
    #[serde(default = "default_treats")]
    pub treat_frequency: TreatFrequency,
    #[serde(default = "default_goal")]
    pub health_goal: HealthGoal,
    #[serde(default = "default_preference")]
    pub dietary_preference: DietaryPreference,
    #[serde(default = "default_climate")]
    pub climate_zone: ClimateZone,
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_breed() -> String {
    UNKNOWN_BREED.to_string()
}
fn default_breed_size() -> BreedSizeCategory {
    BreedSizeCategory::Medium
}
fn default_age_years() -> f32 {
    4.0
}
fn default_weight_kg() -> f32 {
    10.0
}
fn default_bcs() -> u8 {
    3
}
fn default_sex() -> Sex {
    Sex::Female
}
fn default_activity() -> ActivityLevel {
    ActivityLevel::Moderate
}
fn default_environment() -> LivingEnvironment {
    LivingEnvironment::Indoor
}
fn default_food_type() -> FoodType {
    FoodType::Dry
}
fn default_satisfaction() -> FoodSatisfaction {
    FoodSatisfaction::Medium
}
fn default_treats() -> TreatFrequency {
    TreatFrequency::Rarely
}
fn default_goal() -> HealthGoal {
    HealthGoal::Maintenance
}
fn default_preference() -> DietaryPreference {
    DietaryPreference::NoPreference
}
fn default_climate() -> ClimateZone {
    ClimateZone::Temperate
}
fn default_country() -> String {
    "US".to_string()
}

impl PetProfileInput {
    /// A profile with every field at its default, for construction in
    /// tests and CLI examples
    pub fn baseline(species: Species) -> Self {
        Self {
            species,
            breed: default_breed(),
            breed_size_category: default_breed_size(),
            age_years: default_age_years(),
            life_stage: None,
            weight_kg: default_weight_kg(),
            body_condition_score: default_bcs(),
            sex: default_sex(),
            neutered: false,
            activity_level: default_activity(),
            living_environment: default_environment(),
            existing_conditions: BTreeSet::new(),
            food_allergies: BTreeSet::new(),
            medications: BTreeSet::new(),
            current_food_type: default_food_type(),
            food_satisfaction: default_satisfaction(),
            treat_frequency: default_treats(),
            health_goal: default_goal(),
            dietary_preference: default_preference(),
            climate_zone: default_climate(),
            country: default_country(),
        }
    }

    /// Effective life stage: the explicit one if given, otherwise derived
    pub fn life_stage(&self) -> LifeStage {
        self.life_stage
            .unwrap_or_else(|| LifeStage::derive(self.species, self.age_years, self.breed_size_category))
    }

    pub fn has_condition(&self, tag: ConditionTag) -> bool {
        self.existing_conditions.contains(&tag)
    }
}

/// Risk severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

/// The six assessed risk categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    Weight,
    Joint,
    Digestive,
    Metabolic,
    Kidney,
    Dental,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::Weight,
        RiskCategory::Joint,
        RiskCategory::Digestive,
        RiskCategory::Metabolic,
        RiskCategory::Kidney,
        RiskCategory::Dental,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Weight => "weight",
            RiskCategory::Joint => "joint",
            RiskCategory::Digestive => "digestive",
            RiskCategory::Metabolic => "metabolic",
            RiskCategory::Kidney => "kidney",
            RiskCategory::Dental => "dental",
        }
    }
}

/// Fixed six-key risk map
///
/// Always fully populated: every category has exactly one level, never
/// null, never an out-of-vocabulary value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMap {
    pub weight_risk: RiskLevel,
    pub joint_risk: RiskLevel,
    pub digestive_risk: RiskLevel,
    pub metabolic_risk: RiskLevel,
    pub kidney_risk: RiskLevel,
    pub dental_risk: RiskLevel,
}

impl RiskMap {
    /// All six categories at low risk
    pub fn all_low() -> Self {
        Self {
            weight_risk: RiskLevel::Low,
            joint_risk: RiskLevel::Low,
            digestive_risk: RiskLevel::Low,
            metabolic_risk: RiskLevel::Low,
            kidney_risk: RiskLevel::Low,
            dental_risk: RiskLevel::Low,
        }
    }

    pub fn get(&self, category: RiskCategory) -> RiskLevel {
        match category {
            RiskCategory::Weight => self.weight_risk,
            RiskCategory::Joint => self.joint_risk,
            RiskCategory::Digestive => self.digestive_risk,
            RiskCategory::Metabolic => self.metabolic_risk,
            RiskCategory::Kidney => self.kidney_risk,
            RiskCategory::Dental => self.dental_risk,
        }
    }

    pub fn set(&mut self, category: RiskCategory, level: RiskLevel) {
        match category {
            RiskCategory::Weight => self.weight_risk = level,
            RiskCategory::Joint => self.joint_risk = level,
            RiskCategory::Digestive => self.digestive_risk = level,
            RiskCategory::Metabolic => self.metabolic_risk = level,
            RiskCategory::Kidney => self.kidney_risk = level,
            RiskCategory::Dental => self.dental_risk = level,
        }
    }

    /// Iterate categories in their fixed declaration order
    pub fn iter(&self) -> impl Iterator<Item = (RiskCategory, RiskLevel)> + '_ {
        RiskCategory::ALL.iter().map(|c| (*c, self.get(*c)))
    }

    pub fn any_high(&self) -> bool {
        self.iter().any(|(_, l)| l == RiskLevel::High)
    }
}

/// The ten mutually exclusive diet styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietStyle {
    MaintenanceStandard,
    WeightLoss,
    WeightGain,
    HighProteinPerformance,
    SeniorWellness,
    SeniorWellnessKidney,
    GrowthPuppy,
    GrowthKitten,
    DigestiveSensitive,
    GrainFreeHighProtein,
}

impl DietStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DietStyle::MaintenanceStandard => "maintenance_standard",
            DietStyle::WeightLoss => "weight_loss",
            DietStyle::WeightGain => "weight_gain",
            DietStyle::HighProteinPerformance => "high_protein_performance",
            DietStyle::SeniorWellness => "senior_wellness",
            DietStyle::SeniorWellnessKidney => "senior_wellness_kidney",
            DietStyle::GrowthPuppy => "growth_puppy",
            DietStyle::GrowthKitten => "growth_kitten",
            DietStyle::DigestiveSensitive => "digestive_sensitive",
            DietStyle::GrainFreeHighProtein => "grain_free_high_protein",
        }
    }
}

/// Unified multi-task prediction output
///
/// Built once per call by the orchestrator and returned immutable.
/// Invariant: `calorie_range_min <= calories_per_day <= calorie_range_max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    pub calories_per_day: u32,
    pub calorie_range_min: u32,
    pub calorie_range_max: u32,
    pub protein_percent: f32,
    pub fat_percent: f32,
    pub carbohydrate_percent: f32,
    pub diet_style: DietStyle,
    pub diet_style_confidence: f32,
    pub risks: RiskMap,
    pub meals_per_day: u8,
    pub portion_size_grams: u32,
    pub model_version: String,
    pub prediction_timestamp: DateTime<Utc>,
    pub confidence_score: f32,
    pub veterinary_consultation_recommended: bool,
    pub alert_messages: Vec<String>,
}

/// Flattened numeric encoding of a profile
///
/// Produced by the feature encoder, consumed by both the offline training
/// pipeline and the inference tensor path. Recomputed deterministically
/// from the profile on every call; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub encoder_version: String,
    pub values: Vec<f32>,
}

/// One prediction-log row, serializable for the caller's persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    /// Caller-side pet reference (primary key, UUID, whatever the caller uses)
    pub pet_ref: String,
    pub input: PetProfileInput,
    pub output: ModelOutput,
    pub backend: String,
    pub model_version: String,
    pub created_at: DateTime<Utc>,
}

/// Backend identity for logging and telemetry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub backend_name: String,
    pub model_version: String,
    pub encoder_version: String,
}
