//! Baseline risk rule tables, one per category
//!
//! Each table is evaluated independently; within a table the most severe
//! firing rule decides the level, and its certainty is carried into the
//! aggregate confidence. A category with no firing rule is low risk.

use super::Rule;
use crate::models::{
    ActivityLevel, BreedSizeCategory, ConditionTag, FoodSatisfaction, FoodType, PetProfileInput,
    RiskCategory, RiskLevel, Species, TreatFrequency,
};

/// Level plus how certain the baseline is about it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskOutcome {
    pub level: RiskLevel,
    pub certainty: f32,
}

/// Certainty assigned when no rule fires and the category defaults to low
pub const DEFAULT_LOW_CERTAINTY: f32 = 0.9;

const fn outcome(level: RiskLevel, certainty: f32) -> RiskOutcome {
    RiskOutcome { level, certainty }
}

/// Joint-risk-prone breeds (checked case-insensitively)
const JOINT_PRONE_BREEDS: &[&str] = &[
    "German Shepherd",
    "Labrador Retriever",
    "Golden Retriever",
    "Great Dane",
    "Maine Coon",
];

/// Digestively sensitive breeds
const DIGESTIVE_SENSITIVE_BREEDS: &[&str] = &["German Shepherd", "Siamese", "Yorkshire Terrier"];

fn breed_in(profile: &PetProfileInput, list: &[&str]) -> bool {
    list.iter()
        .any(|b| b.eq_ignore_ascii_case(profile.breed.trim()))
}

static WEIGHT_RULES: &[Rule<RiskOutcome>] = &[
    Rule {
        name: "bcs_obese",
        applies: |p| p.body_condition_score >= 5,
        outcome: outcome(RiskLevel::High, 0.9),
    },
    Rule {
        name: "bcs_emaciated",
        applies: |p| p.body_condition_score <= 1,
        outcome: outcome(RiskLevel::High, 0.85),
    },
    Rule {
        name: "overweight_and_inactive",
        applies: |p| {
            p.body_condition_score == 4
                && matches!(p.activity_level, ActivityLevel::Sedentary | ActivityLevel::Low)
        },
        outcome: outcome(RiskLevel::High, 0.8),
    },
    Rule {
        name: "bcs_overweight",
        applies: |p| p.body_condition_score == 4,
        outcome: outcome(RiskLevel::Medium, 0.8),
    },
    Rule {
        name: "bcs_underweight",
        applies: |p| p.body_condition_score == 2,
        outcome: outcome(RiskLevel::Medium, 0.75),
    },
    Rule {
        name: "neutered_sedentary",
        applies: |p| p.neutered && p.activity_level == ActivityLevel::Sedentary,
        outcome: outcome(RiskLevel::Medium, 0.7),
    },
    Rule {
        name: "constant_treats",
        applies: |p| p.treat_frequency == TreatFrequency::MultipleDaily,
        outcome: outcome(RiskLevel::Medium, 0.6),
    },
];

static JOINT_RULES: &[Rule<RiskOutcome>] = &[
    Rule {
        name: "arthritis_diagnosed",
        applies: |p| p.has_condition(ConditionTag::Arthritis),
        outcome: outcome(RiskLevel::High, 0.95),
    },
    Rule {
        name: "giant_breed_aging",
        applies: |p| p.breed_size_category == BreedSizeCategory::Giant && p.age_years >= 5.0,
        outcome: outcome(RiskLevel::High, 0.85),
    },
    Rule {
        name: "large_breed_senior",
        applies: |p| p.breed_size_category == BreedSizeCategory::Large && p.age_years >= 7.0,
        outcome: outcome(RiskLevel::High, 0.8),
    },
    Rule {
        name: "giant_breed",
        applies: |p| p.breed_size_category == BreedSizeCategory::Giant,
        outcome: outcome(RiskLevel::Medium, 0.75),
    },
    Rule {
        name: "large_breed_overweight",
        applies: |p| {
            p.breed_size_category == BreedSizeCategory::Large && p.body_condition_score >= 4
        },
        outcome: outcome(RiskLevel::Medium, 0.75),
    },
    Rule {
        name: "heavy_dog",
        applies: |p| p.species == Species::Dog && p.weight_kg >= 40.0,
        outcome: outcome(RiskLevel::Medium, 0.7),
    },
    Rule {
        name: "joint_prone_breed_aging",
        applies: |p| breed_in(p, JOINT_PRONE_BREEDS) && p.age_years >= 6.0,
        outcome: outcome(RiskLevel::Medium, 0.65),
    },
];

static DIGESTIVE_RULES: &[Rule<RiskOutcome>] = &[
    Rule {
        name: "ibd_diagnosed",
        applies: |p| p.has_condition(ConditionTag::InflammatoryBowelDisease),
        outcome: outcome(RiskLevel::High, 0.95),
    },
    Rule {
        name: "pancreatitis_diagnosed",
        applies: |p| p.has_condition(ConditionTag::Pancreatitis),
        outcome: outcome(RiskLevel::High, 0.9),
    },
    Rule {
        name: "multiple_food_allergies",
        applies: |p| p.food_allergies.len() >= 3,
        outcome: outcome(RiskLevel::High, 0.8),
    },
    Rule {
        name: "known_food_allergy",
        applies: |p| !p.food_allergies.is_empty(),
        outcome: outcome(RiskLevel::Medium, 0.75),
    },
    Rule {
        name: "poor_food_satisfaction",
        applies: |p| p.food_satisfaction == FoodSatisfaction::Low,
        outcome: outcome(RiskLevel::Medium, 0.6),
    },
    Rule {
        name: "sensitive_breed",
        applies: |p| breed_in(p, DIGESTIVE_SENSITIVE_BREEDS),
        outcome: outcome(RiskLevel::Medium, 0.6),
    },
    Rule {
        name: "raw_diet",
        applies: |p| p.current_food_type == FoodType::Raw,
        outcome: outcome(RiskLevel::Medium, 0.55),
    },
];

static METABOLIC_RULES: &[Rule<RiskOutcome>] = &[
    Rule {
        name: "diabetes_diagnosed",
        applies: |p| p.has_condition(ConditionTag::Diabetes),
        outcome: outcome(RiskLevel::High, 0.95),
    },
    Rule {
        name: "hyperthyroidism_diagnosed",
        applies: |p| p.has_condition(ConditionTag::Hyperthyroidism),
        outcome: outcome(RiskLevel::High, 0.85),
    },
    Rule {
        name: "obesity_diagnosed",
        applies: |p| p.has_condition(ConditionTag::Obesity),
        outcome: outcome(RiskLevel::High, 0.8),
    },
    Rule {
        name: "obese_and_neutered",
        applies: |p| p.body_condition_score >= 5 && p.neutered,
        outcome: outcome(RiskLevel::High, 0.8),
    },
    Rule {
        name: "senior_overweight",
        applies: |p| p.body_condition_score >= 4 && p.age_years >= 8.0,
        outcome: outcome(RiskLevel::Medium, 0.75),
    },
    Rule {
        name: "neutered_senior",
        applies: |p| p.neutered && p.age_years >= 9.0,
        outcome: outcome(RiskLevel::Medium, 0.6),
    },
];

static KIDNEY_RULES: &[Rule<RiskOutcome>] = &[
    Rule {
        name: "ckd_diagnosed",
        applies: |p| p.has_condition(ConditionTag::ChronicKidneyDisease),
        outcome: outcome(RiskLevel::High, 0.98),
    },
    Rule {
        name: "geriatric_cat",
        applies: |p| p.species == Species::Cat && p.age_years > 10.0,
        outcome: outcome(RiskLevel::High, 0.85),
    },
    Rule {
        name: "senior_cat",
        applies: |p| p.species == Species::Cat && p.age_years >= 8.0,
        outcome: outcome(RiskLevel::Medium, 0.75),
    },
    Rule {
        name: "dry_fed_aging_cat",
        applies: |p| {
            p.species == Species::Cat
                && p.current_food_type == FoodType::Dry
                && p.age_years >= 7.0
        },
        outcome: outcome(RiskLevel::Medium, 0.7),
    },
    Rule {
        name: "geriatric_dog",
        applies: |p| p.species == Species::Dog && p.age_years >= 11.0,
        outcome: outcome(RiskLevel::Medium, 0.65),
    },
    Rule {
        name: "pkd_prone_breed",
        applies: |p| breed_in(p, &["Persian", "British Shorthair"]),
        outcome: outcome(RiskLevel::Medium, 0.6),
    },
];

static DENTAL_RULES: &[Rule<RiskOutcome>] = &[
    Rule {
        name: "dental_disease_diagnosed",
        applies: |p| p.has_condition(ConditionTag::DentalDisease),
        outcome: outcome(RiskLevel::High, 0.95),
    },
    Rule {
        name: "small_breed_senior",
        applies: |p| p.breed_size_category == BreedSizeCategory::Small && p.age_years >= 8.0,
        outcome: outcome(RiskLevel::High, 0.8),
    },
    Rule {
        name: "small_breed_adult",
        applies: |p| p.breed_size_category == BreedSizeCategory::Small && p.age_years >= 4.0,
        outcome: outcome(RiskLevel::Medium, 0.7),
    },
    Rule {
        name: "senior_teeth",
        applies: |p| p.age_years >= 8.0,
        outcome: outcome(RiskLevel::Medium, 0.7),
    },
    Rule {
        name: "wet_fed_adult",
        applies: |p| p.current_food_type == FoodType::Wet && p.age_years >= 5.0,
        outcome: outcome(RiskLevel::Medium, 0.6),
    },
];

/// Rule table for one risk category
pub fn table(category: RiskCategory) -> &'static [Rule<RiskOutcome>] {
    match category {
        RiskCategory::Weight => WEIGHT_RULES,
        RiskCategory::Joint => JOINT_RULES,
        RiskCategory::Digestive => DIGESTIVE_RULES,
        RiskCategory::Metabolic => METABOLIC_RULES,
        RiskCategory::Kidney => KIDNEY_RULES,
        RiskCategory::Dental => DENTAL_RULES,
    }
}

/// Evaluate one category: most severe firing rule wins
pub fn assess_category(category: RiskCategory, profile: &PetProfileInput) -> RiskOutcome {
    super::firing(table(category), profile)
        .map(|r| r.outcome)
        .max_by(|a, b| {
            a.level
                .cmp(&b.level)
                .then(a.certainty.partial_cmp(&b.certainty).unwrap_or(std::cmp::Ordering::Equal))
        })
        .unwrap_or(outcome(RiskLevel::Low, DEFAULT_LOW_CERTAINTY))
}
