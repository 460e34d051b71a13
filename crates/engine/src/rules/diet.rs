//! Priority-ordered diet style rule table
//!
//! First firing rule wins. Growth classes take absolute precedence, then
//! kidney, then explicit health goals, then life stage, then preference,
//! and maintenance_standard is the default.

use crate::models::{
    ActivityLevel, ConditionTag, DietStyle, DietaryPreference, HealthGoal, LifeStage,
    PetProfileInput, RiskLevel, RiskMap,
};

/// Inputs available to a diet rule: the profile plus optional risk output
/// from the independent stage
#[derive(Clone, Copy)]
pub struct DietContext<'a> {
    pub profile: &'a PetProfileInput,
    pub risks: Option<&'a RiskMap>,
}

impl DietContext<'_> {
    /// Kidney signal: assessed risk when available, diagnosed CKD otherwise
    pub fn kidney_flagged(&self) -> bool {
        match self.risks {
            Some(r) => r.kidney_risk == RiskLevel::High,
            None => self.profile.has_condition(ConditionTag::ChronicKidneyDisease),
        }
    }

    /// Digestive signal: assessed risk when available, profile fields otherwise
    pub fn digestive_flagged(&self) -> bool {
        match self.risks {
            Some(r) => r.digestive_risk == RiskLevel::High,
            None => {
                self.profile.has_condition(ConditionTag::InflammatoryBowelDisease)
                    || self.profile.food_allergies.len() >= 3
            }
        }
    }
}

/// One priority rule
pub struct DietRule {
    pub name: &'static str,
    pub applies: fn(&DietContext<'_>) -> bool,
    pub style: DietStyle,
    pub confidence: f32,
}

/// The table, in strict priority order
pub static DIET_RULES: &[DietRule] = &[
    DietRule {
        name: "growth_puppy",
        applies: |c| c.profile.life_stage() == LifeStage::Puppy,
        style: DietStyle::GrowthPuppy,
        confidence: 0.95,
    },
    DietRule {
        name: "growth_kitten",
        applies: |c| c.profile.life_stage() == LifeStage::Kitten,
        style: DietStyle::GrowthKitten,
        confidence: 0.95,
    },
    DietRule {
        name: "kidney_senior",
        applies: |c| c.kidney_flagged() && c.profile.life_stage() == LifeStage::Senior,
        style: DietStyle::SeniorWellnessKidney,
        confidence: 0.9,
    },
    DietRule {
        name: "kidney_any_age",
        applies: |c| c.kidney_flagged(),
        style: DietStyle::SeniorWellnessKidney,
        confidence: 0.7,
    },
    DietRule {
        name: "goal_weight_loss",
        applies: |c| c.profile.health_goal == HealthGoal::WeightLoss,
        style: DietStyle::WeightLoss,
        confidence: 0.85,
    },
    DietRule {
        name: "goal_weight_gain",
        applies: |c| c.profile.health_goal == HealthGoal::WeightGain,
        style: DietStyle::WeightGain,
        confidence: 0.85,
    },
    DietRule {
        name: "goal_muscle_gain",
        applies: |c| c.profile.health_goal == HealthGoal::MuscleGain,
        style: DietStyle::HighProteinPerformance,
        confidence: 0.8,
    },
    DietRule {
        name: "obese_without_goal",
        applies: |c| c.profile.body_condition_score >= 5,
        style: DietStyle::WeightLoss,
        confidence: 0.7,
    },
    DietRule {
        name: "emaciated_without_goal",
        applies: |c| c.profile.body_condition_score <= 1,
        style: DietStyle::WeightGain,
        confidence: 0.7,
    },
    DietRule {
        name: "very_high_activity",
        applies: |c| c.profile.activity_level == ActivityLevel::VeryHigh,
        style: DietStyle::HighProteinPerformance,
        confidence: 0.7,
    },
    DietRule {
        name: "senior_wellness",
        applies: |c| {
            c.profile.life_stage() == LifeStage::Senior
                || c.profile.health_goal == HealthGoal::SeniorSupport
        },
        style: DietStyle::SeniorWellness,
        confidence: 0.8,
    },
    DietRule {
        name: "digestive_sensitive",
        applies: |c| {
            c.digestive_flagged()
                || c.profile.health_goal == HealthGoal::DigestiveHealth
                || (!c.profile.food_allergies.is_empty()
                    && c.profile.dietary_preference == DietaryPreference::LimitedIngredient)
        },
        style: DietStyle::DigestiveSensitive,
        confidence: 0.75,
    },
    DietRule {
        name: "pref_grain_free",
        applies: |c| c.profile.dietary_preference == DietaryPreference::GrainFree,
        style: DietStyle::GrainFreeHighProtein,
        confidence: 0.75,
    },
    DietRule {
        name: "pref_high_protein",
        applies: |c| c.profile.dietary_preference == DietaryPreference::HighProtein,
        style: DietStyle::HighProteinPerformance,
        confidence: 0.65,
    },
];

/// Default when no rule fires
pub const DEFAULT_STYLE: DietStyle = DietStyle::MaintenanceStandard;
pub const DEFAULT_CONFIDENCE: f32 = 0.7;

/// Penalty applied when profile signals contradict the chosen style
pub const CONFLICT_PENALTY: f32 = 0.15;

/// True when the chosen style contradicts the body condition score
pub fn conflicting_signals(profile: &PetProfileInput, style: DietStyle) -> bool {
    match style {
        DietStyle::WeightLoss => profile.body_condition_score <= 2,
        DietStyle::WeightGain => profile.body_condition_score >= 4,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreedSizeCategory, PetProfileInput, Species};

    fn classify(profile: &PetProfileInput, risks: Option<&RiskMap>) -> (&'static str, DietStyle) {
        let ctx = DietContext { profile, risks };
        super::super::first_firing(DIET_RULES, |r| (r.applies)(&ctx))
            .map(|r| (r.name, r.style))
            .unwrap_or(("default", DEFAULT_STYLE))
    }

    #[test]
    fn test_growth_has_absolute_precedence() {
        let mut profile = PetProfileInput::baseline(Species::Dog);
        profile.life_stage = Some(LifeStage::Puppy);
        profile.breed_size_category = BreedSizeCategory::Giant;
        profile.health_goal = HealthGoal::WeightLoss;
        profile
            .existing_conditions
            .insert(ConditionTag::ChronicKidneyDisease);

        let (name, style) = classify(&profile, None);
        assert_eq!(name, "growth_puppy");
        assert_eq!(style, DietStyle::GrowthPuppy);
    }

    #[test]
    fn test_kidney_senior_beats_generic_senior() {
        let mut profile = PetProfileInput::baseline(Species::Cat);
        profile.age_years = 12.0;
        let mut risks = RiskMap::all_low();
        risks.kidney_risk = RiskLevel::High;

        let (_, style) = classify(&profile, Some(&risks));
        assert_eq!(style, DietStyle::SeniorWellnessKidney);
    }

    #[test]
    fn test_kidney_without_risks_uses_condition() {
        let mut profile = PetProfileInput::baseline(Species::Cat);
        profile.age_years = 12.0;
        profile
            .existing_conditions
            .insert(ConditionTag::ChronicKidneyDisease);

        let (_, style) = classify(&profile, None);
        assert_eq!(style, DietStyle::SeniorWellnessKidney);
    }

    #[test]
    fn test_plain_senior_gets_senior_wellness() {
        let mut profile = PetProfileInput::baseline(Species::Cat);
        profile.age_years = 12.0;
        let (_, style) = classify(&profile, Some(&RiskMap::all_low()));
        assert_eq!(style, DietStyle::SeniorWellness);
    }

    #[test]
    fn test_weight_loss_goal() {
        let mut profile = PetProfileInput::baseline(Species::Dog);
        profile.health_goal = HealthGoal::WeightLoss;
        let (_, style) = classify(&profile, Some(&RiskMap::all_low()));
        assert_eq!(style, DietStyle::WeightLoss);
    }

    #[test]
    fn test_default_is_maintenance() {
        let profile = PetProfileInput::baseline(Species::Dog);
        let (name, style) = classify(&profile, Some(&RiskMap::all_low()));
        assert_eq!(name, "default");
        assert_eq!(style, DietStyle::MaintenanceStandard);
    }

    #[test]
    fn test_conflicting_signals() {
        let mut profile = PetProfileInput::baseline(Species::Dog);
        profile.body_condition_score = 2;
        assert!(conflicting_signals(&profile, DietStyle::WeightLoss));
        assert!(!conflicting_signals(&profile, DietStyle::WeightGain));
        profile.body_condition_score = 4;
        assert!(conflicting_signals(&profile, DietStyle::WeightGain));
    }
}
