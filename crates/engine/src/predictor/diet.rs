//! Diet style classification
//!
//! Thin component over the priority-ordered rule table in
//! [`crate::rules::diet`]. Risk output is a soft dependency: when present
//! it refines the decision, when absent classification proceeds from
//! profile fields alone.

use crate::models::{DietStyle, PetProfileInput, RiskMap};
use crate::rules::diet::{
    conflicting_signals, DietContext, CONFLICT_PENALTY, DEFAULT_CONFIDENCE, DEFAULT_STYLE,
    DIET_RULES,
};
use crate::rules::first_firing;

/// Classification result, with the deciding rule kept for logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DietDecision {
    pub style: DietStyle,
    pub confidence: f32,
    pub rule: &'static str,
}

#[derive(Debug, Clone, Default)]
pub struct DietStyleClassifier;

impl DietStyleClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, profile: &PetProfileInput, risks: Option<&RiskMap>) -> DietDecision {
        let ctx = DietContext { profile, risks };

        let (style, confidence, rule) = match first_firing(DIET_RULES, |r| (r.applies)(&ctx)) {
            Some(rule) => (rule.style, rule.confidence, rule.name),
            None => (DEFAULT_STYLE, DEFAULT_CONFIDENCE, "maintenance_default"),
        };

        let confidence = if conflicting_signals(profile, style) {
            (confidence - CONFLICT_PENALTY).max(0.05)
        } else {
            confidence
        };

        DietDecision {
            style,
            confidence,
            rule,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BreedSizeCategory, HealthGoal, LifeStage, RiskLevel, Species};

    #[test]
    fn test_growth_precedence_ignores_everything_else() {
        let mut profile = PetProfileInput::baseline(Species::Dog);
        profile.life_stage = Some(LifeStage::Puppy);
        profile.breed_size_category = BreedSizeCategory::Giant;
        profile.health_goal = HealthGoal::WeightLoss;

        let decision = DietStyleClassifier::new().classify(&profile, None);
        assert_eq!(decision.style, DietStyle::GrowthPuppy);
        assert!(decision.confidence >= 0.9);
    }

    #[test]
    fn test_kidney_risk_refines_senior() {
        let mut profile = PetProfileInput::baseline(Species::Cat);
        profile.age_years = 12.0;

        let classifier = DietStyleClassifier::new();
        let mut risks = RiskMap::all_low();

        let without = classifier.classify(&profile, Some(&risks));
        assert_eq!(without.style, DietStyle::SeniorWellness);

        risks.kidney_risk = RiskLevel::High;
        let with = classifier.classify(&profile, Some(&risks));
        assert_eq!(with.style, DietStyle::SeniorWellnessKidney);
    }

    #[test]
    fn test_works_without_risk_output() {
        let mut profile = PetProfileInput::baseline(Species::Dog);
        profile.health_goal = HealthGoal::WeightLoss;
        let decision = DietStyleClassifier::new().classify(&profile, None);
        assert_eq!(decision.style, DietStyle::WeightLoss);
    }

    #[test]
    fn test_conflict_penalty_applied() {
        let mut profile = PetProfileInput::baseline(Species::Dog);
        profile.health_goal = HealthGoal::WeightLoss;

        let classifier = DietStyleClassifier::new();
        let normal = classifier.classify(&profile, None);

        profile.body_condition_score = 2;
        let conflicted = classifier.classify(&profile, None);
        assert!(conflicted.confidence < normal.confidence);
        assert_eq!(conflicted.style, DietStyle::WeightLoss);
    }

    #[test]
    fn test_default_confidence_above_consultation_threshold() {
        let profile = PetProfileInput::baseline(Species::Dog);
        let decision = DietStyleClassifier::new().classify(&profile, None);
        assert_eq!(decision.style, DietStyle::MaintenanceStandard);
        assert!(decision.confidence >= 0.6);
    }
}
