//! Six-category risk assessment
//!
//! Each category is an independent classifier over the profile. The
//! baseline comes from the rule tables; a learned classifier, when
//! available, refines the rule output under the conservative-bias
//! invariant: a rule-flagged high is never demoted.

use crate::models::{FeatureVector, PetProfileInput, RiskCategory, RiskLevel, RiskMap};
use crate::rules::risk::{assess_category, RiskOutcome};
use std::sync::Arc;

/// Seam for a trained per-category classifier
///
/// Returning `None` for a category leaves the rule outcome in place.
pub trait RiskModel: Send + Sync {
    fn classify(&self, features: &FeatureVector, category: RiskCategory) -> Option<RiskOutcome>;
}

/// Risk map plus the certainty carried into the aggregate confidence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskReport {
    pub risks: RiskMap,
    pub mean_certainty: f32,
}

/// Assesses all six categories for a profile
pub struct RiskAssessor {
    model: Option<Arc<dyn RiskModel>>,
}

impl RiskAssessor {
    /// Rule-table baseline only
    pub fn rules_only() -> Self {
        Self { model: None }
    }

    /// Rules refined by a trained classifier
    pub fn with_model(model: Arc<dyn RiskModel>) -> Self {
        Self { model: Some(model) }
    }

    /// Assess every category. Categories are independent of each other;
    /// they share only the immutable profile.
    pub fn assess(&self, profile: &PetProfileInput, features: &FeatureVector) -> RiskReport {
        let mut risks = RiskMap::all_low();
        let mut certainty_sum = 0.0;

        for category in RiskCategory::ALL {
            let rule = assess_category(category, profile);
            let resolved = match &self.model {
                Some(model) => match model.classify(features, category) {
                    Some(learned) => refine(rule, learned),
                    None => rule,
                },
                None => rule,
            };
            risks.set(category, resolved.level);
            certainty_sum += resolved.certainty;
        }

        RiskReport {
            risks,
            mean_certainty: certainty_sum / RiskCategory::ALL.len() as f32,
        }
    }
}

/// Merge a learned outcome into the rule outcome
///
/// The learned classifier replaces the rule output, except that a
/// rule-flagged high level is kept regardless of what the model says.
fn refine(rule: RiskOutcome, learned: RiskOutcome) -> RiskOutcome {
    if rule.level == RiskLevel::High && learned.level < RiskLevel::High {
        return rule;
    }
    learned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::FeatureEncoder;
    use crate::models::{ConditionTag, Species};

    struct DemotingModel;

    impl RiskModel for DemotingModel {
        fn classify(&self, _: &FeatureVector, _: RiskCategory) -> Option<RiskOutcome> {
            Some(RiskOutcome {
                level: RiskLevel::Low,
                certainty: 0.99,
            })
        }
    }

    fn encoded(profile: &PetProfileInput) -> FeatureVector {
        FeatureEncoder::new().encode(profile).unwrap()
    }

    #[test]
    fn test_all_six_categories_populated() {
        let profile = PetProfileInput::baseline(Species::Dog);
        let report = RiskAssessor::rules_only().assess(&profile, &encoded(&profile));
        assert_eq!(report.risks.iter().count(), 6);
        assert!(report.mean_certainty > 0.0 && report.mean_certainty <= 1.0);
    }

    #[test]
    fn test_ckd_cat_kidney_high() {
        let mut profile = PetProfileInput::baseline(Species::Cat);
        profile.age_years = 12.0;
        profile
            .existing_conditions
            .insert(ConditionTag::ChronicKidneyDisease);

        let report = RiskAssessor::rules_only().assess(&profile, &encoded(&profile));
        assert_eq!(report.risks.kidney_risk, RiskLevel::High);
    }

    #[test]
    fn test_learned_model_cannot_demote_rule_high() {
        let mut profile = PetProfileInput::baseline(Species::Cat);
        profile.age_years = 12.0;
        profile
            .existing_conditions
            .insert(ConditionTag::ChronicKidneyDisease);

        let assessor = RiskAssessor::with_model(Arc::new(DemotingModel));
        let report = assessor.assess(&profile, &encoded(&profile));
        // Rule says high; the model's low must not win
        assert_eq!(report.risks.kidney_risk, RiskLevel::High);
    }

    #[test]
    fn test_learned_model_may_demote_rule_medium() {
        let mut profile = PetProfileInput::baseline(Species::Dog);
        profile.body_condition_score = 4;

        let assessor = RiskAssessor::with_model(Arc::new(DemotingModel));
        let report = assessor.assess(&profile, &encoded(&profile));
        assert_eq!(report.risks.weight_risk, RiskLevel::Low);
    }
}
