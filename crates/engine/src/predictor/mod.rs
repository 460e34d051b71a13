//! Multi-task prediction components
//!
//! Four components plus the orchestrator that runs them in dependency
//! order. Each component is independently testable against the rule
//! tables in [`crate::rules`]; learned models slot in behind the same
//! interfaces.

mod calories;
mod diet;
mod macros;
mod orchestrator;
mod risk;

pub use calories::{
    resting_energy_requirement, CalorieEstimate, CalorieEstimator, CALORIES_BOUNDS, DER_GUARD_RAIL,
};
pub use diet::{DietDecision, DietStyleClassifier};
pub use macros::{
    MacroTargets, MacronutrientEstimator, CARB_BOUNDS, CAT_PROTEIN_FLOOR, FAT_BOUNDS,
    PROTEIN_BOUNDS,
};
pub use orchestrator::{Orchestrator, OrchestratorSettings, MACRO_SUM_TOLERANCE, PORTION_BOUNDS};
pub use risk::{RiskAssessor, RiskModel, RiskReport};
