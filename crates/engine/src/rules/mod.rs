//! Rule tables for the baseline (pre-ML) prediction path
//!
//! Heuristic logic lives here as data consumed by generic evaluation
//! helpers, so the baseline behavior is auditable and testable on its
//! own, and a learned model can replace it behind the same component
//! interface without touching call sites.

pub mod diet;
pub mod risk;

use crate::models::PetProfileInput;

/// A single named rule: a predicate over the profile plus the outcome it
/// produces when it fires
pub struct Rule<O: 'static> {
    pub name: &'static str,
    pub applies: fn(&PetProfileInput) -> bool,
    pub outcome: O,
}

/// All rules in a table that fire for a profile
pub fn firing<'a, O>(
    rules: &'a [Rule<O>],
    profile: &PetProfileInput,
) -> impl Iterator<Item = &'a Rule<O>> + 'a {
    let hits: Vec<&'a Rule<O>> = rules.iter().filter(|r| (r.applies)(profile)).collect();
    hits.into_iter()
}

/// First rule that fires, for priority-ordered tables
///
/// Generic over the firing test so tables with richer contexts (for
/// example diet rules, which also see risk output) reuse the same
/// evaluation shape.
pub fn first_firing<'a, R>(rules: &'a [R], fires: impl Fn(&R) -> bool) -> Option<&'a R> {
    rules.iter().find(|r| fires(r))
}
