//! End-to-end prediction tests against the public crate surface

use nutrition_engine::encoder::FeatureEncoder;
use nutrition_engine::predictor::resting_energy_requirement;
use nutrition_engine::{
    ConditionTag, DietStyle, EngineConfig, EngineContext, EngineError, HealthGoal, ModelOutput,
    PetProfileInput, RiskLevel, Species, BASELINE_MODEL_VERSION,
};

fn context() -> EngineContext {
    EngineContext::new(EngineConfig::default()).expect("default config must construct")
}

#[tokio::test]
async fn test_overweight_dog_weight_loss_plan() {
    // 29 kg adult dog, owner wants weight loss
    let mut profile = PetProfileInput::baseline(Species::Dog);
    profile.weight_kg = 29.0;
    profile.age_years = 6.0;
    profile.body_condition_score = 4;
    profile.neutered = true;
    profile.health_goal = HealthGoal::WeightLoss;

    let output = context().predict(&profile).await.unwrap();

    assert_eq!(output.diet_style, DietStyle::WeightLoss);

    // The weight-loss factor must land below neutered-adult maintenance
    let rer = resting_energy_requirement(29.0);
    let maintenance = (rer * 1.6).round() as u32;
    assert!(
        output.calories_per_day < maintenance,
        "got {} kcal, maintenance is {}",
        output.calories_per_day,
        maintenance
    );
    assert!(output.calories_per_day > rer as u32 / 2);

    // Weight-loss plans run protein-heavy
    assert!(output.protein_percent > 30.0);
    assert_eq!(output.risks.weight_risk, RiskLevel::Medium);
}

#[tokio::test]
async fn test_senior_ckd_cat_renal_plan() {
    let mut profile = PetProfileInput::baseline(Species::Cat);
    profile.age_years = 12.0;
    profile.weight_kg = 4.5;
    profile
        .existing_conditions
        .insert(ConditionTag::ChronicKidneyDisease);

    let output = context().predict(&profile).await.unwrap();

    assert_eq!(output.risks.kidney_risk, RiskLevel::High);
    assert_eq!(output.diet_style, DietStyle::SeniorWellnessKidney);
    assert!(output.veterinary_consultation_recommended);
    assert!(output
        .alert_messages
        .iter()
        .any(|m| m.contains("kidney")));
    // Renal protein reduction stops at the feline floor
    assert!(output.protein_percent >= 26.0);
}

#[tokio::test]
async fn test_giant_puppy_growth_takes_precedence() {
    // Growth outranks the owner's stated goal
    let mut profile = PetProfileInput::baseline(Species::Dog);
    profile.age_years = 0.4;
    profile.weight_kg = 18.0;
    profile.breed = "Great Dane".to_string();
    profile.breed_size_category = nutrition_engine::BreedSizeCategory::Giant;
    profile.health_goal = HealthGoal::WeightLoss;

    let output = context().predict(&profile).await.unwrap();

    assert_eq!(output.diet_style, DietStyle::GrowthPuppy);
    assert!(output.diet_style_confidence >= 0.9);
    // Young puppies eat more often
    assert_eq!(output.meals_per_day, 4);
}

#[tokio::test]
async fn test_negative_weight_rejected_before_any_stage() {
    let mut profile = PetProfileInput::baseline(Species::Dog);
    profile.weight_kg = -5.0;

    let err = context().predict(&profile).await.unwrap_err();
    assert!(matches!(err, EngineError::FeatureEncoding(_)));
    let msg = err.to_string();
    assert!(msg.contains("weight_kg"), "was: {}", msg);
}

#[tokio::test]
async fn test_output_json_shape_is_backend_neutral() {
    let profile = PetProfileInput::baseline(Species::Dog);
    let output = context().predict(&profile).await.unwrap();

    let json = serde_json::to_value(&output).unwrap();
    let obj = json.as_object().unwrap();
    for key in [
        "calories_per_day",
        "calorie_range_min",
        "calorie_range_max",
        "protein_percent",
        "fat_percent",
        "carbohydrate_percent",
        "diet_style",
        "diet_style_confidence",
        "risks",
        "meals_per_day",
        "portion_size_grams",
        "model_version",
        "prediction_timestamp",
        "confidence_score",
        "veterinary_consultation_recommended",
        "alert_messages",
    ] {
        assert!(obj.contains_key(key), "missing key {}", key);
    }

    // Exactly six risk keys, closed vocabulary
    let risks = obj["risks"].as_object().unwrap();
    assert_eq!(risks.len(), 6);
    for (_, level) in risks {
        let level = level.as_str().unwrap();
        assert!(matches!(level, "low" | "medium" | "high"), "was: {}", level);
    }
}

#[tokio::test]
async fn test_output_round_trips_through_json() {
    let mut profile = PetProfileInput::baseline(Species::Cat);
    profile.age_years = 11.0;

    let output = context().predict(&profile).await.unwrap();
    let json = serde_json::to_string(&output).unwrap();
    let parsed: ModelOutput = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, output);
}

#[tokio::test]
async fn test_calorie_range_brackets_the_point_estimate() {
    for species in [Species::Dog, Species::Cat] {
        let output = context()
            .predict(&PetProfileInput::baseline(species))
            .await
            .unwrap();
        assert!(output.calorie_range_min < output.calories_per_day);
        assert!(output.calories_per_day < output.calorie_range_max);
    }
}

#[tokio::test]
async fn test_baseline_reports_rule_version() {
    let output = context()
        .predict(&PetProfileInput::baseline(Species::Dog))
        .await
        .unwrap();
    assert_eq!(output.model_version, BASELINE_MODEL_VERSION);

    let info = context().engine_info();
    assert_eq!(info.backend_name, "proprietary");
    assert_eq!(info.encoder_version, "enc-v1");
}

#[test]
fn test_encoding_is_deterministic() {
    let encoder = FeatureEncoder::new();
    let mut profile = PetProfileInput::baseline(Species::Dog);
    profile.breed = "Labrador Retriever".to_string();
    profile.existing_conditions.insert(ConditionTag::Arthritis);

    let a = encoder.encode(&profile).unwrap();
    let b = encoder.encode(&profile).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.encoder_version, "enc-v1");
}
