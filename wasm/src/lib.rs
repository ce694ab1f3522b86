//! Nutrition Planner WASM Module
//!
//! WebAssembly bindings so the onboarding flow can preview targets in the
//! browser with the same engine the backend uses. Structured values cross
//! the boundary as JSON strings in the engine's camelCase wire format.

use nutrition_planner_shared::{
    calculate_bmr_mifflin, calculate_micronutrients, compute_targets, estimate_energy,
    plan_calories, DietPreference, Gender, Goal, UserProfile,
};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Arguments of the planning stage
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlanInput {
    #[serde(default)]
    tdee_kcal: u32,
    goal: Option<Goal>,
    weekly_rate_kg: Option<f64>,
    diet_preference: Option<DietPreference>,
}

fn parse_profile(profile_json: &str) -> Result<UserProfile, String> {
    serde_json::from_str(profile_json).map_err(|e| format!("Invalid profile: {}", e))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

fn estimate_energy_inner(profile_json: &str) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    to_json(&estimate_energy(&profile))
}

fn plan_calories_inner(input_json: &str) -> Result<String, String> {
    let input: PlanInput =
        serde_json::from_str(input_json).map_err(|e| format!("Invalid plan input: {}", e))?;
    to_json(&plan_calories(
        input.tdee_kcal,
        input.goal,
        input.weekly_rate_kg,
        input.diet_preference,
    ))
}

fn calculate_micronutrients_inner(
    profile_json: &str,
    daily_calorie_target_kcal: u32,
) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    to_json(&calculate_micronutrients(&profile, daily_calorie_target_kcal))
}

fn compute_targets_inner(profile_json: &str) -> Result<String, String> {
    let profile = parse_profile(profile_json)?;
    to_json(&compute_targets(&profile))
}

/// BMR and TDEE for a profile, as JSON
#[wasm_bindgen]
pub fn estimate_energy_json(profile_json: &str) -> Result<String, JsValue> {
    estimate_energy_inner(profile_json).map_err(|e| JsValue::from_str(&e))
}

/// Calorie target and macros from `{tdeeKcal, goal, weeklyRateKg, dietPreference}`
#[wasm_bindgen]
pub fn plan_calories_json(input_json: &str) -> Result<String, JsValue> {
    plan_calories_inner(input_json).map_err(|e| JsValue::from_str(&e))
}

/// Micronutrient targets, or `null` when they cannot be computed yet
#[wasm_bindgen]
pub fn calculate_micronutrients_json(
    profile_json: &str,
    daily_calorie_target_kcal: u32,
) -> Result<String, JsValue> {
    calculate_micronutrients_inner(profile_json, daily_calorie_target_kcal)
        .map_err(|e| JsValue::from_str(&e))
}

/// The full target bundle for a profile
#[wasm_bindgen]
pub fn compute_targets_json(profile_json: &str) -> Result<String, JsValue> {
    compute_targets_inner(profile_json).map_err(|e| JsValue::from_str(&e))
}

/// Calculate BMR using the Mifflin-St Jeor equation
#[wasm_bindgen]
pub fn calculate_bmr(weight_kg: f64, height_cm: f64, age_years: u32, is_male: bool) -> f64 {
    let gender = if is_male { Gender::Male } else { Gender::Female };
    calculate_bmr_mifflin(weight_kg, height_cm, age_years, gender).max(0.0)
}

/// Calculate TDEE (Total Daily Energy Expenditure)
/// Rounds the BMR first, as the engine does.
#[wasm_bindgen]
pub fn calculate_tdee(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    is_male: bool,
    activity_multiplier: f64,
) -> f64 {
    let bmr = calculate_bmr(weight_kg, height_cm, age_years, is_male).round();
    (bmr * activity_multiplier).round()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"{
        "gender": "male",
        "age": 30,
        "heightCm": 180,
        "currentWeightKg": 80,
        "activityLevel": "sedentary",
        "goal": "improved_health"
    }"#;

    #[test]
    fn test_bmr_and_tdee() {
        assert_eq!(calculate_bmr(80.0, 180.0, 30, true), 1780.0);
        assert_eq!(calculate_tdee(80.0, 180.0, 30, true, 1.2), 2136.0);
    }

    #[test]
    fn test_estimate_energy_json() {
        let json: serde_json::Value =
            serde_json::from_str(&estimate_energy_inner(PROFILE).unwrap()).unwrap();
        assert_eq!(json["bmrKcal"], 1780);
        assert_eq!(json["tdeeKcal"], 2136);
    }

    #[test]
    fn test_plan_calories_json() {
        let out = plan_calories_inner(
            r#"{"tdeeKcal": 2136, "goal": "weight_gain", "weeklyRateKg": 0.5}"#,
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["dailyCalorieTargetKcal"], 2686);
    }

    #[test]
    fn test_micronutrients_json_null_without_calories() {
        assert_eq!(calculate_micronutrients_inner(PROFILE, 0).unwrap(), "null");
        let out = calculate_micronutrients_inner(PROFILE, 2136).unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["vitaminA"], 900.0);
    }

    #[test]
    fn test_compute_targets_json() {
        let json: serde_json::Value =
            serde_json::from_str(&compute_targets_inner(PROFILE).unwrap()).unwrap();
        assert_eq!(json["plan"]["dailyCalorieTargetKcal"], 2136);
        assert!(json["micronutrients"].is_object());
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(compute_targets_inner("not json").is_err());
        assert!(estimate_energy_inner(r#"{"gender": "robot"}"#).is_err());
    }
}
