//! Input validation functions
//!
//! Range checks for values arriving from the onboarding flow and the
//! intake log. The target engine never calls these; hosts do, before a
//! value is stored.

use crate::errors::ProfileError;
use crate::profile::UserProfile;
use std::fmt;

pub const MIN_AGE_YEARS: u32 = 13;
pub const MAX_AGE_YEARS: u32 = 100;
pub const MAX_WEEKLY_RATE_KG: f64 = 1.5;

/// Validate age in whole years
pub fn validate_age(age_years: u32) -> Result<(), String> {
    if age_years < MIN_AGE_YEARS {
        return Err(format!("Age must be at least {} years", MIN_AGE_YEARS));
    }
    if age_years > MAX_AGE_YEARS {
        return Err(format!("Age must be at most {} years", MAX_AGE_YEARS));
    }
    Ok(())
}

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate desired weekly weight change (magnitude, kg)
pub fn validate_weekly_rate(rate_kg: f64) -> Result<(), String> {
    if rate_kg.is_nan() || rate_kg.is_infinite() {
        return Err("Weekly rate must be a valid number".to_string());
    }
    if rate_kg < 0.0 {
        return Err("Weekly rate cannot be negative".to_string());
    }
    if rate_kg > MAX_WEEKLY_RATE_KG {
        return Err(format!(
            "Weekly rate must be at most {} kg",
            MAX_WEEKLY_RATE_KG
        ));
    }
    Ok(())
}

/// Validate average nightly sleep
pub fn validate_sleep_hours(hours: f64) -> Result<(), String> {
    if hours.is_nan() || hours.is_infinite() {
        return Err("Sleep hours must be a valid number".to_string());
    }
    if !(0.0..=24.0).contains(&hours) {
        return Err("Sleep hours must be between 0 and 24".to_string());
    }
    Ok(())
}

/// Validate a logged intake amount (kcal, grams or nutrient units)
pub fn validate_intake_amount(amount: f64) -> Result<(), String> {
    if amount.is_nan() || amount.is_infinite() {
        return Err("Amount must be a valid number".to_string());
    }
    if amount < 0.0 {
        return Err("Amount cannot be negative".to_string());
    }
    Ok(())
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "gender" => "Gender",
        "age" => "Age",
        "height_cm" | "height" => "Height",
        "current_weight_kg" | "weight" => "Current Weight",
        "activity_level" => "Activity Level",
        "goal" => "Goal",
        "diet_preference" => "Diet Preference",
        "weekly_rate_kg" => "Weekly Rate",
        "sleep_hours" => "Sleep Hours",
        "calories_kcal" => "Calories",
        "protein_g" => "Protein",
        "carbs_g" => "Carbohydrates",
        "fats_g" => "Fats",
        "nutrients" => "Nutrients",
        _ => field_name,
    }
}

/// Convert a list of technical field names to user-friendly labels
pub fn get_missing_fields_labels(fields: &[&str]) -> Vec<String> {
    fields
        .iter()
        .map(|f| get_field_display_label(f).to_string())
        .collect()
}

/// Validation error with field context
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
    pub display_label: String,
}

impl ValidationError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
            display_label: get_field_display_label(field).to_string(),
        }
    }

    /// Format as user-friendly error message
    pub fn user_message(&self) -> String {
        format!("{}: {}", self.display_label, self.message)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl From<ValidationError> for ProfileError {
    fn from(err: ValidationError) -> Self {
        ProfileError::InvalidField {
            field: err.field,
            message: err.message,
        }
    }
}

fn check<T: Copy>(
    errors: &mut Vec<ValidationError>,
    field: &str,
    value: Option<T>,
    validate: fn(T) -> Result<(), String>,
) {
    if let Some(value) = value {
        if let Err(message) = validate(value) {
            errors.push(ValidationError::new(field, &message));
        }
    }
}

impl UserProfile {
    /// Check every numeric field that is set
    ///
    /// Collects all violations instead of stopping at the first.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check(&mut errors, "age", self.age, validate_age);
        check(&mut errors, "height_cm", self.height_cm, validate_height_cm);
        check(&mut errors, "current_weight_kg", self.current_weight_kg, validate_weight);
        check(&mut errors, "weekly_rate_kg", self.weekly_rate_kg, validate_weekly_rate);
        check(&mut errors, "sleep_hours", self.sleep_hours, validate_sleep_hours);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
