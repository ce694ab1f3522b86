//! API request and response types

use crate::errors::ProfileError;
use crate::intake::{IntakeEntry, IntakeReport};
use crate::pipeline::NutritionTargets;
use crate::profile::{
    ActivityLevel, AlcoholFrequency, CaffeineIntake, Climate, Deficiency, DietPreference,
    ExerciseType, Gender, Goal, HealthCondition, Medication, MenstrualCycle, PregnancyStatus,
    SkinTone, SmokingStatus, StressLevel, SunExposure, UserProfile,
};
use crate::units::{EnergyUnit, FeetInchesHeight, HeightUnit, WeightUnit};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Partial profile update sent by one onboarding step
///
/// Every field is optional; only the ones present are written. Weight and
/// height may be given in any supported unit and are stored in kg and cm.
#[derive(Debug, Clone, Serialize, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[validate(range(min = 13, max = 100))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Height value in `height_unit` (cm when absent)
    #[validate(range(exclusive_min = 0.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_unit: Option<HeightUnit>,
    /// Height as feet and inches; takes precedence over `height`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_feet_inches: Option<FeetInchesHeight>,
    /// Weight value in `weight_unit` (kg when absent)
    #[validate(range(exclusive_min = 0.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_unit: Option<WeightUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_preference: Option<DietPreference>,
    #[validate(range(min = 0.0, max = 1.5))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_rate_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pregnancy_status: Option<PregnancyStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menstrual_cycle: Option<MenstrualCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoking_status: Option<SmokingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alcohol_frequency: Option<AlcoholFrequency>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caffeine_intake: Option<CaffeineIntake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sun_exposure: Option<SunExposure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub climate: Option<Climate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<SkinTone>,
    #[validate(range(min = 0.0, max = 24.0))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<StressLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<BTreeSet<Medication>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_deficiencies: Option<BTreeSet<Deficiency>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exercise_types: Option<BTreeSet<ExerciseType>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_conditions: Option<BTreeSet<HealthCondition>>,
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

impl UpdateProfileRequest {
    /// Height in centimeters, if this update carries one
    pub fn height_cm(&self) -> Option<f64> {
        match (self.height_feet_inches, self.height) {
            (Some(feet_inches), _) => Some(feet_inches.to_cm()),
            (None, Some(value)) => Some(self.height_unit.unwrap_or_default().to_cm(value)),
            (None, None) => None,
        }
    }

    /// Weight in kilograms, if this update carries one
    pub fn weight_kg(&self) -> Option<f64> {
        self.weight
            .map(|value| self.weight_unit.unwrap_or_default().to_kg(value))
    }

    /// Merge the present fields into `profile`
    ///
    /// Converted measurements are range-checked before anything is written.
    pub fn apply_to(self, profile: &mut UserProfile) -> Result<(), ProfileError> {
        let height_cm = self.height_cm();
        let weight_kg = self.weight_kg();
        if let Some(cm) = height_cm {
            crate::validation::validate_height_cm(cm).map_err(|message| {
                ProfileError::InvalidField {
                    field: "height_cm".to_string(),
                    message,
                }
            })?;
        }
        if let Some(kg) = weight_kg {
            crate::validation::validate_weight(kg).map_err(|message| {
                ProfileError::InvalidField {
                    field: "current_weight_kg".to_string(),
                    message,
                }
            })?;
        }

        overwrite(&mut profile.gender, self.gender);
        overwrite(&mut profile.age, self.age);
        overwrite(&mut profile.height_cm, height_cm);
        overwrite(&mut profile.current_weight_kg, weight_kg);
        overwrite(&mut profile.activity_level, self.activity_level);
        overwrite(&mut profile.goal, self.goal);
        overwrite(&mut profile.diet_preference, self.diet_preference);
        overwrite(&mut profile.weekly_rate_kg, self.weekly_rate_kg);
        overwrite(&mut profile.pregnancy_status, self.pregnancy_status);
        overwrite(&mut profile.menstrual_cycle, self.menstrual_cycle);
        overwrite(&mut profile.smoking_status, self.smoking_status);
        overwrite(&mut profile.alcohol_frequency, self.alcohol_frequency);
        overwrite(&mut profile.caffeine_intake, self.caffeine_intake);
        overwrite(&mut profile.sun_exposure, self.sun_exposure);
        overwrite(&mut profile.climate, self.climate);
        overwrite(&mut profile.skin_tone, self.skin_tone);
        overwrite(&mut profile.sleep_hours, self.sleep_hours);
        overwrite(&mut profile.stress_level, self.stress_level);

        if let Some(medications) = self.medications {
            profile.medications = medications;
        }
        if let Some(deficiencies) = self.previous_deficiencies {
            profile.previous_deficiencies = deficiencies;
        }
        if let Some(exercise_types) = self.exercise_types {
            profile.exercise_types = exercise_types;
        }
        if let Some(conditions) = self.health_conditions {
            profile.health_conditions = conditions;
        }
        Ok(())
    }
}

/// Stored profile with a fresh target preview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: String,
    pub profile: UserProfile,
    /// Labels of required fields still missing
    pub missing_fields: Vec<String>,
    pub preview: NutritionTargets,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Target Types
// ============================================================================

/// Stateless target preview
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetsPreviewResponse {
    pub targets: NutritionTargets,
    pub is_complete: bool,
    pub missing_fields: Vec<String>,
}

/// Targets stored when a profile was finalized
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredTargetsResponse {
    pub profile_id: String,
    pub finalized_at: DateTime<Utc>,
    pub fields: BTreeMap<String, f64>,
    pub targets: NutritionTargets,
}

// ============================================================================
// Intake Types
// ============================================================================

/// Log intake request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogIntakeRequest {
    /// Day the intake belongs to (defaults to today, UTC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub entry: IntakeEntry,
}

/// Logged intake response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeLogResponse {
    pub id: String,
    pub date: NaiveDate,
    pub entry: IntakeEntry,
    pub logged_at: DateTime<Utc>,
}

/// Daily report response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyReportResponse {
    pub date: NaiveDate,
    pub report: IntakeReport,
}

/// Daily report query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Day to report (defaults to today, UTC)
    pub date: Option<NaiveDate>,
    /// Unit for calorie figures (defaults to kcal)
    pub energy_unit: Option<EnergyUnit>,
}
