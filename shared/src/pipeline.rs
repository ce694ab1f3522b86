//! Full target pipeline and its stored form
//!
//! Runs energy estimation, calorie planning and the micronutrient
//! calculation in order, handing each stage the previous stage's output.
//! The resulting bundle can be flattened into plain numeric fields for
//! storage and read back for reporting.

use crate::energy::{estimate_energy, EnergyEstimate};
use crate::errors::SnapshotError;
use crate::micronutrients::{calculate_micronutrients, MicronutrientTargets, Nutrient};
use crate::planner::{plan_calories, CaloriePlan, MacroGrams, MacroSplit};
use crate::profile::UserProfile;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored field names
pub mod keys {
    pub const BMR_KCAL: &str = "bmrKcal";
    pub const TDEE_KCAL: &str = "tdeeKcal";
    pub const ACTIVITY_MULTIPLIER: &str = "activityMultiplier";
    pub const DAILY_CALORIE_TARGET_KCAL: &str = "dailyCalorieTargetKcal";
    pub const PROTEIN_GRAMS: &str = "proteinGrams";
    pub const CARBS_GRAMS: &str = "carbsGrams";
    pub const FATS_GRAMS: &str = "fatsGrams";
    pub const PROTEIN_PCT: &str = "proteinPct";
    pub const CARB_PCT: &str = "carbPct";
    pub const FAT_PCT: &str = "fatPct";
}

/// Everything the engine derives from one profile
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionTargets {
    pub energy: EnergyEstimate,
    pub plan: CaloriePlan,
    pub micronutrients: Option<MicronutrientTargets>,
}

/// Run all three stages for a profile
pub fn compute_targets(profile: &UserProfile) -> NutritionTargets {
    let energy = estimate_energy(profile);
    let plan = plan_calories(
        energy.tdee_kcal,
        profile.goal,
        profile.weekly_rate_kg,
        profile.diet_preference,
    );
    let micronutrients = calculate_micronutrients(profile, plan.daily_calorie_target_kcal);

    NutritionTargets {
        energy,
        plan,
        micronutrients,
    }
}

impl NutritionTargets {
    pub fn is_complete(&self) -> bool {
        self.energy.is_complete() && self.plan.is_complete() && self.micronutrients.is_some()
    }

    /// Flatten into key/value fields
    pub fn to_fields(&self) -> BTreeMap<String, f64> {
        let mut fields = BTreeMap::new();
        let mut put = |key: &str, value: f64| {
            fields.insert(key.to_string(), value);
        };

        put(keys::BMR_KCAL, self.energy.bmr_kcal as f64);
        put(keys::TDEE_KCAL, self.energy.tdee_kcal as f64);
        if let Some(multiplier) = self.energy.activity_multiplier {
            put(keys::ACTIVITY_MULTIPLIER, multiplier);
        }

        put(
            keys::DAILY_CALORIE_TARGET_KCAL,
            self.plan.daily_calorie_target_kcal as f64,
        );
        put(keys::PROTEIN_GRAMS, self.plan.macros_grams.protein as f64);
        put(keys::CARBS_GRAMS, self.plan.macros_grams.carbs as f64);
        put(keys::FATS_GRAMS, self.plan.macros_grams.fats as f64);
        put(keys::PROTEIN_PCT, self.plan.macro_split.protein_pct);
        put(keys::CARB_PCT, self.plan.macro_split.carb_pct);
        put(keys::FAT_PCT, self.plan.macro_split.fat_pct);

        if let Some(micros) = &self.micronutrients {
            for (nutrient, value) in micros.iter() {
                put(nutrient.key(), value);
            }
        }

        fields
    }

    /// Rebuild targets from stored fields
    ///
    /// Unknown keys are ignored. Micronutrients are read back only when
    /// every nutrient key is present; a partial set is an error.
    pub fn from_fields(fields: &BTreeMap<String, f64>) -> Result<Self, SnapshotError> {
        let energy = EnergyEstimate {
            bmr_kcal: whole(fields, keys::BMR_KCAL)?,
            tdee_kcal: whole(fields, keys::TDEE_KCAL)?,
            activity_multiplier: optional(fields, keys::ACTIVITY_MULTIPLIER)?,
        };

        let plan = CaloriePlan {
            daily_calorie_target_kcal: whole(fields, keys::DAILY_CALORIE_TARGET_KCAL)?,
            macros_grams: MacroGrams {
                protein: whole(fields, keys::PROTEIN_GRAMS)?,
                carbs: whole(fields, keys::CARBS_GRAMS)?,
                fats: whole(fields, keys::FATS_GRAMS)?,
            },
            macro_split: MacroSplit::new(
                optional(fields, keys::PROTEIN_PCT)?.unwrap_or(0.0),
                optional(fields, keys::CARB_PCT)?.unwrap_or(0.0),
                optional(fields, keys::FAT_PCT)?.unwrap_or(0.0),
            ),
        };

        let stored = Nutrient::ALL
            .iter()
            .filter(|n| fields.contains_key(n.key()))
            .count();
        let micronutrients = if stored == 0 {
            None
        } else {
            let targets = Nutrient::ALL
                .iter()
                .map(|n| Ok((*n, required(fields, n.key())?)))
                .collect::<Result<MicronutrientTargets, SnapshotError>>()?;
            Some(targets)
        };

        Ok(Self {
            energy,
            plan,
            micronutrients,
        })
    }
}

fn optional(fields: &BTreeMap<String, f64>, key: &str) -> Result<Option<f64>, SnapshotError> {
    match fields.get(key) {
        None => Ok(None),
        Some(&value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        Some(&value) => Err(SnapshotError::InvalidValue {
            field: key.to_string(),
            value,
        }),
    }
}

fn required(fields: &BTreeMap<String, f64>, key: &str) -> Result<f64, SnapshotError> {
    optional(fields, key)?.ok_or_else(|| SnapshotError::MissingField(key.to_string()))
}

fn whole(fields: &BTreeMap<String, f64>, key: &str) -> Result<u32, SnapshotError> {
    let value = required(fields, key)?;
    if value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(SnapshotError::InvalidValue {
            field: key.to_string(),
            value,
        });
    }
    Ok(value as u32)
}
