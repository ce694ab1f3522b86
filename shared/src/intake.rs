//! Intake reporting
//!
//! Compares what a user logged for a day against their stored targets.

use crate::micronutrients::Nutrient;
use crate::pipeline::NutritionTargets;
use crate::units::EnergyUnit;
use crate::validation::{validate_intake_amount, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One logged food or supplement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_kcal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carbs_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fats_g: Option<f64>,
    /// Amounts in each nutrient's reference unit
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub nutrients: BTreeMap<Nutrient, f64>,
}

impl IntakeEntry {
    /// Reject negative or non-finite amounts
    pub fn validate(&self) -> Result<(), ValidationError> {
        let macros = [
            ("calories_kcal", self.calories_kcal),
            ("protein_g", self.protein_g),
            ("carbs_g", self.carbs_g),
            ("fats_g", self.fats_g),
        ];
        for (field, amount) in macros {
            if let Some(amount) = amount {
                validate_intake_amount(amount).map_err(|msg| ValidationError::new(field, &msg))?;
            }
        }
        for (nutrient, amount) in &self.nutrients {
            validate_intake_amount(*amount).map_err(|msg| {
                ValidationError::new("nutrients", &format!("{}: {}", nutrient.key(), msg))
            })?;
        }
        Ok(())
    }
}

/// Progress toward one daily target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetProgress {
    pub consumed: f64,
    pub target: f64,
    /// Unit of `consumed` and `target`
    pub unit: String,
    /// Absent when there is no target to measure against
    pub percent_of_target: Option<f64>,
}

impl TargetProgress {
    pub fn new(consumed: f64, target: f64, unit: &str) -> Self {
        Self {
            consumed,
            target,
            unit: unit.to_string(),
            percent_of_target: percent_of_target(consumed, target),
        }
    }

    /// Energy progress from kcal figures, reported in `unit`
    ///
    /// The percentage is taken on the kcal values so it does not depend on
    /// the reporting unit.
    pub fn energy(consumed_kcal: f64, target_kcal: f64, unit: EnergyUnit) -> Self {
        Self {
            consumed: unit.from_kcal(consumed_kcal),
            target: unit.from_kcal(target_kcal),
            unit: unit.abbreviation().to_string(),
            percent_of_target: percent_of_target(consumed_kcal, target_kcal),
        }
    }
}

/// `consumed / target * 100`, rounded to one decimal
pub fn percent_of_target(consumed: f64, target: f64) -> Option<f64> {
    if !(target.is_finite() && target > 0.0) || !consumed.is_finite() {
        return None;
    }
    Some((consumed / target * 1000.0).round() / 10.0)
}

/// Totals for a day of intake against the targets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeReport {
    pub entry_count: usize,
    pub calories: TargetProgress,
    pub protein: TargetProgress,
    pub carbs: TargetProgress,
    pub fats: TargetProgress,
    pub nutrients: BTreeMap<Nutrient, TargetProgress>,
}

/// Sum a day's entries and compare them with the targets, energy in kcal
pub fn daily_report(targets: &NutritionTargets, entries: &[IntakeEntry]) -> IntakeReport {
    daily_report_in(targets, entries, EnergyUnit::Kcal)
}

/// Same as [`daily_report`] with calories reported in `energy_unit`
pub fn daily_report_in(
    targets: &NutritionTargets,
    entries: &[IntakeEntry],
    energy_unit: EnergyUnit,
) -> IntakeReport {
    let sum = |pick: fn(&IntakeEntry) -> Option<f64>| -> f64 {
        entries.iter().filter_map(pick).sum()
    };

    let grams = targets.plan.macros_grams;
    let nutrients = Nutrient::ALL
        .iter()
        .map(|&nutrient| {
            let consumed: f64 = entries
                .iter()
                .filter_map(|e| e.nutrients.get(&nutrient))
                .sum();
            let target = targets
                .micronutrients
                .as_ref()
                .and_then(|m| m.get(nutrient))
                .unwrap_or(0.0);
            let unit = nutrient.unit().abbreviation();
            (nutrient, TargetProgress::new(consumed, target, unit))
        })
        .collect();

    IntakeReport {
        entry_count: entries.len(),
        calories: TargetProgress::energy(
            sum(|e| e.calories_kcal),
            targets.plan.daily_calorie_target_kcal as f64,
            energy_unit,
        ),
        protein: TargetProgress::new(sum(|e| e.protein_g), grams.protein as f64, "g"),
        carbs: TargetProgress::new(sum(|e| e.carbs_g), grams.carbs as f64, "g"),
        fats: TargetProgress::new(sum(|e| e.fats_g), grams.fats as f64, "g"),
        nutrients,
    }
}
