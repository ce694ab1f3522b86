//! Profile-wide adjustment passes
//!
//! These run after every per-nutrient rule, deficiency history first and
//! diet preference second.

use super::{Adjustment, Nutrient, Op};
use crate::profile::{Deficiency, DietPreference, UserProfile};
use std::collections::BTreeMap;

/// Multiplier applied to a nutrient after a past deficiency
const DEFICIENCY_MULTIPLIERS: [(Deficiency, Nutrient, f64); 7] = [
    (Deficiency::Iron, Nutrient::Iron, 1.5),
    (Deficiency::VitaminD, Nutrient::VitaminD, 1.5),
    (Deficiency::VitaminB12, Nutrient::VitaminB12, 1.5),
    (Deficiency::Calcium, Nutrient::Calcium, 1.2),
    (Deficiency::Folate, Nutrient::VitaminB9, 1.3),
    (Deficiency::Magnesium, Nutrient::Magnesium, 1.2),
    (Deficiency::Zinc, Nutrient::Zinc, 1.3),
];

fn diet_addends(diet: DietPreference) -> &'static [(Nutrient, f64)] {
    match diet {
        DietPreference::Keto => &[
            (Nutrient::Magnesium, 50.0),
            (Nutrient::Potassium, 500.0),
            (Nutrient::Sodium, 500.0),
        ],
        DietPreference::Paleo => &[(Nutrient::Calcium, 50.0)],
        DietPreference::Mediterranean => &[(Nutrient::VitaminD, 5.0)],
        DietPreference::LowCarb => &[(Nutrient::Magnesium, 30.0), (Nutrient::Potassium, 300.0)],
        DietPreference::HighProtein => &[(Nutrient::Calcium, 100.0), (Nutrient::VitaminB6, 0.3)],
        DietPreference::Balanced
        | DietPreference::LowFat
        | DietPreference::Vegan
        | DietPreference::Vegetarian => &[],
    }
}

fn apply(
    values: &mut BTreeMap<Nutrient, f64>,
    nutrient: Nutrient,
    op: Op,
    reason: &'static str,
    trail: &mut Vec<Adjustment>,
) {
    if let Some(value) = values.get_mut(&nutrient) {
        let before = *value;
        *value = op.apply(before);
        trail.push(Adjustment {
            nutrient,
            reason,
            op,
            before,
            after: *value,
        });
    }
}

pub(super) fn apply_deficiency_history(
    profile: &UserProfile,
    values: &mut BTreeMap<Nutrient, f64>,
    trail: &mut Vec<Adjustment>,
) {
    for (deficiency, nutrient, factor) in DEFICIENCY_MULTIPLIERS {
        if profile.previous_deficiencies.contains(&deficiency) {
            apply(values, nutrient, Op::Multiply(factor), deficiency.label(), trail);
        }
    }
}

pub(super) fn apply_diet_preference(
    profile: &UserProfile,
    values: &mut BTreeMap<Nutrient, f64>,
    trail: &mut Vec<Adjustment>,
) {
    let Some(diet) = profile.diet_preference else {
        return;
    };
    for &(nutrient, amount) in diet_addends(diet) {
        apply(values, nutrient, Op::Add(amount), "diet preference", trail);
    }
}
