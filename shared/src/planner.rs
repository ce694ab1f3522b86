//! Calorie and macro planning
//!
//! Second stage of the target engine. Turns TDEE, goal and weekly rate into
//! a daily calorie target, then splits the target into protein, carbohydrate
//! and fat grams using the diet pattern's percentage table.
//!
//! The order of the macro adjustments is fixed: diet table first, then the
//! goal skew, then renormalization with fat absorbing the remainder.

use crate::energy::round_non_negative;
use crate::profile::{DietPreference, Goal};
use serde::{Deserialize, Serialize};

/// Energy stored in one kilogram of body fat
pub const KCAL_PER_KG_BODY_FAT: f64 = 7700.0;
pub const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
pub const KCAL_PER_GRAM_CARBS: f64 = 4.0;
pub const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Protein share added (and carb share removed) for loss/gain goals
pub const GOAL_PROTEIN_SHIFT: f64 = 0.05;
/// Carbohydrate share never drops below this
pub const MIN_CARB_PCT: f64 = 0.05;

/// Fractions of daily calories assigned to each macro
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroSplit {
    pub protein_pct: f64,
    pub carb_pct: f64,
    pub fat_pct: f64,
}

impl MacroSplit {
    pub const fn new(protein_pct: f64, carb_pct: f64, fat_pct: f64) -> Self {
        Self {
            protein_pct,
            carb_pct,
            fat_pct,
        }
    }

    /// Base split for a diet pattern
    pub fn for_diet(diet: DietPreference) -> Self {
        match diet {
            DietPreference::Balanced => Self::new(0.30, 0.45, 0.25),
            DietPreference::Keto => Self::new(0.25, 0.05, 0.70),
            DietPreference::LowCarb => Self::new(0.30, 0.20, 0.50),
            DietPreference::HighProtein => Self::new(0.40, 0.35, 0.25),
            DietPreference::LowFat => Self::new(0.25, 0.60, 0.15),
            DietPreference::Mediterranean => Self::new(0.20, 0.50, 0.30),
            DietPreference::Paleo => Self::new(0.30, 0.30, 0.40),
            DietPreference::Vegan | DietPreference::Vegetarian => Self::new(0.20, 0.55, 0.25),
        }
    }

    /// Shift toward protein when the goal changes body weight
    pub fn skewed_for_goal(self, goal: Goal) -> Self {
        if !goal.changes_weight() {
            return self;
        }
        Self {
            protein_pct: self.protein_pct + GOAL_PROTEIN_SHIFT,
            carb_pct: (self.carb_pct - GOAL_PROTEIN_SHIFT).max(MIN_CARB_PCT),
            fat_pct: self.fat_pct,
        }
    }

    /// Make the shares sum to 1.0; protein and carbs are kept, fat absorbs
    /// the difference.
    pub fn renormalized(self) -> Self {
        let remainder = 1.0 - self.total();
        if remainder.abs() <= f64::EPSILON {
            return self;
        }
        Self {
            fat_pct: self.fat_pct + remainder,
            ..self
        }
    }

    pub fn total(&self) -> f64 {
        self.protein_pct + self.carb_pct + self.fat_pct
    }
}

/// Daily macro targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroGrams {
    pub protein: u32,
    pub carbs: u32,
    pub fats: u32,
}

impl MacroGrams {
    /// Convert a calorie target into grams for the given split
    pub fn from_split(target_kcal: u32, split: MacroSplit) -> Self {
        let target = target_kcal as f64;
        Self {
            protein: round_non_negative(target * split.protein_pct / KCAL_PER_GRAM_PROTEIN),
            carbs: round_non_negative(target * split.carb_pct / KCAL_PER_GRAM_CARBS),
            fats: round_non_negative(target * split.fat_pct / KCAL_PER_GRAM_FAT),
        }
    }

    /// Calories implied by the gram amounts
    pub fn kcal(&self) -> f64 {
        self.protein as f64 * KCAL_PER_GRAM_PROTEIN
            + self.carbs as f64 * KCAL_PER_GRAM_CARBS
            + self.fats as f64 * KCAL_PER_GRAM_FAT
    }
}

/// Output of the planning stage
///
/// An all-zero plan means TDEE or goal was not available yet.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaloriePlan {
    pub daily_calorie_target_kcal: u32,
    pub macros_grams: MacroGrams,
    pub macro_split: MacroSplit,
}

impl CaloriePlan {
    pub fn is_complete(&self) -> bool {
        self.daily_calorie_target_kcal > 0
    }
}

/// Daily kcal change needed to move `weekly_rate_kg` per week
pub fn daily_adjustment_kcal(weekly_rate_kg: f64) -> f64 {
    if !weekly_rate_kg.is_finite() {
        return 0.0;
    }
    weekly_rate_kg.abs() * KCAL_PER_KG_BODY_FAT / 7.0
}

/// Daily calorie target for a goal
pub fn calorie_target(tdee_kcal: u32, goal: Goal, weekly_rate_kg: f64) -> u32 {
    let tdee = tdee_kcal as f64;
    let adjustment = daily_adjustment_kcal(weekly_rate_kg);
    let target = match goal {
        Goal::WeightLoss => tdee - adjustment,
        Goal::WeightGain => tdee + adjustment,
        Goal::ImprovedHealth => tdee,
    };
    round_non_negative(target)
}

/// Plan daily calories and macros
///
/// `tdee_kcal` of 0 means the energy stage could not run yet. A missing
/// weekly rate counts as 0 and a missing diet preference as balanced.
pub fn plan_calories(
    tdee_kcal: u32,
    goal: Option<Goal>,
    weekly_rate_kg: Option<f64>,
    diet_preference: Option<DietPreference>,
) -> CaloriePlan {
    let Some(goal) = goal else {
        return CaloriePlan::default();
    };
    if tdee_kcal == 0 {
        return CaloriePlan::default();
    }

    let target = calorie_target(tdee_kcal, goal, weekly_rate_kg.unwrap_or(0.0));
    let split = MacroSplit::for_diet(diet_preference.unwrap_or_default())
        .skewed_for_goal(goal)
        .renormalized();

    CaloriePlan {
        daily_calorie_target_kcal: target,
        macros_grams: MacroGrams::from_split(target, split),
        macro_split: split,
    }
}
