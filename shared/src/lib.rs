//! Nutrition Planner Shared Library
//!
//! The personalized target engine (energy estimation, calorie and macro
//! planning, micronutrient requirements) plus the types and validators
//! shared by the backend and WASM modules.

pub mod energy;
pub mod errors;
pub mod intake;
pub mod micronutrients;
pub mod pipeline;
pub mod planner;
pub mod profile;
pub mod types;
pub mod units;
pub mod validation;

// Re-export commonly used items
pub use energy::{calculate_bmr_mifflin, estimate_energy, EnergyEstimate};
pub use errors::*;
pub use intake::{daily_report, daily_report_in, IntakeEntry, IntakeReport, TargetProgress};
pub use micronutrients::{
    calculate_micronutrients, explain_micronutrients, MicronutrientTargets, Nutrient,
};
pub use pipeline::{compute_targets, NutritionTargets};
pub use planner::{plan_calories, CaloriePlan, MacroGrams, MacroSplit};
pub use profile::*;
pub use types::*;
pub use units::*;
