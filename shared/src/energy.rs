//! Energy estimation
//!
//! First stage of the target engine: Basal Metabolic Rate from body stats,
//! then Total Daily Energy Expenditure from the activity multiplier.
//!
//! Missing inputs never fail the call. They produce a zeroed
//! [`EnergyEstimate`], which callers treat as "not yet computable".

use crate::profile::{Gender, UserProfile};
use serde::{Deserialize, Serialize};

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Women: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Round to the nearest non-negative integer
pub(crate) fn round_non_negative(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

/// Output of the energy stage
///
/// Both figures are 0 when the profile lacks the fields they need.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyEstimate {
    pub bmr_kcal: u32,
    pub tdee_kcal: u32,
    /// Multiplier applied to the BMR, absent until an activity level is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_multiplier: Option<f64>,
}

impl EnergyEstimate {
    pub fn is_complete(&self) -> bool {
        self.bmr_kcal > 0 && self.tdee_kcal > 0
    }
}

/// Estimate BMR and TDEE for a profile
///
/// Requires gender, age, weight and height (positive). Without an activity
/// level the BMR is still reported but TDEE stays 0.
pub fn estimate_energy(profile: &UserProfile) -> EnergyEstimate {
    let (Some(gender), Some(age), Some(weight_kg), Some(height_cm)) = (
        profile.gender,
        profile.age,
        profile.current_weight_kg,
        profile.height_cm,
    ) else {
        return EnergyEstimate::default();
    };

    if age == 0 || !(weight_kg > 0.0) || !(height_cm > 0.0) {
        return EnergyEstimate::default();
    }

    let bmr_kcal = round_non_negative(calculate_bmr_mifflin(weight_kg, height_cm, age, gender));

    match profile.activity_level {
        Some(level) => EnergyEstimate {
            bmr_kcal,
            tdee_kcal: round_non_negative(bmr_kcal as f64 * level.multiplier()),
            activity_multiplier: Some(level.multiplier()),
        },
        None => EnergyEstimate {
            bmr_kcal,
            tdee_kcal: 0,
            activity_multiplier: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ActivityLevel;
    use proptest::prelude::*;
    use rstest::rstest;

    fn profile(gender: Gender, activity: Option<ActivityLevel>) -> UserProfile {
        UserProfile {
            gender: Some(gender),
            age: Some(30),
            current_weight_kg: Some(80.0),
            height_cm: Some(180.0),
            activity_level: activity,
            ..Default::default()
        }
    }

    // =========================================================================
    // BMR Tests
    // =========================================================================

    #[test]
    fn test_bmr_mifflin_exact() {
        // 800 + 1125 - 150 + 5
        assert_eq!(calculate_bmr_mifflin(80.0, 180.0, 30, Gender::Male), 1780.0);
        // 800 + 1125 - 150 - 161
        assert_eq!(calculate_bmr_mifflin(80.0, 180.0, 30, Gender::Female), 1614.0);
    }

    #[test]
    fn test_estimate_energy_bmr() {
        let male = estimate_energy(&profile(Gender::Male, None));
        assert_eq!(male.bmr_kcal, 1780);
        let female = estimate_energy(&profile(Gender::Female, None));
        assert_eq!(female.bmr_kcal, 1614);
    }

    #[rstest]
    #[case(ActivityLevel::Sedentary, 2136)]
    #[case(ActivityLevel::LightlyActive, 2448)]
    #[case(ActivityLevel::ModeratelyActive, 2759)]
    #[case(ActivityLevel::VeryActive, 3071)]
    #[case(ActivityLevel::ExtraActive, 3382)]
    fn test_tdee_per_activity_level(#[case] level: ActivityLevel, #[case] expected: u32) {
        let estimate = estimate_energy(&profile(Gender::Male, Some(level)));
        assert_eq!(estimate.bmr_kcal, 1780);
        assert_eq!(estimate.tdee_kcal, expected);
        assert_eq!(estimate.activity_multiplier, Some(level.multiplier()));
        assert!(estimate.is_complete());
    }

    #[test]
    fn test_missing_activity_level_zeroes_tdee() {
        let estimate = estimate_energy(&profile(Gender::Male, None));
        assert_eq!(estimate.bmr_kcal, 1780);
        assert_eq!(estimate.tdee_kcal, 0);
        assert!(!estimate.is_complete());
    }

    #[test]
    fn test_empty_profile_is_incomplete() {
        let estimate = estimate_energy(&UserProfile::default());
        assert_eq!(estimate, EnergyEstimate::default());
        assert_eq!(estimate.bmr_kcal, 0);
        assert_eq!(estimate.tdee_kcal, 0);
    }

    #[test]
    fn test_each_required_field_is_checked() {
        let full = profile(Gender::Female, Some(ActivityLevel::Sedentary));

        let mut p = full.clone();
        p.gender = None;
        assert_eq!(estimate_energy(&p).bmr_kcal, 0);

        let mut p = full.clone();
        p.age = None;
        assert_eq!(estimate_energy(&p).bmr_kcal, 0);

        let mut p = full.clone();
        p.height_cm = Some(0.0);
        assert_eq!(estimate_energy(&p).bmr_kcal, 0);

        let mut p = full;
        p.current_weight_kg = Some(f64::NAN);
        assert_eq!(estimate_energy(&p).bmr_kcal, 0);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: Male BMR > Female BMR (same stats)
        #[test]
        fn prop_male_bmr_higher(
            weight in 40.0f64..150.0,
            height in 140.0f64..210.0,
            age in 13u32..=100
        ) {
            let male = calculate_bmr_mifflin(weight, height, age, Gender::Male);
            let female = calculate_bmr_mifflin(weight, height, age, Gender::Female);
            prop_assert!(male > female);
        }

        /// Property: TDEE is the rounded BMR times the multiplier
        #[test]
        fn prop_tdee_matches_multiplier(
            weight in 40.0f64..150.0,
            height in 140.0f64..210.0,
            age in 13u32..=100,
            level_idx in 0usize..5
        ) {
            let level = ActivityLevel::ALL[level_idx];
            let p = UserProfile {
                gender: Some(Gender::Female),
                age: Some(age),
                current_weight_kg: Some(weight),
                height_cm: Some(height),
                activity_level: Some(level),
                ..Default::default()
            };
            let estimate = estimate_energy(&p);
            let expected = (estimate.bmr_kcal as f64 * level.multiplier()).round() as u32;
            prop_assert_eq!(estimate.tdee_kcal, expected);
            prop_assert!(estimate.tdee_kcal >= estimate.bmr_kcal);
        }

        /// Property: repeated calls give identical results
        #[test]
        fn prop_estimate_is_idempotent(weight in 40.0f64..150.0, age in 13u32..=100) {
            let p = UserProfile {
                gender: Some(Gender::Male),
                age: Some(age),
                current_weight_kg: Some(weight),
                height_cm: Some(175.0),
                activity_level: Some(ActivityLevel::ModeratelyActive),
                ..Default::default()
            };
            prop_assert_eq!(estimate_energy(&p), estimate_energy(&p));
        }
    }
}
