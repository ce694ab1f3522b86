//! Micronutrient requirement calculator
//!
//! Third stage of the target engine. Every nutrient starts from a
//! reference intake and is walked through its own ordered list of
//! adjustment steps (see [`rules`]), followed by two profile-wide passes
//! for deficiency history and diet preference (see [`passes`]). Values are
//! clamped at zero and rounded to one decimal only at the very end.

mod passes;
mod rules;

use crate::profile::{Gender, UserProfile};
use crate::units::NutrientUnit;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use rules::Op;

// ============================================================================
// Nutrient catalogue
// ============================================================================

/// Micronutrients with a daily target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Nutrient {
    VitaminA,
    VitaminD,
    VitaminE,
    VitaminK,
    VitaminC,
    VitaminB1,
    VitaminB2,
    VitaminB3,
    VitaminB5,
    VitaminB6,
    VitaminB9,
    VitaminB12,
    Calcium,
    Iron,
    Magnesium,
    Phosphorus,
    Potassium,
    Sodium,
    Zinc,
    Selenium,
    Copper,
    Manganese,
}

impl Nutrient {
    pub const ALL: [Nutrient; 22] = [
        Nutrient::VitaminA,
        Nutrient::VitaminD,
        Nutrient::VitaminE,
        Nutrient::VitaminK,
        Nutrient::VitaminC,
        Nutrient::VitaminB1,
        Nutrient::VitaminB2,
        Nutrient::VitaminB3,
        Nutrient::VitaminB5,
        Nutrient::VitaminB6,
        Nutrient::VitaminB9,
        Nutrient::VitaminB12,
        Nutrient::Calcium,
        Nutrient::Iron,
        Nutrient::Magnesium,
        Nutrient::Phosphorus,
        Nutrient::Potassium,
        Nutrient::Sodium,
        Nutrient::Zinc,
        Nutrient::Selenium,
        Nutrient::Copper,
        Nutrient::Manganese,
    ];

    /// Wire key, also used for stored snapshot fields
    pub fn key(&self) -> &'static str {
        match self {
            Nutrient::VitaminA => "vitaminA",
            Nutrient::VitaminD => "vitaminD",
            Nutrient::VitaminE => "vitaminE",
            Nutrient::VitaminK => "vitaminK",
            Nutrient::VitaminC => "vitaminC",
            Nutrient::VitaminB1 => "vitaminB1",
            Nutrient::VitaminB2 => "vitaminB2",
            Nutrient::VitaminB3 => "vitaminB3",
            Nutrient::VitaminB5 => "vitaminB5",
            Nutrient::VitaminB6 => "vitaminB6",
            Nutrient::VitaminB9 => "vitaminB9",
            Nutrient::VitaminB12 => "vitaminB12",
            Nutrient::Calcium => "calcium",
            Nutrient::Iron => "iron",
            Nutrient::Magnesium => "magnesium",
            Nutrient::Phosphorus => "phosphorus",
            Nutrient::Potassium => "potassium",
            Nutrient::Sodium => "sodium",
            Nutrient::Zinc => "zinc",
            Nutrient::Selenium => "selenium",
            Nutrient::Copper => "copper",
            Nutrient::Manganese => "manganese",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            Nutrient::VitaminA => "Vitamin A",
            Nutrient::VitaminD => "Vitamin D",
            Nutrient::VitaminE => "Vitamin E",
            Nutrient::VitaminK => "Vitamin K",
            Nutrient::VitaminC => "Vitamin C",
            Nutrient::VitaminB1 => "Thiamin (B1)",
            Nutrient::VitaminB2 => "Riboflavin (B2)",
            Nutrient::VitaminB3 => "Niacin (B3)",
            Nutrient::VitaminB5 => "Pantothenic acid (B5)",
            Nutrient::VitaminB6 => "Vitamin B6",
            Nutrient::VitaminB9 => "Folate (B9)",
            Nutrient::VitaminB12 => "Vitamin B12",
            Nutrient::Calcium => "Calcium",
            Nutrient::Iron => "Iron",
            Nutrient::Magnesium => "Magnesium",
            Nutrient::Phosphorus => "Phosphorus",
            Nutrient::Potassium => "Potassium",
            Nutrient::Sodium => "Sodium",
            Nutrient::Zinc => "Zinc",
            Nutrient::Selenium => "Selenium",
            Nutrient::Copper => "Copper",
            Nutrient::Manganese => "Manganese",
        }
    }

    pub fn unit(&self) -> NutrientUnit {
        match self {
            Nutrient::VitaminA
            | Nutrient::VitaminD
            | Nutrient::VitaminK
            | Nutrient::VitaminB12
            | Nutrient::Selenium
            | Nutrient::Copper => NutrientUnit::Mcg,
            Nutrient::VitaminB3 => NutrientUnit::MgNe,
            Nutrient::VitaminB9 => NutrientUnit::McgDfe,
            _ => NutrientUnit::Mg,
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Nutrient {
    type Err = crate::errors::ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Nutrient::ALL
            .iter()
            .copied()
            .find(|n| n.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::errors::ProfileError::UnknownValue {
                kind: "nutrient",
                value: s.to_string(),
            })
    }
}

// ============================================================================
// Targets
// ============================================================================

/// Daily micronutrient targets, one entry per [`Nutrient`]
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MicronutrientTargets(BTreeMap<Nutrient, f64>);

impl MicronutrientTargets {
    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        self.0.get(&nutrient).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Nutrient, f64)> + '_ {
        self.0.iter().map(|(n, v)| (*n, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(Nutrient, f64)> for MicronutrientTargets {
    fn from_iter<I: IntoIterator<Item = (Nutrient, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One adjustment that changed a nutrient value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub nutrient: Nutrient,
    pub reason: &'static str,
    pub op: Op,
    pub before: f64,
    pub after: f64,
}

/// Targets together with the adjustments that produced them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MicronutrientExplanation {
    pub targets: MicronutrientTargets,
    pub adjustments: Vec<Adjustment>,
}

/// Profile facts shared by every rule
pub(crate) struct RuleContext<'a> {
    pub profile: &'a UserProfile,
    pub gender: Gender,
    pub age: u32,
    pub calories: f64,
}

impl<'a> RuleContext<'a> {
    fn new(profile: &'a UserProfile, daily_calorie_target_kcal: u32) -> Option<Self> {
        if daily_calorie_target_kcal == 0 {
            return None;
        }
        Some(Self {
            profile,
            gender: profile.gender?,
            age: profile.age?,
            calories: daily_calorie_target_kcal as f64,
        })
    }

    pub fn is_male(&self) -> bool {
        self.gender == Gender::Male
    }

    pub fn is_female(&self) -> bool {
        self.gender == Gender::Female
    }

    /// Pick the male or female figure
    pub fn by_gender(&self, male: f64, female: f64) -> f64 {
        if self.is_male() {
            male
        } else {
            female
        }
    }

    pub fn weight_kg(&self) -> f64 {
        self.profile
            .current_weight_kg
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(0.0)
    }
}

fn round_one_decimal(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        (value * 10.0).round() / 10.0
    } else {
        0.0
    }
}

fn evaluate(ctx: &RuleContext<'_>, trail: &mut Vec<Adjustment>) -> MicronutrientTargets {
    let mut values: BTreeMap<Nutrient, f64> = rules::RULES
        .iter()
        .map(|rule| (rule.nutrient, rule.evaluate(ctx, trail)))
        .collect();

    passes::apply_deficiency_history(ctx.profile, &mut values, trail);
    passes::apply_diet_preference(ctx.profile, &mut values, trail);

    values
        .into_iter()
        .map(|(nutrient, value)| (nutrient, round_one_decimal(value)))
        .collect()
}

/// Compute daily micronutrient targets
///
/// Returns `None` when there is no calorie target yet or when gender or
/// age is unknown. Otherwise every nutrient in [`Nutrient::ALL`] has a
/// non-negative value.
pub fn calculate_micronutrients(
    profile: &UserProfile,
    daily_calorie_target_kcal: u32,
) -> Option<MicronutrientTargets> {
    let ctx = RuleContext::new(profile, daily_calorie_target_kcal)?;
    Some(evaluate(&ctx, &mut Vec::new()))
}

/// Same as [`calculate_micronutrients`], keeping every adjustment that fired
pub fn explain_micronutrients(
    profile: &UserProfile,
    daily_calorie_target_kcal: u32,
) -> Option<MicronutrientExplanation> {
    let ctx = RuleContext::new(profile, daily_calorie_target_kcal)?;
    let mut adjustments = Vec::new();
    let targets = evaluate(&ctx, &mut adjustments);
    Some(MicronutrientExplanation {
        targets,
        adjustments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{
        ActivityLevel, AlcoholFrequency, Deficiency, DietPreference, ExerciseType, PregnancyStatus,
    };
    use proptest::prelude::*;

    fn adult(gender: Gender) -> UserProfile {
        UserProfile {
            gender: Some(gender),
            age: Some(30),
            current_weight_kg: Some(80.0),
            height_cm: Some(180.0),
            ..Default::default()
        }
    }

    fn target(profile: &UserProfile, nutrient: Nutrient) -> f64 {
        calculate_micronutrients(profile, 2000)
            .and_then(|t| t.get(nutrient))
            .unwrap()
    }

    #[test]
    fn test_returns_none_without_prerequisites() {
        assert!(calculate_micronutrients(&adult(Gender::Male), 0).is_none());
        assert!(calculate_micronutrients(&UserProfile::default(), 2000).is_none());

        let mut no_age = adult(Gender::Female);
        no_age.age = None;
        assert!(calculate_micronutrients(&no_age, 2000).is_none());
    }

    #[test]
    fn test_every_nutrient_present() {
        let targets = calculate_micronutrients(&adult(Gender::Male), 2000).unwrap();
        assert_eq!(targets.len(), 22);
        for nutrient in Nutrient::ALL {
            assert!(targets.get(nutrient).is_some(), "{} missing", nutrient);
        }
    }

    #[test]
    fn test_pregnancy_overrides() {
        let profile = UserProfile {
            gender: Some(Gender::Female),
            age: Some(28),
            current_weight_kg: Some(65.0),
            height_cm: Some(165.0),
            pregnancy_status: Some(PregnancyStatus::Pregnant),
            ..Default::default()
        };
        assert_eq!(target(&profile, Nutrient::VitaminB9), 600.0);
        assert_eq!(target(&profile, Nutrient::Iron), 27.0);
        assert_eq!(target(&profile, Nutrient::VitaminA), 770.0);
    }

    #[test]
    fn test_pregnant_and_lactating_takes_lactation_value() {
        let profile = UserProfile {
            pregnancy_status: Some(PregnancyStatus::Both),
            ..adult(Gender::Female)
        };
        assert_eq!(target(&profile, Nutrient::VitaminA), 1300.0);
        assert_eq!(target(&profile, Nutrient::Iron), 9.0);
        assert_eq!(target(&profile, Nutrient::VitaminB9), 500.0);
    }

    #[test]
    fn test_deficiency_compounding() {
        let mut profile = adult(Gender::Male);
        profile.previous_deficiencies.insert(Deficiency::Iron);
        assert_eq!(target(&profile, Nutrient::Iron), 12.0);

        profile.exercise_types.insert(ExerciseType::Cardio);
        assert_eq!(target(&profile, Nutrient::Iron), 16.5);
    }

    #[test]
    fn test_deficiency_pass_runs_before_diet_addends() {
        let profile = UserProfile {
            age: Some(45),
            diet_preference: Some(DietPreference::Keto),
            ..adult(Gender::Male)
        };
        let mut deficient = profile.clone();
        deficient.previous_deficiencies.insert(Deficiency::Magnesium);

        assert_eq!(target(&profile, Nutrient::Magnesium), 470.0);
        // 420 * 1.2 + 50
        assert_eq!(target(&deficient, Nutrient::Magnesium), 554.0);
    }

    #[test]
    fn test_calorie_scaled_b_vitamins() {
        let profile = adult(Gender::Male);
        assert_eq!(target(&profile, Nutrient::VitaminB1), 1.0);
        assert_eq!(target(&profile, Nutrient::VitaminB2), 1.1);
        assert_eq!(target(&profile, Nutrient::VitaminB3), 13.0);
    }

    #[test]
    fn test_explain_records_fired_steps() {
        let profile = UserProfile {
            alcohol_frequency: Some(AlcoholFrequency::Daily),
            activity_level: Some(ActivityLevel::ExtraActive),
            ..adult(Gender::Male)
        };
        let explanation = explain_micronutrients(&profile, 2000).unwrap();
        assert_eq!(
            explanation.targets,
            calculate_micronutrients(&profile, 2000).unwrap()
        );
        assert!(explanation
            .adjustments
            .iter()
            .any(|a| a.nutrient == Nutrient::VitaminB1 && a.op == Op::Multiply(1.3)));
        assert!(explanation
            .adjustments
            .iter()
            .any(|a| a.nutrient == Nutrient::Sodium && a.after == 2000.0));
        assert!(!explanation
            .adjustments
            .iter()
            .any(|a| a.nutrient == Nutrient::Phosphorus));
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let targets = calculate_micronutrients(&adult(Gender::Female), 1800).unwrap();
        let json = serde_json::to_value(&targets).unwrap();
        assert_eq!(json["vitaminB12"], 2.4);
        assert_eq!(json["vitaminA"], 700.0);
        let back: MicronutrientTargets = serde_json::from_value(json).unwrap();
        assert_eq!(back, targets);
    }

    #[test]
    fn test_nutrient_units() {
        assert_eq!(Nutrient::VitaminA.unit(), NutrientUnit::Mcg);
        assert_eq!(Nutrient::VitaminB3.unit(), NutrientUnit::MgNe);
        assert_eq!(Nutrient::VitaminB9.unit(), NutrientUnit::McgDfe);
        assert_eq!(Nutrient::Iron.unit(), NutrientUnit::Mg);
        assert_eq!("VITAMINB12".parse::<Nutrient>().unwrap(), Nutrient::VitaminB12);
        assert!("vitaminZ".parse::<Nutrient>().is_err());
    }

    fn arb_profile() -> impl Strategy<Value = UserProfile> {
        (
            any::<bool>(),
            13u32..=100,
            prop::option::of(20.0f64..200.0),
            0usize..4,
            0usize..9,
            prop::collection::btree_set(0usize..7, 0..4),
            0usize..5,
            prop::option::of(0.0f64..14.0),
        )
            .prop_map(|(male, age, weight, preg, diet, defs, alcohol, sleep)| {
                let pregnancy = [
                    PregnancyStatus::None,
                    PregnancyStatus::Pregnant,
                    PregnancyStatus::Lactating,
                    PregnancyStatus::Both,
                ];
                let alcohol_levels = [
                    AlcoholFrequency::Never,
                    AlcoholFrequency::Rarely,
                    AlcoholFrequency::Occasionally,
                    AlcoholFrequency::Regularly,
                    AlcoholFrequency::Daily,
                ];
                UserProfile {
                    gender: Some(if male { Gender::Male } else { Gender::Female }),
                    age: Some(age),
                    current_weight_kg: weight,
                    pregnancy_status: Some(pregnancy[preg]),
                    diet_preference: Some(DietPreference::ALL[diet]),
                    previous_deficiencies: defs.into_iter().map(|i| Deficiency::ALL[i]).collect(),
                    alcohol_frequency: Some(alcohol_levels[alcohol]),
                    sleep_hours: sleep,
                    ..Default::default()
                }
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: every target is non-negative and has one decimal at most
        #[test]
        fn prop_targets_non_negative(profile in arb_profile(), kcal in 1u32..6000) {
            let targets = calculate_micronutrients(&profile, kcal).unwrap();
            prop_assert_eq!(targets.len(), 22);
            for (nutrient, value) in targets.iter() {
                prop_assert!(value >= 0.0, "{} was {}", nutrient, value);
                prop_assert!(((value * 10.0).round() - value * 10.0).abs() < 1e-6);
            }
        }

        /// Property: same profile, same targets
        #[test]
        fn prop_idempotent(profile in arb_profile(), kcal in 1u32..6000) {
            prop_assert_eq!(
                calculate_micronutrients(&profile, kcal),
                calculate_micronutrients(&profile, kcal)
            );
        }
    }
}
