//! User profile model
//!
//! The profile is filled in incrementally by the onboarding flow, so every
//! attribute is optional. Each stage of the target engine checks the fields
//! it needs on entry and returns an "incomplete" sentinel instead of failing.
//!
//! Free-text lists from the original forms (medications, conditions,
//! exercise types, deficiency history) are closed vocabularies here. Their
//! canonical labels are part of the wire contract.

use crate::errors::ProfileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Physiology
// ============================================================================

/// Biological sex used by the physiological formulas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    VeryActive,
    /// Very hard exercise, physical job
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
            ActivityLevel::ExtraActive => 1.9,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little or no exercise",
            ActivityLevel::LightlyActive => "Light exercise 1-3 days/week",
            ActivityLevel::ModeratelyActive => "Moderate exercise 3-5 days/week",
            ActivityLevel::VeryActive => "Hard exercise 6-7 days/week",
            ActivityLevel::ExtraActive => "Very hard exercise or physical job",
        }
    }

    /// Very or extra active; several micronutrient rules key on this
    pub fn is_very_active(&self) -> bool {
        matches!(self, ActivityLevel::VeryActive | ActivityLevel::ExtraActive)
    }
}

/// Body-weight goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    WeightLoss,
    ImprovedHealth,
    WeightGain,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::WeightLoss, Goal::ImprovedHealth, Goal::WeightGain];

    /// Whether the goal moves body weight (and so skews the macro split)
    pub fn changes_weight(&self) -> bool {
        matches!(self, Goal::WeightLoss | Goal::WeightGain)
    }
}

/// Diet pattern selected during onboarding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DietPreference {
    #[default]
    Balanced,
    Keto,
    LowCarb,
    HighProtein,
    LowFat,
    Mediterranean,
    Paleo,
    Vegan,
    Vegetarian,
}

impl DietPreference {
    pub const ALL: [DietPreference; 9] = [
        DietPreference::Balanced,
        DietPreference::Keto,
        DietPreference::LowCarb,
        DietPreference::HighProtein,
        DietPreference::LowFat,
        DietPreference::Mediterranean,
        DietPreference::Paleo,
        DietPreference::Vegan,
        DietPreference::Vegetarian,
    ];

    pub fn is_plant_based(&self) -> bool {
        matches!(self, DietPreference::Vegan | DietPreference::Vegetarian)
    }
}

// ============================================================================
// Lifestyle
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PregnancyStatus {
    #[default]
    None,
    Pregnant,
    Lactating,
    /// Pregnant while still breastfeeding a previous child
    Both,
}

impl PregnancyStatus {
    pub fn is_pregnant(&self) -> bool {
        matches!(self, PregnancyStatus::Pregnant | PregnancyStatus::Both)
    }

    pub fn is_lactating(&self) -> bool {
        matches!(self, PregnancyStatus::Lactating | PregnancyStatus::Both)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenstrualCycle {
    Normal,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlcoholFrequency {
    Never,
    Rarely,
    Occasionally,
    Regularly,
    Daily,
}

impl AlcoholFrequency {
    /// Regular or daily drinking
    pub fn is_regular(&self) -> bool {
        matches!(self, AlcoholFrequency::Regularly | AlcoholFrequency::Daily)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaffeineIntake {
    None,
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunExposure {
    Minimal,
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    Tropical,
    Dry,
    Temperate,
    Cold,
    #[serde(alias = "very_cold")]
    Polar,
    HotHumid,
    HotDry,
}

impl Climate {
    pub fn is_hot(&self) -> bool {
        matches!(self, Climate::Tropical | Climate::HotHumid | Climate::HotDry)
    }

    pub fn is_cold(&self) -> bool {
        matches!(self, Climate::Cold | Climate::Polar)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinTone {
    Fair,
    Light,
    Medium,
    Olive,
    Brown,
    Dark,
    VeryDark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StressLevel {
    Low,
    Moderate,
    High,
    Severe,
}

// ============================================================================
// Closed vocabularies
// ============================================================================

/// Medications that change micronutrient requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Medication {
    BirthControlPills,
    AntacidsPpis,
    Metformin,
    Diuretics,
    Statins,
    BloodThinners,
    Antidepressants,
    ThyroidMedication,
}

impl Medication {
    pub const ALL: [Medication; 8] = [
        Medication::BirthControlPills,
        Medication::AntacidsPpis,
        Medication::Metformin,
        Medication::Diuretics,
        Medication::Statins,
        Medication::BloodThinners,
        Medication::Antidepressants,
        Medication::ThyroidMedication,
    ];

    /// Canonical label, as shown in the onboarding form
    pub fn label(&self) -> &'static str {
        match self {
            Medication::BirthControlPills => "Birth control pills",
            Medication::AntacidsPpis => "Antacids/PPIs",
            Medication::Metformin => "Metformin",
            Medication::Diuretics => "Diuretics",
            Medication::Statins => "Statins",
            Medication::BloodThinners => "Blood thinners",
            Medication::Antidepressants => "Antidepressants",
            Medication::ThyroidMedication => "Thyroid medication",
        }
    }
}

/// Health conditions that change micronutrient requirements
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HealthCondition {
    Diabetes,
    Hypertension,
    HeartDisease,
    HighCholesterol,
    FattyLiver,
    LiverDisease,
    ThyroidDisorder,
    KidneyDisease,
    DigestiveDisorder,
}

impl HealthCondition {
    pub const ALL: [HealthCondition; 9] = [
        HealthCondition::Diabetes,
        HealthCondition::Hypertension,
        HealthCondition::HeartDisease,
        HealthCondition::HighCholesterol,
        HealthCondition::FattyLiver,
        HealthCondition::LiverDisease,
        HealthCondition::ThyroidDisorder,
        HealthCondition::KidneyDisease,
        HealthCondition::DigestiveDisorder,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HealthCondition::Diabetes => "Diabetes",
            HealthCondition::Hypertension => "Hypertension",
            HealthCondition::HeartDisease => "Heart disease",
            HealthCondition::HighCholesterol => "High cholesterol",
            HealthCondition::FattyLiver => "Fatty liver",
            HealthCondition::LiverDisease => "Liver disease",
            HealthCondition::ThyroidDisorder => "Thyroid disorder",
            HealthCondition::KidneyDisease => "Kidney disease",
            HealthCondition::DigestiveDisorder => "Digestive disorder",
        }
    }

    pub fn is_cardiovascular(&self) -> bool {
        matches!(
            self,
            HealthCondition::HeartDisease
                | HealthCondition::HighCholesterol
                | HealthCondition::Hypertension
        )
    }

    pub fn is_liver(&self) -> bool {
        matches!(self, HealthCondition::FattyLiver | HealthCondition::LiverDisease)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ExerciseType {
    Cardio,
    Strength,
    Hiit,
    Sports,
    Yoga,
    Pilates,
    Walking,
}

impl ExerciseType {
    pub const ALL: [ExerciseType; 7] = [
        ExerciseType::Cardio,
        ExerciseType::Strength,
        ExerciseType::Hiit,
        ExerciseType::Sports,
        ExerciseType::Yoga,
        ExerciseType::Pilates,
        ExerciseType::Walking,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ExerciseType::Cardio => "cardio",
            ExerciseType::Strength => "strength",
            ExerciseType::Hiit => "hiit",
            ExerciseType::Sports => "sports",
            ExerciseType::Yoga => "yoga",
            ExerciseType::Pilates => "pilates",
            ExerciseType::Walking => "walking",
        }
    }

    /// Training that raises niacin turnover
    pub fn is_vigorous(&self) -> bool {
        matches!(
            self,
            ExerciseType::Strength | ExerciseType::Hiit | ExerciseType::Cardio | ExerciseType::Sports
        )
    }
}

/// Previously diagnosed deficiencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Deficiency {
    Iron,
    VitaminD,
    VitaminB12,
    Calcium,
    Folate,
    Magnesium,
    Zinc,
}

impl Deficiency {
    pub const ALL: [Deficiency; 7] = [
        Deficiency::Iron,
        Deficiency::VitaminD,
        Deficiency::VitaminB12,
        Deficiency::Calcium,
        Deficiency::Folate,
        Deficiency::Magnesium,
        Deficiency::Zinc,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Deficiency::Iron => "Iron (Anemia)",
            Deficiency::VitaminD => "Vitamin D",
            Deficiency::VitaminB12 => "Vitamin B12",
            Deficiency::Calcium => "Calcium",
            Deficiency::Folate => "Folate (B9)",
            Deficiency::Magnesium => "Magnesium",
            Deficiency::Zinc => "Zinc",
        }
    }

    /// Short names also accepted on input
    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Deficiency::Iron => &["iron", "anemia"],
            Deficiency::VitaminD => &["vitamind", "vitamin_d"],
            Deficiency::VitaminB12 => &["vitaminb12", "vitamin_b12", "b12"],
            Deficiency::Calcium => &[],
            Deficiency::Folate => &["folate", "vitaminb9", "vitamin_b9", "vitamin b9"],
            Deficiency::Magnesium => &[],
            Deficiency::Zinc => &[],
        }
    }
}

/// Implements `Display`, `FromStr` and the serde string conversions for a
/// closed vocabulary with a `label()` and an `ALL` list.
macro_rules! vocabulary {
    ($ty:ident, $kind:literal, |$v:ident, $s:ident| $extra:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $ty {
            type Err = ProfileError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|$v| {
                        let $s = trimmed;
                        $v.label().eq_ignore_ascii_case($s) || $extra
                    })
                    .ok_or_else(|| ProfileError::UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }

        impl TryFrom<String> for $ty {
            type Error = ProfileError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> Self {
                value.label().to_string()
            }
        }
    };
}

vocabulary!(Medication, "medication", |_m, _s| false);
vocabulary!(HealthCondition, "health condition", |_c, _s| false);
vocabulary!(ExerciseType, "exercise type", |_e, _s| false);
vocabulary!(Deficiency, "deficiency", |d, s| d
    .aliases()
    .iter()
    .any(|alias| alias.eq_ignore_ascii_case(s)));

// ============================================================================
// Profile
// ============================================================================

/// Everything the target engine knows about a user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    /// Age in whole years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<Goal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diet_preference: Option<DietPreference>,
    /// Desired magnitude of weekly weight change in kg
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
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<StressLevel>,

    pub medications: BTreeSet<Medication>,
    pub previous_deficiencies: BTreeSet<Deficiency>,
    pub exercise_types: BTreeSet<ExerciseType>,
    pub health_conditions: BTreeSet<HealthCondition>,
}

/// Fields the full pipeline cannot do without, in onboarding order
pub const REQUIRED_FIELDS: &[&str] = &[
    "gender",
    "age",
    "height_cm",
    "current_weight_kg",
    "activity_level",
    "goal",
];

impl UserProfile {
    pub fn pregnancy(&self) -> PregnancyStatus {
        self.pregnancy_status.unwrap_or_default()
    }

    pub fn is_pregnant(&self) -> bool {
        self.pregnancy().is_pregnant()
    }

    pub fn is_lactating(&self) -> bool {
        self.pregnancy().is_lactating()
    }

    pub fn is_very_active(&self) -> bool {
        self.activity_level.is_some_and(|level| level.is_very_active())
    }

    pub fn is_plant_based(&self) -> bool {
        self.diet_preference.is_some_and(|diet| diet.is_plant_based())
    }

    pub fn drinks_regularly(&self) -> bool {
        self.alcohol_frequency.is_some_and(|freq| freq.is_regular())
    }

    pub fn lives_in_hot_climate(&self) -> bool {
        self.climate.is_some_and(|c| c.is_hot())
    }

    pub fn lives_in_cold_climate(&self) -> bool {
        self.climate.is_some_and(|c| c.is_cold())
    }

    pub fn takes(&self, medication: Medication) -> bool {
        self.medications.contains(&medication)
    }

    pub fn has_condition(&self, condition: HealthCondition) -> bool {
        self.health_conditions.contains(&condition)
    }

    pub fn does_exercise(&self, exercise: ExerciseType) -> bool {
        self.exercise_types.contains(&exercise)
    }

    /// Names of required fields that are still empty
    ///
    /// Non-positive body measurements count as missing, matching what the
    /// energy estimator accepts.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let present = [
            self.gender.is_some(),
            self.age.is_some_and(|a| a > 0),
            self.height_cm.is_some_and(|h| h > 0.0),
            self.current_weight_kg.is_some_and(|w| w > 0.0),
            self.activity_level.is_some(),
            self.goal.is_some(),
        ];
        REQUIRED_FIELDS
            .iter()
            .zip(present)
            .filter(|(_, ok)| !ok)
            .map(|(field, _)| *field)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_multipliers() {
        assert_eq!(ActivityLevel::Sedentary.multiplier(), 1.2);
        assert_eq!(ActivityLevel::LightlyActive.multiplier(), 1.375);
        assert_eq!(ActivityLevel::ModeratelyActive.multiplier(), 1.55);
        assert_eq!(ActivityLevel::VeryActive.multiplier(), 1.725);
        assert_eq!(ActivityLevel::ExtraActive.multiplier(), 1.9);
    }

    #[test]
    fn test_pregnancy_status_both_counts_twice() {
        assert!(PregnancyStatus::Both.is_pregnant());
        assert!(PregnancyStatus::Both.is_lactating());
        assert!(!PregnancyStatus::None.is_pregnant());
        assert!(!PregnancyStatus::Pregnant.is_lactating());
    }

    #[test]
    fn test_vocabulary_parsing() {
        assert_eq!(
            "Birth control pills".parse::<Medication>().unwrap(),
            Medication::BirthControlPills
        );
        assert_eq!("antacids/ppis".parse::<Medication>().unwrap(), Medication::AntacidsPpis);
        assert_eq!("Fatty liver".parse::<HealthCondition>().unwrap(), HealthCondition::FattyLiver);
        assert_eq!("HIIT".parse::<ExerciseType>().unwrap(), ExerciseType::Hiit);
        assert_eq!("Iron (Anemia)".parse::<Deficiency>().unwrap(), Deficiency::Iron);
        assert_eq!("vitaminB9".parse::<Deficiency>().unwrap(), Deficiency::Folate);

        let err = "Aspirin".parse::<Medication>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown medication: Aspirin");
    }

    #[test]
    fn test_vocabulary_labels_round_trip() {
        for m in Medication::ALL {
            assert_eq!(m.label().parse::<Medication>().unwrap(), m);
        }
        for c in HealthCondition::ALL {
            assert_eq!(c.label().parse::<HealthCondition>().unwrap(), c);
        }
        for d in Deficiency::ALL {
            assert_eq!(d.label().parse::<Deficiency>().unwrap(), d);
        }
    }

    #[test]
    fn test_profile_json_wire_format() {
        let json = r#"{
            "gender": "female",
            "age": 28,
            "currentWeightKg": 65.0,
            "pregnancyStatus": "pregnant",
            "climate": "very_cold",
            "medications": ["Antacids/PPIs"],
            "previousDeficiencies": ["Iron (Anemia)", "folate"],
            "exerciseTypes": ["cardio"]
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.gender, Some(Gender::Female));
        assert_eq!(profile.climate, Some(Climate::Polar));
        assert!(profile.takes(Medication::AntacidsPpis));
        assert!(profile.previous_deficiencies.contains(&Deficiency::Folate));
        assert!(profile.does_exercise(ExerciseType::Cardio));
        assert!(profile.is_pregnant());

        let out = serde_json::to_value(&profile).unwrap();
        assert_eq!(out["currentWeightKg"], 65.0);
        assert_eq!(out["previousDeficiencies"][0], "Iron (Anemia)");
        assert!(out.get("heightCm").is_none());
    }

    #[test]
    fn test_unknown_vocabulary_rejected_in_json() {
        let json = r#"{ "medications": ["Something else"] }"#;
        assert!(serde_json::from_str::<UserProfile>(json).is_err());
    }

    #[test]
    fn test_missing_fields() {
        let profile = UserProfile::default();
        assert_eq!(profile.missing_fields(), REQUIRED_FIELDS.to_vec());

        let profile = UserProfile {
            gender: Some(Gender::Male),
            age: Some(30),
            height_cm: Some(180.0),
            current_weight_kg: Some(0.0),
            activity_level: Some(ActivityLevel::Sedentary),
            goal: Some(Goal::ImprovedHealth),
            ..Default::default()
        };
        assert_eq!(profile.missing_fields(), vec!["current_weight_kg"]);
        assert!(!profile.is_complete());
    }
}
