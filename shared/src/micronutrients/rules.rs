//! Per-nutrient requirement rules
//!
//! A rule is a base intake plus an ordered list of steps. Steps run in
//! table order and each one that applies transforms the running value.
//! Pregnancy and lactation overrides are `Set` steps placed first, with
//! lactation after pregnancy so it wins for "both".

use super::{Adjustment, Nutrient, RuleContext};
use crate::profile::{
    CaffeineIntake, ExerciseType, HealthCondition, Medication, MenstrualCycle, SkinTone,
    SmokingStatus, StressLevel, SunExposure,
};
use serde::Serialize;

/// How a step changes the running value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Op {
    Set(f64),
    Add(f64),
    Multiply(f64),
    /// Raise to at least this value
    Floor(f64),
}

impl Op {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Op::Set(v) => v,
            Op::Add(delta) => value + delta,
            Op::Multiply(factor) => value * factor,
            Op::Floor(min) => value.max(min),
        }
    }
}

type Predicate = fn(&RuleContext<'_>) -> bool;
type Base = fn(&RuleContext<'_>) -> f64;

pub(crate) struct Step {
    pub label: &'static str,
    pub applies: Predicate,
    pub op: Op,
}

pub(crate) struct NutrientRule {
    pub nutrient: Nutrient,
    pub base: Base,
    pub steps: &'static [Step],
}

impl NutrientRule {
    pub fn evaluate(&self, ctx: &RuleContext<'_>, trail: &mut Vec<Adjustment>) -> f64 {
        self.steps
            .iter()
            .filter(|step| (step.applies)(ctx))
            .fold((self.base)(ctx), |value, step| {
                let after = step.op.apply(value);
                trail.push(Adjustment {
                    nutrient: self.nutrient,
                    reason: step.label,
                    op: step.op,
                    before: value,
                    after,
                });
                after
            })
    }
}

const fn step(label: &'static str, applies: Predicate, op: Op) -> Step {
    Step { label, applies, op }
}

// Shared predicates

fn pregnant(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.is_pregnant()
}

fn lactating(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.is_lactating()
}

fn pregnant_or_lactating(ctx: &RuleContext<'_>) -> bool {
    pregnant(ctx) || lactating(ctx)
}

fn drinks_regularly(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.drinks_regularly()
}

fn very_active(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.is_very_active()
}

fn hot_climate(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.lives_in_hot_climate()
}

fn plant_based(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.is_plant_based()
}

fn current_smoker(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.smoking_status == Some(SmokingStatus::Current)
}

fn minimal_sun(ctx: &RuleContext<'_>) -> bool {
    ctx.profile.sun_exposure == Some(SunExposure::Minimal)
}

pub(crate) static RULES: [NutrientRule; 22] = [
    NutrientRule {
        nutrient: Nutrient::VitaminA,
        base: |c| c.by_gender(900.0, 700.0),
        steps: &[
            step("pregnancy", pregnant, Op::Set(770.0)),
            step("lactation", lactating, Op::Set(1300.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminD,
        base: |c| if c.age >= 71 { 20.0 } else { 15.0 },
        steps: &[
            step("minimal sun exposure", minimal_sun, Op::Add(10.0)),
            step(
                "high sun exposure",
                |c| c.profile.sun_exposure == Some(SunExposure::High),
                Op::Add(-5.0),
            ),
            step(
                "dark skin tone",
                |c| matches!(c.profile.skin_tone, Some(SkinTone::Dark | SkinTone::VeryDark)),
                Op::Add(10.0),
            ),
            step(
                "brown or olive skin tone",
                |c| matches!(c.profile.skin_tone, Some(SkinTone::Brown | SkinTone::Olive)),
                Op::Add(5.0),
            ),
            step("cold climate", |c| c.profile.lives_in_cold_climate(), Op::Add(5.0)),
            step("pregnancy or lactation", pregnant_or_lactating, Op::Floor(15.0)),
            step(
                "fatty liver with minimal sun",
                |c| minimal_sun(c) && c.profile.has_condition(HealthCondition::FattyLiver),
                Op::Floor(37.5),
            ),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminE,
        base: |_| 15.0,
        steps: &[
            step("lactation", lactating, Op::Set(19.0)),
            step("current smoker", current_smoker, Op::Add(2.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminK,
        base: |c| c.weight_kg(),
        steps: &[
            step("male minimum", |c| c.is_male(), Op::Floor(120.0)),
            step("female minimum", |c| c.is_female(), Op::Floor(90.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminC,
        base: |c| c.by_gender(90.0, 75.0),
        steps: &[
            step("pregnancy", pregnant, Op::Set(85.0)),
            step("lactation", lactating, Op::Set(120.0)),
            step("current smoker", current_smoker, Op::Add(35.0)),
            step(
                "high stress",
                |c| c.profile.stress_level == Some(StressLevel::High),
                Op::Add(25.0),
            ),
            step(
                "severe stress",
                |c| c.profile.stress_level == Some(StressLevel::Severe),
                Op::Add(50.0),
            ),
            step("very active", very_active, Op::Add(25.0)),
            step("hot climate", hot_climate, Op::Add(15.0)),
            step(
                "liver condition",
                |c| c.profile.health_conditions.iter().any(|h| h.is_liver()),
                Op::Floor(100.0),
            ),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminB1,
        base: |c| c.calories * 0.0005,
        steps: &[step("regular alcohol", drinks_regularly, Op::Multiply(1.3))],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminB2,
        base: |c| c.calories * 0.00055,
        steps: &[step("regular alcohol", drinks_regularly, Op::Multiply(1.2))],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminB3,
        base: |c| c.calories * 0.0065,
        steps: &[
            step("pregnancy", pregnant, Op::Set(18.0)),
            step("lactation", lactating, Op::Set(17.0)),
            step(
                "vigorous exercise",
                |c| c.profile.exercise_types.iter().any(|e| e.is_vigorous()),
                Op::Add(2.0),
            ),
            step(
                "cardiovascular condition",
                |c| c.profile.health_conditions.iter().any(|h| h.is_cardiovascular()),
                Op::Floor(16.0),
            ),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminB5,
        base: |_| 5.0,
        steps: &[
            step("pregnancy", pregnant, Op::Set(6.0)),
            step("lactation", lactating, Op::Set(7.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminB6,
        base: |c| if c.age > 50 { c.by_gender(1.7, 1.5) } else { 1.3 },
        steps: &[
            step("pregnancy", pregnant, Op::Set(1.9)),
            step("lactation", lactating, Op::Set(2.0)),
            step(
                "birth control pills",
                |c| c.profile.takes(Medication::BirthControlPills),
                Op::Add(0.5),
            ),
            step("regular alcohol", drinks_regularly, Op::Multiply(1.2)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminB9,
        base: |_| 400.0,
        steps: &[
            step("pregnancy", pregnant, Op::Set(600.0)),
            step("lactation", lactating, Op::Set(500.0)),
            step(
                "reproductive age",
                |c| c.is_female() && (15..=50).contains(&c.age),
                Op::Floor(400.0),
            ),
            step("regular alcohol", drinks_regularly, Op::Multiply(1.2)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::VitaminB12,
        base: |_| 2.4,
        steps: &[
            step("pregnancy", pregnant, Op::Set(2.6)),
            step("lactation", lactating, Op::Set(2.8)),
            step("age 65 and over", |c| c.age >= 65, Op::Floor(2.4)),
            step(
                "antacids or PPIs",
                |c| c.profile.takes(Medication::AntacidsPpis),
                Op::Multiply(1.5),
            ),
            step("metformin", |c| c.profile.takes(Medication::Metformin), Op::Multiply(1.3)),
            step("regular alcohol", drinks_regularly, Op::Multiply(1.2)),
            step("plant-based diet", plant_based, Op::Multiply(1.5)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Calcium,
        base: |c| {
            if (c.is_female() && c.age > 50) || c.age > 70 {
                1200.0
            } else {
                1000.0
            }
        },
        steps: &[
            step(
                "antacids or PPIs",
                |c| c.profile.takes(Medication::AntacidsPpis),
                Op::Multiply(1.2),
            ),
            step(
                "high caffeine",
                |c| c.profile.caffeine_intake == Some(CaffeineIntake::High),
                Op::Add(100.0),
            ),
            step("very active", very_active, Op::Add(200.0)),
            step("plant-based diet", plant_based, Op::Add(100.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Iron,
        base: |c| {
            if c.is_female() && (15..=49).contains(&c.age) {
                let heavy = c.profile.menstrual_cycle == Some(MenstrualCycle::Heavy);
                if heavy {
                    23.0
                } else {
                    18.0
                }
            } else {
                8.0
            }
        },
        steps: &[
            step("pregnancy", pregnant, Op::Set(27.0)),
            step("lactation", lactating, Op::Set(9.0)),
            step(
                "endurance activity",
                |c| very_active(c) || c.profile.does_exercise(ExerciseType::Cardio),
                Op::Add(3.0),
            ),
            step(
                "caffeine",
                |c| {
                    matches!(
                        c.profile.caffeine_intake,
                        Some(CaffeineIntake::Moderate | CaffeineIntake::High)
                    )
                },
                Op::Add(2.0),
            ),
            step("plant-based diet", plant_based, Op::Multiply(1.8)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Magnesium,
        base: |c| {
            let over_30 = c.age > 30;
            match (c.is_male(), over_30) {
                (true, true) => 420.0,
                (true, false) => 400.0,
                (false, true) => 320.0,
                (false, false) => 310.0,
            }
        },
        steps: &[
            step("pregnancy under 19", |c| pregnant(c) && c.age < 19, Op::Set(400.0)),
            step("pregnancy", |c| pregnant(c) && c.age >= 19, Op::Set(350.0)),
            step("lactation under 19", |c| lactating(c) && c.age < 19, Op::Set(360.0)),
            step("lactation", |c| lactating(c) && c.age >= 19, Op::Set(310.0)),
            step(
                "diabetes",
                |c| c.profile.has_condition(HealthCondition::Diabetes),
                Op::Add(50.0),
            ),
            step("regular alcohol", drinks_regularly, Op::Add(50.0)),
            step(
                "high stress",
                |c| matches!(c.profile.stress_level, Some(StressLevel::High | StressLevel::Severe)),
                Op::Add(50.0),
            ),
            step(
                "short sleep",
                |c| c.profile.sleep_hours.is_some_and(|h| h < 6.0),
                Op::Add(50.0),
            ),
            step("diuretics", |c| c.profile.takes(Medication::Diuretics), Op::Add(75.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Phosphorus,
        base: |_| 700.0,
        steps: &[],
    },
    NutrientRule {
        nutrient: Nutrient::Potassium,
        base: |c| c.by_gender(3400.0, 2600.0),
        steps: &[
            step("pregnancy or lactation", pregnant_or_lactating, Op::Set(2900.0)),
            step(
                "hypertension",
                |c| c.profile.has_condition(HealthCondition::Hypertension),
                Op::Add(500.0),
            ),
            step("very active", very_active, Op::Add(500.0)),
            step("hot climate", hot_climate, Op::Add(300.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Sodium,
        base: |_| 1500.0,
        steps: &[
            step(
                "hypertension",
                |c| c.profile.has_condition(HealthCondition::Hypertension),
                Op::Set(1200.0),
            ),
            step("very active", very_active, Op::Add(500.0)),
            step("hot climate", hot_climate, Op::Add(300.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Zinc,
        base: |c| c.by_gender(11.0, 8.0),
        steps: &[
            step("pregnancy", pregnant, Op::Set(11.0)),
            step("lactation", lactating, Op::Set(12.0)),
            step("regular alcohol", drinks_regularly, Op::Add(2.0)),
            step("very active", very_active, Op::Add(2.0)),
            step("plant-based diet", plant_based, Op::Multiply(1.5)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Selenium,
        base: |_| 55.0,
        steps: &[
            step("pregnancy", pregnant, Op::Set(60.0)),
            step("lactation", lactating, Op::Set(70.0)),
            step(
                "thyroid disorder",
                |c| c.profile.has_condition(HealthCondition::ThyroidDisorder),
                Op::Add(15.0),
            ),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Copper,
        base: |_| 900.0,
        steps: &[
            step("pregnancy", pregnant, Op::Set(1000.0)),
            step("lactation", lactating, Op::Set(1300.0)),
        ],
    },
    NutrientRule {
        nutrient: Nutrient::Manganese,
        base: |c| c.by_gender(2.3, 1.8),
        steps: &[
            step("pregnancy", pregnant, Op::Set(2.0)),
            step("lactation", lactating, Op::Set(2.6)),
        ],
    },
];
