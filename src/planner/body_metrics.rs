use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{RecommendError, Result};

/// Calorie targets never drop below this.
pub const MIN_DAILY_CALORIES: f64 = 1200.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(RecommendError::invalid_input(format!(
                "unknown gender '{}', expected male or female",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Extra,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::Light,
        ActivityLevel::Moderate,
        ActivityLevel::Active,
        ActivityLevel::Extra,
    ];

    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Extra => 1.9,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Little/no exercise",
            ActivityLevel::Light => "Light exercise (1-2 days/wk)",
            ActivityLevel::Moderate => "Moderate exercise (3-5 days/wk)",
            ActivityLevel::Active => "Active (6-7 days/wk)",
            ActivityLevel::Extra => "Extra active (very physical job)",
        }
    }

    /// Looks a level up by its position on the sedentary..extra scale,
    /// clamping out-of-range positions to the nearest end.
    pub fn from_index(index: i64) -> Self {
        let clamped = index.clamp(0, Self::ALL.len() as i64 - 1) as usize;
        Self::ALL[clamped]
    }
}

impl FromStr for ActivityLevel {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "light" => Ok(ActivityLevel::Light),
            "moderate" => Ok(ActivityLevel::Moderate),
            "active" => Ok(ActivityLevel::Active),
            "extra" => Ok(ActivityLevel::Extra),
            other => Err(RecommendError::invalid_input(format!("unknown activity level '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

/// Returns the body-mass index rounded to two decimals (halves to even), with its category.
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> Result<(f64, BmiStatus)> {
    if !(weight_kg > 0.0) || !(height_cm > 0.0) {
        return Err(RecommendError::invalid_input(format!(
            "weight and height must be positive, got {} kg and {} cm",
            weight_kg, height_cm
        )));
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    let status = if bmi < 18.5 {
        BmiStatus::Underweight
    } else if bmi < 25.0 {
        BmiStatus::Normal
    } else if bmi < 30.0 {
        BmiStatus::Overweight
    } else {
        BmiStatus::Obese
    };
    Ok(((bmi * 100.0).round_ties_even() / 100.0, status))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: Gender,
    pub activity: ActivityLevel,
}

/// Total daily energy expenditure: Mifflin-St Jeor BMR times the activity factor.
pub fn calculate_tdee(user: &UserProfile) -> f64 {
    let sex_constant = match user.gender {
        Gender::Male => 5.0,
        Gender::Female => -161.0,
    };
    let bmr = 10.0 * user.weight_kg + 6.25 * user.height_cm - 5.0 * user.age as f64 + sex_constant;
    bmr * user.activity.factor()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightPlan {
    Maintain,
    Mild,
    Loss,
    Extreme,
}

impl WeightPlan {
    pub const ALL: [WeightPlan; 4] = [WeightPlan::Maintain, WeightPlan::Mild, WeightPlan::Loss, WeightPlan::Extreme];

    pub fn label(self) -> &'static str {
        match self {
            WeightPlan::Maintain => "Maintain weight",
            WeightPlan::Mild => "Mild weight loss",
            WeightPlan::Loss => "Weight loss",
            WeightPlan::Extreme => "Extreme weight loss",
        }
    }

    /// Daily calorie adjustment relative to TDEE.
    pub fn calorie_adjustment(self) -> f64 {
        match self {
            WeightPlan::Maintain => 0.0,
            WeightPlan::Mild => -250.0,
            WeightPlan::Loss => -500.0,
            WeightPlan::Extreme => -1000.0,
        }
    }

    /// Expected weight change in kg per week.
    pub fn weekly_delta_kg(self) -> f64 {
        match self {
            WeightPlan::Maintain => 0.0,
            WeightPlan::Mild => -0.25,
            WeightPlan::Loss => -0.5,
            WeightPlan::Extreme => -1.0,
        }
    }
}

impl FromStr for WeightPlan {
    type Err = RecommendError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "maintain" => Ok(WeightPlan::Maintain),
            "mild" => Ok(WeightPlan::Mild),
            "loss" => Ok(WeightPlan::Loss),
            "extreme" => Ok(WeightPlan::Extreme),
            other => Err(RecommendError::invalid_input(format!("unknown weight plan '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanTarget {
    pub plan: WeightPlan,
    pub label: String,
    pub calories: f64,
    pub delta_kg: f64,
}

/// Daily calorie target for every weight plan, in plan order.
pub fn plan_targets(tdee: f64) -> Vec<PlanTarget> {
    WeightPlan::ALL
        .iter()
        .map(|&plan| PlanTarget {
            plan,
            label: plan.label().to_string(),
            calories: (tdee + plan.calorie_adjustment()).max(MIN_DAILY_CALORIES).round_ties_even(),
            delta_kg: plan.weekly_delta_kg(),
        })
        .collect()
}
