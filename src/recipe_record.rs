use serde::{Deserialize, Serialize};

use crate::errors::{RecommendError, Result};
use crate::list_literal::encode_list_literal;

/// Number of nutrient columns used as search features.
pub const NUTRIENT_COUNT: usize = 9;

/// The nutrient columns, in the order the scaler and the index expect them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NutrientColumn {
    Calories,
    Fat,
    SaturatedFat,
    Cholesterol,
    Sodium,
    Carbohydrate,
    Fiber,
    Sugar,
    Protein,
}

impl NutrientColumn {
    pub const ALL: [NutrientColumn; NUTRIENT_COUNT] = [
        NutrientColumn::Calories,
        NutrientColumn::Fat,
        NutrientColumn::SaturatedFat,
        NutrientColumn::Cholesterol,
        NutrientColumn::Sodium,
        NutrientColumn::Carbohydrate,
        NutrientColumn::Fiber,
        NutrientColumn::Sugar,
        NutrientColumn::Protein,
    ];

    /// Dataset header for this column.
    pub fn header(self) -> &'static str {
        match self {
            NutrientColumn::Calories => "Calories",
            NutrientColumn::Fat => "FatContent",
            NutrientColumn::SaturatedFat => "SaturatedFatContent",
            NutrientColumn::Cholesterol => "CholesterolContent",
            NutrientColumn::Sodium => "SodiumContent",
            NutrientColumn::Carbohydrate => "CarbohydrateContent",
            NutrientColumn::Fiber => "FiberContent",
            NutrientColumn::Sugar => "SugarContent",
            NutrientColumn::Protein => "ProteinContent",
        }
    }
}

/// Nutrient profile of one recipe (or one nutrition target).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrients {
    #[serde(rename = "Calories")]
    pub calories: f64,
    #[serde(rename = "FatContent")]
    pub fat_g: f64,
    #[serde(rename = "SaturatedFatContent")]
    pub saturated_fat_g: f64,
    #[serde(rename = "CholesterolContent")]
    pub cholesterol_mg: f64,
    #[serde(rename = "SodiumContent")]
    pub sodium_mg: f64,
    #[serde(rename = "CarbohydrateContent")]
    pub carbohydrate_g: f64,
    #[serde(rename = "FiberContent")]
    pub fiber_g: f64,
    #[serde(rename = "SugarContent")]
    pub sugar_g: f64,
    #[serde(rename = "ProteinContent")]
    pub protein_g: f64,
}

impl Nutrients {
    pub fn get(&self, column: NutrientColumn) -> f64 {
        match column {
            NutrientColumn::Calories => self.calories,
            NutrientColumn::Fat => self.fat_g,
            NutrientColumn::SaturatedFat => self.saturated_fat_g,
            NutrientColumn::Cholesterol => self.cholesterol_mg,
            NutrientColumn::Sodium => self.sodium_mg,
            NutrientColumn::Carbohydrate => self.carbohydrate_g,
            NutrientColumn::Fiber => self.fiber_g,
            NutrientColumn::Sugar => self.sugar_g,
            NutrientColumn::Protein => self.protein_g,
        }
    }

    pub fn set(&mut self, column: NutrientColumn, value: f64) {
        let slot = match column {
            NutrientColumn::Calories => &mut self.calories,
            NutrientColumn::Fat => &mut self.fat_g,
            NutrientColumn::SaturatedFat => &mut self.saturated_fat_g,
            NutrientColumn::Cholesterol => &mut self.cholesterol_mg,
            NutrientColumn::Sodium => &mut self.sodium_mg,
            NutrientColumn::Carbohydrate => &mut self.carbohydrate_g,
            NutrientColumn::Fiber => &mut self.fiber_g,
            NutrientColumn::Sugar => &mut self.sugar_g,
            NutrientColumn::Protein => &mut self.protein_g,
        };
        *slot = value;
    }

    pub fn to_vector(&self) -> NutrientVector {
        NutrientVector(NutrientColumn::ALL.map(|column| self.get(column)))
    }
}

/// Nine nutrient values in `NutrientColumn::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientVector(pub [f64; NUTRIENT_COUNT]);

impl NutrientVector {
    /// Builds a vector from caller-supplied values; anything but exactly nine
    /// finite values is rejected.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let array: [f64; NUTRIENT_COUNT] = values.try_into().map_err(|_| {
            RecommendError::invalid_input(format!(
                "nutrient vector must have {} values, got {}",
                NUTRIENT_COUNT,
                values.len()
            ))
        })?;
        if let Some(pos) = array.iter().position(|v| !v.is_finite()) {
            return Err(RecommendError::invalid_input(format!(
                "nutrient vector value for '{}' is not a finite number",
                NutrientColumn::ALL[pos].header()
            )));
        }
        Ok(Self(array))
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// One row of the recipe dataset. List columns are kept in their `c("...")`
/// encoding until the recipe is formatted for output.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeRecord {
    pub recipe_id: Option<i64>,
    pub name: String,
    pub cook_time: String,
    pub prep_time: String,
    pub total_time: String,
    pub ingredient_parts: String,
    pub nutrients: Nutrients,
    pub instructions: String,
    pub images: Option<String>,
}

impl RecipeRecord {
    /// Creates a record from plain lists, encoding them as list literals.
    pub fn from_lists<S: AsRef<str>>(
        recipe_id: Option<i64>,
        name: &str,
        nutrients: Nutrients,
        ingredients: &[S],
        instructions: &[S],
        images: Option<&[S]>,
    ) -> Self {
        Self {
            recipe_id,
            name: name.to_string(),
            cook_time: String::new(),
            prep_time: String::new(),
            total_time: String::new(),
            ingredient_parts: encode_list_literal(ingredients),
            nutrients,
            instructions: encode_list_literal(instructions),
            images: images.map(encode_list_literal::<S>),
        }
    }

    /// Identity used for deduplication: the recipe id, or the name when the
    /// id is absent.
    pub fn identity(&self) -> RecipeIdentity {
        match self.recipe_id {
            Some(id) => RecipeIdentity::Id(id),
            None => RecipeIdentity::Name(self.name.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecipeIdentity {
    Id(i64),
    Name(String),
}
