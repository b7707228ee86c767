use serde::{Deserialize, Serialize};

use crate::list_literal::parse_list_literal;
use crate::recipe_record::{Nutrients, RecipeIdentity, RecipeRecord};

/// A recipe ready for display: list columns decoded into plain lists.
/// Serialized field names follow the dataset headers.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FormattedRecipe {
    #[serde(rename = "RecipeId")]
    pub recipe_id: Option<i64>,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CookTime")]
    pub cook_time: String,
    #[serde(rename = "PrepTime")]
    pub prep_time: String,
    #[serde(rename = "TotalTime")]
    pub total_time: String,
    #[serde(rename = "RecipeIngredientParts")]
    pub ingredient_parts: Vec<String>,
    #[serde(flatten)]
    pub nutrients: Nutrients,
    #[serde(rename = "RecipeInstructions")]
    pub instructions: Vec<String>,
    #[serde(rename = "RecipeImages")]
    pub images: Vec<String>,
}

impl FormattedRecipe {
    pub fn identity(&self) -> RecipeIdentity {
        match self.recipe_id {
            Some(id) => RecipeIdentity::Id(id),
            None => RecipeIdentity::Name(self.name.clone()),
        }
    }
}

impl From<&RecipeRecord> for FormattedRecipe {
    fn from(record: &RecipeRecord) -> Self {
        Self {
            recipe_id: record.recipe_id,
            name: record.name.clone(),
            cook_time: record.cook_time.clone(),
            prep_time: record.prep_time.clone(),
            total_time: record.total_time.clone(),
            ingredient_parts: parse_list_literal(&record.ingredient_parts),
            nutrients: record.nutrients,
            instructions: parse_list_literal(&record.instructions),
            // A missing image column or cell becomes an empty list.
            images: record
                .images
                .as_deref()
                .map(parse_list_literal)
                .unwrap_or_default(),
        }
    }
}

/// Decodes the list columns of each recipe, keeping order. `None` passes through.
pub fn format_results(recipes: Option<&[RecipeRecord]>) -> Option<Vec<FormattedRecipe>> {
    recipes.map(|rows| rows.iter().map(FormattedRecipe::from).collect())
}
