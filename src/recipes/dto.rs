use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::filter::{PageInfo, RecipeFilter};
use super::model::{Ingredient, Instruction, Recipe, Tag};
use super::repo::RecipeWithParts;
use crate::notes::dto::NoteResponse;

/// Listing query. Every parameter is optional and read leniently: a value that
/// cannot be understood never fails the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListRecipesQuery {
    pub cuisine: Option<String>,
    pub difficulty: Option<String>,
    #[serde(alias = "minRating")]
    pub min_rating: Option<String>,
    #[serde(alias = "cookTime")]
    pub cook_time: Option<String>,
    pub dietary: Option<String>,
    pub page: Option<String>,
}

impl ListRecipesQuery {
    pub fn filter(&self) -> RecipeFilter {
        let min_rating = self
            .min_rating
            .as_deref()
            .and_then(|v| v.trim().parse::<f64>().ok());
        RecipeFilter::new()
            .cuisine(self.cuisine.as_deref())
            .difficulty(self.difficulty.as_deref())
            .min_rating(min_rating)
            .cook_time(self.cook_time.as_deref())
            .dietary(self.dietary.as_deref())
    }

    pub fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub total_time: i32,
}

impl From<Recipe> for RecipeSummary {
    fn from(recipe: Recipe) -> Self {
        Self {
            total_time: recipe.total_time(),
            recipe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeSummary>,
    pub pagination: PageInfo,
}

#[derive(Debug, Serialize)]
pub struct RecipeDetails {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub ingredients: Vec<Ingredient>,
    pub tags: Vec<Tag>,
    pub instructions: Vec<Instruction>,
}

impl From<RecipeWithParts> for RecipeDetails {
    fn from(p: RecipeWithParts) -> Self {
        Self {
            summary: p.recipe.into(),
            ingredients: p.ingredients,
            tags: p.tags,
            instructions: p.instructions,
        }
    }
}

/// The caller's own rating, favorite and note for one recipe.
#[derive(Debug, Serialize)]
pub struct PersonalRecipeState {
    pub recipe_id: Uuid,
    pub your_rating: Option<i32>,
    pub favorited: bool,
    pub note: Option<NoteResponse>,
}
