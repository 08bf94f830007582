use sqlx::FromRow;
use uuid::Uuid;

use super::model::{Cuisine, DietaryInfo, Difficulty, Ingredient, Instruction, Recipe, Tag};

/// Recipe joined with its (optional) dietary info.
#[derive(Debug, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub cuisine: String,
    pub difficulty: String,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    pub rating: f64,
    pub rating_count: i32,
    pub dietary_recipe_id: Option<Uuid>,
    pub vegetarian: Option<bool>,
    pub vegan: Option<bool>,
    pub gluten_free: Option<bool>,
    pub dairy_free: Option<bool>,
}

impl TryFrom<RecipeRow> for Recipe {
    type Error = anyhow::Error;

    fn try_from(r: RecipeRow) -> Result<Self, Self::Error> {
        let dietary = r.dietary_recipe_id.map(|_| DietaryInfo {
            vegetarian: r.vegetarian.unwrap_or(false),
            vegan: r.vegan.unwrap_or(false),
            gluten_free: r.gluten_free.unwrap_or(false),
            dairy_free: r.dairy_free.unwrap_or(false),
        });
        Ok(Self {
            id: r.id,
            name: r.name,
            image_url: r.image_url,
            cuisine: Cuisine::from_stored(&r.cuisine),
            difficulty: r.difficulty.parse::<Difficulty>()?,
            prep_time: r.prep_time,
            cook_time: r.cook_time,
            servings: r.servings,
            rating: r.rating,
            rating_count: r.rating_count,
            dietary,
        })
    }
}

#[derive(Debug, FromRow)]
pub struct IngredientRow {
    pub name: String,
    pub amount: f64,
    pub unit: Option<String>,
    pub category: Option<String>,
}

impl From<IngredientRow> for Ingredient {
    fn from(r: IngredientRow) -> Self {
        Self {
            name: r.name,
            amount: r.amount,
            unit: r.unit,
            category: r.category,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct TagRow {
    pub id: Uuid,
    pub name: String,
}

impl From<TagRow> for Tag {
    fn from(r: TagRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

#[derive(Debug, FromRow)]
pub struct InstructionRow {
    pub step_number: i32,
    pub instruction: String,
}

impl From<InstructionRow> for Instruction {
    fn from(r: InstructionRow) -> Self {
        Self {
            step_number: r.step_number,
            text: r.instruction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RecipeRow {
        RecipeRow {
            id: Uuid::new_v4(),
            name: "Pad Thai".into(),
            image_url: Some("https://img.example/pad-thai.jpg".into()),
            cuisine: "Thai".into(),
            difficulty: "Medium".into(),
            prep_time: 15,
            cook_time: 20,
            servings: 2,
            rating: 4.25,
            rating_count: 4,
            dietary_recipe_id: None,
            vegetarian: None,
            vegan: None,
            gluten_free: None,
            dairy_free: None,
        }
    }

    #[test]
    fn converts_row_without_dietary_info() {
        let recipe = Recipe::try_from(row()).unwrap();
        assert_eq!(recipe.cuisine, Cuisine::Thai);
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert_eq!(recipe.total_time(), 35);
        assert!(recipe.dietary.is_none());
    }

    #[test]
    fn converts_row_with_dietary_info() {
        let mut r = row();
        r.dietary_recipe_id = Some(r.id);
        r.vegan = Some(true);
        r.gluten_free = Some(true);
        let recipe = Recipe::try_from(r).unwrap();
        let dietary = recipe.dietary.expect("dietary info");
        assert!(dietary.vegan && dietary.gluten_free);
        assert!(!dietary.vegetarian && !dietary.dairy_free);
    }

    #[test]
    fn rejects_unknown_difficulty() {
        let mut r = row();
        r.difficulty = "Extreme".into();
        assert!(Recipe::try_from(r).is_err());
    }
}
