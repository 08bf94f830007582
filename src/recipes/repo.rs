use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Ingredient, Instruction, Recipe, Tag};
use super::repo_types::{IngredientRow, InstructionRow, RecipeRow, TagRow};

const RECIPE_COLUMNS: &str = r#"
    r.id, r.name, r.image_url, r.cuisine, r.difficulty,
    r.prep_time, r.cook_time, r.servings, r.rating, r.rating_count,
    d.recipe_id AS dietary_recipe_id, d.vegetarian, d.vegan, d.gluten_free, d.dairy_free
"#;

/// A recipe with everything the detail page shows.
#[derive(Debug)]
pub struct RecipeWithParts {
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
    pub tags: Vec<Tag>,
    pub instructions: Vec<Instruction>,
}

/// All recipes with their dietary info, ordered by name.
pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes r
        LEFT JOIN dietary_info d ON d.recipe_id = r.id
        ORDER BY r.name ASC, r.id ASC
        "#
    ))
    .fetch_all(db)
    .await
    .context("list recipes")?;

    rows.into_iter().map(Recipe::try_from).collect()
}

pub async fn find(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<Option<Recipe>> {
    let row = sqlx::query_as::<_, RecipeRow>(&format!(
        r#"
        SELECT {RECIPE_COLUMNS}
        FROM recipes r
        LEFT JOIN dietary_info d ON d.recipe_id = r.id
        WHERE r.id = $1
        "#
    ))
    .bind(recipe_id)
    .fetch_optional(db)
    .await
    .context("get recipe")?;

    row.map(Recipe::try_from).transpose()
}

pub async fn find_with_parts(
    db: &PgPool,
    recipe_id: Uuid,
) -> anyhow::Result<Option<RecipeWithParts>> {
    let Some(recipe) = find(db, recipe_id).await? else {
        return Ok(None);
    };

    let ingredients = sqlx::query_as::<_, IngredientRow>(
        r#"
        SELECT name, amount, unit, category
          FROM ingredients
         WHERE recipe_id = $1
         ORDER BY position ASC, id ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list ingredients")?;

    let tags = sqlx::query_as::<_, TagRow>(
        r#"
        SELECT t.id, t.name
          FROM tags t
          JOIN recipe_tags rt ON rt.tag_id = t.id
         WHERE rt.recipe_id = $1
         ORDER BY t.name ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list tags")?;

    let instructions = sqlx::query_as::<_, InstructionRow>(
        r#"
        SELECT step_number, instruction
          FROM recipe_instructions
         WHERE recipe_id = $1
         ORDER BY step_number ASC
        "#,
    )
    .bind(recipe_id)
    .fetch_all(db)
    .await
    .context("list instructions")?;

    Ok(Some(RecipeWithParts {
        recipe,
        ingredients: ingredients.into_iter().map(Into::into).collect(),
        tags: tags.into_iter().map(Into::into).collect(),
        instructions: instructions.into_iter().map(Into::into).collect(),
    }))
}

/// Deletes a recipe and, through cascades, everything it owns. Returns false
/// when there was nothing to delete.
pub async fn delete(db: &PgPool, recipe_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM recipes WHERE id = $1")
        .bind(recipe_id)
        .execute(db)
        .await
        .context("delete recipe")?;
    Ok(res.rows_affected() > 0)
}
