use anyhow::Context;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::repo_types::{NoteWithRecipeRow, RecipeNote};
use crate::error::{foreign_key_violation, is_missing_customer};

#[derive(Debug, Error)]
pub enum NoteError {
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("customer not found")]
    CustomerNotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Creates the note, or replaces its text and bumps `updated_at` when the
/// customer already has one for this recipe.
pub async fn upsert(
    db: &PgPool,
    customer_id: Uuid,
    recipe_id: Uuid,
    text: &str,
) -> Result<RecipeNote, NoteError> {
    let res = sqlx::query_as::<_, RecipeNote>(
        r#"
        INSERT INTO recipe_notes (customer_id, recipe_id, note_text)
        VALUES ($1, $2, $3)
        ON CONFLICT (customer_id, recipe_id)
        DO UPDATE SET note_text = EXCLUDED.note_text, updated_at = now()
        RETURNING id, customer_id, recipe_id, note_text, created_at, updated_at
        "#,
    )
    .bind(customer_id)
    .bind(recipe_id)
    .bind(text)
    .fetch_one(db)
    .await
    .context("upsert note");

    match res {
        Ok(note) => Ok(note),
        Err(e) => match foreign_key_violation(&e) {
            Some(c) if is_missing_customer(c) => Err(NoteError::CustomerNotFound),
            Some(_) => Err(NoteError::RecipeNotFound),
            None => Err(NoteError::Storage(e)),
        },
    }
}

/// Returns false when there was no note to delete.
pub async fn delete(db: &PgPool, customer_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM recipe_notes WHERE customer_id = $1 AND recipe_id = $2")
        .bind(customer_id)
        .bind(recipe_id)
        .execute(db)
        .await
        .context("delete note")?;
    Ok(res.rows_affected() > 0)
}

pub async fn find(
    db: &PgPool,
    customer_id: Uuid,
    recipe_id: Uuid,
) -> anyhow::Result<Option<RecipeNote>> {
    let note = sqlx::query_as::<_, RecipeNote>(
        r#"
        SELECT id, customer_id, recipe_id, note_text, created_at, updated_at
          FROM recipe_notes
         WHERE customer_id = $1 AND recipe_id = $2
        "#,
    )
    .bind(customer_id)
    .bind(recipe_id)
    .fetch_optional(db)
    .await
    .context("get note")?;
    Ok(note)
}

/// Most recently touched first.
pub async fn list_by_customer(
    db: &PgPool,
    customer_id: Uuid,
) -> anyhow::Result<Vec<NoteWithRecipeRow>> {
    let rows = sqlx::query_as::<_, NoteWithRecipeRow>(
        r#"
        SELECT n.id, n.recipe_id, r.name AS recipe_name, n.note_text,
               n.created_at, n.updated_at
          FROM recipe_notes n
          JOIN recipes r ON r.id = n.recipe_id
         WHERE n.customer_id = $1
         ORDER BY COALESCE(n.updated_at, n.created_at) DESC
        "#,
    )
    .bind(customer_id)
    .fetch_all(db)
    .await
    .context("list notes")?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{database, seed_customer, seed_recipe};

    #[tokio::test]
    async fn second_save_updates_the_same_note() {
        let Some(db) = database().await else { return };
        let customer = seed_customer(&db).await;
        let recipe = seed_recipe(&db).await;

        let first = upsert(&db, customer, recipe, "less salt").await.unwrap();
        assert!(first.updated_at.is_none());

        let second = upsert(&db, customer, recipe, "less salt, more lemon").await.unwrap();
        assert_eq!(second.id, first.id);
        assert_eq!(second.note_text, "less salt, more lemon");
        assert!(second.updated_at.is_some());

        assert!(delete(&db, customer, recipe).await.unwrap());
        assert!(!delete(&db, customer, recipe).await.unwrap());
        assert!(find(&db, customer, recipe).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn missing_parent_rows_are_reported_separately() {
        let Some(db) = database().await else { return };
        let customer = seed_customer(&db).await;
        let recipe = seed_recipe(&db).await;

        assert!(matches!(
            upsert(&db, customer, Uuid::new_v4(), "x").await,
            Err(NoteError::RecipeNotFound)
        ));
        assert!(matches!(
            upsert(&db, Uuid::new_v4(), recipe, "x").await,
            Err(NoteError::CustomerNotFound)
        ));
    }
}
