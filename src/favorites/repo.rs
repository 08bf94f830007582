use anyhow::Context;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::{foreign_key_violation, is_missing_customer, is_unique_violation};

#[derive(Debug, Error)]
pub enum FavoriteError {
    #[error("recipe is already a favorite")]
    Duplicate,
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("customer not found")]
    CustomerNotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// A favorited recipe as shown in the customer's list.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct FavoriteItem {
    pub recipe_id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub cuisine: String,
    pub difficulty: String,
    pub rating: f64,
    pub rating_count: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub added_at: OffsetDateTime,
}

/// Inserts the favorite. The (customer, recipe) unique constraint turns a
/// second insert, concurrent or not, into `FavoriteError::Duplicate`.
pub async fn add(db: &PgPool, customer_id: Uuid, recipe_id: Uuid) -> Result<(), FavoriteError> {
    let res = sqlx::query(
        r#"
        INSERT INTO favorite_recipes (customer_id, recipe_id)
        VALUES ($1, $2)
        "#,
    )
    .bind(customer_id)
    .bind(recipe_id)
    .execute(db)
    .await
    .context("insert favorite");

    match res {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => Err(FavoriteError::Duplicate),
        Err(e) => match foreign_key_violation(&e) {
            Some(c) if is_missing_customer(c) => Err(FavoriteError::CustomerNotFound),
            Some(_) => Err(FavoriteError::RecipeNotFound),
            None => Err(FavoriteError::Storage(e)),
        },
    }
}

/// Returns false when there was no favorite to remove.
pub async fn remove(db: &PgPool, customer_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
    let res = sqlx::query("DELETE FROM favorite_recipes WHERE customer_id = $1 AND recipe_id = $2")
        .bind(customer_id)
        .bind(recipe_id)
        .execute(db)
        .await
        .context("delete favorite")?;
    Ok(res.rows_affected() > 0)
}

/// Flips the favorite and returns the new state.
pub async fn toggle(db: &PgPool, customer_id: Uuid, recipe_id: Uuid) -> Result<bool, FavoriteError> {
    if remove(db, customer_id, recipe_id).await? {
        return Ok(false);
    }
    add(db, customer_id, recipe_id).await?;
    Ok(true)
}

pub async fn is_favorite(db: &PgPool, customer_id: Uuid, recipe_id: Uuid) -> anyhow::Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM favorite_recipes
             WHERE customer_id = $1 AND recipe_id = $2
        )
        "#,
    )
    .bind(customer_id)
    .bind(recipe_id)
    .fetch_one(db)
    .await
    .context("check favorite")?;
    Ok(exists)
}

/// Newest first.
pub async fn list_by_customer(db: &PgPool, customer_id: Uuid) -> anyhow::Result<Vec<FavoriteItem>> {
    let rows = sqlx::query_as::<_, FavoriteItem>(
        r#"
        SELECT r.id AS recipe_id, r.name, r.image_url, r.cuisine, r.difficulty,
               r.rating, r.rating_count, f.added_at
          FROM favorite_recipes f
          JOIN recipes r ON r.id = f.recipe_id
         WHERE f.customer_id = $1
         ORDER BY f.added_at DESC
        "#,
    )
    .bind(customer_id)
    .fetch_all(db)
    .await
    .context("list favorites")?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{database, seed_customer, seed_recipe};

    async fn favorite_rows(db: &PgPool, customer_id: Uuid, recipe_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM favorite_recipes WHERE customer_id = $1 AND recipe_id = $2",
        )
        .bind(customer_id)
        .bind(recipe_id)
        .fetch_one(db)
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn concurrent_adds_leave_exactly_one_favorite() {
        let Some(db) = database().await else { return };
        let customer = seed_customer(&db).await;
        let recipe = seed_recipe(&db).await;

        let (first, second) = tokio::join!(
            add(&db, customer, recipe),
            add(&db, customer, recipe)
        );
        let outcomes = [first, second];

        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(FavoriteError::Duplicate))));
        assert_eq!(favorite_rows(&db, customer, recipe).await, 1);
    }

    #[tokio::test]
    async fn toggle_flips_between_states() {
        let Some(db) = database().await else { return };
        let customer = seed_customer(&db).await;
        let recipe = seed_recipe(&db).await;

        assert!(toggle(&db, customer, recipe).await.unwrap());
        assert!(is_favorite(&db, customer, recipe).await.unwrap());
        assert!(!toggle(&db, customer, recipe).await.unwrap());
        assert!(!is_favorite(&db, customer, recipe).await.unwrap());
        assert!(!remove(&db, customer, recipe).await.unwrap());
    }

    #[tokio::test]
    async fn missing_parent_rows_are_reported_separately() {
        let Some(db) = database().await else { return };
        let customer = seed_customer(&db).await;
        let recipe = seed_recipe(&db).await;

        assert!(matches!(
            add(&db, customer, Uuid::new_v4()).await,
            Err(FavoriteError::RecipeNotFound)
        ));
        assert!(matches!(
            add(&db, Uuid::new_v4(), recipe).await,
            Err(FavoriteError::CustomerNotFound)
        ));
    }
}
