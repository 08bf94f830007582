use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use thiserror::Error;
use uuid::Uuid;

use super::aggregate::{RatingSummary, Stars};
use crate::error::{foreign_key_violation, is_missing_customer};

#[derive(Debug, Error)]
pub enum RatingError {
    #[error("recipe not found")]
    RecipeNotFound,
    #[error("customer not found")]
    CustomerNotFound,
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Recipe aggregate after a rating change, plus the caller's own rating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingOutcome {
    pub summary: RatingSummary,
    pub your_rating: Option<i32>,
}

/// Locks the recipe row for the rest of the transaction and returns its
/// stored summary. Concurrent rating changes on one recipe queue up here.
async fn lock_recipe(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
) -> anyhow::Result<Option<RatingSummary>> {
    let row = sqlx::query_as::<_, (f64, i32)>(
        r#"
        SELECT rating, rating_count
          FROM recipes
         WHERE id = $1
           FOR UPDATE
        "#,
    )
    .bind(recipe_id)
    .fetch_optional(&mut **tx)
    .await
    .context("lock recipe")?;

    Ok(row.map(|(mean, count)| RatingSummary { mean, count }))
}

async fn store_summary(
    tx: &mut Transaction<'_, Postgres>,
    recipe_id: Uuid,
    summary: RatingSummary,
) -> anyhow::Result<()> {
    sqlx::query("UPDATE recipes SET rating = $2, rating_count = $3 WHERE id = $1")
        .bind(recipe_id)
        .bind(summary.mean)
        .bind(summary.count)
        .execute(&mut **tx)
        .await
        .context("store rating summary")?;
    Ok(())
}

/// Adds or replaces the customer's rating, then recomputes the recipe
/// summary from all of its ratings in the same transaction.
pub async fn rate(
    db: &PgPool,
    customer_id: Uuid,
    recipe_id: Uuid,
    stars: Stars,
) -> Result<RatingOutcome, RatingError> {
    let mut tx = db.begin().await.context("begin tx")?;

    if lock_recipe(&mut tx, recipe_id).await?.is_none() {
        return Err(RatingError::RecipeNotFound);
    }

    let updated = sqlx::query(
        r#"
        UPDATE recipe_ratings
           SET rating = $3, rated_at = now()
         WHERE customer_id = $1 AND recipe_id = $2
        "#,
    )
    .bind(customer_id)
    .bind(recipe_id)
    .bind(stars.value())
    .execute(&mut *tx)
    .await
    .context("update rating")?
    .rows_affected();

    if updated == 0 {
        let inserted = sqlx::query(
            r#"
            INSERT INTO recipe_ratings (customer_id, recipe_id, rating)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(customer_id)
        .bind(recipe_id)
        .bind(stars.value())
        .execute(&mut *tx)
        .await
        .context("insert rating");

        if let Err(e) = inserted {
            return Err(match foreign_key_violation(&e) {
                Some(c) if is_missing_customer(c) => RatingError::CustomerNotFound,
                _ => RatingError::Storage(e),
            });
        }
    }

    let ratings = sqlx::query_scalar::<_, i32>(
        "SELECT rating FROM recipe_ratings WHERE recipe_id = $1",
    )
    .bind(recipe_id)
    .fetch_all(&mut *tx)
    .await
    .context("load ratings")?;

    let summary = RatingSummary::recompute(&ratings);
    store_summary(&mut tx, recipe_id, summary).await?;
    tx.commit().await.context("commit tx")?;

    Ok(RatingOutcome {
        summary,
        your_rating: Some(stars.value()),
    })
}

/// Removes the customer's rating and updates the summary incrementally.
/// A missing recipe or rating is a no-op.
pub async fn remove(
    db: &PgPool,
    customer_id: Uuid,
    recipe_id: Uuid,
) -> anyhow::Result<RatingOutcome> {
    let mut tx = db.begin().await.context("begin tx")?;

    let Some(current) = lock_recipe(&mut tx, recipe_id).await? else {
        return Ok(RatingOutcome {
            summary: RatingSummary::EMPTY,
            your_rating: None,
        });
    };

    let removed = sqlx::query_scalar::<_, i32>(
        r#"
        DELETE FROM recipe_ratings
         WHERE customer_id = $1 AND recipe_id = $2
        RETURNING rating
        "#,
    )
    .bind(customer_id)
    .bind(recipe_id)
    .fetch_optional(&mut *tx)
    .await
    .context("delete rating")?;

    let summary = match removed {
        Some(value) => {
            let summary = current.without(value);
            store_summary(&mut tx, recipe_id, summary).await?;
            summary
        }
        None => current,
    };
    tx.commit().await.context("commit tx")?;

    Ok(RatingOutcome {
        summary,
        your_rating: None,
    })
}

pub async fn customer_rating(
    db: &PgPool,
    customer_id: Uuid,
    recipe_id: Uuid,
) -> anyhow::Result<Option<i32>> {
    let rating = sqlx::query_scalar::<_, i32>(
        "SELECT rating FROM recipe_ratings WHERE customer_id = $1 AND recipe_id = $2",
    )
    .bind(customer_id)
    .bind(recipe_id)
    .fetch_optional(db)
    .await
    .context("get customer rating")?;
    Ok(rating)
}
