use axum::{
    extract::{Path, State},
    routing::put,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::aggregate::Stars;
use super::dto::{RateRequest, RatingResponse};
use super::repo::{self, RatingError};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/recipes/:id/rating", put(rate_recipe).delete(remove_rating))
}

impl From<RatingError> for ApiError {
    fn from(e: RatingError) -> Self {
        match e {
            RatingError::RecipeNotFound => ApiError::NotFound("Recipe not found".into()),
            RatingError::CustomerNotFound => ApiError::Unauthorized("Customer not found".into()),
            RatingError::Storage(e) => ApiError::Internal(e),
        }
    }
}

/// Range is checked before anything is written.
#[instrument(skip(state, body))]
pub async fn rate_recipe(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<RateRequest>,
) -> Result<Json<RatingResponse>, ApiError> {
    let stars = Stars::try_from(body.rating).map_err(|e| {
        warn!(%customer_id, recipe_id = %id, rating = body.rating, "rating out of range");
        ApiError::BadRequest(e.to_string())
    })?;

    let outcome = repo::rate(&state.db, customer_id, id, stars).await?;
    info!(
        %customer_id,
        recipe_id = %id,
        stars = stars.value(),
        mean = outcome.summary.mean,
        count = outcome.summary.count,
        "recipe rated"
    );
    Ok(Json(RatingResponse::new(id, outcome)))
}

#[instrument(skip(state))]
pub async fn remove_rating(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<RatingResponse>, ApiError> {
    let outcome = repo::remove(&state.db, customer_id, id).await?;
    info!(
        %customer_id,
        recipe_id = %id,
        mean = outcome.summary.mean,
        count = outcome.summary.count,
        "rating removed"
    );
    Ok(Json(RatingResponse::new(id, outcome)))
}
