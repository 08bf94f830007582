use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::repo::{self, FavoriteError, FavoriteItem};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route(
            "/recipes/:id/favorite",
            put(add_favorite).delete(remove_favorite),
        )
        .route("/recipes/:id/favorite/toggle", post(toggle_favorite))
}

#[derive(Debug, Serialize)]
pub struct FavoriteState {
    pub recipe_id: Uuid,
    pub favorited: bool,
}

impl From<FavoriteError> for ApiError {
    fn from(e: FavoriteError) -> Self {
        match e {
            FavoriteError::Duplicate => ApiError::Conflict(e.to_string()),
            FavoriteError::RecipeNotFound => ApiError::NotFound("Recipe not found".into()),
            FavoriteError::CustomerNotFound => ApiError::Unauthorized("Customer not found".into()),
            FavoriteError::Storage(e) => ApiError::Internal(e),
        }
    }
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
) -> Result<Json<Vec<FavoriteItem>>, ApiError> {
    Ok(Json(repo::list_by_customer(&state.db, customer_id).await?))
}

#[instrument(skip(state))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<FavoriteState>), ApiError> {
    repo::add(&state.db, customer_id, id).await.map_err(|e| {
        if matches!(e, FavoriteError::Duplicate) {
            warn!(%customer_id, recipe_id = %id, "duplicate favorite");
        }
        ApiError::from(e)
    })?;
    info!(%customer_id, recipe_id = %id, "favorite added");
    Ok((
        StatusCode::CREATED,
        Json(FavoriteState {
            recipe_id: id,
            favorited: true,
        }),
    ))
}

/// Idempotent.
#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::remove(&state.db, customer_id, id).await? {
        info!(%customer_id, recipe_id = %id, "favorite removed");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<FavoriteState>, ApiError> {
    let favorited = repo::toggle(&state.db, customer_id, id).await?;
    info!(%customer_id, recipe_id = %id, favorited, "favorite toggled");
    Ok(Json(FavoriteState {
        recipe_id: id,
        favorited,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_favorite_is_a_conflict() {
        assert_eq!(
            ApiError::from(FavoriteError::Duplicate).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::from(FavoriteError::RecipeNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(FavoriteError::CustomerNotFound).status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
