use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{ListRecipesQuery, PersonalRecipeState, RecipeDetails, RecipeListResponse};
use super::filter::paginate;
use super::repo;
use crate::{auth::AuthUser, error::ApiError, favorites, notes, ratings, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe).delete(delete_recipe))
        .route("/recipes/:id/personal", get(get_personal_state))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(q): Query<ListRecipesQuery>,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let filter = q.filter();
    let all = repo::list_all(&state.db).await?;
    let matching = filter.apply(all);
    let (page, pagination) = paginate(matching, q.page(), state.config.page_size);

    Ok(Json(RecipeListResponse {
        recipes: page.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RecipeDetails>, ApiError> {
    let details = repo::find_with_parts(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Recipe not found".into()))?;
    Ok(Json(details.into()))
}

/// Idempotent: deleting a missing recipe still answers 204.
#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete(&state.db, id).await? {
        info!(%customer_id, recipe_id = %id, "recipe deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn get_personal_state(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PersonalRecipeState>, ApiError> {
    if repo::find(&state.db, id).await?.is_none() {
        return Err(ApiError::NotFound("Recipe not found".into()));
    }

    let your_rating = ratings::repo::customer_rating(&state.db, customer_id, id).await?;
    let favorited = favorites::repo::is_favorite(&state.db, customer_id, id).await?;
    let note = notes::repo::find(&state.db, customer_id, id).await?;

    Ok(Json(PersonalRecipeState {
        recipe_id: id,
        your_rating,
        favorited,
        note: note.map(Into::into),
    }))
}
