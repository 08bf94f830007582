use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{NoteListItem, NoteResponse, SaveNoteRequest};
use super::repo::{self, NoteError};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/notes", get(list_notes))
        .route("/recipes/:id/note", put(save_note).delete(delete_note))
}

impl From<NoteError> for ApiError {
    fn from(e: NoteError) -> Self {
        match e {
            NoteError::RecipeNotFound => ApiError::NotFound("Recipe not found".into()),
            NoteError::CustomerNotFound => ApiError::Unauthorized("Customer not found".into()),
            NoteError::Storage(e) => ApiError::Internal(e),
        }
    }
}

#[instrument(skip(state))]
pub async fn list_notes(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
) -> Result<Json<Vec<NoteListItem>>, ApiError> {
    let rows = repo::list_by_customer(&state.db, customer_id).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

#[instrument(skip(state, body))]
pub async fn save_note(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<SaveNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    let text = body.validated().map_err(|msg| {
        warn!(%customer_id, recipe_id = %id, "rejected note");
        ApiError::BadRequest(msg)
    })?;

    let note = repo::upsert(&state.db, customer_id, id, text).await?;
    info!(
        %customer_id,
        recipe_id = %id,
        updated = note.updated_at.is_some(),
        "note saved"
    );
    Ok(Json(note.into()))
}

/// Idempotent.
#[instrument(skip(state))]
pub async fn delete_note(
    State(state): State<AppState>,
    AuthUser(customer_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if repo::delete(&state.db, customer_id, id).await? {
        info!(%customer_id, recipe_id = %id, "note deleted");
    }
    Ok(StatusCode::NO_CONTENT)
}
