use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{NoteWithRecipeRow, RecipeNote};

pub const MAX_NOTE_LEN: usize = 4000;

#[derive(Debug, Deserialize)]
pub struct SaveNoteRequest {
    pub text: String,
}

impl SaveNoteRequest {
    /// Trimmed text, or a message explaining why it cannot be saved.
    pub fn validated(&self) -> Result<&str, String> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err("Note text is required".into());
        }
        if text.chars().count() > MAX_NOTE_LEN {
            return Err(format!("Note is longer than {MAX_NOTE_LEN} characters"));
        }
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
pub struct NoteResponse {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl From<RecipeNote> for NoteResponse {
    fn from(n: RecipeNote) -> Self {
        Self {
            id: n.id,
            recipe_id: n.recipe_id,
            text: n.note_text,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl From<NoteWithRecipeRow> for NoteListItem {
    fn from(r: NoteWithRecipeRow) -> Self {
        Self {
            id: r.id,
            recipe_id: r.recipe_id,
            recipe_name: r.recipe_name,
            text: r.note_text,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}
