use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// One customer's note on one recipe.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeNote {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub recipe_id: Uuid,
    pub note_text: String,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

/// Note joined with the name of the recipe it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct NoteWithRecipeRow {
    pub id: Uuid,
    pub recipe_id: Uuid,
    pub recipe_name: String,
    pub note_text: String,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}
