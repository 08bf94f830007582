use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Customer record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,                   // unique customer ID
    pub email: String,              // login email
    #[serde(skip_serializing)]
    pub password_hash: String,      // Argon2 hash, not exposed in JSON
    pub first_name: String,
    pub last_name: String,
    pub created_at: OffsetDateTime, // creation timestamp
}
