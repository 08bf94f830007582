use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::RatingOutcome;

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i64,
}

/// Aggregate state returned by both rate and remove.
#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub recipe_id: Uuid,
    pub rating: f64,
    pub rating_count: i32,
    pub your_rating: Option<i32>,
}

impl RatingResponse {
    pub fn new(recipe_id: Uuid, outcome: RatingOutcome) -> Self {
        Self {
            recipe_id,
            rating: outcome.summary.mean,
            rating_count: outcome.summary.count,
            your_rating: outcome.your_rating,
        }
    }
}
