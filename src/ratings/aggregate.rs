//! Denormalised rating summary kept on each recipe.
//!
//! Adds and updates recompute the summary from every stored rating; removals
//! use the incremental formula, which must agree with a full recomputation.

use serde::Serialize;
use thiserror::Error;

pub const MIN_STARS: i32 = 1;
pub const MAX_STARS: i32 = 5;

/// A customer rating, always within `MIN_STARS..=MAX_STARS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Stars(i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating must be between 1 and 5, got {0}")]
pub struct StarsOutOfRange(pub i64);

impl Stars {
    pub fn value(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for Stars {
    type Error = StarsOutOfRange;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        if (i64::from(MIN_STARS)..=i64::from(MAX_STARS)).contains(&v) {
            Ok(Stars(v as i32))
        } else {
            Err(StarsOutOfRange(v))
        }
    }
}

/// Mean and count of a recipe's ratings. `(0, 0)` when unrated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub mean: f64,
    pub count: i32,
}

impl RatingSummary {
    pub const EMPTY: RatingSummary = RatingSummary {
        mean: 0.0,
        count: 0,
    };

    /// Summary of exactly `ratings`.
    pub fn recompute(ratings: &[i32]) -> Self {
        if ratings.is_empty() {
            return Self::EMPTY;
        }
        let sum: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
        let count = ratings.len() as i32;
        Self {
            mean: clamp_mean(sum as f64 / f64::from(count)),
            count,
        }
    }

    /// Summary after removing one rating of `removed`, without rereading the
    /// remaining ratings. Removing the last rating resets to `(0, 0)`.
    pub fn without(self, removed: i32) -> Self {
        if self.count <= 1 {
            return Self::EMPTY;
        }
        let remaining = self.count - 1;
        let mean = (self.mean * f64::from(self.count) - f64::from(removed)) / f64::from(remaining);
        Self {
            mean: clamp_mean(mean),
            count: remaining,
        }
    }
}

// absorbs float drift from repeated incremental removals
fn clamp_mean(mean: f64) -> f64 {
    mean.clamp(0.0, f64::from(MAX_STARS))
}
