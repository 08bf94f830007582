//! Recipe filtering and pagination.
//!
//! Every supplied criterion becomes a predicate over [`Recipe`]; a recipe is
//! kept only when all of them hold, so the order in which criteria are added
//! never changes the result.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::model::{Cuisine, DietaryFlag, Difficulty, Recipe};

/// Cook-time bound in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookTime {
    /// `<N`: strictly less than N.
    Under(i32),
    /// `>N`: strictly greater than N.
    Over(i32),
    /// `A-B`: inclusive range.
    Between(i32, i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid cook time filter {0:?}, expected <N, >N or A-B")]
pub struct InvalidCookTime(pub String);

impl FromStr for CookTime {
    type Err = InvalidCookTime;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCookTime(s.to_string());
        let minutes = |v: &str| v.trim().parse::<i32>().map_err(|_| invalid());
        let trimmed = s.trim();

        if let Some(max) = trimmed.strip_prefix('<') {
            return Ok(CookTime::Under(minutes(max)?));
        }
        if let Some(min) = trimmed.strip_prefix('>') {
            return Ok(CookTime::Over(minutes(min)?));
        }
        if let Some((min, max)) = trimmed.split_once('-') {
            return Ok(CookTime::Between(minutes(min)?, minutes(max)?));
        }
        Err(invalid())
    }
}

impl CookTime {
    pub fn contains(&self, minutes: i32) -> bool {
        match *self {
            CookTime::Under(max) => minutes < max,
            CookTime::Over(min) => minutes > min,
            CookTime::Between(min, max) => (min..=max).contains(&minutes),
        }
    }
}

/// A single predicate over a recipe.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Cuisine(Cuisine),
    Difficulty(Difficulty),
    MinRating(f64),
    CookTime(CookTime),
    Dietary(DietaryFlag),
    /// Matches no recipe; produced by a malformed cook-time filter.
    Nothing,
}

impl Criterion {
    pub fn matches(&self, recipe: &Recipe) -> bool {
        match self {
            Criterion::Cuisine(c) => recipe.cuisine == *c,
            Criterion::Difficulty(d) => recipe.difficulty == *d,
            Criterion::MinRating(min) => recipe.rating >= *min,
            Criterion::CookTime(range) => range.contains(recipe.cook_time),
            Criterion::Dietary(flag) => recipe.is(*flag),
            Criterion::Nothing => false,
        }
    }
}

/// Conjunction of criteria. An empty filter keeps every recipe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecipeFilter {
    criteria: Vec<Criterion>,
}

fn supplied(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

impl RecipeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, criterion: Criterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    /// Exact cuisine match; an unrecognised name applies no filter.
    pub fn cuisine(self, raw: Option<&str>) -> Self {
        match supplied(raw).map(str::parse::<Cuisine>) {
            Some(Ok(c)) => self.and(Criterion::Cuisine(c)),
            Some(Err(e)) => {
                debug!(error = %e, "ignoring cuisine filter");
                self
            }
            None => self,
        }
    }

    /// Exact difficulty match; an unrecognised name applies no filter.
    pub fn difficulty(self, raw: Option<&str>) -> Self {
        match supplied(raw).map(str::parse::<Difficulty>) {
            Some(Ok(d)) => self.and(Criterion::Difficulty(d)),
            Some(Err(e)) => {
                debug!(error = %e, "ignoring difficulty filter");
                self
            }
            None => self,
        }
    }

    /// Keeps recipes rated at least `min`. Thresholds `<= 0` (and NaN) apply no filter.
    pub fn min_rating(self, min: Option<f64>) -> Self {
        match min {
            Some(m) if m > 0.0 => self.and(Criterion::MinRating(m)),
            _ => self,
        }
    }

    /// `<N`, `>N` or `A-B`. Any other form matches nothing.
    pub fn cook_time(self, raw: Option<&str>) -> Self {
        match supplied(raw).map(str::parse::<CookTime>) {
            Some(Ok(range)) => self.and(Criterion::CookTime(range)),
            Some(Err(e)) => {
                debug!(error = %e, "cook time filter matches nothing");
                self.and(Criterion::Nothing)
            }
            None => self,
        }
    }

    /// Dietary flag, case-insensitive; an unrecognised flag applies no filter.
    pub fn dietary(self, raw: Option<&str>) -> Self {
        match supplied(raw).map(str::parse::<DietaryFlag>) {
            Some(Ok(flag)) => self.and(Criterion::Dietary(flag)),
            Some(Err(e)) => {
                debug!(error = %e, "ignoring dietary filter");
                self
            }
            None => self,
        }
    }

    pub fn matches(&self, recipe: &Recipe) -> bool {
        self.criteria.iter().all(|c| c.matches(recipe))
    }

    /// Keeps the matching recipes, preserving input order.
    pub fn apply<I>(&self, recipes: I) -> Vec<Recipe>
    where
        I: IntoIterator<Item = Recipe>,
    {
        recipes.into_iter().filter(|r| self.matches(r)).collect()
    }
}

/// Pagination metadata returned with every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

/// Cuts one 1-indexed page out of `items`. Pages below 1 are read as page 1;
/// pages past the end are empty.
pub fn paginate<T>(items: Vec<T>, page: i64, page_size: i64) -> (Vec<T>, PageInfo) {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total_items = items.len() as i64;
    let total_pages = (total_items + page_size - 1) / page_size;

    let skip = usize::try_from((page - 1).saturating_mul(page_size)).unwrap_or(usize::MAX);
    let take = usize::try_from(page_size).unwrap_or(usize::MAX);
    let rows = items.into_iter().skip(skip).take(take).collect();

    (
        rows,
        PageInfo {
            page,
            page_size,
            total_items,
            total_pages,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipes::model::DietaryInfo;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn recipe(
        name: &str,
        cuisine: Cuisine,
        difficulty: Difficulty,
        cook_time: i32,
        rating: f64,
        dietary: Option<DietaryInfo>,
    ) -> Recipe {
        Recipe {
            id: Uuid::new_v4(),
            name: name.into(),
            image_url: None,
            cuisine,
            difficulty,
            prep_time: 10,
            cook_time,
            servings: 4,
            rating,
            rating_count: if rating > 0.0 { 3 } else { 0 },
            dietary,
        }
    }

    fn vegan() -> Option<DietaryInfo> {
        Some(DietaryInfo {
            vegetarian: true,
            vegan: true,
            gluten_free: false,
            dairy_free: true,
        })
    }

    fn catalogue() -> Vec<Recipe> {
        vec![
            recipe("Margherita", Cuisine::Italian, Difficulty::Easy, 15, 4.5, None),
            recipe("Risotto", Cuisine::Italian, Difficulty::Hard, 40, 4.0, None),
            recipe("Minestrone", Cuisine::Italian, Difficulty::Easy, 45, 3.5, vegan()),
            recipe("Tacos", Cuisine::Mexican, Difficulty::Easy, 20, 4.8, None),
            recipe("Mole", Cuisine::Mexican, Difficulty::Hard, 120, 0.0, None),
            recipe("Dal", Cuisine::Indian, Difficulty::Medium, 30, 4.2, vegan()),
        ]
    }

    fn names(recipes: &[Recipe]) -> Vec<&str> {
        recipes.iter().map(|r| r.name.as_str()).collect()
    }

    fn ids(recipes: &[Recipe]) -> HashSet<Uuid> {
        recipes.iter().map(|r| r.id).collect()
    }

    #[test]
    fn parses_cook_time_forms() {
        assert_eq!("<30".parse(), Ok(CookTime::Under(30)));
        assert_eq!(">60".parse(), Ok(CookTime::Over(60)));
        assert_eq!("30-60".parse(), Ok(CookTime::Between(30, 60)));
        assert_eq!(" 30 - 60 ".parse(), Ok(CookTime::Between(30, 60)));
    }

    #[test]
    fn rejects_malformed_cook_time() {
        for raw in ["abc", "30", "<", ">x", "a-b", "10-", "10-20-30", "=30"] {
            assert!(raw.parse::<CookTime>().is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn cook_time_bounds() {
        assert!(CookTime::Under(30).contains(29));
        assert!(!CookTime::Under(30).contains(30));
        assert!(CookTime::Over(60).contains(61));
        assert!(!CookTime::Over(60).contains(60));
        assert!(CookTime::Between(30, 60).contains(30));
        assert!(CookTime::Between(30, 60).contains(60));
        assert!(!CookTime::Between(30, 60).contains(61));
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let all = catalogue();
        assert_eq!(RecipeFilter::new().apply(all.clone()), all);
    }

    #[test]
    fn cook_time_under_keeps_only_shorter_recipes() {
        let kept = RecipeFilter::new().cook_time(Some("<30")).apply(catalogue());
        assert_eq!(names(&kept), ["Margherita", "Tacos"]);
        assert!(kept.iter().all(|r| r.cook_time < 30));
    }

    #[test]
    fn malformed_cook_time_matches_nothing() {
        let kept = RecipeFilter::new().cook_time(Some("abc")).apply(catalogue());
        assert!(kept.is_empty());
    }

    #[test]
    fn blank_inputs_are_not_supplied() {
        let f = RecipeFilter::new()
            .cuisine(Some(""))
            .difficulty(Some("  "))
            .cook_time(Some(""))
            .dietary(None);
        assert!(f.criteria().is_empty());
    }

    #[test]
    fn unknown_enum_names_apply_no_filter() {
        let f = RecipeFilter::new()
            .cuisine(Some("Atlantean"))
            .difficulty(Some("Impossible"))
            .dietary(Some("carnivore"));
        assert!(f.criteria().is_empty());
        assert_eq!(f.apply(catalogue()).len(), catalogue().len());
    }

    #[test]
    fn min_rating_threshold() {
        let kept = RecipeFilter::new().min_rating(Some(4.2)).apply(catalogue());
        assert_eq!(names(&kept), ["Margherita", "Tacos", "Dal"]);

        for none in [Some(0.0), Some(-1.0), Some(f64::NAN), None] {
            assert!(RecipeFilter::new().min_rating(none).criteria().is_empty());
        }
    }

    #[test]
    fn dietary_is_case_insensitive_and_skips_missing_info() {
        let kept = RecipeFilter::new().dietary(Some("VEGAN")).apply(catalogue());
        assert_eq!(names(&kept), ["Minestrone", "Dal"]);

        let kept = RecipeFilter::new().dietary(Some("glutenfree")).apply(catalogue());
        assert!(kept.is_empty());
    }

    #[test]
    fn criteria_intersect_regardless_of_order() {
        let all = catalogue();
        let a = RecipeFilter::new()
            .cuisine(Some("Italian"))
            .difficulty(Some("Easy"))
            .apply(all.clone());
        let b = RecipeFilter::new()
            .difficulty(Some("Easy"))
            .cuisine(Some("Italian"))
            .apply(all.clone());
        assert_eq!(ids(&a), ids(&b));
        assert_eq!(ids(&a).len(), 2);
        assert_eq!(names(&a), ["Margherita", "Minestrone"]);
    }

    #[test]
    fn all_criteria_hold_simultaneously() {
        let kept = RecipeFilter::new()
            .cuisine(Some("italian"))
            .difficulty(Some("easy"))
            .min_rating(Some(3.0))
            .cook_time(Some("30-60"))
            .dietary(Some("vegetarian"))
            .apply(catalogue());
        assert_eq!(names(&kept), ["Minestrone"]);
    }

    #[test]
    fn paginates_twenty_five_items_in_pages_of_twelve() {
        let items: Vec<u32> = (1..=25).collect();

        let (first, info) = paginate(items.clone(), 1, 12);
        assert_eq!(first.len(), 12);
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.total_items, 25);

        let (last, info) = paginate(items.clone(), 3, 12);
        assert_eq!(last, vec![25]);
        assert_eq!(info.page, 3);

        let (past_end, _) = paginate(items, 4, 12);
        assert!(past_end.is_empty());
    }

    #[test]
    fn page_below_one_reads_first_page() {
        let (rows, info) = paginate(vec![1, 2, 3], 0, 2);
        assert_eq!(rows, vec![1, 2]);
        assert_eq!(info.page, 1);

        let (_, info) = paginate(Vec::<u8>::new(), -3, 12);
        assert_eq!(info.total_pages, 0);
        assert_eq!(info.page, 1);
    }
}
