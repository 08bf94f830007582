use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A string that names none of an enum's variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Case-insensitive comparison that ignores spaces, hyphens and underscores,
/// so "gluten-free", "Gluten Free" and "glutenfree" all name `GlutenFree`.
fn loosely_eq(input: &str, name: &str) -> bool {
    let mut normalized = input
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .map(|c| c.to_ascii_lowercase());
    let mut expected = name.chars().map(|c| c.to_ascii_lowercase());
    loop {
        match (normalized.next(), expected.next()) {
            (None, None) => return true,
            (Some(a), Some(b)) if a == b => continue,
            _ => return false,
        }
    }
}

macro_rules! named_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal, [$($variant:ident),+ $(,)?]) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| loosely_eq(s, v.as_str()))
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

named_enum!(
    Cuisine,
    "cuisine",
    [
        Italian,
        Mexican,
        Chinese,
        Indian,
        Japanese,
        Thai,
        French,
        Mediterranean,
        American,
        Greek,
        Other,
    ]
);

named_enum!(Difficulty, "difficulty", [Easy, Medium, Hard]);

named_enum!(
    /// One of the four independent dietary-suitability flags.
    DietaryFlag,
    "dietary flag",
    [Vegetarian, Vegan, GlutenFree, DairyFree]
);

impl Cuisine {
    /// Stored cuisines outside the known set fall back to `Other`.
    pub fn from_stored(s: &str) -> Self {
        s.parse().unwrap_or(Cuisine::Other)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryInfo {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
}

impl DietaryInfo {
    pub fn has(&self, flag: DietaryFlag) -> bool {
        match flag {
            DietaryFlag::Vegetarian => self.vegetarian,
            DietaryFlag::Vegan => self.vegan,
            DietaryFlag::GlutenFree => self.gluten_free,
            DietaryFlag::DairyFree => self.dairy_free,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recipe {
    pub id: Uuid,
    pub name: String,
    pub image_url: Option<String>,
    pub cuisine: Cuisine,
    pub difficulty: Difficulty,
    pub prep_time: i32,
    pub cook_time: i32,
    pub servings: i32,
    /// Mean of all customer ratings, 0 when unrated.
    pub rating: f64,
    pub rating_count: i32,
    pub dietary: Option<DietaryInfo>,
}

impl Recipe {
    pub fn total_time(&self) -> i32 {
        self.prep_time + self.cook_time
    }

    /// Recipes without dietary info satisfy no dietary flag.
    pub fn is(&self, flag: DietaryFlag) -> bool {
        self.dietary.map_or(false, |d| d.has(flag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub step_number: i32,
    pub text: String,
}
