//! Meal catalog rules: skill levels, filter normalisation, slugs.

use serde::Deserialize;

use crate::error::CoreError;

pub const SKILL_EASY: &str = "Easy";
pub const SKILL_INTERMEDIATE: &str = "Intermediate";
pub const SKILL_ADVANCED: &str = "Advanced";

const ALL_SKILL_LEVELS: &[&str] = &[SKILL_EASY, SKILL_INTERMEDIATE, SKILL_ADVANCED];

/// Sentinel the UI sends for "no cuisine filter".
pub const CUISINE_ANY: &str = "Any";

/// Sentinel the UI sends for "no dietary filter".
pub const DIET_NONE: &str = "none";

/// Raw catalog query string (`GET /api/meals?...`).
///
/// Every field is optional and arrives as a string; `time_limit` is parsed
/// leniently so a malformed value behaves like "no limit".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealQuery {
    pub age_range: Option<String>,
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub skill: Option<String>,
    pub time_limit: Option<String>,
    pub search: Option<String>,
}

/// Normalised filters ready for the repository layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealFilters {
    pub age_range: Option<String>,
    pub diet: Option<String>,
    pub cuisine: Option<String>,
    pub skill: Option<String>,
    pub max_minutes: Option<i32>,
    pub search: Option<String>,
}

impl MealFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<MealQuery> for MealFilters {
    fn from(query: MealQuery) -> Self {
        Self {
            age_range: non_blank(query.age_range),
            diet: non_blank(query.diet).filter(|d| d != DIET_NONE),
            cuisine: non_blank(query.cuisine).filter(|c| c != CUISINE_ANY),
            skill: non_blank(query.skill),
            max_minutes: non_blank(query.time_limit)
                .and_then(|t| t.parse::<i32>().ok())
                .filter(|t| *t > 0),
            search: non_blank(query.search),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Validate an optional skill level.
pub fn validate_skill_level(skill: Option<&str>) -> Result<(), CoreError> {
    match skill {
        None => Ok(()),
        Some(s) if ALL_SKILL_LEVELS.contains(&s) => Ok(()),
        Some(s) => Err(CoreError::Validation(format!(
            "Invalid skill level '{s}'. Must be one of: {}",
            ALL_SKILL_LEVELS.join(", ")
        ))),
    }
}

/// Build a URL slug from a meal title: lowercase ASCII alphanumerics
/// separated by single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Whether a stored image URL counts as "has an image".
pub fn has_image(image_url: Option<&str>) -> bool {
    image_url.is_some_and(|url| !url.trim().is_empty())
}
