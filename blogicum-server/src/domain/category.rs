use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::validation::{FieldErrors, REQUIRED, is_valid_slug};

pub const TITLE_MAX_CHARS: usize = 256;
pub const SLUG_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub is_published: bool,
}

impl NewCategory {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        if self.title.trim().is_empty() {
            errors.add("title", REQUIRED);
        }
        errors.max_chars("title", &self.title, TITLE_MAX_CHARS);
        if self.description.trim().is_empty() {
            errors.add("description", REQUIRED);
        }
        if !is_valid_slug(&self.slug) {
            errors.add(
                "slug",
                "Use only Latin letters, digits, hyphens and underscores.",
            );
        }
        errors.max_chars("slug", &self.slug, SLUG_MAX_CHARS);
        errors.into_result()
    }
}
