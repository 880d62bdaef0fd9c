use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;
use crate::domain::validation::{FieldErrors, REQUIRED};

pub const NAME_MAX_CHARS: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLocation {
    pub name: String,
    pub is_published: bool,
}

impl NewLocation {
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::default();
        if self.name.trim().is_empty() {
            errors.add("name", REQUIRED);
        }
        errors.max_chars("name", &self.name, NAME_MAX_CHARS);
        errors.into_result()
    }
}
