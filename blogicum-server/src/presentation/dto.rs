use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::category::Category;
use crate::domain::comment::CommentView;
use crate::domain::error::DomainError;
use crate::domain::location::Location;
use crate::domain::post::{Post, PostDraft, PostView, TITLE_MAX_CHARS};
use crate::domain::query::Page;
use crate::domain::user::{ProfileUpdate, User};
use crate::domain::validation::{
    EMAIL_MAX_CHARS, FieldErrors, REQUIRED, is_valid_email, is_valid_username,
};

pub const USERNAME_MAX_CHARS: usize = 150;
pub const PASSWORD_MIN_CHARS: usize = 8;
const NAME_MAX_CHARS: usize = 150;

const USERNAME_RULES: &str =
    "Enter a valid username. It may contain only letters, digits and @/./+/-/_ characters.";

// ======================= AUTH =======================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Checked registration fields: `(username, email, password)`.
pub type Registration = (String, String, String);

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, DomainError> {
        let mut errors = FieldErrors::default();
        let username = errors.required("username", self.username);
        if let Some(username) = &username {
            check_username(&mut errors, username);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        let password = errors.required("password", self.password);
        if let Some(password) = &password {
            if password.chars().count() < PASSWORD_MIN_CHARS {
                errors.add(
                    "password",
                    format!("This password is too short. It must contain at least {PASSWORD_MIN_CHARS} characters."),
                );
            }
        }
        let (Some(username), Some(password)) = (username, password) else {
            return Err(DomainError::Validation(errors));
        };
        errors.into_result()?;
        Ok((username, self.email.unwrap_or_default(), password))
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(rename = "token_type")]
    pub token_type: String,
}

impl AuthResponse {
    pub fn bearer(access_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            expires_in,
            token_type: "Bearer".to_string(),
        }
    }
}

// ======================= POSTS =======================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostForm {
    pub title: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub pub_date: Option<DateTime<Utc>>,
    #[serde(default = "default_published")]
    pub is_published: bool,
    pub category: Option<i64>,
    #[serde(default)]
    pub location: Option<i64>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PostForm {
    /// A missing `pub_date` means "publish at `now`".
    pub fn validate(self, now: DateTime<Utc>) -> Result<PostDraft, DomainError> {
        let mut errors = FieldErrors::default();
        let title = errors.required("title", self.title);
        if let Some(title) = &title {
            errors.max_chars("title", title, TITLE_MAX_CHARS);
        }
        let text = errors.required("text", self.text);
        if self.category.is_none() {
            errors.add("category", REQUIRED);
        }
        let (Some(title), Some(text)) = (title, text) else {
            return Err(DomainError::Validation(errors));
        };
        errors.into_result()?;

        Ok(PostDraft {
            title,
            text,
            pub_date: self.pub_date.unwrap_or(now),
            is_published: self.is_published,
            category_id: self.category,
            location_id: self.location,
            image: self.image.filter(|image| !image.trim().is_empty()),
        })
    }
}

impl From<&Post> for PostForm {
    fn from(post: &Post) -> Self {
        Self {
            title: Some(post.title.clone()),
            text: Some(post.text.clone()),
            pub_date: Some(post.pub_date),
            is_published: post.is_published,
            category: post.category_id,
            location: post.location_id,
            image: post.image.clone(),
        }
    }
}

/// What a post form needs to render: current values (when editing) and the
/// selectable relations.
#[derive(Debug, Serialize, Deserialize)]
pub struct PostFormResponse {
    pub form: Option<PostForm>,
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostView,
    pub comments: Vec<CommentView>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryFeedResponse {
    pub category: Category,
    pub posts: Page<PostView>,
}

// ======================= COMMENTS =======================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub text: Option<String>,
}

impl CommentForm {
    pub fn validate(self) -> Result<String, DomainError> {
        let mut errors = FieldErrors::default();
        errors
            .required("text", self.text)
            .ok_or(DomainError::Validation(errors))
    }
}

// ======================= PROFILES =======================

#[derive(Debug, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub date_joined: DateTime<Utc>,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            date_joined: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    pub posts: Page<PostView>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl ProfileForm {
    pub fn validate(self) -> Result<ProfileUpdate, DomainError> {
        let mut errors = FieldErrors::default();
        if let Some(username) = &self.username {
            check_username(&mut errors, username);
        }
        if let Some(email) = &self.email {
            check_email(&mut errors, email);
        }
        for (field, value) in [("first_name", &self.first_name), ("last_name", &self.last_name)] {
            if let Some(value) = value {
                errors.max_chars(field, value, NAME_MAX_CHARS);
            }
        }
        errors.into_result()?;
        Ok(ProfileUpdate {
            username: self.username,
            email: self.email.map(|email| email.to_lowercase()),
            first_name: self.first_name,
            last_name: self.last_name,
        })
    }
}

impl From<&User> for ProfileForm {
    fn from(user: &User) -> Self {
        Self {
            username: Some(user.username.clone()),
            email: Some(user.email.clone()),
            first_name: Some(user.first_name.clone()),
            last_name: Some(user.last_name.clone()),
        }
    }
}

// ======================= PAGES =======================

#[derive(Debug, Serialize, Deserialize)]
pub struct PageTitle {
    pub title: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

// ======================= Utils =======================
fn default_published() -> bool {
    true
}

fn check_username(errors: &mut FieldErrors, username: &str) {
    if !is_valid_username(username) {
        errors.add("username", USERNAME_RULES);
    }
    errors.max_chars("username", username, USERNAME_MAX_CHARS);
}

/// Blank is allowed; anything else must look like an address.
fn check_email(errors: &mut FieldErrors, email: &str) {
    if email.is_empty() {
        return;
    }
    if !is_valid_email(email) {
        errors.add("email", "Enter a valid email address.");
    }
    errors.max_chars("email", email, EMAIL_MAX_CHARS);
}
