//! Paths the server redirects to, built when a response needs them.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    PostDetail(i64),
    Profile(String),
    Login { next: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Index => "/".to_string(),
            Route::PostDetail(id) => format!("/posts/{}/", id),
            Route::Profile(username) => format!("/profile/{}/", urlencoding::encode(username)),
            Route::Login { next } => format!("/auth/login/?next={}", urlencoding::encode(next)),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
