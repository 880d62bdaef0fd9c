pub mod category;
pub mod comment;
pub mod error;
pub mod location;
pub mod ownership;
pub mod post;
pub mod query;
pub mod user;
pub mod validation;
pub mod visibility;
