pub mod auth;
pub mod comment;
pub mod feed;
pub mod pages;
pub mod post;
pub mod profile;
