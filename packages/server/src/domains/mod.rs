pub mod admin;
pub mod auth;
pub mod comments;
pub mod media;
pub mod posts;
pub mod tag;
