//! Comments domain - reader comments and their moderation

pub mod actions;
pub mod data;
pub mod models;

pub use data::{CommentInput, CommentListQuery};
pub use models::{Comment, CommentStatus};
