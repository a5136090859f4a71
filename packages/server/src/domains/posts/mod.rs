//! Posts domain - authoring, listing, search, and view counting for blog posts

pub mod actions;
pub mod data;
pub mod models;
pub mod seo;

pub use data::{ListPostsQuery, PostInput, SearchInput};
pub use models::{Post, PostWithTags};
pub use seo::PostMetadata;
