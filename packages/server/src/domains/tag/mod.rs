//! Tag domain - the flat tag vocabulary attached to posts

pub mod actions;
pub mod data;
pub mod models;

pub use data::TagInput;
pub use models::{PostTag, Tag, TagFields};
