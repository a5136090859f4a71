pub mod post;

pub use post::{Post, PostFields, PostFilter, PostStats, PostWithTags};
