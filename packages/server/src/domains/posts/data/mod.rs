pub mod types;

pub use types::{ListPostsQuery, PostInput, SearchInput};
