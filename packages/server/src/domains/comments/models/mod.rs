pub mod comment;

pub use comment::{Comment, CommentFields, CommentFilter, CommentStatus};
