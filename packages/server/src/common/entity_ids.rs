//! Typed ID aliases for every blog entity.

pub use super::id::Id;

/// Marker type for blog posts.
pub struct Post;

/// Marker type for tags.
pub struct Tag;

/// Marker type for reader comments.
pub struct Comment;

pub type PostId = Id<Post>;
pub type TagId = Id<Tag>;
pub type CommentId = Id<Comment>;
