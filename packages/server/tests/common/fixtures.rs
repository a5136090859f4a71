//! Test fixtures for creating test data.
//!
//! Fixtures go through the actions so seeded rows obey the same validation
//! as real ones.

use blog_core::common::PostId;
use blog_core::domains::comments::actions::submit_comment;
use blog_core::domains::comments::{Comment, CommentInput};
use blog_core::domains::posts::actions::create_post;
use blog_core::domains::posts::{Post, PostInput};
use blog_core::domains::tag::actions::create_tag;
use blog_core::domains::tag::{Tag, TagInput};
use blog_core::kernel::ServerDeps;
use uuid::Uuid;

/// Slug unique across test runs sharing a database
pub fn unique_slug(prefix: &str) -> String {
    format!("{}-{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

/// Smallest valid post: draft, no tags
pub fn post_input(slug: &str) -> PostInput {
    PostInput {
        title: "Hello".to_string(),
        slug: slug.to_string(),
        content: "0123456789".to_string(),
        ..Default::default()
    }
}

pub fn published_post_input(slug: &str) -> PostInput {
    PostInput {
        published: true,
        ..post_input(slug)
    }
}

pub async fn create_published_post(deps: &ServerDeps, slug: &str) -> Post {
    create_post(published_post_input(slug), deps)
        .await
        .expect("Failed to create published post")
}

pub async fn create_draft_post(deps: &ServerDeps, slug: &str) -> Post {
    create_post(post_input(slug), deps)
        .await
        .expect("Failed to create draft post")
}

pub async fn create_test_tag(deps: &ServerDeps, name: &str, slug: &str) -> Tag {
    create_tag(TagInput::new(name, slug), deps)
        .await
        .expect("Failed to create tag")
}

pub fn comment_input(post_id: PostId) -> CommentInput {
    CommentInput {
        post_id: post_id.to_string(),
        author_name: "Ada Lovelace".to_string(),
        author_email: "ada@example.com".to_string(),
        content: "Thanks, this cleared things up.".to_string(),
    }
}

pub async fn create_pending_comment(deps: &ServerDeps, post_id: PostId) -> Comment {
    submit_comment(comment_input(post_id), deps)
        .await
        .expect("Failed to submit comment")
}
