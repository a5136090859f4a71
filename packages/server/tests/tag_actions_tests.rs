//! Tag actions: ordering, validation, uniqueness, and deletion while linked.

mod common;

use crate::common::*;
use blog_core::common::{ActionError, TagId};
use blog_core::domains::posts::actions::{create_post, get_post_by_id, get_post_by_slug};
use blog_core::domains::posts::PostInput;
use blog_core::domains::tag::actions::{create_tag, delete_tag, list_tags};
use blog_core::domains::tag::TagInput;
use tokio_test::assert_ok;

#[tokio::test]
async fn tags_are_listed_by_name() {
    let harness = TestHarness::new();
    for (name, slug) in [("Web", "web"), ("Databases", "databases"), ("Rust", "rust")] {
        create_test_tag(&harness.deps, name, slug).await;
    }

    let tags = list_tags(&harness.deps).await.unwrap();

    let names: Vec<_> = tags.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Databases", "Rust", "Web"]);
}

#[tokio::test]
async fn invalid_tag_is_rejected() {
    let harness = TestHarness::new();

    let err = create_tag(TagInput::new("", "Not A Slug"), &harness.deps)
        .await
        .unwrap_err();

    let fields = err.field_errors().unwrap();
    assert_eq!(fields["name"], vec!["Tag name is required"]);
    assert_eq!(
        fields["slug"],
        vec!["Slug can only contain lowercase letters, numbers, and hyphens"]
    );
    assert!(list_tags(&harness.deps).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_slug_is_left_to_the_store() {
    let harness = TestHarness::new();
    create_test_tag(&harness.deps, "Rust", "rust").await;

    // Same name with a different slug is fine
    assert_ok!(create_tag(TagInput::new("Rust", "rust-lang"), &harness.deps).await);

    let err = create_tag(TagInput::new("Rust again", "rust"), &harness.deps)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::Store(ref msg) if msg.contains("tags_slug_key")));
}

#[tokio::test]
async fn deleting_a_linked_tag_drops_it_and_its_links_only() {
    let harness = TestHarness::new();
    let rust = create_test_tag(&harness.deps, "Rust", "rust").await;
    let web = create_test_tag(&harness.deps, "Web", "web").await;
    let post = create_post(
        PostInput {
            tag_ids: Some(vec![rust.id.to_string(), web.id.to_string()]),
            ..published_post_input("linked")
        },
        &harness.deps,
    )
    .await
    .unwrap();

    assert_ok!(delete_tag(rust.id, &harness.deps).await);

    let tags = list_tags(&harness.deps).await.unwrap();
    assert!(tags.iter().all(|t| t.id != rust.id));

    let post = get_post_by_id(post.id, &harness.deps).await.unwrap();
    assert_eq!(post.tags, vec![web.clone()]);

    // Public page reflects the deletion as well
    let page = get_post_by_slug("linked", &harness.deps).await.unwrap();
    assert_eq!(page.tags, vec![web]);
}

#[tokio::test]
async fn deleting_a_tag_refreshes_cached_post_pages() {
    let harness = TestHarness::new();
    let rust = create_test_tag(&harness.deps, "Rust", "rust").await;
    create_post(
        PostInput {
            tag_ids: Some(vec![rust.id.to_string()]),
            ..published_post_input("already-read")
        },
        &harness.deps,
    )
    .await
    .unwrap();
    let cached = get_post_by_slug("already-read", &harness.deps).await.unwrap();
    assert_eq!(cached.tags, vec![rust.clone()]);

    delete_tag(rust.id, &harness.deps).await.unwrap();

    let page = get_post_by_slug("already-read", &harness.deps).await.unwrap();
    assert!(page.tags.is_empty());
}

#[tokio::test]
async fn deleting_a_missing_tag_succeeds() {
    let harness = TestHarness::new();
    assert_ok!(delete_tag(TagId::new(), &harness.deps).await);
}
