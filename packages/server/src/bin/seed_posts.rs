//! Seeds the blog with sample posts for local development.
//!
//! Posts go through `create_post`, so they are validated exactly like posts
//! written in the admin editor. Existing slugs are reported and skipped.

use std::sync::Arc;

use anyhow::{Context, Result};
use blog_core::common::ActionError;
use blog_core::config::Config;
use blog_core::domains::auth::JwtService;
use blog_core::domains::posts::actions::create_post;
use blog_core::domains::posts::PostInput;
use blog_core::kernel::{PageCache, PostgresBlogStore, ServerDeps, StorageClient};
use clap::Parser;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "seed_posts")]
#[command(about = "Insert sample blog posts")]
struct Cli {
    /// Publish the seeded posts instead of leaving them as drafts
    #[arg(long)]
    publish: bool,
}

struct SamplePost {
    title: &'static str,
    slug: &'static str,
    excerpt: &'static str,
    content: &'static str,
}

const SAMPLE_POSTS: &[SamplePost] = &[
    SamplePost {
        title: "Building a Real-Time Chat Application with WebSockets",
        slug: "real-time-chat-websockets",
        excerpt: "A persistent, bidirectional channel between browser and server, from handshake to broadcast.",
        content: r#"# Building a Real-Time Chat Application with WebSockets

Polling over plain HTTP wastes requests. WebSockets keep one connection open in both directions, which is exactly what a chat room needs.

## The server

```rust
let (mut sender, mut receiver) = socket.split();
while let Some(Ok(message)) = receiver.next().await {
    broadcast.send(message)?;
}
```

Every connected client subscribes to the broadcast channel and forwards what it receives.
"#,
    },
    SamplePost {
        title: "Designing Postgres Schemas That Age Well",
        slug: "postgres-schemas-that-age-well",
        excerpt: "Constraints, foreign keys, and migrations that keep data honest as the product changes.",
        content: r#"# Designing Postgres Schemas That Age Well

Let the database enforce what must always be true: `UNIQUE` slugs, `CHECK` constraints on formats, and `ON DELETE CASCADE` where child rows have no meaning without their parent.

```sql
CREATE TABLE post_tags (
    post_id UUID REFERENCES posts(id) ON DELETE CASCADE,
    tag_id  UUID REFERENCES tags(id)  ON DELETE CASCADE,
    PRIMARY KEY (post_id, tag_id)
);
```
"#,
    },
    SamplePost {
        title: "Writing Tests You Can Trust",
        slug: "writing-tests-you-can-trust",
        excerpt: "Fast in-memory doubles for the common path, real containers for the edges.",
        content: r#"# Writing Tests You Can Trust

Keep infrastructure behind a trait and most tests never need a network. Save the container-backed tests for the behavior only the real database has.

```rust
#[tokio::test]
async fn drafts_are_hidden() {
    let deps = TestDependencies::new().into_deps();
    // ...
}
```
"#,
    },
];

/// Whole minutes at 200 words per minute, at least one
fn reading_time_minutes(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(200).max(1) as i32
}

/// Validation failures name each rejected field
fn describe_failure(err: &ActionError) -> String {
    match err.field_errors() {
        Some(fields) => fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect::<Vec<_>>()
            .join("; "),
        None => err.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,blog_core=info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    // Load config
    let config = Config::from_env()?;

    // Connect to database
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    println!("✓ Connected to database");

    let deps = ServerDeps::new(
        Arc::new(PostgresBlogStore::new(pool)),
        Arc::new(StorageClient::new(
            &config.storage_url,
            config.storage_service_key.clone(),
            config.storage_bucket.clone(),
        )),
        PageCache::new(config.page_cache_ttl),
        Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone())),
        config.admin_emails.clone(),
    );

    let mut created_count = 0;
    let mut skipped_count = 0;

    for (idx, sample) in SAMPLE_POSTS.iter().enumerate() {
        println!("[{}/{}] {}", idx + 1, SAMPLE_POSTS.len(), sample.slug);

        let input = PostInput {
            title: sample.title.to_string(),
            slug: sample.slug.to_string(),
            content: sample.content.to_string(),
            excerpt: Some(sample.excerpt.to_string()),
            published: cli.publish,
            reading_time_minutes: Some(reading_time_minutes(sample.content)),
            ..Default::default()
        };

        match create_post(input, &deps).await {
            Ok(post) => {
                println!("  ✓ Created {}", post.id);
                created_count += 1;
            }
            Err(e) => {
                println!("  ⊘ Skipped: {}", describe_failure(&e));
                skipped_count += 1;
            }
        }
    }

    println!(
        "\nDone: {} created, {} skipped ({})",
        created_count,
        skipped_count,
        if cli.publish { "published" } else { "drafts" }
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_post_names_the_rejected_field() {
        let err = ActionError::field("slug", "A post with this slug already exists");
        assert_eq!(
            describe_failure(&err),
            "slug: A post with this slug already exists"
        );
    }

    #[test]
    fn non_validation_failure_uses_the_error_message() {
        let err = ActionError::not_found("Post");
        assert_eq!(describe_failure(&err), "Post not found");
    }
}
