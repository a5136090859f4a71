//! Cache for the public blog pages.
//!
//! Public listing and detail reads are served from here until a mutation
//! revalidates the page path (`/blog` or `/blog/{slug}`) or the entry's TTL
//! runs out. Admin reads never go through the cache.
//!
//! A read that misses takes a [`FillTicket`] before going to the store. Every
//! revalidation bumps the cache generation, and a fill whose ticket predates
//! the latest revalidation is discarded, so a slow read can never put back a
//! page that a mutation has already dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use tracing::debug;

use crate::common::Page;
use crate::domains::posts::models::{Post, PostWithTags};

pub const BLOG_INDEX_PATH: &str = "/blog";
pub const ADMIN_COMMENTS_PATH: &str = "/admin/comments";
/// Every `/blog/{slug}` page at once
pub const ALL_POST_PAGES_PATH: &str = "/blog/[slug]";

const MAX_LISTING_PAGES: u64 = 256;
const MAX_POST_PAGES: u64 = 1_024;

pub fn post_path(slug: &str) -> String {
    format!("{}/{}", BLOG_INDEX_PATH, slug)
}

/// Cache generation observed before a store read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FillTicket(u64);

#[derive(Clone)]
pub struct PageCache {
    listings: Cache<String, Arc<Vec<Post>>>,
    posts: Cache<String, Arc<PostWithTags>>,
    generation: Arc<AtomicU64>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            listings: Cache::builder()
                .max_capacity(MAX_LISTING_PAGES)
                .time_to_live(ttl)
                .build(),
            posts: Cache::builder()
                .max_capacity(MAX_POST_PAGES)
                .time_to_live(ttl)
                .build(),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Take before reading the store for a page that is about to be cached.
    pub fn ticket(&self) -> FillTicket {
        FillTicket(self.generation.load(Ordering::SeqCst))
    }

    fn is_current(&self, ticket: FillTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    fn listing_key(page: Page) -> String {
        format!("{}?limit={}&offset={}", BLOG_INDEX_PATH, page.limit, page.offset)
    }

    pub async fn listing(&self, page: Page) -> Option<Arc<Vec<Post>>> {
        self.listings.get(&Self::listing_key(page)).await
    }

    pub async fn store_listing(&self, page: Page, posts: Arc<Vec<Post>>, ticket: FillTicket) {
        let key = Self::listing_key(page);
        if !self.is_current(ticket) {
            debug!(key = %key, "Discarding stale listing fill");
            return;
        }
        self.listings.insert(key.clone(), posts).await;
        // A revalidation that landed during the insert may have missed it
        if !self.is_current(ticket) {
            self.listings.invalidate(&key).await;
        }
    }

    pub async fn post(&self, slug: &str) -> Option<Arc<PostWithTags>> {
        self.posts.get(&post_path(slug)).await
    }

    pub async fn store_post(&self, slug: &str, post: Arc<PostWithTags>, ticket: FillTicket) {
        let key = post_path(slug);
        if !self.is_current(ticket) {
            debug!(key = %key, "Discarding stale post fill");
            return;
        }
        self.posts.insert(key.clone(), post).await;
        if !self.is_current(ticket) {
            self.posts.invalidate(&key).await;
        }
    }

    /// Drops whatever is cached for a page path.
    ///
    /// `/blog` drops every listing page; `/blog/{slug}` drops one post page
    /// and `/blog/[slug]` drops them all. Other paths have nothing cached and
    /// are ignored.
    pub async fn revalidate(&self, path: &str) {
        debug!(path = %path, "Revalidating page");
        if path == BLOG_INDEX_PATH || path.starts_with("/blog/") {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        if path == BLOG_INDEX_PATH {
            self.listings.invalidate_all();
        } else if path == ALL_POST_PAGES_PATH {
            self.posts.invalidate_all();
        } else if path.starts_with("/blog/") {
            self.posts.invalidate(path).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PostId;
    use chrono::Utc;

    fn post(slug: &str) -> Post {
        Post {
            id: PostId::new(),
            slug: slug.to_string(),
            title: "Title".to_string(),
            content: "0123456789".to_string(),
            excerpt: None,
            published: true,
            view_count: 0,
            reading_time_minutes: None,
            meta_title: None,
            meta_description: None,
            og_image: None,
            featured_image: None,
            featured_image_alt: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn index_revalidation_drops_every_listing_page() {
        let cache = PageCache::new(Duration::from_secs(60));
        let first = Page::new(10, 0);
        let second = Page::new(10, 10);
        cache
            .store_listing(first, Arc::new(vec![post("a")]), cache.ticket())
            .await;
        cache
            .store_listing(second, Arc::new(vec![post("b")]), cache.ticket())
            .await;

        cache.revalidate(BLOG_INDEX_PATH).await;

        assert!(cache.listing(first).await.is_none());
        assert!(cache.listing(second).await.is_none());
    }

    #[tokio::test]
    async fn post_revalidation_only_touches_that_post() {
        let cache = PageCache::new(Duration::from_secs(60));
        for slug in ["kept", "dropped"] {
            let page = PostWithTags {
                post: post(slug),
                tags: vec![],
            };
            cache.store_post(slug, Arc::new(page), cache.ticket()).await;
        }
        cache
            .store_listing(Page::default(), Arc::new(vec![]), cache.ticket())
            .await;

        cache.revalidate(&post_path("dropped")).await;

        assert!(cache.post("dropped").await.is_none());
        assert!(cache.post("kept").await.is_some());
        assert!(cache.listing(Page::default()).await.is_some());
    }

    #[tokio::test]
    async fn all_post_pages_revalidation_keeps_listings() {
        let cache = PageCache::new(Duration::from_secs(60));
        for slug in ["one", "two"] {
            let page = PostWithTags {
                post: post(slug),
                tags: vec![],
            };
            cache.store_post(slug, Arc::new(page), cache.ticket()).await;
        }
        cache
            .store_listing(Page::default(), Arc::new(vec![]), cache.ticket())
            .await;

        cache.revalidate(ALL_POST_PAGES_PATH).await;

        assert!(cache.post("one").await.is_none());
        assert!(cache.post("two").await.is_none());
        assert!(cache.listing(Page::default()).await.is_some());
    }

    #[tokio::test]
    async fn unrelated_paths_are_ignored() {
        let cache = PageCache::new(Duration::from_secs(60));
        let ticket = cache.ticket();
        cache.revalidate(ADMIN_COMMENTS_PATH).await;
        cache
            .store_listing(Page::default(), Arc::new(vec![]), ticket)
            .await;
        assert!(cache.listing(Page::default()).await.is_some());
    }

    #[tokio::test]
    async fn fill_started_before_revalidation_is_discarded() {
        let cache = PageCache::new(Duration::from_secs(60));
        let page = PostWithTags {
            post: post("racing"),
            tags: vec![],
        };
        let post_ticket = cache.ticket();
        let listing_ticket = cache.ticket();

        cache.revalidate(&post_path("racing")).await;
        cache.store_post("racing", Arc::new(page), post_ticket).await;
        cache
            .store_listing(Page::default(), Arc::new(vec![]), listing_ticket)
            .await;

        assert!(cache.post("racing").await.is_none());
        assert!(cache.listing(Page::default()).await.is_none());
    }
}
