//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod page_cache;
pub mod postgres_store;
pub mod storage_client;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use page_cache::{
    post_path, FillTicket, PageCache, ADMIN_COMMENTS_PATH, ALL_POST_PAGES_PATH, BLOG_INDEX_PATH,
};
pub use postgres_store::PostgresBlogStore;
pub use storage_client::StorageClient;
pub use test_dependencies::TestDependencies;
pub use traits::*;
