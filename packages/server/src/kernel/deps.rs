//! Server dependencies for actions (using traits for testability)
//!
//! Every action receives `&ServerDeps`. External services sit behind the
//! `Base*` traits so tests can swap in the in-memory doubles from
//! `kernel::test_dependencies`.

use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::{BaseBlogStore, BaseImageStorage, PageCache};

#[derive(Clone)]
pub struct ServerDeps {
    pub store: Arc<dyn BaseBlogStore>,
    pub storage: Arc<dyn BaseImageStorage>,
    pub page_cache: PageCache,
    pub jwt_service: Arc<JwtService>,
    /// Emails granted admin access (matched case-insensitively)
    pub admin_emails: Vec<String>,
}

impl ServerDeps {
    pub fn new(
        store: Arc<dyn BaseBlogStore>,
        storage: Arc<dyn BaseImageStorage>,
        page_cache: PageCache,
        jwt_service: Arc<JwtService>,
        admin_emails: Vec<String>,
    ) -> Self {
        Self {
            store,
            storage,
            page_cache,
            jwt_service,
            admin_emails,
        }
    }

    pub fn store(&self) -> &dyn BaseBlogStore {
        self.store.as_ref()
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails
            .iter()
            .any(|admin| admin.eq_ignore_ascii_case(email))
    }

    /// Revalidates each page path in order
    pub async fn revalidate(&self, paths: &[&str]) {
        for path in paths {
            self.page_cache.revalidate(path).await;
        }
    }
}
