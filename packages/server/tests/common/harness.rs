//! Test harnesses for integration testing.
//!
//! `TestHarness` wires the real router and actions to the in-memory store and
//! mock image storage from `kernel::test_dependencies`; it needs nothing
//! running. `postgres_pool` starts one shared Postgres container for the
//! store tests that exercise real SQL.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use blog_core::domains::auth::{AUTHENTICATED_ROLE, SERVICE_ROLE};
use blog_core::kernel::test_dependencies::{InMemoryBlogStore, MockImageStorage, TEST_ADMIN_EMAIL};
use blog_core::kernel::{ServerDeps, TestDependencies};
use blog_core::server::build_app;
use serde_json::Value;
use sqlx::PgPool;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use tower::ServiceExt;
use uuid::Uuid;

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-process application with in-memory infrastructure.
pub struct TestHarness {
    pub deps: ServerDeps,
    /// Same store the deps use, for seeding, inspection and failure injection
    pub store: Arc<InMemoryBlogStore>,
    pub storage: Arc<MockImageStorage>,
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_dependencies(TestDependencies::new())
    }

    pub fn with_dependencies(test_deps: TestDependencies) -> Self {
        init_tracing();
        let store = test_deps.store.clone();
        let storage = test_deps.storage.clone();
        Self {
            deps: test_deps.into_deps(),
            store,
            storage,
        }
    }

    pub fn router(&self) -> Router {
        build_app(self.deps.clone(), &[])
    }

    /// Signed-in user on the admin email list
    pub fn admin_token(&self) -> String {
        self.token(Some(TEST_ADMIN_EMAIL), AUTHENTICATED_ROLE)
    }

    /// Backend service credential (admin without an email)
    pub fn service_token(&self) -> String {
        self.token(None, SERVICE_ROLE)
    }

    /// Signed-in user who is not an admin
    pub fn reader_token(&self) -> String {
        self.token(Some("reader@example.com"), AUTHENTICATED_ROLE)
    }

    fn token(&self, email: Option<&str>, role: &str) -> String {
        self.deps
            .jwt_service
            .create_token(Uuid::new_v4(), email.map(str::to_string), role)
            .expect("Failed to sign test token")
    }

    /// Sends a request through the full router; returns the status and JSON body.
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(json_request(Method::GET, uri, None, None)).await
    }

    /// Same as `get`, with a bearer token
    pub async fn get_as(&self, uri: &str, token: &str) -> (StatusCode, Value) {
        self.send(json_request(Method::GET, uri, Some(token), None))
            .await
    }
}

/// Builds a request with an optional bearer token and JSON body.
pub fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("Failed to build request")
}

/// Builds a single-file multipart upload in the `file` field.
pub fn multipart_request(
    uri: &str,
    token: &str,
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Request<Body> {
    let boundary = "blog-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .expect("Failed to build multipart request")
}

// =============================================================================
// Postgres
// =============================================================================

/// Shared Postgres container, started once and migrated once.
struct SharedTestInfra {
    db_url: String,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let pg_host = postgres.get_host().await?;
        let pg_port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!(
            "postgresql://postgres:postgres@{}:{}/postgres",
            pg_host, pg_port
        );

        let pool = PgPool::connect(&db_url)
            .await
            .context("Failed to connect to Postgres for migrations")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }
}

/// Fresh pool on the shared, migrated database. Tests share the database,
/// so they must use unique slugs.
pub async fn postgres_pool() -> Result<PgPool> {
    let infra = SharedTestInfra::get().await;
    PgPool::connect(&infra.db_url)
        .await
        .context("Failed to connect to test database")
}
