#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use bytes::Bytes;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use tontext_api::config::{AdminCredentials, ServerConfig, StorageConfig};
use tontext_api::router::build_app_router;
use tontext_api::state::AppState;
use tontext_core::storage::local::LocalBlobStore;
use tontext_core::storage::{BlobReader, BlobStore, StorageError};
use tontext_db::DbPool;

/// `admin:changeme`
pub const ADMIN_AUTH: &str = "Basic YWRtaW46Y2hhbmdlbWU=";

/// `admin:wrong`
pub const WRONG_AUTH: &str = "Basic YWRtaW46d3Jvbmc=";

/// A router wired to an in-memory ledger and a temporary blob store.
pub struct TestApp {
    pub router: Router,
    pub pool: DbPool,
    pub storage: TempDir,
}

impl TestApp {
    /// Write an object straight into the backing directory.
    pub fn seed(&self, key: &str, content: &[u8]) {
        let path = self.storage.path().join(key);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    /// File names currently present under `releases/`.
    pub fn release_files(&self) -> Vec<String> {
        let dir = self.storage.path().join("releases");
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    pub async fn ledger_count(&self) -> i64 {
        tontext_db::repositories::DownloadRepo::count(&self.pool)
            .await
            .unwrap()
    }
}

/// Build a test `ServerConfig` with safe defaults and a local blob store.
pub fn test_config(storage_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_path: tontext_db::IN_MEMORY.to_string(),
        admin: AdminCredentials {
            username: "admin".to_string(),
            password: "changeme".to_string(),
        },
        storage: StorageConfig::Local {
            root: storage_root.to_path_buf(),
        },
    }
}

pub async fn test_pool() -> DbPool {
    let pool = tontext_db::create_pool(tontext_db::IN_MEMORY).await.unwrap();
    tontext_db::run_migrations(&pool).await.unwrap();
    pool
}

/// Build the full application router over a filesystem store (direct
/// transfer mode).
pub async fn build_test_app() -> TestApp {
    let storage = tempfile::tempdir().unwrap();
    let store = LocalBlobStore::new(storage.path());
    store.ensure_layout().await.unwrap();
    build_with_store(storage, Arc::new(store)).await
}

/// Build the full application router over a store that redirects to a
/// `/storage` proxy (object-storage mode).
pub async fn build_proxied_test_app() -> TestApp {
    let storage = tempfile::tempdir().unwrap();
    let inner = LocalBlobStore::new(storage.path());
    inner.ensure_layout().await.unwrap();
    build_with_store(storage, Arc::new(ProxiedStore { inner })).await
}

async fn build_with_store(storage: TempDir, store: Arc<dyn BlobStore>) -> TestApp {
    let config = test_config(storage.path());
    let pool = test_pool().await;
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        store,
    };
    TestApp {
        router: build_app_router(state, &config),
        pool,
        storage,
    }
}

/// Build the full application router over a store whose every call fails,
/// like an unreachable object storage endpoint.
pub async fn build_unreachable_store_app() -> TestApp {
    let storage = tempfile::tempdir().unwrap();
    build_with_store(storage, Arc::new(UnreachableStore)).await
}

/// Local store that advertises a proxy URL, like the S3 deployment.
struct ProxiedStore {
    inner: LocalBlobStore,
}

#[async_trait]
impl BlobStore for ProxiedStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        self.inner.list(prefix).await
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.inner.exists(key).await
    }

    async fn open(&self, key: &str) -> Result<BlobReader, StorageError> {
        self.inner.open(key).await
    }

    async fn put(&self, key: &str, content: Bytes, content_type: &str) -> Result<(), StorageError> {
        self.inner.put(key, content, content_type).await
    }

    fn public_url(&self, key: &str) -> Option<String> {
        Some(format!("/storage/{key}"))
    }
}

struct UnreachableStore;

fn connection_refused() -> StorageError {
    StorageError::Backend("connection refused".into())
}

#[async_trait]
impl BlobStore for UnreachableStore {
    async fn list(&self, _: &str) -> Result<Vec<String>, StorageError> {
        Err(connection_refused())
    }

    async fn exists(&self, _: &str) -> Result<bool, StorageError> {
        Err(connection_refused())
    }

    async fn open(&self, _: &str) -> Result<BlobReader, StorageError> {
        Err(connection_refused())
    }

    async fn put(&self, _: &str, _: Bytes, _: &str) -> Result<(), StorageError> {
        Err(connection_refused())
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: &TestApp, request: Request<Body>) -> Response<Body> {
    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &TestApp, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_with_auth(app: &TestApp, uri: &str, auth: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header(AUTHORIZATION, auth)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET as if the TCP peer were `ip`, with the given user agent.
pub async fn get_from(app: &TestApp, uri: &str, ip: &str, user_agent: &str) -> Response<Body> {
    let addr: SocketAddr = format!("{ip}:40000").parse().unwrap();
    let request = Request::get(uri)
        .header("user-agent", user_agent)
        .extension(ConnectInfo(addr))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// POST a single-file multipart form under field `file`.
pub async fn upload(
    app: &TestApp,
    filename: Option<&str>,
    content: &[u8],
    auth: Option<&str>,
) -> Response<Body> {
    let boundary = "tontext-test-boundary";
    let disposition = match filename {
        Some(name) => format!("form-data; name=\"file\"; filename=\"{name}\""),
        None => "form-data; name=\"file\"".to_string(),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(format!("Content-Disposition: {disposition}\r\n").as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    let mut builder = Request::post("/api/releases/upload").header(
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={boundary}"),
    );
    if let Some(auth) = auth {
        builder = builder.header(AUTHORIZATION, auth);
    }
    send(app, builder.body(Body::from(body)).unwrap()).await
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
