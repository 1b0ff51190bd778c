//! Mock upstream HTTP server for integration tests
//!
//! Echoes requests back as JSON so tests can assert on what actually
//! went over the wire

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use axum::extract::{Multipart, Path, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::IntoResponse;
use axum::{Json, Router, routing};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Upstream that records how many requests it served
pub struct MockUpstream {
    addr: SocketAddr,
    shutdown: CancellationToken,
    state: Arc<UpstreamState>,
}

struct UpstreamState {
    request_count: AtomicU32,
}

impl MockUpstream {
    /// Start the mock server, returning immediately
    pub async fn start() -> anyhow::Result<Self> {
        let state = Arc::new(UpstreamState {
            request_count: AtomicU32::new(0),
        });

        let app = Router::new()
            .route(
                "/echo",
                routing::get(handle_echo)
                    .post(handle_echo)
                    .put(handle_echo)
                    .delete(handle_echo),
            )
            .route("/upload", routing::post(handle_upload).put(handle_upload))
            .route("/status/{code}", routing::get(handle_status).post(handle_status))
            .route("/slow", routing::get(handle_slow))
            .route("/garbage", routing::get(handle_garbage))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let shutdown = CancellationToken::new();
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    shutdown_clone.cancelled().await;
                })
                .await
                .ok();
        });

        Ok(Self { addr, shutdown, state })
    }

    /// Absolute URL for a path on this server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// `host:port` the server listens on
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Number of requests received across all routes
    pub fn request_count(&self) -> u32 {
        self.state.request_count.load(Ordering::Relaxed)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Address nothing is listening on
pub fn closed_address() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    listener.local_addr().expect("local address")
}

// -- Wire types --

/// What `/echo` saw
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub body: String,
    pub content_type: Option<String>,
    pub headers: BTreeMap<String, String>,
}

/// What `/upload` saw
#[derive(Debug, Serialize, Deserialize)]
pub struct Upload {
    pub method: String,
    pub fields: BTreeMap<String, String>,
    pub files: Vec<UploadedFile>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: usize,
}

// -- Handlers --

async fn handle_echo(
    State(state): State<Arc<UpstreamState>>,
    method: Method,
    headers: HeaderMap,
    body: String,
) -> Json<Echo> {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);

    let headers = headers
        .iter()
        .filter_map(|(name, value)| Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned())))
        .collect();

    Json(Echo {
        method: method.to_string(),
        body,
        content_type,
        headers,
    })
}

async fn handle_upload(
    State(state): State<Arc<UpstreamState>>,
    method: Method,
    mut multipart: Multipart,
) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let mut fields = BTreeMap::new();
    let mut files = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        };

        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field.file_name().map(ToOwned::to_owned);
        let content_type = field.content_type().map(ToOwned::to_owned);

        let Ok(data) = field.bytes().await else {
            return StatusCode::BAD_REQUEST.into_response();
        };

        match file_name {
            Some(file_name) => files.push(UploadedFile {
                field: name,
                file_name,
                content_type,
                size: data.len(),
            }),
            None => {
                fields.insert(name, String::from_utf8_lossy(&data).into_owned());
            }
        }
    }

    Json(Upload {
        method: method.to_string(),
        fields,
        files,
    })
    .into_response()
}

async fn handle_status(State(state): State<Arc<UpstreamState>>, Path(code): Path<u16>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);

    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, format!("status {code}"))
}

async fn handle_slow(State(state): State<Arc<UpstreamState>>) -> &'static str {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    tokio::time::sleep(Duration::from_secs(5)).await;
    "finally"
}

async fn handle_garbage(State(state): State<Arc<UpstreamState>>) -> impl IntoResponse {
    state.request_count.fetch_add(1, Ordering::Relaxed);
    ([("content-type", "application/json")], "<html>not json</html>")
}
