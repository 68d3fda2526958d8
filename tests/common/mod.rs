//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, HeaderName, StatusCode,
    },
    response::IntoResponse,
    routing::{any, post},
    Router,
};
use rpt_gateway::{GatewayConfig, HttpServer, Shutdown};
use tokio::net::TcpListener;

/// What the mock token endpoint received.
#[derive(Debug, Clone, Default)]
pub struct CapturedExchange {
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

/// Handle on a running mock authorization server.
#[derive(Clone)]
pub struct AuthServer {
    pub addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<CapturedExchange>>>,
}

impl AuthServer {
    pub fn token_endpoint(&self) -> String {
        format!("http://{}/token", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last(&self) -> Option<CapturedExchange> {
        self.last.lock().unwrap().clone()
    }
}

#[derive(Clone)]
struct AuthState {
    status: StatusCode,
    body: &'static str,
    calls: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<CapturedExchange>>>,
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(String::from)
}

async fn token(
    State(state): State<AuthState>,
    headers: HeaderMap,
    body: String,
) -> impl IntoResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);
    *state.last.lock().unwrap() = Some(CapturedExchange {
        authorization: header_string(&headers, AUTHORIZATION),
        content_type: header_string(&headers, CONTENT_TYPE),
        body,
    });
    (state.status, [(CONTENT_TYPE, "application/json")], state.body)
}

/// Start a token endpoint answering every exchange with `status` and `body`.
pub async fn start_auth_server(status: StatusCode, body: &'static str) -> AuthServer {
    let calls = Arc::new(AtomicUsize::new(0));
    let last = Arc::new(Mutex::new(None));
    let state = AuthState {
        status,
        body,
        calls: calls.clone(),
        last: last.clone(),
    };

    let app = Router::new().route("/token", post(token)).with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    AuthServer { addr, calls, last }
}

async fn echo_authorization(headers: HeaderMap) -> String {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("<none>")
        .to_string()
}

/// Start a backend that answers with the `Authorization` header it received.
pub async fn start_upstream() -> SocketAddr {
    let app = Router::new()
        .route("/", any(echo_authorization))
        .route("/{*path}", any(echo_authorization));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// An address nothing is listening on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Run the gateway in front of `upstream`, exchanging against `endpoint`.
pub async fn start_gateway(endpoint: String, upstream: SocketAddr) -> (SocketAddr, Shutdown) {
    let mut config = GatewayConfig::default();
    config.name = "orders-rpt".into();
    config.exchange.authorization_endpoint = endpoint;
    config.exchange.audience = "orders-api".into();
    config.exchange.timeout_secs = 5;
    config.upstream.address = upstream.to_string();

    let server = HttpServer::new(config).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
