//! Axum server setup
//!
//! Server skeleton with:
//! - Permissive CORS by default, localhost-only on request
//! - Tracing middleware
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{HeaderValue, Method, Uri};
use axum::Router;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::routes;
use crate::db::{ensure_schema, HistoryRepo, HistoryStore, UserRepo, UserStore};

/// Origins allowed when CORS is restricted
const LOCAL_ORIGINS: [&str; 6] = [
    "http://localhost:3000",
    "http://localhost:5000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5000",
    "http://127.0.0.1:5173",
];

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:5000, reachable on the LAN)
    pub bind_addr: SocketAddr,

    /// Allow any origin (default: true). When false only local dev
    /// origins are accepted.
    pub cors_permissive: bool,

    /// Abort startup if the schema can't be ensured (default: false)
    pub strict_schema: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            cors_permissive: true,
            strict_schema: false,
        }
    }
}

/// Shared application state: the storage handles every handler works with
#[derive(Clone)]
pub struct AppState {
    pub history: Arc<dyn HistoryStore>,
    pub users: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(history: Arc<dyn HistoryStore>, users: Arc<dyn UserStore>) -> Self {
        Self { history, users }
    }

    /// PostgreSQL repositories sharing one pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self::new(
            Arc::new(HistoryRepo::new(pool.clone())),
            Arc::new(UserRepo::new(pool)),
        )
    }
}

/// Build the application router with all routes and middleware.
pub fn build_router(state: AppState, config: &ServerConfig) -> Router {
    let cors = if config.cors_permissive {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(LOCAL_ORIGINS.map(HeaderValue::from_static))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .merge(routes::health::router())
        .merge(routes::history::router())
        .merge(routes::users::router())
        .fallback(unknown_route)
        .method_not_allowed_fallback(unsupported_method)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

async fn unknown_route(uri: Uri) -> ApiError {
    ApiError::NotFound {
        resource: "route",
        id: uri.path().to_owned(),
    }
}

async fn unsupported_method(method: Method, uri: Uri) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
        path: uri.path().to_owned(),
    }
}

/// Run the HTTP server.
///
/// Ensures the schema first; a failure there is logged and, unless
/// `strict_schema` is set, the server starts anyway.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool(&settings)?;
/// run_server(pool, ServerConfig::default()).await?;
/// ```
pub async fn run_server(pool: PgPool, config: ServerConfig) -> Result<(), ServerError> {
    if let Err(e) = ensure_schema(&pool).await {
        tracing::error!(error = %e, "schema initialization failed");
        if config.strict_schema {
            return Err(ServerError::Schema(e));
        }
    }

    if config.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
    }

    let app = build_router(AppState::from_pool(pool), &config);

    // Bind listener
    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    // Run with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("schema initialization failed: {0}")]
    Schema(#[source] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use std::time::Duration;

    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use crate::db::DbSettings;
    use crate::testing::{send, TestApp};

    /// Lazy pool at a port nothing listens on, failing fast
    fn unreachable_pool() -> PgPool {
        let options = DbSettings::Url("postgres://nobody@127.0.0.1:1/none".into())
            .connect_options()
            .unwrap();
        PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy_with(options)
    }

    fn local_config(strict_schema: bool) -> ServerConfig {
        ServerConfig {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            strict_schema,
            ..ServerConfig::default()
        }
    }

    #[tokio::test]
    async fn strict_schema_failure_stops_startup() {
        let result = tokio::time::timeout(
            Duration::from_secs(10),
            run_server(unreachable_pool(), local_config(true)),
        )
        .await
        .expect("run_server should fail, not keep serving");

        assert!(matches!(result, Err(ServerError::Schema(_))));
    }

    #[tokio::test]
    async fn schema_failure_is_not_fatal_by_default() {
        let outcome = tokio::time::timeout(
            Duration::from_secs(2),
            run_server(unreachable_pool(), local_config(false)),
        )
        .await;

        // Still serving when the timeout fires
        assert!(outcome.is_err(), "run_server returned early: {:?}", outcome);
    }

    #[tokio::test]
    async fn unknown_path_is_404_json() {
        let app = TestApp::new();

        let (status, body) = send(&app.router, "GET", "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
        assert_eq!(body["error"], "route '/nope' not found");
    }

    #[tokio::test]
    async fn wrong_method_is_405_json() {
        let app = TestApp::new();

        for (method, uri) in [
            ("PUT", "/historico"),
            ("DELETE", "/historico"),
            ("PATCH", "/usuarios/1"),
        ] {
            let (status, body) = send(&app.router, method, uri, None).await;
            assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", method, uri);
            assert_eq!(body["code"], "method_not_allowed");
            assert_eq!(
                body["error"],
                format!("method {} not allowed on {}", method, uri)
            );
        }
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 5000);
        assert!(config.cors_permissive);
        assert!(!config.strict_schema);
    }

    async fn preflight(config: &ServerConfig, origin: &str) -> Option<HeaderValue> {
        let router = build_router(TestApp::state(), config);
        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/historico")
                    .header(header::ORIGIN, origin)
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn permissive_cors_allows_any_origin() {
        let allowed = preflight(&ServerConfig::default(), "http://192.168.0.10:5173").await;
        assert!(allowed.is_some());
    }

    #[tokio::test]
    async fn strict_cors_allows_only_local_origins() {
        let config = ServerConfig {
            cors_permissive: false,
            ..ServerConfig::default()
        };

        let local = preflight(&config, "http://localhost:5173").await;
        assert_eq!(local.unwrap(), "http://localhost:5173");

        let remote = preflight(&config, "http://evil.example").await;
        assert!(remote.is_none());
    }
}
