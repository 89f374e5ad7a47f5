//! HTTP surface.
//!
//! A JSON API over the gallery, catalog and settings services. Every route
//! is served both at the root and under `/api`.
//!
//! # Endpoints
//!
//! | Method | Path | Access |
//! |--------|------|--------|
//! | GET | `/health` | public |
//! | GET | `/gallery` | public |
//! | POST | `/gallery` | admin, multipart |
//! | PUT | `/gallery/{id}` | admin, multipart |
//! | DELETE | `/gallery/{id}` | admin |
//! | GET | `/products` | public |
//! | POST | `/products` | admin |
//! | GET | `/products/{id}` | public |
//! | DELETE | `/products/{id}` | admin |
//! | GET | `/products/{id}/related` | public |
//! | GET | `/products/{id}/details` | public |
//! | GET | `/products/{id}/reviews` | public |
//! | GET | `/settings` | public |
//! | PUT | `/settings` | admin |
//! | POST | `/reviews` | signed in |
//! | GET | `/reviews/featured` | public |
//! | PATCH | `/reviews/{id}` | admin |
//! | GET | `/uploads/*` | public, filesystem backend only |

mod error;
mod extract;
mod handlers;
mod multipart;
mod state;

pub use error::AppError;
pub use extract::{AdminPrincipal, Authenticated};
pub use state::{AppState, open_records};

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, patch, post, put},
};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::{Config, ServerConfig};
use crate::constants::MULTIPART_OVERHEAD_BYTES;

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/gallery",
            get(handlers::gallery_list).post(handlers::gallery_upload),
        )
        .route(
            "/gallery/{id}",
            put(handlers::gallery_replace).delete(handlers::gallery_delete),
        )
        .route(
            "/products",
            get(handlers::product_list).post(handlers::product_create),
        )
        .route(
            "/products/{id}",
            get(handlers::product_get).delete(handlers::product_delete),
        )
        .route("/products/{id}/related", get(handlers::product_related))
        .route("/products/{id}/details", get(handlers::product_detail))
        .route("/products/{id}/reviews", get(handlers::reviews_for_product))
        .route(
            "/settings",
            get(handlers::settings_get).put(handlers::settings_update),
        )
        .route("/reviews", post(handlers::review_create))
        .route("/reviews/featured", get(handlers::reviews_featured))
        .route("/reviews/{id}", patch(handlers::review_moderate))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(parsed)
    }
}

/// Builds the application router.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    let body_limit = state.gallery.max_upload_bytes() + MULTIPART_OVERHEAD_BYTES;
    let uploads_dir = state.uploads_dir.clone();

    let api = api_routes();
    let mut router = Router::new().merge(api.clone()).nest("/api", api);

    if let Some(dir) = uploads_dir {
        router = router.nest_service("/uploads", ServeDir::new(dir.as_path()));
    }

    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout_secs),
        ))
        .layer(cors_layer(&server.cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Runs the HTTP server until Ctrl+C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the backends cannot be opened or the address cannot
/// be bound.
pub async fn serve(config: &Config) -> Result<()> {
    let state = AppState::from_config(config)?;
    let app = build_router(state, &config.server);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!(%address, "Server running");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            },
            Err(err) => {
                warn!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
