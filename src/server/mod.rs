use std::sync::Arc;

use axum::{routing::get, Router};
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};

use crate::config::ServerConfig;
use crate::introspection;
use crate::schema_graph::{build_graph, SchemaGraph};

pub mod handlers;

/// Shared request state: the immutable graph snapshot and the configuration
/// it was built under.
///
/// The graph is fully built before the router exists, so handlers can never
/// observe a partial one.
#[derive(Clone)]
pub struct AppState {
    pub graph: Arc<SchemaGraph>,
    pub config: ServerConfig,
}

/// Build the axum router: the two API routes plus the static frontend
/// fallback (unknown paths get `index.html`, letting the SPA route).
pub fn router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let index = format!("{}/index.html", static_dir);
    let static_files = ServeDir::new(static_dir).not_found_service(ServeFile::new(index));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/schema", get(handlers::schema_handler))
        .fallback_service(static_files)
        .with_state(Arc::new(state))
}

pub async fn run() {
    dotenv().ok();

    // Load server configuration from environment variables
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    run_with_config(config).await;
}

pub async fn run_with_config(config: ServerConfig) {
    dotenv().ok();

    log::info!(
        "Server configuration: http={}:{}, db_schema={}, static_dir={}",
        config.http_host,
        config.http_port,
        config.db_schema,
        config.static_dir
    );

    let Some(pool) = introspection::try_get_pool() else {
        log::error!("DATABASE_URL is not set or invalid; cannot reach PostgreSQL");
        std::process::exit(1);
    };

    if let Err(e) = introspection::test_connection(&pool).await {
        log::error!("PostgreSQL connection test failed: {}", e);
        std::process::exit(1);
    }
    log::info!("✓ PostgreSQL connection established");

    // One-shot build. Any failure here is fatal: serving a stale or partial
    // graph is worse than not coming up at all.
    let raw = match introspection::fetch_raw_schema(&pool, &config.db_schema).await {
        Ok(raw) => raw,
        Err(e) => {
            log::error!("✗ Failed to introspect schema '{}': {}", config.db_schema, e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Introspected {} tables from schema '{}'",
        raw.tables.len(),
        config.db_schema
    );

    let graph = match build_graph(&raw) {
        Ok(graph) => Arc::new(graph),
        Err(e) => {
            log::error!("✗ Failed to build schema graph: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Schema graph built: {} tables, {} links",
        graph.tables.len(),
        graph.links.len()
    );

    let bind_address = format!("{}:{}", config.http_host, config.http_port);
    let app = router(AppState {
        graph,
        config: config.clone(),
    });

    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            log::info!("Successfully bound HTTP listener to {}", bind_address);
            listener
        }
        Err(e) => {
            log::error!("✗ FATAL: Failed to bind HTTP listener to {}: {}", bind_address, e);
            log::error!("  Is another process using port {}?", config.http_port);
            std::process::exit(1);
        }
    };

    println!("Schemascope server is running");
    println!("  Schema API: http://{}/schema", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("HTTP server fatal error: {:?}", e);
        std::process::exit(1);
    }
}
