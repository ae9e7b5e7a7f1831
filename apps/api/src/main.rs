use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::{header, Method};
use axum::{routing::get, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use eventhub_api::config::Config;
use eventhub_api::graphql::build_schema;
use eventhub_api::repositories::{MemoryStore, PgStore, Store};
use eventhub_api::routes::{graphql_router, GraphQLState};
use eventhub_api::{AuthConfig, AuthService, EventPubSub};

/// Build the CORS layer based on configuration.
///
/// Configured origins are always honoured. Without `CORS_ORIGINS`, production
/// rejects cross-origin requests and development allows everything.
fn build_cors_layer(config: &Config) -> CorsLayer {
    match &config.cors_allowed_origins {
        Some(origins) if !origins.is_empty() => {
            let allowed_origins: Vec<_> = origins
                .iter()
                .filter_map(|origin| {
                    origin.parse().ok().or_else(|| {
                        tracing::warn!("Invalid CORS origin '{}', skipping", origin);
                        None
                    })
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::error!("No valid CORS origins configured, CORS requests will be rejected");
                return CorsLayer::new();
            }

            tracing::info!(origins = ?origins, "CORS origins configured");
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .allow_credentials(true)
                .max_age(std::time::Duration::from_secs(3600))
        }
        _ if config.is_production() => {
            tracing::warn!(
                "CORS_ORIGINS not configured in production mode. \
                 CORS requests will be rejected."
            );
            CorsLayer::new()
        }
        _ => {
            tracing::warn!("Using permissive CORS in development mode");
            CorsLayer::permissive()
        }
    }
}

/// Select the persistence adapter: Postgres when configured, memory otherwise
async fn connect_store(config: &Config) -> anyhow::Result<Arc<dyn Store>> {
    let Some(database) = config.database() else {
        tracing::warn!("DATABASE_URL not set, using the in-memory store; data is lost on restart");
        return Ok(Arc::new(MemoryStore::new()));
    };

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(database.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(
            database.connect_timeout_secs,
        ))
        .connect(&database.url)
        .await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations completed successfully");

    Ok(Arc::new(PgStore::new(pool)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "eventhub_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        environment = %config.environment(),
        "Starting Eventhub API server"
    );

    let store = connect_store(&config).await?;
    let auth_service = AuthService::new(store.clone(), AuthConfig::new(config.jwt_secret.clone()))?;
    let pubsub = EventPubSub::new();

    let schema = build_schema(store.clone(), auth_service.clone());
    let state = GraphQLState::new(schema, auth_service, store, pubsub);

    let app = Router::new()
        .route("/", get(root))
        .merge(graphql_router(state))
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Listening on {}", addr);
    tracing::info!(
        "GraphQL Playground available at http://{}:{}/graphql",
        addr.ip(),
        addr.port()
    );

    axum::serve(listener, app).await?;

    Ok(())
}

async fn root() -> &'static str {
    "Eventhub API"
}
