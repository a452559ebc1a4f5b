//! RentNest API Gateway
//!
//! HTTP surface over the RentNest core.
//! Handles:
//! - Session login, registration, logout and restore
//! - Listing feed, detail and agent quick-add
//! - Multipart listing submission
//! - Observability (logging, metrics, tracing)

mod handlers;
mod middleware;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use rand::{rngs::StdRng, SeedableRng};
use rentnest_common::{
    config::{AppConfig, ObservabilityConfig},
    feed::Feed,
    form::{FormValidator, PropertyForm},
    metrics, AuthService, Catalog, Session, SimulatedSubmitter, Submitter,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::{Mutex, RwLock};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub catalog: Arc<Catalog>,
    pub feed: Arc<Feed>,
    pub auth: AuthService,
    pub session: Arc<RwLock<Session>>,
    pub form: Arc<Mutex<PropertyForm>>,
    pub submitter: Arc<dyn Submitter>,
}

impl AppState {
    /// Build the catalog once and restore any persisted session
    pub async fn build(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let mut rng = match config.feed.views_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let feed = Feed::from_config(&config.feed);
        let catalog = Catalog::bundled(feed.aggregator(), &mut rng)
            .context("Failed to load bundled listings")?;

        let auth = AuthService::from_config(&config.session);
        let session = auth.restore().await.context("Failed to restore session")?;

        let form = PropertyForm::new(FormValidator::new(config.submission.min_photos));
        let submitter = SimulatedSubmitter::new(config.submission_latency());

        Ok(Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            feed: Arc::new(feed),
            auth,
            session: Arc::new(RwLock::new(session)),
            form: Arc::new(Mutex::new(form)),
            submitter: Arc::new(submitter),
        })
    }
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.observability);

    info!("Starting RentNest API Gateway v{}", rentnest_common::VERSION);

    metrics::register_metrics();

    let host: std::net::IpAddr = config
        .server
        .host
        .parse()
        .with_context(|| format!("Invalid server.host {:?}", config.server.host))?;
    let addr = SocketAddr::new(host, config.server.port);

    let state = AppState::build(config).await.map_err(|e| {
        error!(error = %e, "Failed to initialise gateway");
        e
    })?;

    let app = create_router(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Session
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/session", get(handlers::auth::current))
        // Listings
        .route(
            "/properties",
            get(handlers::properties::list).post(handlers::properties::create),
        )
        .route("/properties/{id}", get(handlers::properties::get))
        .route(
            "/properties/quick-add/{index}",
            get(handlers::properties::quick_add),
        )
        // Form
        .route("/form", get(handlers::form::status))
        .route("/form/options", get(handlers::form::options))
        .route_layer(from_fn(middleware::metrics::track_requests));

    let body_limit = state.config.server.body_limit_bytes;
    let timeout = state.config.request_timeout();

    Router::new()
        .route("/health", get(handlers::health::health))
        .nest("/v1", api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors)
                .layer(TimeoutLayer::new(timeout)),
        )
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
