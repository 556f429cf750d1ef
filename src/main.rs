use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use dance_booking::adapters::http::{router, AppState, WebhookSettings};
use dance_booking::adapters::memory::{
    InMemoryBookingRepository, InMemoryClassOccurrenceRepository, InMemoryWebhookEventRepository,
};
use dance_booking::adapters::postgres::{
    PostgresBookingRepository, PostgresClassOccurrenceRepository, PostgresWebhookEventRepository,
};
use dance_booking::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use dance_booking::application::handlers::PruneWebhookEventsHandler;
use dance_booking::config::{AppConfig, DatabaseConfig, ServerConfig};
use dance_booking::ports::{
    BookingRepository, ClassOccurrenceRepository, Clock, SystemClock, WebhookEventRepository,
};
use dance_booking::telemetry::init_tracing;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const PRUNE_INTERVAL: Duration = Duration::from_secs(6 * 60 * 60);

struct Repositories {
    classes: Arc<dyn ClassOccurrenceRepository>,
    bookings: Arc<dyn BookingRepository>,
    webhook_events: Arc<dyn WebhookEventRepository>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config.server)?;
    config.validate()?;

    let repositories = match &config.database {
        Some(database) => postgres_repositories(database).await?,
        None => {
            tracing::warn!("No database configured; bookings are kept in memory only");
            in_memory_repositories()
        }
    };

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let stripe = StripeConfig::from_secret(config.payment.stripe_api_key.clone())
        .with_base_url(config.payment.api_base_url.clone());

    let state = AppState {
        classes: repositories.classes,
        bookings: repositories.bookings,
        webhook_events: repositories.webhook_events.clone(),
        payments: Arc::new(StripePaymentAdapter::new(stripe)),
        clock: clock.clone(),
        window: config.booking_window(),
        checkout: config.checkout_settings()?,
        webhook: WebhookSettings {
            secret: config.payment.stripe_webhook_secret.clone(),
            tolerance_secs: config.payment.webhook_tolerance_secs,
        },
    };

    tokio::spawn(prune_webhook_events(PruneWebhookEventsHandler::new(
        repositories.webhook_events,
        clock,
        config.payment.webhook_retention_days,
    )));

    let app = router(state)
        .layer(cors_layer(&config.server))
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = config.server.environment.as_str(),
        checkout_mode = config.payment.checkout_mode.as_str(),
        stripe_test_mode = config.payment.is_test_mode(),
        "dance-booking listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn postgres_repositories(database: &DatabaseConfig) -> Result<Repositories, BoxError> {
    tracing::info!(
        url = %database.redacted_url(),
        pool_size = database.pool_size,
        "Connecting to Postgres"
    );
    let pool = database.pool_options().connect(&database.url).await?;

    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Repositories {
        classes: Arc::new(PostgresClassOccurrenceRepository::new(pool.clone())),
        bookings: Arc::new(PostgresBookingRepository::new(pool.clone())),
        webhook_events: Arc::new(PostgresWebhookEventRepository::new(pool)),
    })
}

fn in_memory_repositories() -> Repositories {
    Repositories {
        classes: Arc::new(InMemoryClassOccurrenceRepository::new()),
        bookings: Arc::new(InMemoryBookingRepository::new()),
        webhook_events: Arc::new(InMemoryWebhookEventRepository::new()),
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .allowed_origins()
        .into_iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH])
        .allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(origins)
    }
}

async fn prune_webhook_events(handler: PruneWebhookEventsHandler) {
    let mut interval = tokio::time::interval(PRUNE_INTERVAL);
    loop {
        interval.tick().await;
        if let Err(e) = handler.handle().await {
            tracing::error!(error = %e, "Failed to prune webhook event log");
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
