use std::{process, sync::Arc};

use content_service::{
    application::{
        catalog::{CacheTtls, CatalogService},
        error::AppError,
        metrics::ServiceMetrics,
    },
    cache::{CacheAdapter, CacheConfig, CacheHealth},
    config,
    infra::{
        error::InfraError,
        http::{self, HttpState},
        memory::InMemoryContentStore,
        telemetry,
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging).map_err(AppError::from)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let metrics = Arc::new(ServiceMetrics::new());
    let cache_config = CacheConfig::from(&settings.cache);
    let cache = CacheAdapter::from_config(&cache_config, Arc::clone(&metrics));
    report_cache_status(&cache, &cache_config).await;

    let store = InMemoryContentStore::seeded()?;
    let catalog = CatalogService::new(
        Arc::new(store),
        cache.clone(),
        Arc::clone(&metrics),
        CacheTtls::from(&cache_config),
    );

    let state = HttpState {
        catalog: Arc::new(catalog),
        metrics,
        cache,
        debug: settings.server.debug,
    };

    serve_http(&settings, state).await
}

async fn report_cache_status(cache: &CacheAdapter, config: &CacheConfig) {
    match cache.health().await {
        CacheHealth::Healthy => info!(
            target: "content_service::startup",
            backend = config.backend.as_str(),
            host = %config.host,
            port = config.port,
            "cache connected"
        ),
        CacheHealth::Unhealthy => warn!(
            target: "content_service::startup",
            backend = config.backend.as_str(),
            host = %config.host,
            port = config.port,
            "cache unreachable; requests will bypass it until it recovers"
        ),
        CacheHealth::Disconnected => info!(
            target: "content_service::startup",
            "running without cache"
        ),
    }
}

async fn serve_http(settings: &config::Settings, state: HttpState) -> Result<(), AppError> {
    let router = http::build_router(state);

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;

    info!(
        target: "content_service::startup",
        addr = %settings.server.addr,
        debug = settings.server.debug,
        "content service listening"
    );

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!(target: "content_service::shutdown", "shutdown signal received");
}
