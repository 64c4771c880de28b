use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use folio_api::{
    background_task::{start_limiter_eviction, start_orphan_sweep},
    db::postgres::create_pool,
    graceful_shutdown::shutdown_signal,
    handlers::system::START_TIME,
    middlewares::auth::AuthMiddleware,
    repositories::sqlx_repo::SqlxContentRepo,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};

fn cors(config: &AppConfig) -> Cors {
    let origins = config.cors_origins();
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    once_cell::sync::Lazy::force(&START_TIME);
    let config = AppConfig::new().context("Configuration error")?;
    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let pool = create_pool(&config)
        .await
        .context("Failed to create database connection pool")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let app_state = web::Data::new(AppState::new(&config, pool.clone()));

    if config.orphan_sweep_minutes > 0 {
        tokio::spawn(start_orphan_sweep(
            app_state.storage.clone(),
            SqlxContentRepo::new(pool.clone()),
            config.orphan_sweep_minutes,
            config.orphan_grace_hours,
        ));
    } else {
        tracing::info!("Orphan sweep disabled");
    }
    tokio::spawn(start_limiter_eviction(app_state.contact_limiter.clone()));

    let server_addr = format!("{}:{}", config.host, config.port);
    tracing::info!(
        "🚀 Starting {} v{} on {}",
        config.name,
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let state = app_state.clone();
    let server_config = config.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(AuthMiddleware)
            .wrap(cors(&server_config))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(|cfg| configure_routes(cfg, &state))
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .disable_signals()
    .run();

    let handle = server.handle();
    let mut server_task = actix_web::rt::spawn(server);

    tokio::select! {
        result = &mut server_task => {
            result.context("HTTP server task panicked")?.context("HTTP server error")?;
        }
        signal = shutdown_signal() => {
            tracing::info!("Stopping HTTP server after {}", signal);
            handle.stop(true).await;
            server_task
                .await
                .context("HTTP server task panicked")?
                .context("HTTP server error")?;
        }
    }

    pool.close().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
