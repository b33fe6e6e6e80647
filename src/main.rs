//! Pacer - pedometer and point backend
//!
//! Architecture:
//! - SeaORM for database access (SQLite)
//! - Axum for HTTP API with rate limiting
//! - Time-bucketed rollups for step aggregation
//! - Tokio for async runtime

mod bucket;
mod entity;
mod error;
mod find;
mod geo;
mod handlers;
mod migration;
mod prelude;
mod state;
mod sv;
mod utils;

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use axum::routing::{delete, get, patch, post};
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::prelude::*;
use crate::state::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  dotenvy::dotenv().ok();

  // Initialize tracing
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
      "pacer=debug,tower_http=debug,axum=trace,sea_orm=warn".into()
    }))
    .with(tracing_subscriber::fmt::layer())
    .init();

  let db_url =
    env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite:pacer.db?mode=rwc".into());

  let mut config = Config::default();
  if let Ok(raw) = env::var("START_OF_WEEK") {
    let day = raw.parse().context("Invalid START_OF_WEEK")?;
    anyhow::ensure!((1..=7).contains(&day), "START_OF_WEEK must be 1..=7");
    config.start_of_week = day;
  }

  info!("Starting Pacer v{}", env!("CARGO_PKG_VERSION"));

  let app = Arc::new(AppState::with_config(&db_url, config).await);

  let governor_conf = Arc::new(
    GovernorConfigBuilder::default()
      .per_second(2)
      .burst_size(100)
      .finish()
      .context("Failed to build rate limiter config")?,
  );
  let limiter = governor_conf.limiter().clone();

  // the governor keeps per-ip state; clear out stale entries
  tokio::spawn(async move {
    loop {
      tokio::time::sleep(Duration::from_secs(60)).await;
      limiter.retain_recent();
    }
  });

  let router = Router::new()
    .route("/health", get(handlers::health))
    .route("/api/users", post(handlers::users::create))
    .route("/api/users", get(handlers::users::find_many))
    .route("/api/users/{uid}", get(handlers::users::find_one))
    .route("/api/users/{uid}", patch(handlers::users::update))
    .route("/api/users/{uid}", delete(handlers::users::remove))
    .route("/api/users/{uid}/points", post(handlers::users::record_points))
    .route("/api/users/{uid}/points", get(handlers::users::point_history))
    .route("/api/point-logs/{uid}", get(handlers::users::point_log))
    .route("/api/devices", post(handlers::devices::create))
    .route("/api/devices", get(handlers::devices::find_many))
    .route("/api/devices/{uid}", get(handlers::devices::find_one))
    .route("/api/devices/{uid}", patch(handlers::devices::update))
    .route("/api/devices/{uid}", delete(handlers::devices::remove))
    .route("/api/devices/{uid}/logs", post(handlers::devices::record_state))
    .route("/api/devices/{uid}/logs", get(handlers::devices::log_history))
    .route("/api/device-logs/{uid}", get(handlers::devices::log))
    .route("/api/stores", post(handlers::stores::create))
    .route("/api/stores", get(handlers::stores::find_many))
    .route("/api/stores/nearby", get(handlers::stores::nearby))
    .route("/api/stores/area", get(handlers::stores::in_area))
    .route("/api/stores/{uid}", get(handlers::stores::find_one))
    .route("/api/stores/{uid}", patch(handlers::stores::update))
    .route("/api/stores/{uid}", delete(handlers::stores::remove))
    .route(
      "/api/pedometers/{user_uid}/logs",
      post(handlers::pedometers::record),
    )
    .route("/api/pedometers/{user_uid}/daily", get(handlers::pedometers::daily))
    .route(
      "/api/pedometers/{user_uid}/periodic",
      get(handlers::pedometers::periodic),
    )
    .route("/api/pedometers/{user_uid}/total", get(handlers::pedometers::total))
    .layer(
      ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(GovernorLayer::new(governor_conf))
        .layer(
          CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
        ),
    )
    .with_state(app)
    .into_make_service_with_connect_info::<SocketAddr>();

  let port: u16 =
    env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);
  let addr = SocketAddr::from(([0, 0, 0, 0], port));

  let listener = tokio::net::TcpListener::bind(addr)
    .await
    .with_context(|| format!("Failed to bind {addr}"))?;
  info!("HTTP Server listening on {addr}");

  axum::serve(listener, router).await.context("Axum server error")
}
