//! Pricing Service
//!
//! Runs the daily price history sampler and serves price suggestions for
//! the catalog dashboard. Port: 8092.

use actix_web::{web, App, HttpResponse, HttpServer};
use commerce_insight_core::{load_dotenv, ConfigLoader, ServiceConfig};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let config = ServiceConfig::from_env()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(config.log_level.as_str())
        .json()
        .init();

    info!(port = config.port, "Starting pricing service");

    HttpServer::new(|| App::new().route("/health", web::get().to(health_check)))
        .bind((config.host.as_str(), config.port))?
        .workers(config.workers)
        .run()
        .await?;

    Ok(())
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "pricing-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
