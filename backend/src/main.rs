mod analysis;
mod config;
mod routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use analysis::{AnalysisClient, GeminiClient};
use config::AppConfig;
use routes::configure_routes;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    if !config.has_api_key() {
        log::warn!(
            "GEMINI_API_KEY is not set. Analysis requests will be rejected by the vision service."
        );
    }

    let gemini = GeminiClient::new(
        &config.base_url,
        config.api_key.clone(),
        config.model.clone(),
        config.timeout,
    )
    .map_err(|e| {
        log::error!("Failed to create vision client: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    log::info!("Vision model endpoint: {}", gemini.endpoint());

    let client = AnalysisClient::new(Arc::new(gemini), config.instruction.clone());

    let frontend_dir = config.frontend_dir.clone();
    let max_payload_bytes = config.max_payload_bytes;
    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!("Serving frontend from {}", frontend_dir);
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(web::Data::new(client.clone()))
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone(), max_payload_bytes))
    })
    .bind(&bind_address)?
    .run()
    .await
}
