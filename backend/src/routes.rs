use actix_files::Files;
use actix_web::{HttpResponse, error, web};
use log::{error, info, warn};
use serde_json::json;
use shared::{ANALYSIS_FAILED_MESSAGE, AnalyzeRequest, ErrorResponse};
use uuid::Uuid;

use crate::analysis::AnalysisClient;

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String, max_payload_bytes: usize) {
    configure_api(cfg, max_payload_bytes);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

pub fn configure_api(cfg: &mut web::ServiceConfig, max_payload_bytes: usize) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(max_payload_bytes)
            .error_handler(|err, _req| {
                warn!("Rejected analysis request body: {}", err);
                let response = HttpResponse::BadRequest().json(failure());
                error::InternalError::from_response(err, response).into()
            }),
    )
    .service(web::resource("/api/analyze").route(web::post().to(handle_analyze)))
    .service(web::resource("/api/health").route(web::get().to(health)));
}

fn failure() -> ErrorResponse {
    ErrorResponse {
        error: ANALYSIS_FAILED_MESSAGE.into(),
    }
}

async fn handle_analyze(
    client: web::Data<AnalysisClient>,
    request: web::Json<AnalyzeRequest>,
) -> HttpResponse {
    let request_id = Uuid::new_v4();
    info!("[{}] Analysis requested ({} bytes)", request_id, request.image.len());

    match client.analyze(&request.image).await {
        Ok(analysis) => {
            info!(
                "[{}] Analysis completed, urgency {}/10",
                request_id, analysis.urgency_score
            );
            HttpResponse::Ok().json(analysis)
        }
        Err(e) if e.is_client_error() => {
            warn!("[{}] Rejected image: {}", request_id, e);
            HttpResponse::BadRequest().json(failure())
        }
        Err(e) => {
            error!("[{}] Analysis failed: {}", request_id, e);
            HttpResponse::BadGateway().json(failure())
        }
    }
}

async fn health(client: web::Data<AnalysisClient>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "model": client.model_name(),
    }))
}
