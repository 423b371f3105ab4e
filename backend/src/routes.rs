use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{Error, HttpResponse, web};
use futures::{StreamExt, TryStreamExt};
use log::{error, info, warn};
use serde::Serialize;
use serde_json::json;
use shared::InferenceResponse;
use std::io::Write;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::inference::model::Model;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: String) {
    cfg.service(web::resource("/api/inference").route(web::post().to(handle_inference)))
        .service(web::resource("/api/health").route(web::get().to(health)))
        .service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

async fn handle_inference(
    model: web::Data<Model>,
    config: web::Data<AppConfig>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let request_id = Uuid::new_v4();
    let limit = config.server.max_upload_bytes;
    let mut image_data: Vec<u8> = Vec::new();

    loop {
        let mut field = match payload.try_next().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("[{}] malformed multipart payload: {}", request_id, e);
                break;
            }
        };
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if image_data.len() + data.len() > limit {
                warn!("[{}] upload exceeds the {} byte limit", request_id, limit);
                return Ok(HttpResponse::PayloadTooLarge().json(ErrorResponse {
                    error: format!("Upload exceeds the {} byte limit", limit),
                }));
            }
            image_data.write_all(&data)?;
        }
        // First non-empty file field wins; one image per request.
        if !image_data.is_empty() {
            break;
        }
    }

    if image_data.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ErrorResponse {
            error: "No image uploaded".to_string(),
        }));
    }

    match model.inference(&image_data) {
        Ok(probability) => {
            let response = InferenceResponse::from_probability(probability);
            info!(
                "[{}] prediction: {} (model output {:.4})",
                request_id, response.verdict, probability
            );
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) if e.is_client_error() => {
            warn!("[{}] rejected upload: {}", request_id, e);
            Ok(HttpResponse::BadRequest().json(ErrorResponse {
                error: e.to_string(),
            }))
        }
        Err(e) => {
            error!("[{}] inference failed: {}", request_id, e);
            Ok(HttpResponse::InternalServerError().json(ErrorResponse {
                error: format!("Model inference error: {}", e),
            }))
        }
    }
}
