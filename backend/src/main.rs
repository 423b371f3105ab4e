mod config;
mod error;
mod inference;
mod routes;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use config::AppConfig;
use inference::model::Model;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    }

    let frontend_dir = if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        format!("{}/../frontend/dist", manifest_dir)
    } else {
        "/usr/src/app/frontend/dist".to_string()
    };

    let config = AppConfig::load()
        .map_err(|e| std::io::Error::other(format!("Config loading failed: {}", e)))?;

    // The model is loaded exactly once; without it the server must not start.
    let model_path = env::var("MODEL_PATH").unwrap_or_else(|_| config.model.path.clone());
    let model = match Model::load(&model_path, config.to_preprocess_options()) {
        Ok(model) => model,
        Err(e) => {
            log::error!("Failed to load model at startup: {}", e);
            return Err(std::io::Error::other(format!("Model loading failed: {}", e)));
        }
    };

    let model = web::Data::new(model);
    let config = web::Data::new(config);

    let port = env::var("PORT").unwrap_or_else(|_| config.server.port.to_string());
    let bind_address = format!("0.0.0.0:{}", port);
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
            .app_data(model.clone())
            .app_data(config.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
