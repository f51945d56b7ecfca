use actix_files as fs;
use actix_web::{web, HttpResponse, Responder};
use std::path::Path;

use crate::models::{AppState, GameOptions};

/// HTTP handler for the index page
pub async fn index(app_state: web::Data<AppState>) -> actix_web::Result<fs::NamedFile> {
    let path = Path::new(&app_state.config.static_dir).join("index.html");
    Ok(fs::NamedFile::open_async(path).await?)
}

/// Choices for the start form.
pub async fn options() -> impl Responder {
    HttpResponse::Ok().json(GameOptions::current())
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: &str) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(web::resource("/api/options").route(web::get().to(options)))
        .service(web::resource("/").route(web::get().to(index)))
        .service(fs::Files::new("/static", static_dir));
}
