use actix_web::{web, App, HttpServer};
use log::info;

use chess_tournament::config::ServerConfig;
use chess_tournament::models::AppState;
use chess_tournament::routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    info!("Starting chess tournament server at http://{}", config.bind);

    let bind = config.bind.clone();
    let static_dir = config.static_dir.clone();
    let app_state = web::Data::new(AppState::new(config));

    HttpServer::new(move || {
        let static_dir = static_dir.clone();
        App::new()
            .app_data(app_state.clone())
            .configure(move |cfg| routes::configure_routes(cfg, &static_dir))
    })
    .bind(bind)?
    .run()
    .await
}
