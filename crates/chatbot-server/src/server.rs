use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::io;

use crate::handlers;
use crate::state::AppState;

/// Routes: the widget at `/` and the JSON API under `/api/v1`.
pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(handlers::index::handler))
        .service(
            web::scope("/api/v1")
                .route("/chat", web::post().to(handlers::chat::handler))
                .route("/health", web::get().to(handlers::health::handler)),
        );
}

pub async fn run_server(state: AppState, host: &str, port: u16) -> io::Result<()> {
    let state = web::Data::new(state);

    log::info!("Serving {} on http://{}:{}", state.title, host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(Cors::permissive())
            .configure(app_config)
    })
    .bind((host, port))?
    .run()
    .await
}
