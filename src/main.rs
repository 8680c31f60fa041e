mod config;
mod db;
mod error;
mod handlers;
mod models;
mod services;
mod validation;

use config::Config;
use db::Db;
use ntex::web;
use ntex_cors::Cors;
use std::sync::Arc;

#[ntex::main]
async fn main() -> std::io::Result<()> {
    let config = Config::from_environment();

    pretty_env_logger::formatted_builder()
        .filter_level(config.log_level)
        .parse_env("RUST_LOG")
        .init();

    log::debug!("Using config: {:?}", config);

    let db = Arc::new(Db::open(&config.database_path).map_err(|e| {
        std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("Failed to open database {}: {}", config.database_path, e),
        )
    })?);

    log::info!("Bracket desk server starting on {}", config.bind_addr());

    web::HttpServer::new(move || {
        web::App::new()
            .state(db.clone())
            .wrap(
                Cors::new()
                    .allowed_origin("*")
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec!["Content-Type"])
                    .max_age(3600)
                    .finish(),
            )
            .route("/api/health", web::get().to(health))
            // Tickets
            .route("/api/tickets", web::post().to(handlers::ticket::issue_ticket))
            .route("/api/tickets/validate", web::post().to(handlers::ticket::validate_ticket))
            .route("/api/tickets/revoke", web::post().to(handlers::ticket::revoke_ticket))
            // Scores and wrap reports
            .route(
                "/api/competitions/{id}/scores",
                web::post().to(handlers::scoring::submit_score),
            )
            .route(
                "/api/competitions/{id}/wrap-report",
                web::post().to(handlers::wrap_report::generate_wrap_report),
            )
            .route(
                "/api/competitions/{id}/wrap-report",
                web::get().to(handlers::wrap_report::get_wrap_report),
            )
            .route(
                "/api/competitions/{id}/wrap-report/exists",
                web::get().to(handlers::wrap_report::has_wrap_report),
            )
            // Leaderboards
            .route("/api/leaderboards", web::post().to(handlers::leaderboard::update_leaderboards))
            .route(
                "/api/leaderboards/{scope}",
                web::get().to(handlers::leaderboard::get_leaderboard),
            )
            .route(
                "/api/leaderboards/{scope}/{player_id}",
                web::get().to(handlers::leaderboard::get_leaderboard_entry),
            )
    })
    .bind(config.bind_addr())?
    .run()
    .await
}

async fn health() -> web::HttpResponse {
    web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
