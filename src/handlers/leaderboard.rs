use crate::db::Db;
use crate::error::AppError;
use crate::models::leaderboard::*;
use crate::services::leaderboard as service;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn update_leaderboards(
    db: web::types::State<Arc<Db>>,
    body: web::types::Json<LeaderboardUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    service::update_leaderboards(&db, &req.report, &req.game_id, req.league_id.as_deref())?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn get_leaderboard(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
    query: web::types::Query<LeaderboardQuery>,
) -> Result<HttpResponse, AppError> {
    let limit = query.limit.unwrap_or(20);
    let entries = service::get_leaderboard(&db, &path.into_inner(), limit)?;
    Ok(HttpResponse::Ok().json(&entries))
}

pub async fn get_leaderboard_entry(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<(String, String)>,
) -> Result<HttpResponse, AppError> {
    let (scope, player_id) = path.into_inner();
    match service::get_leaderboard_entry(&db, &scope, &player_id)? {
        Some(entry) => Ok(HttpResponse::Ok().json(&entry)),
        None => Ok(HttpResponse::NotFound()
            .json(&serde_json::json!({ "error": "Leaderboard entry not found" }))),
    }
}
