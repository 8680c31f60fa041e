use crate::db::Db;
use crate::error::AppError;
use crate::models::bracket::{ScoreSubmission, ScoreSubmissionBody};
use crate::services::scoring as service;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn submit_score(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
    body: web::types::Json<ScoreSubmissionBody>,
) -> Result<HttpResponse, AppError> {
    let req = ScoreSubmission::new(path.into_inner(), body.into_inner());
    let updated = service::submit_score(&db, req)?;
    Ok(HttpResponse::Ok().json(&updated))
}
