use crate::db::Db;
use crate::error::AppError;
use crate::models::ticket::*;
use crate::services::ticket as service;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn issue_ticket(
    db: web::types::State<Arc<Db>>,
    body: web::types::Json<IssueTicketRequest>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let result = service::issue_ticket(&db, req)?;
    Ok(HttpResponse::Created().json(&result))
}

pub async fn validate_ticket(
    db: web::types::State<Arc<Db>>,
    body: web::types::Json<TicketCheckRequest>,
) -> Result<HttpResponse, AppError> {
    let valid = service::validate_ticket(&db, &body.code, &body.competition_id)?;
    Ok(HttpResponse::Ok().json(&ValidateTicketResult { valid }))
}

pub async fn revoke_ticket(
    db: web::types::State<Arc<Db>>,
    body: web::types::Json<TicketCheckRequest>,
) -> Result<HttpResponse, AppError> {
    let revoked = service::revoke_ticket(&db, &body.code, &body.competition_id)?;
    Ok(HttpResponse::Ok().json(&RevokeTicketResult { revoked }))
}
