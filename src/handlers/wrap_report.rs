use crate::db::Db;
use crate::error::AppError;
use crate::models::wrap_report::WrapReportExists;
use crate::services::wrap_report as service;
use ntex::web::{self, HttpResponse};
use std::sync::Arc;

pub async fn generate_wrap_report(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = service::generate_wrap_report(&db, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(&report))
}

pub async fn get_wrap_report(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
) -> Result<HttpResponse, AppError> {
    let report = service::get_wrap_report(&db, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(&report))
}

pub async fn has_wrap_report(
    db: web::types::State<Arc<Db>>,
    path: web::types::Path<String>,
) -> Result<HttpResponse, AppError> {
    let exists = service::has_wrap_report(&db, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(&WrapReportExists { exists }))
}
