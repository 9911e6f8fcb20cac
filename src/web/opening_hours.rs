use crate::lifecycle::{self, LifecycleError};
use crate::opening_hours::{self, ServiceHours};
use actix_web::{get, put, web, HttpResponse};
use chrono::{NaiveDate, NaiveDateTime};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

pub(super) fn configure(conf: &mut web::ServiceConfig) {
    conf.service(view_effective_hours)
        .service(view_open_at)
        .service(view_opening_hours)
        .service(replace_opening_hours);
}

#[derive(Deserialize)]
pub struct DateQuery {
    /// Defaults to today
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize)]
pub struct AtQuery {
    pub at: Option<NaiveDateTime>,
}

#[get("/api/versions/{id}/opening-hours")]
pub async fn view_opening_hours(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, LifecycleError> {
    let id = path.into_inner();
    lifecycle::get_version(db.get_ref(), id).await?;
    let hours = opening_hours::load_opening_hours(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(hours))
}

#[put("/api/versions/{id}/opening-hours")]
pub async fn replace_opening_hours(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<Vec<ServiceHours>>,
) -> Result<HttpResponse, LifecycleError> {
    let hours =
        opening_hours::replace_opening_hours(db.get_ref(), path.into_inner(), &body).await?;
    Ok(HttpResponse::Ok().json(hours))
}

#[get("/api/versions/{id}/opening-hours/effective")]
pub async fn view_effective_hours(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    query: web::Query<DateQuery>,
) -> Result<HttpResponse, LifecycleError> {
    let id = path.into_inner();
    lifecycle::get_version(db.get_ref(), id).await?;
    let hours = opening_hours::load_opening_hours(db.get_ref(), id).await?;
    let date = query.date.unwrap_or_else(|| super::now().date());
    Ok(HttpResponse::Ok().json(opening_hours::effective_hours(&hours, date)))
}

#[get("/api/versions/{id}/opening-hours/open")]
pub async fn view_open_at(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    query: web::Query<AtQuery>,
) -> Result<HttpResponse, LifecycleError> {
    let id = path.into_inner();
    lifecycle::get_version(db.get_ref(), id).await?;
    let hours = opening_hours::load_opening_hours(db.get_ref(), id).await?;
    let at = query.at.unwrap_or_else(super::now);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "at": at,
        "open": opening_hours::is_open_at(&hours, at),
    })))
}
