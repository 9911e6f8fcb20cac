use crate::lifecycle::{
    self, ArchiveRequest, DraftInput, FailedPublishRequest, LifecycleError, PublishRequest,
    RestoreRequest, ReviewRequest,
};
use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use validator::Validate;

pub(super) fn configure(conf: &mut web::ServiceConfig) {
    conf.service(view_version)
        .service(edit_version)
        .service(publish_version)
        .service(archive_version)
        .service(review_version)
        .service(failed_publish)
        .service(restore_version);
}

#[get("/api/versions/{id}")]
pub async fn view_version(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, LifecycleError> {
    let view = lifecycle::get_version(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/versions/{id}/edit")]
pub async fn edit_version(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<DraftInput>,
) -> Result<HttpResponse, LifecycleError> {
    let view = lifecycle::edit(db.get_ref(), path.into_inner(), &body, super::now()).await?;
    Ok(HttpResponse::Created().json(view))
}

#[post("/api/versions/{id}/publish")]
pub async fn publish_version(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<PublishRequest>,
) -> Result<HttpResponse, LifecycleError> {
    let view = lifecycle::publish(db.get_ref(), path.into_inner(), &body, super::now()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/versions/{id}/archive")]
pub async fn archive_version(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<ArchiveRequest>,
) -> Result<HttpResponse, LifecycleError> {
    let view = lifecycle::archive(db.get_ref(), path.into_inner(), &body, super::now()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/versions/{id}/review")]
pub async fn review_version(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<ReviewRequest>,
) -> Result<HttpResponse, LifecycleError> {
    let view =
        lifecycle::mark_reviewed(db.get_ref(), path.into_inner(), &body, super::now()).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/versions/{id}/failed-publish")]
pub async fn failed_publish(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<FailedPublishRequest>,
) -> Result<HttpResponse, LifecycleError> {
    body.validate()?;
    let view = lifecycle::record_failed_publish(
        db.get_ref(),
        path.into_inner(),
        &body.language,
        super::now(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/versions/{id}/restore")]
pub async fn restore_version(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    body: web::Json<RestoreRequest>,
) -> Result<HttpResponse, LifecycleError> {
    let view = lifecycle::restore(db.get_ref(), path.into_inner(), &body, super::now()).await?;
    Ok(HttpResponse::Created().json(view))
}
