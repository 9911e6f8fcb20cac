use crate::integrity;
use crate::lifecycle::{self, DraftInput, LifecycleError};
use crate::orm::roots::{self, EntityKind};
use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

pub(super) fn configure(conf: &mut web::ServiceConfig) {
    conf.service(list_roots)
        .service(create_root)
        .service(view_current)
        .service(view_history)
        .service(view_integrity);
}

#[derive(Deserialize)]
pub struct CurrentQuery {
    pub lang: Option<String>,
}

fn parse_kind(segment: &str) -> Result<EntityKind, LifecycleError> {
    EntityKind::from_path(segment)
        .ok_or_else(|| LifecycleError::NotFound(format!("unknown entity kind '{}'", segment)))
}

/// Root `root_id` if it exists and is of the kind named in the path.
async fn root_of_kind(
    db: &DatabaseConnection,
    segment: &str,
    root_id: i32,
) -> Result<roots::Model, LifecycleError> {
    let kind = parse_kind(segment)?;
    let root = lifecycle::find_root(db, root_id).await?;
    if root.kind != kind {
        return Err(LifecycleError::NotFound(format!(
            "{} {}",
            kind.path(),
            root_id
        )));
    }
    Ok(root)
}

#[get("/api/{kind}")]
pub async fn list_roots(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, LifecycleError> {
    let kind = parse_kind(&path.into_inner())?;
    let roots = lifecycle::list_roots(db.get_ref(), kind).await?;
    Ok(HttpResponse::Ok().json(roots.iter().map(|r| r.id).collect::<Vec<_>>()))
}

#[post("/api/{kind}")]
pub async fn create_root(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
    body: web::Json<DraftInput>,
) -> Result<HttpResponse, LifecycleError> {
    let kind = parse_kind(&path.into_inner())?;
    let view = lifecycle::create_root(db.get_ref(), kind, &body, super::now()).await?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/api/{kind}/{root_id}/current")]
pub async fn view_current(
    db: web::Data<DatabaseConnection>,
    path: web::Path<(String, i32)>,
    query: web::Query<CurrentQuery>,
) -> Result<HttpResponse, LifecycleError> {
    let (kind, root_id) = path.into_inner();
    root_of_kind(db.get_ref(), &kind, root_id).await?;
    let now = super::now();

    match &query.lang {
        Some(lang) => {
            let view = lifecycle::current_version(db.get_ref(), root_id, lang, now)
                .await?
                .ok_or_else(|| {
                    LifecycleError::NotFound(format!(
                        "no published version of {} in '{}'",
                        root_id, lang
                    ))
                })?;
            Ok(HttpResponse::Ok().json(view))
        }
        None => {
            let views = lifecycle::current_versions(db.get_ref(), root_id, now).await?;
            Ok(HttpResponse::Ok().json(views))
        }
    }
}

#[get("/api/{kind}/{root_id}/history")]
pub async fn view_history(
    db: web::Data<DatabaseConnection>,
    path: web::Path<(String, i32)>,
) -> Result<HttpResponse, LifecycleError> {
    let (kind, root_id) = path.into_inner();
    root_of_kind(db.get_ref(), &kind, root_id).await?;
    let history = lifecycle::history(db.get_ref(), root_id).await?;
    Ok(HttpResponse::Ok().json(history))
}

#[get("/api/{kind}/{root_id}/integrity")]
pub async fn view_integrity(
    db: web::Data<DatabaseConnection>,
    path: web::Path<(String, i32)>,
) -> Result<HttpResponse, LifecycleError> {
    let (kind, root_id) = path.into_inner();
    root_of_kind(db.get_ref(), &kind, root_id).await?;
    let violations = integrity::check_root(db.get_ref(), root_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "root_id": root_id,
        "ok": violations.is_empty(),
        "violations": violations,
    })))
}
