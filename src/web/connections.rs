use crate::connections;
use crate::lifecycle::LifecycleError;
use actix_web::{get, post, web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use validator::Validate;

pub(super) fn configure(conf: &mut web::ServiceConfig) {
    conf.service(create_connection)
        .service(view_service_connections)
        .service(view_channel_connections);
}

#[derive(Deserialize, Validate)]
pub struct NewConnection {
    #[validate(range(min = 1))]
    pub service_root_id: i32,
    #[validate(range(min = 1))]
    pub channel_root_id: i32,
}

#[post("/api/connections")]
pub async fn create_connection(
    db: web::Data<DatabaseConnection>,
    body: web::Json<NewConnection>,
) -> Result<HttpResponse, LifecycleError> {
    body.validate()?;
    let connection = connections::connect(
        db.get_ref(),
        body.service_root_id,
        body.channel_root_id,
        super::now(),
    )
    .await?;
    Ok(HttpResponse::Created().json(connection))
}

#[get("/api/services/{root_id}/connections")]
pub async fn view_service_connections(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, LifecycleError> {
    let rows = connections::connections_for_service(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[get("/api/channels/{root_id}/connections")]
pub async fn view_channel_connections(
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, LifecycleError> {
    let rows = connections::connections_for_channel(db.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(rows))
}
