use crate::orm::postal_codes;
use actix_web::{error, get, web, Error, HttpResponse};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

pub(super) fn configure(conf: &mut web::ServiceConfig) {
    conf.service(view_postal_code);
}

#[get("/api/postal-codes/{code}")]
pub async fn view_postal_code(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let code = path.into_inner();
    let postal_code = postal_codes::Entity::find()
        .filter(postal_codes::Column::Code.eq(code.as_str()))
        .one(db.get_ref())
        .await
        .map_err(error::ErrorInternalServerError)?
        .ok_or_else(|| error::ErrorNotFound("Postal code not found."))?;
    Ok(HttpResponse::Ok().json(postal_code))
}
