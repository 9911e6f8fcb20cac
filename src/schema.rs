//! Table creation from the entity definitions

use crate::orm::{
    daily_opening_times, language_availabilities, localized_texts, postal_codes, roots,
    service_channel_connections, service_hours, versioned_entities, versionings,
};
use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};

/// Create every table that does not exist yet, parents before children.
pub async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    create(db, roots::Entity).await?;
    create(db, versionings::Entity).await?;
    create(db, versioned_entities::Entity).await?;
    create(db, localized_texts::Entity).await?;
    create(db, language_availabilities::Entity).await?;
    create(db, service_hours::Entity).await?;
    create(db, daily_opening_times::Entity).await?;
    create(db, postal_codes::Entity).await?;
    create(db, service_channel_connections::Entity).await?;
    Ok(())
}

async fn create<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    log::debug!("Creating table {}", entity.table_name());
    let backend = db.get_database_backend();
    let mut statement = Schema::new(backend).create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}
