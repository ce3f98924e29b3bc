use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema};

use crate::entity::{photo, user};

/// Connect to the database and make sure the schema exists.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(20)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    sync_schema(&db).await?;

    Ok(db)
}

/// Create the `user` and `photo` tables (with their unique constraints) from
/// the entity definitions if they do not exist yet.
async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut create_user = schema.create_table_from_entity(user::Entity);
    db.execute(backend.build(create_user.if_not_exists())).await?;

    let mut create_photo = schema.create_table_from_entity(photo::Entity);
    db.execute(backend.build(create_photo.if_not_exists())).await?;

    Ok(())
}
