use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use tracing::info;

use crate::config::DatabaseConfig;

/// Connect and bring the `asset` table in line with the entity definitions.
pub async fn init_db(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(1)
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    db.get_schema_registry("cms_server::entity::*")
        .sync(&db)
        .await?;
    info!(backend = ?db.get_database_backend(), "metadata schema synced");

    Ok(db)
}
