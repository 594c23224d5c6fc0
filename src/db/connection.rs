use anyhow::Context;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use tracing::info;

use crate::config::DatabaseConfig;

/// Single connection: the seeder issues one write at a time.
pub fn connect_options(cfg: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(1)
        .min_connections(0)
        .sqlx_logging(false);
    options
}

/// Connects and creates the `documents` and `accounts` tables if missing.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(connect_options(cfg))
        .await
        .context("failed to open the seed database")?;

    let backend = db.get_database_backend();
    info!(backend = ?backend, "syncing seed tables");
    db.get_schema_registry("mobievent_seed::db::entities::*")
        .sync(&db)
        .await
        .with_context(|| format!("failed to sync seed tables on {backend:?}"))?;
    Ok(db)
}

#[cfg(test)]
mod tests {
    use super::connect_options;
    use crate::config::DatabaseConfig;

    #[test]
    fn uses_a_single_connection() {
        let options = connect_options(&DatabaseConfig {
            url: "postgres://seed@localhost/mobievent".to_string(),
        });

        assert_eq!(options.get_max_connections(), Some(1));
        assert_eq!(options.get_min_connections(), Some(0));
        assert_eq!(options.get_url(), "postgres://seed@localhost/mobievent");
    }
}
