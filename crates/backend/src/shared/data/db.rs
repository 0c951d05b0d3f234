use once_cell::sync::OnceCell;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

static DB_CONN: OnceCell<DatabaseConnection> = OnceCell::new();

/// Схема создается при старте; повторный запуск ничего не меняет
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS a002_service_type (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT,
        updated_at TEXT
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a001_pricing_category (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        sort_order INTEGER NOT NULL DEFAULT 1,
        is_active INTEGER NOT NULL DEFAULT 1,
        created_at TEXT,
        updated_at TEXT
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a001_pricing_category_service_type (
        category_id TEXT NOT NULL,
        service_type_id TEXT NOT NULL,
        PRIMARY KEY (category_id, service_type_id)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS a001_pricing_category_vehicle (
        category_id TEXT NOT NULL,
        vehicle_id TEXT NOT NULL,
        PRIMARY KEY (category_id, vehicle_id)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS system_log (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        source TEXT NOT NULL,
        category TEXT NOT NULL,
        message TEXT NOT NULL
    );
    "#,
];

/// Открыть соединение по URL вида `sqlite://...` или `sqlite::memory:`
pub async fn connect(db_url: &str) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(db_url.to_string());
    // SQLite: одна запись за раз; для :memory: еще и одна общая база
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

pub async fn bootstrap_schema(conn: &DatabaseConnection) -> anyhow::Result<()> {
    for sql in SCHEMA {
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            sql.to_string(),
        ))
        .await?;
    }
    Ok(())
}

pub async fn initialize_database(db_path: Option<&str>) -> anyhow::Result<()> {
    let db_file = db_path.unwrap_or("target/db/fleet_pricing.db");
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    let conn = connect(&db_url).await?;
    bootstrap_schema(&conn).await?;
    tracing::info!("Database ready at {}", normalized);

    DB_CONN
        .set(conn)
        .map_err(|_| anyhow::anyhow!("Failed to set DB_CONN"))?;
    Ok(())
}

pub fn get_connection() -> &'static DatabaseConnection {
    DB_CONN
        .get()
        .expect("Database connection has not been initialized")
}

/// Соединение, если база уже инициализирована (для фоновых задач)
pub fn try_get_connection() -> Option<&'static DatabaseConnection> {
    DB_CONN.get()
}

#[cfg(test)]
pub async fn test_connection() -> DatabaseConnection {
    let conn = connect("sqlite::memory:").await.unwrap();
    bootstrap_schema(&conn).await.unwrap();
    conn
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let conn = test_connection().await;
        bootstrap_schema(&conn).await.unwrap();

        let tables = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' AND name LIKE 'a00%'".to_string(),
            ))
            .await
            .unwrap();
        assert_eq!(tables.len(), 4);
    }
}
