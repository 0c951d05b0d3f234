use chrono::Utc;
use contracts::shared::logger::LogEntry;
use sea_orm::entity::prelude::*;
use sea_orm::{EntityTrait, QueryOrder, Set};

use crate::shared::data::db::try_get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "system_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub timestamp: String,
    pub source: String,
    pub category: String,
    pub message: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for LogEntry {
    fn from(m: Model) -> Self {
        LogEntry {
            id: m.id,
            timestamp: m.timestamp,
            source: m.source,
            category: m.category,
            message: m.message,
        }
    }
}

/// Добавить запись в лог без ожидания (внутренняя функция).
/// До инициализации базы запись уходит только в tracing.
pub fn log_event_internal(source: &str, category: &str, message: &str) {
    tracing::debug!(source, category, "{}", message);
    let Some(db) = try_get_connection() else {
        return;
    };
    let source = source.to_string();
    let category = category.to_string();
    let message = message.to_string();

    tokio::spawn(async move {
        if let Err(e) = log_event(db, &source, &category, &message).await {
            tracing::warn!("Failed to log event: {}", e);
        }
    });
}

/// Добавить запись в лог
pub async fn log_event(
    db: &DatabaseConnection,
    source: &str,
    category: &str,
    message: &str,
) -> anyhow::Result<()> {
    let now = Utc::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string();

    let active = ActiveModel {
        id: sea_orm::ActiveValue::NotSet,
        timestamp: Set(now),
        source: Set(source.to_string()),
        category: Set(category.to_string()),
        message: Set(message.to_string()),
    };

    active.insert(db).await?;
    Ok(())
}

/// Получить все записи лога (новые сверху)
pub async fn get_all_logs(db: &DatabaseConnection) -> anyhow::Result<Vec<LogEntry>> {
    let logs: Vec<LogEntry> = Entity::find()
        .order_by_desc(Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(logs)
}

/// Очистить все записи лога
pub async fn clear_all_logs(db: &DatabaseConnection) -> anyhow::Result<()> {
    Entity::delete_many().exec(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;

    #[tokio::test]
    async fn test_newest_entries_first() {
        let db = test_connection().await;
        log_event(&db, "client", "a001_pricing_category", "first").await.unwrap();
        log_event(&db, "server", "startup", "second").await.unwrap();

        let logs = get_all_logs(&db).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].message, "second");
        assert_eq!(logs[1].source, "client");

        clear_all_logs(&db).await.unwrap();
        assert!(get_all_logs(&db).await.unwrap().is_empty());
    }
}
