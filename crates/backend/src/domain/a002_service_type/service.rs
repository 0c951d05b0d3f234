use contracts::domain::a002_service_type::aggregate::{ServiceType, ServiceTypeDto, ServiceTypeId};
use sea_orm::DatabaseConnection;

use super::repository;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::shared::logger;

pub async fn list_all(db: &DatabaseConnection) -> ServiceResult<Vec<ServiceType>> {
    Ok(repository::list_all(db).await?)
}

pub async fn create(db: &DatabaseConnection, dto: ServiceTypeDto) -> ServiceResult<ServiceType> {
    let aggregate = ServiceType::new_for_insert(dto);
    aggregate.validate().map_err(ServiceError::Validation)?;

    repository::insert(db, &aggregate).await?;
    logger::log_for::<ServiceType>(&format!("Created service type '{}'", aggregate.name));
    Ok(aggregate)
}

/// Проверка ссылок на типы услуг; неизвестный id — ошибка валидации
pub async fn ensure_exist(db: &DatabaseConnection, ids: &[ServiceTypeId]) -> ServiceResult<()> {
    let found = repository::existing_ids(db, ids).await?;
    if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
        return Err(ServiceError::Validation(format!(
            "Unknown service type: {}",
            missing
        )));
    }
    Ok(())
}

/// Типы услуг для демо-данных (если таблица пуста)
pub async fn insert_test_data(db: &DatabaseConnection) -> ServiceResult<Vec<ServiceType>> {
    if repository::count(db).await? > 0 {
        return list_all(db).await;
    }
    let names = [
        ("Airport Transfer Haneda", "Haneda airport pick-up and drop-off"),
        ("Airport Transfer Narita", "Narita airport pick-up and drop-off"),
        ("Charter Services", "Hourly charter with a dedicated driver"),
    ];
    let mut created = Vec::with_capacity(names.len());
    for (name, description) in names {
        let dto = ServiceTypeDto {
            name: name.to_string(),
            description: Some(description.to_string()),
            is_active: true,
        };
        created.push(create(db, dto).await?);
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;
    use sea_orm::ConnectionTrait;

    fn dto(name: &str) -> ServiceTypeDto {
        ServiceTypeDto {
            name: name.to_string(),
            description: None,
            is_active: true,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_sorted_by_name() {
        let db = test_connection().await;
        create(&db, dto("Charter Services")).await.unwrap();
        create(&db, dto("Airport Transfer Haneda")).await.unwrap();

        let names: Vec<String> = list_all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Airport Transfer Haneda", "Charter Services"]);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let db = test_connection().await;
        let err = create(&db, dto("   ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_ensure_exist_reports_unknown_id() {
        let db = test_connection().await;
        let known = create(&db, dto("Charter Services")).await.unwrap();
        let unknown = ServiceTypeId::new_v4();

        assert!(ensure_exist(&db, &[known.id]).await.is_ok());
        let err = ensure_exist(&db, &[known.id, unknown]).await.unwrap_err();
        assert!(err.to_string().contains(&unknown.to_string()));
    }

    #[tokio::test]
    async fn test_insert_test_data_runs_once() {
        let db = test_connection().await;
        assert_eq!(insert_test_data(&db).await.unwrap().len(), 3);
        assert_eq!(insert_test_data(&db).await.unwrap().len(), 3);
        assert_eq!(list_all(&db).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_rows_with_bad_id_are_skipped() {
        let db = test_connection().await;
        create(&db, dto("Charter Services")).await.unwrap();
        db.execute_unprepared(
            "INSERT INTO a002_service_type (id, name, is_active) VALUES ('broken', 'Broken', 1)",
        )
        .await
        .unwrap();

        let items = list_all(&db).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Charter Services");
    }
}
