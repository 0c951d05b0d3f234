use contracts::domain::a001_pricing_category::aggregate::{
    dedup_ids, PricingCategory, PricingCategoryDto, PricingCategoryId, PricingCategoryPatch,
};
use contracts::domain::a002_service_type::aggregate::ServiceTypeId;
use contracts::domain::common::AggregateRoot;
use sea_orm::DatabaseConnection;

use super::repository;
use crate::domain::a002_service_type;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::shared::logger;

fn log(message: &str) {
    logger::log_for::<PricingCategory>(message);
}

/// Список категорий (sort_order по возрастанию, затем имя)
pub async fn list_all(db: &DatabaseConnection) -> ServiceResult<Vec<PricingCategory>> {
    Ok(repository::list_all(db).await?)
}

pub async fn get_by_id(
    db: &DatabaseConnection,
    id: PricingCategoryId,
) -> ServiceResult<PricingCategory> {
    repository::get_by_id(db, id)
        .await?
        .ok_or_else(|| ServiceError::not_found(PricingCategory::element_name(), id))
}

/// Создание категории; без явного sort_order встает в конец списка
pub async fn create(
    db: &DatabaseConnection,
    dto: PricingCategoryDto,
) -> ServiceResult<PricingCategory> {
    let next_sort_order = repository::count(db).await? as i32 + 1;
    let mut aggregate = PricingCategory::new_for_insert(dto, next_sort_order);

    aggregate.validate().map_err(ServiceError::Validation)?;
    a002_service_type::service::ensure_exist(db, &aggregate.service_type_ids).await?;
    aggregate.before_write();

    repository::insert(db, &aggregate).await?;
    tracing::info!(
        "Created pricing category '{}' at position {}",
        aggregate.name,
        aggregate.sort_order
    );
    log(&format!("Created category '{}'", aggregate.name));
    Ok(aggregate)
}

/// Частичное обновление. Перестановка присылает только `sort_order`.
pub async fn patch(
    db: &DatabaseConnection,
    id: PricingCategoryId,
    patch: PricingCategoryPatch,
) -> ServiceResult<PricingCategory> {
    patch.validate().map_err(ServiceError::Validation)?;

    let mut aggregate = get_by_id(db, id).await?;
    aggregate.apply_patch(&patch);
    aggregate.validate().map_err(ServiceError::Validation)?;
    aggregate.before_write();

    if patch.service_type_ids.is_some() {
        a002_service_type::service::ensure_exist(db, &aggregate.service_type_ids).await?;
    }

    let links = patch
        .service_type_ids
        .as_ref()
        .map(|_| aggregate.service_type_ids.as_slice());
    repository::update(db, &aggregate, links).await?;

    if let Some(sort_order) = patch.sort_order {
        tracing::debug!("Category {} moved to position {}", id, sort_order);
    } else {
        log(&format!("Updated category '{}'", aggregate.name));
    }
    get_by_id(db, id).await
}

/// Удаление без перенумерации соседних категорий
pub async fn delete(db: &DatabaseConnection, id: PricingCategoryId) -> ServiceResult<()> {
    if !repository::delete(db, id).await? {
        return Err(ServiceError::not_found(PricingCategory::element_name(), id));
    }
    tracing::info!("Deleted pricing category {}", id);
    log(&format!("Deleted category {}", id));
    Ok(())
}

pub async fn replace_service_types(
    db: &DatabaseConnection,
    id: PricingCategoryId,
    ids: Vec<ServiceTypeId>,
) -> ServiceResult<PricingCategory> {
    let ids = dedup_ids(ids);
    get_by_id(db, id).await?;
    a002_service_type::service::ensure_exist(db, &ids).await?;

    repository::replace_service_types(db, id, &ids).await?;
    get_by_id(db, id).await
}

pub async fn add_vehicles(
    db: &DatabaseConnection,
    id: PricingCategoryId,
    vehicle_ids: Vec<String>,
) -> ServiceResult<PricingCategory> {
    let vehicle_ids = clean_vehicle_ids(vehicle_ids)?;
    get_by_id(db, id).await?;

    let added = repository::add_vehicles(db, id, &vehicle_ids).await?;
    if added > 0 {
        log(&format!("Linked {} vehicle(s) to category {}", added, id));
    }
    get_by_id(db, id).await
}

pub async fn remove_vehicles(
    db: &DatabaseConnection,
    id: PricingCategoryId,
    vehicle_ids: Vec<String>,
) -> ServiceResult<PricingCategory> {
    let vehicle_ids = clean_vehicle_ids(vehicle_ids)?;
    get_by_id(db, id).await?;

    let removed = repository::remove_vehicles(db, id, &vehicle_ids).await?;
    if removed > 0 {
        log(&format!("Unlinked {} vehicle(s) from category {}", removed, id));
    }
    get_by_id(db, id).await
}

fn clean_vehicle_ids(vehicle_ids: Vec<String>) -> ServiceResult<Vec<String>> {
    let ids: Vec<String> = vehicle_ids
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    if ids.is_empty() {
        return Err(ServiceError::Validation(
            "At least one vehicle id is required".into(),
        ));
    }
    Ok(dedup_ids(ids))
}

/// Демо-данные: типы услуг и несколько категорий
pub async fn insert_test_data(db: &DatabaseConnection) -> ServiceResult<Vec<PricingCategory>> {
    let service_types = a002_service_type::service::insert_test_data(db).await?;
    let find = |name: &str| -> Vec<ServiceTypeId> {
        service_types
            .iter()
            .filter(|s| s.name.starts_with(name))
            .map(|s| s.id)
            .collect()
    };

    let data = vec![
        PricingCategoryDto {
            name: "Airport Transfers".into(),
            description: Some("Fixed fares to and from Haneda and Narita".into()),
            service_type_ids: find("Airport Transfer"),
            sort_order: None,
            is_active: true,
        },
        PricingCategoryDto {
            name: "Charter".into(),
            description: Some("Hourly charter, priced per day".into()),
            service_type_ids: find("Charter"),
            sort_order: None,
            is_active: true,
        },
        PricingCategoryDto {
            name: "Corporate".into(),
            description: None,
            service_type_ids: Vec::new(),
            sort_order: None,
            is_active: false,
        },
    ];

    for dto in data {
        create(db, dto).await?;
    }
    list_all(db).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_connection;
    use contracts::domain::a002_service_type::aggregate::ServiceTypeDto;
    use sea_orm::{ConnectionTrait, EntityTrait};

    fn dto(name: &str) -> PricingCategoryDto {
        PricingCategoryDto {
            name: name.to_string(),
            is_active: true,
            ..Default::default()
        }
    }

    async fn names(db: &DatabaseConnection) -> Vec<String> {
        list_all(db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect()
    }

    #[tokio::test]
    async fn test_create_appends_to_end() {
        let db = test_connection().await;
        let a = create(&db, dto("A")).await.unwrap();
        let b = create(&db, dto("B")).await.unwrap();
        let c = create(&db, dto("C")).await.unwrap();

        assert_eq!((a.sort_order, b.sort_order, c.sort_order), (1, 2, 3));
        assert_eq!(names(&db).await, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let db = test_connection().await;
        let err = create(&db, dto("  ")).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(list_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_service_type() {
        let db = test_connection().await;
        let mut input = dto("A");
        input.service_type_ids = vec![ServiceTypeId::new_v4()];

        let err = create(&db, input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_sort_order_patches_reorder_list() {
        let db = test_connection().await;
        let a = create(&db, dto("A")).await.unwrap();
        let b = create(&db, dto("B")).await.unwrap();
        let c = create(&db, dto("C")).await.unwrap();

        // C перетащили в начало: C=1, A=2, B=3
        for (id, n) in [(c.id, 1), (a.id, 2), (b.id, 3)] {
            let updated = patch(&db, id, PricingCategoryPatch::sort_order_only(n))
                .await
                .unwrap();
            assert_eq!(updated.sort_order, n);
        }
        assert_eq!(names(&db).await, vec!["C", "A", "B"]);
    }

    #[tokio::test]
    async fn test_patch_keeps_untouched_fields() {
        let db = test_connection().await;
        let mut input = dto("Charter");
        input.description = Some("hourly".into());
        let created = create(&db, input).await.unwrap();

        let updated = patch(&db, created.id, PricingCategoryPatch::is_active_only(false))
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.description.as_deref(), Some("hourly"));
        assert_eq!(updated.sort_order, created.sort_order);
    }

    #[tokio::test]
    async fn test_patch_errors() {
        let db = test_connection().await;
        let created = create(&db, dto("A")).await.unwrap();

        let empty = patch(&db, created.id, PricingCategoryPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(empty, ServiceError::Validation(_)));

        let zero = patch(&db, created.id, PricingCategoryPatch::sort_order_only(0))
            .await
            .unwrap_err();
        assert!(matches!(zero, ServiceError::Validation(_)));

        let missing = patch(
            &db,
            PricingCategoryId::new_v4(),
            PricingCategoryPatch::sort_order_only(1),
        )
        .await
        .unwrap_err();
        assert!(matches!(missing, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_does_not_renumber() {
        let db = test_connection().await;
        create(&db, dto("A")).await.unwrap();
        let b = create(&db, dto("B")).await.unwrap();
        create(&db, dto("C")).await.unwrap();

        delete(&db, b.id).await.unwrap();
        let orders: Vec<i32> = list_all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.sort_order)
            .collect();
        assert_eq!(orders, vec![1, 3]);

        let again = delete(&db, b.id).await.unwrap_err();
        assert!(matches!(again, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_equal_sort_orders_fall_back_to_name() {
        let db = test_connection().await;
        let mut zed = dto("Zed");
        zed.sort_order = Some(1);
        let mut alpha = dto("Alpha");
        alpha.sort_order = Some(1);
        create(&db, zed).await.unwrap();
        create(&db, alpha).await.unwrap();

        assert_eq!(names(&db).await, vec!["Alpha", "Zed"]);
    }

    #[tokio::test]
    async fn test_service_type_links() {
        let db = test_connection().await;
        let haneda = a002_service_type::service::create(
            &db,
            ServiceTypeDto {
                name: "Airport Transfer Haneda".into(),
                description: None,
                is_active: true,
            },
        )
        .await
        .unwrap();
        let created = create(&db, dto("Airport")).await.unwrap();

        let updated = replace_service_types(&db, created.id, vec![haneda.id, haneda.id])
            .await
            .unwrap();
        assert_eq!(updated.service_type_ids, vec![haneda.id]);

        let cleared = patch(
            &db,
            created.id,
            PricingCategoryPatch {
                service_type_ids: Some(Vec::new()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(cleared.service_type_ids.is_empty());
    }

    #[tokio::test]
    async fn test_vehicle_links_are_idempotent() {
        let db = test_connection().await;
        let created = create(&db, dto("Charter")).await.unwrap();

        add_vehicles(&db, created.id, vec!["v-1".into(), "v-2".into()])
            .await
            .unwrap();
        let linked = add_vehicles(&db, created.id, vec!["v-2".into(), "v-2".into()])
            .await
            .unwrap();
        assert_eq!(linked.vehicle_ids, vec!["v-1", "v-2"]);

        let left = remove_vehicles(&db, created.id, vec!["v-1".into()])
            .await
            .unwrap();
        assert_eq!(left.vehicle_ids, vec!["v-2"]);

        let err = add_vehicles(&db, created.id, vec!["  ".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_links() {
        let db = test_connection().await;
        let created = create(&db, dto("Charter")).await.unwrap();
        add_vehicles(&db, created.id, vec!["v-1".into()])
            .await
            .unwrap();

        delete(&db, created.id).await.unwrap();
        let orphans = repository::vehicle_link::Entity::find()
            .all(&db)
            .await
            .unwrap();
        assert!(orphans.is_empty());
    }

    #[tokio::test]
    async fn test_insert_test_data() {
        let db = test_connection().await;
        let categories = insert_test_data(&db).await.unwrap();

        assert_eq!(categories.len(), 3);
        assert_eq!(categories[0].name, "Airport Transfers");
        assert_eq!(categories[0].service_type_ids.len(), 2);
        assert_eq!(categories[2].sort_order, 3);
    }

    #[tokio::test]
    async fn test_patch_is_atomic_when_links_fail() {
        let db = test_connection().await;
        let charter = a002_service_type::service::create(
            &db,
            ServiceTypeDto {
                name: "Charter Services".into(),
                description: None,
                is_active: true,
            },
        )
        .await
        .unwrap();
        let created = create(&db, dto("Charter")).await.unwrap();

        db.execute_unprepared(
            "CREATE TRIGGER links_locked BEFORE INSERT ON a001_pricing_category_service_type \
             BEGIN SELECT RAISE(ABORT, 'links locked'); END;",
        )
        .await
        .unwrap();

        let err = patch(
            &db,
            created.id,
            PricingCategoryPatch {
                name: Some("Renamed".into()),
                service_type_ids: Some(vec![charter.id]),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Internal(_)));

        let stored = get_by_id(&db, created.id).await.unwrap();
        assert_eq!(stored.name, "Charter");
        assert!(stored.service_type_ids.is_empty());
    }

    #[tokio::test]
    async fn test_rows_with_bad_id_are_skipped() {
        let db = test_connection().await;
        create(&db, dto("A")).await.unwrap();
        db.execute_unprepared(
            "INSERT INTO a001_pricing_category (id, name, sort_order, is_active) \
             VALUES ('not-a-uuid', 'Broken', 1, 1)",
        )
        .await
        .unwrap();

        assert_eq!(names(&db).await, vec!["A"]);
    }
}
