use std::collections::HashMap;

use chrono::Utc;
use contracts::domain::a001_pricing_category::aggregate::{PricingCategory, PricingCategoryId};
use contracts::domain::a002_service_type::aggregate::ServiceTypeId;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a001_pricing_category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Связь категория ↔ тип услуги
pub mod service_type_link {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "a001_pricing_category_service_type")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub category_id: String,
        #[sea_orm(primary_key, auto_increment = false)]
        pub service_type_id: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

/// Связь категория ↔ автомобиль
pub mod vehicle_link {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "a001_pricing_category_vehicle")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub category_id: String,
        #[sea_orm(primary_key, auto_increment = false)]
        pub vehicle_id: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl TryFrom<Model> for PricingCategory {
    type Error = uuid::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id)?;
        Ok(PricingCategory {
            id: PricingCategoryId::new(uuid),
            name: m.name,
            description: m.description,
            service_type_ids: Vec::new(),
            vehicle_ids: Vec::new(),
            sort_order: m.sort_order,
            is_active: m.is_active,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
        })
    }
}

/// Строки с нечитаемым id пропускаются с предупреждением
fn from_models(models: Vec<Model>) -> Vec<PricingCategory> {
    models
        .into_iter()
        .filter_map(|m| {
            let id = m.id.clone();
            PricingCategory::try_from(m)
                .map_err(|e| tracing::warn!("Skipping pricing category with bad id '{}': {}", id, e))
                .ok()
        })
        .collect()
}

fn to_active(aggregate: &PricingCategory) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.id.to_string()),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        sort_order: Set(aggregate.sort_order),
        is_active: Set(aggregate.is_active),
        created_at: Set(Some(aggregate.created_at)),
        updated_at: Set(Some(aggregate.updated_at)),
    }
}

/// Подтянуть связи из junction-таблиц
async fn attach_links<C: ConnectionTrait>(
    db: &C,
    items: &mut [PricingCategory],
) -> anyhow::Result<()> {
    if items.is_empty() {
        return Ok(());
    }
    let keys: Vec<String> = items.iter().map(|c| c.id.to_string()).collect();

    let mut service_types: HashMap<String, Vec<ServiceTypeId>> = HashMap::new();
    for link in service_type_link::Entity::find()
        .filter(service_type_link::Column::CategoryId.is_in(keys.clone()))
        .order_by_asc(service_type_link::Column::ServiceTypeId)
        .all(db)
        .await?
    {
        if let Ok(uuid) = Uuid::parse_str(&link.service_type_id) {
            service_types
                .entry(link.category_id)
                .or_default()
                .push(ServiceTypeId::new(uuid));
        }
    }

    let mut vehicles: HashMap<String, Vec<String>> = HashMap::new();
    for link in vehicle_link::Entity::find()
        .filter(vehicle_link::Column::CategoryId.is_in(keys))
        .order_by_asc(vehicle_link::Column::VehicleId)
        .all(db)
        .await?
    {
        vehicles
            .entry(link.category_id)
            .or_default()
            .push(link.vehicle_id);
    }

    for item in items.iter_mut() {
        let key = item.id.to_string();
        item.service_type_ids = service_types.remove(&key).unwrap_or_default();
        item.vehicle_ids = vehicles.remove(&key).unwrap_or_default();
    }
    Ok(())
}

/// Все категории в порядке отображения: sort_order, затем имя
pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<PricingCategory>> {
    let models = Entity::find()
        .order_by_asc(Column::SortOrder)
        .order_by_asc(Column::Name)
        .all(db)
        .await?;
    let mut items = from_models(models);
    attach_links(db, &mut items).await?;
    Ok(items)
}

pub async fn get_by_id(
    db: &DatabaseConnection,
    id: PricingCategoryId,
) -> anyhow::Result<Option<PricingCategory>> {
    let Some(model) = Entity::find_by_id(id.to_string()).one(db).await? else {
        return Ok(None);
    };
    let mut items = vec![PricingCategory::try_from(model)?];
    attach_links(db, &mut items).await?;
    Ok(items.pop())
}

pub async fn count(db: &DatabaseConnection) -> anyhow::Result<u64> {
    Ok(Entity::find().count(db).await?)
}

async fn insert_service_type_links<C: ConnectionTrait>(
    db: &C,
    category_id: &str,
    ids: &[ServiceTypeId],
) -> anyhow::Result<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let links = ids.iter().map(|id| service_type_link::ActiveModel {
        category_id: Set(category_id.to_string()),
        service_type_id: Set(id.to_string()),
    });
    service_type_link::Entity::insert_many(links)
        .exec_without_returning(db)
        .await?;
    Ok(())
}

pub async fn insert(db: &DatabaseConnection, aggregate: &PricingCategory) -> anyhow::Result<Uuid> {
    let key = aggregate.id.to_string();
    let txn = db.begin().await?;

    to_active(aggregate).insert(&txn).await?;
    insert_service_type_links(&txn, &key, &aggregate.service_type_ids).await?;

    txn.commit().await?;
    Ok(aggregate.id.value())
}

/// Обновить поля строки. Если переданы `service_type_ids`, набор связей
/// заменяется в той же транзакции.
pub async fn update(
    db: &DatabaseConnection,
    aggregate: &PricingCategory,
    service_type_ids: Option<&[ServiceTypeId]>,
) -> anyhow::Result<()> {
    let txn = db.begin().await?;

    to_active(aggregate).update(&txn).await?;
    if let Some(ids) = service_type_ids {
        rewrite_service_type_links(&txn, aggregate.id, ids).await?;
    }

    txn.commit().await?;
    Ok(())
}

/// Жесткое удаление вместе со связями. `false`, если строки не было.
pub async fn delete(db: &DatabaseConnection, id: PricingCategoryId) -> anyhow::Result<bool> {
    let key = id.to_string();
    let txn = db.begin().await?;

    service_type_link::Entity::delete_many()
        .filter(service_type_link::Column::CategoryId.eq(key.clone()))
        .exec(&txn)
        .await?;
    vehicle_link::Entity::delete_many()
        .filter(vehicle_link::Column::CategoryId.eq(key.clone()))
        .exec(&txn)
        .await?;
    let result = Entity::delete_by_id(key).exec(&txn).await?;

    txn.commit().await?;
    Ok(result.rows_affected > 0)
}

/// Полная замена набора типов услуг
pub async fn replace_service_types(
    db: &DatabaseConnection,
    id: PricingCategoryId,
    ids: &[ServiceTypeId],
) -> anyhow::Result<()> {
    let txn = db.begin().await?;
    rewrite_service_type_links(&txn, id, ids).await?;
    txn.commit().await?;
    Ok(())
}

async fn rewrite_service_type_links<C: ConnectionTrait>(
    db: &C,
    id: PricingCategoryId,
    ids: &[ServiceTypeId],
) -> anyhow::Result<()> {
    let key = id.to_string();
    service_type_link::Entity::delete_many()
        .filter(service_type_link::Column::CategoryId.eq(key.clone()))
        .exec(db)
        .await?;
    insert_service_type_links(db, &key, ids).await
}

/// Добавить автомобили; уже привязанные пропускаются
pub async fn add_vehicles(
    db: &DatabaseConnection,
    id: PricingCategoryId,
    vehicle_ids: &[String],
) -> anyhow::Result<usize> {
    let key = id.to_string();
    let existing: Vec<String> = vehicle_link::Entity::find()
        .filter(vehicle_link::Column::CategoryId.eq(key.clone()))
        .all(db)
        .await?
        .into_iter()
        .map(|l| l.vehicle_id)
        .collect();

    let fresh: Vec<vehicle_link::ActiveModel> = vehicle_ids
        .iter()
        .filter(|v| !existing.contains(v))
        .map(|v| vehicle_link::ActiveModel {
            category_id: Set(key.clone()),
            vehicle_id: Set(v.clone()),
        })
        .collect();
    let added = fresh.len();
    if added > 0 {
        vehicle_link::Entity::insert_many(fresh)
            .exec_without_returning(db)
            .await?;
    }
    Ok(added)
}

pub async fn remove_vehicles(
    db: &DatabaseConnection,
    id: PricingCategoryId,
    vehicle_ids: &[String],
) -> anyhow::Result<u64> {
    if vehicle_ids.is_empty() {
        return Ok(0);
    }
    let result = vehicle_link::Entity::delete_many()
        .filter(vehicle_link::Column::CategoryId.eq(id.to_string()))
        .filter(vehicle_link::Column::VehicleId.is_in(vehicle_ids.to_vec()))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
