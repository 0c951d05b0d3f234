use chrono::Utc;
use contracts::domain::a002_service_type::aggregate::{ServiceType, ServiceTypeId};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a002_service_type")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ServiceType {
    type Error = uuid::Error;

    fn try_from(m: Model) -> Result<Self, Self::Error> {
        let uuid = Uuid::parse_str(&m.id)?;
        Ok(ServiceType {
            id: ServiceTypeId::new(uuid),
            name: m.name,
            description: m.description,
            is_active: m.is_active,
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
        })
    }
}

fn from_models(models: Vec<Model>) -> Vec<ServiceType> {
    models
        .into_iter()
        .filter_map(|m| {
            let id = m.id.clone();
            ServiceType::try_from(m)
                .map_err(|e| tracing::warn!("Skipping service type with bad id '{}': {}", id, e))
                .ok()
        })
        .collect()
}

pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<ServiceType>> {
    let models = Entity::find().order_by_asc(Column::Name).all(db).await?;
    Ok(from_models(models))
}

pub async fn count(db: &DatabaseConnection) -> anyhow::Result<u64> {
    use sea_orm::PaginatorTrait;
    Ok(Entity::find().count(db).await?)
}

/// Какие из переданных id реально существуют
pub async fn existing_ids(
    db: &DatabaseConnection,
    ids: &[ServiceTypeId],
) -> anyhow::Result<Vec<ServiceTypeId>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let keys: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    let models = Entity::find().filter(Column::Id.is_in(keys)).all(db).await?;
    Ok(from_models(models).into_iter().map(|s| s.id).collect())
}

pub async fn insert(db: &DatabaseConnection, aggregate: &ServiceType) -> anyhow::Result<Uuid> {
    let uuid = aggregate.id.value();
    let active = ActiveModel {
        id: Set(uuid.to_string()),
        name: Set(aggregate.name.clone()),
        description: Set(aggregate.description.clone()),
        is_active: Set(aggregate.is_active),
        created_at: Set(Some(aggregate.created_at)),
        updated_at: Set(Some(aggregate.updated_at)),
    };
    active.insert(db).await?;
    Ok(uuid)
}
