use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::AggregateRoot;

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор типа услуги
    ServiceTypeId
);

/// Тип услуги (Airport Transfer, Charter Services, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: ServiceTypeId,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceType {
    /// Создать новый тип услуги для вставки в БД
    pub fn new_for_insert(dto: ServiceTypeDto) -> Self {
        let now = Utc::now();
        Self {
            id: ServiceTypeId::new_v4(),
            name: dto.name.trim().to_string(),
            description: dto.description,
            is_active: dto.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Service type name is required".into());
        }
        Ok(())
    }
}

impl AggregateRoot for ServiceType {
    type Id = ServiceTypeId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a002"
    }

    fn collection_name() -> &'static str {
        "service_type"
    }

    fn element_name() -> &'static str {
        "Service type"
    }

    fn list_name() -> &'static str {
        "Service types"
    }
}

/// DTO для создания типа услуги
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTypeDto {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
