use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::a002_service_type::aggregate::ServiceTypeId;
use crate::domain::common::AggregateRoot;

// ============================================================================
// ID Type
// ============================================================================

crate::uuid_aggregate_id!(
    /// Уникальный идентификатор ценовой категории
    PricingCategoryId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Ценовая категория: именованная группа услуг с позицией в списке
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingCategory {
    pub id: PricingCategoryId,
    pub name: String,
    pub description: Option<String>,
    /// Без дубликатов, порядок не важен
    #[serde(default)]
    pub service_type_ids: Vec<ServiceTypeId>,
    /// Привязанные автомобили (таблица связей)
    #[serde(default)]
    pub vehicle_ids: Vec<String>,
    /// Ранг категории, начиная с 1
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PricingCategory {
    /// Создать новую категорию для вставки в БД.
    ///
    /// `next_sort_order` используется, когда DTO не задает позицию явно
    /// (новая категория встает в конец списка: count + 1).
    pub fn new_for_insert(dto: PricingCategoryDto, next_sort_order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: PricingCategoryId::new_v4(),
            name: dto.name.trim().to_string(),
            description: normalize_description(dto.description),
            service_type_ids: dedup_ids(dto.service_type_ids),
            vehicle_ids: Vec::new(),
            sort_order: dto.sort_order.unwrap_or(next_sort_order),
            is_active: dto.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Применить частичное обновление. Поля `None` не трогаются.
    pub fn apply_patch(&mut self, patch: &PricingCategoryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = &patch.description {
            self.description = normalize_description(Some(description.clone()));
        }
        if let Some(sort_order) = patch.sort_order {
            self.sort_order = sort_order;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        if let Some(ids) = &patch.service_type_ids {
            self.service_type_ids = dedup_ids(ids.clone());
        }
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Category name is required".into());
        }
        if self.sort_order < 1 {
            return Err("Sort order must be a positive integer".into());
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl AggregateRoot for PricingCategory {
    type Id = PricingCategoryId;

    fn id(&self) -> Self::Id {
        self.id
    }

    fn aggregate_index() -> &'static str {
        "a001"
    }

    fn collection_name() -> &'static str {
        "pricing_category"
    }

    fn element_name() -> &'static str {
        "Pricing category"
    }

    fn list_name() -> &'static str {
        "Pricing categories"
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// Удаляет повторы, сохраняя первое вхождение
pub fn dedup_ids<T: PartialEq>(ids: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания категории
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PricingCategoryDto {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub service_type_ids: Vec<ServiceTypeId>,
    /// `None` — поставить в конец списка
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Частичное обновление (PATCH). Сериализуются только заданные поля,
/// поэтому перестановка отправляет ровно `{"sort_order": n}`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PricingCategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type_ids: Option<Vec<ServiceTypeId>>,
}

impl PricingCategoryPatch {
    pub fn sort_order_only(sort_order: i32) -> Self {
        Self {
            sort_order: Some(sort_order),
            ..Default::default()
        }
    }

    pub fn is_active_only(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.sort_order.is_none()
            && self.is_active.is_none()
            && self.service_type_ids.is_none()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.is_empty() {
            return Err(
                "No update data provided. At least one field must be specified for update.".into(),
            );
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err("Category name is required".into());
        }
        if matches!(self.sort_order, Some(n) if n < 1) {
            return Err("Sort order must be a positive integer".into());
        }
        Ok(())
    }
}

/// Список автомобилей для привязки/отвязки
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct VehicleLinksDto {
    pub vehicle_ids: Vec<String>,
}

/// Полная замена набора типов услуг
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServiceTypeLinksDto {
    pub service_type_ids: Vec<ServiceTypeId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(name: &str) -> PricingCategoryDto {
        PricingCategoryDto {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_for_insert_appends_to_end() {
        let category = PricingCategory::new_for_insert(dto("Business"), 4);
        assert_eq!(category.sort_order, 4);
        assert_eq!(category.name, "Business");
        assert!(category.validate().is_ok());
    }

    #[test]
    fn test_explicit_sort_order_wins() {
        let mut input = dto("Elite");
        input.sort_order = Some(2);
        let category = PricingCategory::new_for_insert(input, 9);
        assert_eq!(category.sort_order, 2);
    }

    #[test]
    fn test_service_type_ids_are_deduplicated() {
        let a = ServiceTypeId::new_v4();
        let b = ServiceTypeId::new_v4();
        let mut input = dto("Platinum");
        input.service_type_ids = vec![a, b, a];
        let category = PricingCategory::new_for_insert(input, 1);
        assert_eq!(category.service_type_ids, vec![a, b]);
    }

    #[test]
    fn test_blank_name_is_invalid() {
        let category = PricingCategory::new_for_insert(dto("   "), 1);
        assert!(category.validate().is_err());
    }

    #[test]
    fn test_sort_order_patch_serializes_single_field() {
        let json = serde_json::to_value(PricingCategoryPatch::sort_order_only(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "sort_order": 3 }));
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        assert!(PricingCategoryPatch::default().validate().is_err());
        assert!(PricingCategoryPatch::sort_order_only(0).validate().is_err());
        assert!(PricingCategoryPatch::is_active_only(false).validate().is_ok());
    }

    #[test]
    fn test_apply_patch_touches_only_given_fields() {
        let mut category = PricingCategory::new_for_insert(dto("Crown"), 1);
        category.description = Some("Sedan".into());
        category.apply_patch(&PricingCategoryPatch::sort_order_only(5));
        assert_eq!(category.sort_order, 5);
        assert_eq!(category.name, "Crown");
        assert_eq!(category.description.as_deref(), Some("Sedan"));
        assert!(category.is_active);
    }
}
