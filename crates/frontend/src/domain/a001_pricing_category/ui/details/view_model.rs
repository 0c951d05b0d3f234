use contracts::domain::a001_pricing_category::aggregate::{
    PricingCategory, PricingCategoryDto, PricingCategoryId, PricingCategoryPatch,
};
use contracts::domain::a002_service_type::aggregate::{ServiceType, ServiceTypeId};
use leptos::prelude::*;
use std::rc::Rc;

use crate::domain::a001_pricing_category::api;
use crate::domain::a002_service_type::api::list_service_types;

/// Состояние формы категории
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryForm {
    pub id: Option<PricingCategoryId>,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub service_type_ids: Vec<ServiceTypeId>,
}

impl Default for CategoryForm {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            is_active: true,
            service_type_ids: Vec::new(),
        }
    }
}

impl From<PricingCategory> for CategoryForm {
    fn from(c: PricingCategory) -> Self {
        Self {
            id: Some(c.id),
            name: c.name,
            description: c.description.unwrap_or_default(),
            is_active: c.is_active,
            service_type_ids: c.service_type_ids,
        }
    }
}

impl CategoryForm {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Название категории обязательно".to_string());
        }
        Ok(())
    }

    pub fn toggle_service_type(&mut self, id: ServiceTypeId, checked: bool) {
        self.service_type_ids.retain(|s| *s != id);
        if checked {
            self.service_type_ids.push(id);
        }
    }

    /// Новая категория встает в конец списка (sort_order назначит сервер)
    pub fn to_dto(&self) -> PricingCategoryDto {
        PricingCategoryDto {
            name: self.name.trim().to_string(),
            description: Some(self.description.trim().to_string()).filter(|d| !d.is_empty()),
            service_type_ids: self.service_type_ids.clone(),
            sort_order: None,
            is_active: self.is_active,
        }
    }

    /// Правка не трогает `sort_order`: позицию меняет только перетаскивание
    pub fn to_patch(&self) -> PricingCategoryPatch {
        PricingCategoryPatch {
            name: Some(self.name.trim().to_string()),
            description: Some(self.description.trim().to_string()),
            sort_order: None,
            is_active: Some(self.is_active),
            service_type_ids: Some(self.service_type_ids.clone()),
        }
    }
}

/// ViewModel for PricingCategory details form
#[derive(Clone)]
pub struct CategoryDetailsViewModel {
    pub form: RwSignal<CategoryForm>,
    pub service_types: RwSignal<Vec<ServiceType>>,
    pub error: RwSignal<Option<String>>,
    pub saving: RwSignal<bool>,
}

impl CategoryDetailsViewModel {
    pub fn new() -> Self {
        Self {
            form: RwSignal::new(CategoryForm::default()),
            service_types: RwSignal::new(Vec::new()),
            error: RwSignal::new(None),
            saving: RwSignal::new(false),
        }
    }

    pub fn is_edit_mode(&self) -> bool {
        self.form.get().id.is_some()
    }

    pub fn is_form_valid(&self) -> bool {
        self.form.get().validate().is_ok()
    }

    /// Загрузить справочник типов услуг и, если задан ID, саму категорию
    pub fn load(&self, id: Option<PricingCategoryId>) {
        let service_types = self.service_types;
        let form = self.form;
        let error = self.error;
        wasm_bindgen_futures::spawn_local(async move {
            match list_service_types().await {
                Ok(items) => service_types.set(items),
                Err(e) => log::warn!("Service types unavailable: {}", e),
            }
            if let Some(id) = id {
                match api::get_category(id).await {
                    Ok(category) => form.set(category.into()),
                    Err(e) => error.set(Some(format!("Ошибка загрузки: {}", e))),
                }
            }
        });
    }

    pub fn save_command(&self, on_saved: Rc<dyn Fn(())>) {
        let current = self.form.get();
        if let Err(e) = current.validate() {
            self.error.set(Some(e));
            return;
        }

        let error = self.error;
        let saving = self.saving;
        saving.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            let result = match current.id {
                Some(id) => api::patch_category(id, &current.to_patch()).await,
                None => api::create_category(&current.to_dto()).await,
            };
            saving.set(false);
            match result {
                Ok(_) => (on_saved)(()),
                Err(e) => error.set(Some(e)),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_is_invalid() {
        let form = CategoryForm {
            name: "  ".into(),
            ..Default::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_dto_trims_and_leaves_position_to_server() {
        let form = CategoryForm {
            name: " Charter ".into(),
            description: "   ".into(),
            ..Default::default()
        };
        let dto = form.to_dto();
        assert_eq!(dto.name, "Charter");
        assert_eq!(dto.description, None);
        assert_eq!(dto.sort_order, None);
        assert!(dto.is_active);
    }

    #[test]
    fn test_patch_never_sends_sort_order() {
        let form = CategoryForm {
            id: Some(PricingCategoryId::new_v4()),
            name: "Charter".into(),
            ..Default::default()
        };
        let json = serde_json::to_value(form.to_patch()).unwrap();
        assert!(json.get("sort_order").is_none());
        assert_eq!(json["name"], "Charter");
    }

    #[test]
    fn test_toggle_service_type_has_no_duplicates() {
        let id = ServiceTypeId::new_v4();
        let mut form = CategoryForm::default();
        form.toggle_service_type(id, true);
        form.toggle_service_type(id, true);
        assert_eq!(form.service_type_ids, vec![id]);
        form.toggle_service_type(id, false);
        assert!(form.service_type_ids.is_empty());
    }
}
