use contracts::domain::a001_pricing_category::aggregate::PricingCategoryId;
use contracts::domain::a002_service_type::aggregate::{ServiceType, ServiceTypeId};
use leptos::prelude::*;

use crate::domain::a001_pricing_category::reorder::ReorderState;

/// Сколько держится уведомление на экране
pub const NOTICE_TIMEOUT_MS: u32 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub seq: u64,
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct CategoryListState {
    pub reorder: ReorderState,
    pub service_types: Vec<ServiceType>,
    pub is_loaded: bool,
    pub dragging: Option<PricingCategoryId>,
    pub drag_over: Option<PricingCategoryId>,
    pub notice: Option<Notice>,
    notice_seq: u64,
}

impl Default for CategoryListState {
    fn default() -> Self {
        Self {
            reorder: ReorderState::new(Vec::new()),
            service_types: Vec::new(),
            is_loaded: false,
            dragging: None,
            drag_over: None,
            notice: None,
            notice_seq: 0,
        }
    }
}

impl CategoryListState {
    /// Показать уведомление; возвращает его номер для автоскрытия
    pub fn show_notice(&mut self, kind: NoticeKind, text: impl Into<String>) -> u64 {
        self.notice_seq += 1;
        self.notice = Some(Notice {
            seq: self.notice_seq,
            kind,
            text: text.into(),
        });
        self.notice_seq
    }

    /// Скрыть уведомление, если его еще не сменило более новое
    pub fn hide_notice(&mut self, seq: u64) {
        if self.notice.as_ref().is_some_and(|n| n.seq == seq) {
            self.notice = None;
        }
    }

    pub fn service_type_name(&self, id: ServiceTypeId) -> String {
        self.service_types
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| "?".to_string())
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
        self.drag_over = None;
    }
}

pub fn create_state() -> RwSignal<CategoryListState> {
    RwSignal::new(CategoryListState::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_older_notice_timer_keeps_newer_notice() {
        let mut state = CategoryListState::default();
        let first = state.show_notice(NoticeKind::Success, "Порядок сохранен");
        let second = state.show_notice(NoticeKind::Error, "Не удалось сохранить");

        state.hide_notice(first);
        assert_eq!(state.notice.as_ref().map(|n| n.seq), Some(second));

        state.hide_notice(second);
        assert!(state.notice.is_none());
    }
}
