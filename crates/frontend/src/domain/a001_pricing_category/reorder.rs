//! Сохранение нового порядка категорий после drag-and-drop.
//!
//! Состояние двухфазное: `confirmed` (подтвержден сервером) и `pending`
//! (показан сразу после жеста). Каждый жест и каждая перезагрузка списка
//! получают номер поколения; результат устаревшего поколения игнорируется.
//! Цикл записи останавливается только новым жестом: он перепишет все
//! позиции сам. Перезагрузка списка запись не прерывает.
//!
//! Запись идет строго по одной категории за раз. Первая ошибка прерывает
//! цикл, после чего список один раз перечитывается с сервера. Уже
//! записанный префикс назад не откатывается.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use contracts::domain::a001_pricing_category::aggregate::{PricingCategory, PricingCategoryId};
use contracts::domain::a001_pricing_category::reorder::{plan_reorder, SortOrderAssignment};

/// Удаленное хранилище категорий
#[async_trait(?Send)]
pub trait CategoryStore {
    /// Текущий авторитетный список
    async fn list(&self) -> Result<Vec<PricingCategory>, String>;

    /// Записать только `sort_order`. `Ok(None)` тоже считается отказом.
    async fn update_sort_order(
        &self,
        id: PricingCategoryId,
        sort_order: i32,
    ) -> Result<Option<PricingCategory>, String>;
}

#[derive(Debug, Clone)]
pub struct ReorderState {
    confirmed: Vec<PricingCategory>,
    pending: Option<Vec<PricingCategory>>,
    generation: Arc<AtomicU64>,
    /// Поколение последнего жеста
    gesture: Arc<AtomicU64>,
}

/// Задание на запись одного жеста
#[derive(Debug, Clone)]
pub struct ReorderTicket {
    pub generation: u64,
    pub assignments: Vec<SortOrderAssignment>,
    latest: Arc<AtomicU64>,
}

impl ReorderTicket {
    /// `false`, если после этого жеста начался новый.
    /// Перезагрузка списка жест не вытесняет.
    pub fn is_current(&self) -> bool {
        self.latest.load(Ordering::SeqCst) == self.generation
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReorderOutcome {
    Persisted {
        generation: u64,
        written: usize,
    },
    /// Цикл остановлен, потому что начался более новый жест
    Superseded {
        generation: u64,
        written: usize,
    },
    Failed {
        generation: u64,
        /// Номер записи (с 1), на которой произошел отказ
        attempted: usize,
        message: String,
        /// Результат единственного повторного чтения списка
        refreshed: Result<Vec<PricingCategory>, String>,
    },
}

impl ReorderOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            ReorderOutcome::Persisted { generation, .. }
            | ReorderOutcome::Superseded { generation, .. }
            | ReorderOutcome::Failed { generation, .. } => *generation,
        }
    }
}

/// Что произошло с экраном после `ReorderState::apply`
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyResult {
    /// Результат устаревшего поколения, состояние не менялось
    Stale,
    Persisted,
    /// Все записи прошли, но пока они шли, список перечитали.
    /// На экране снимок до конца записи, его нужно загрузить заново.
    PersistedAfterReload,
    /// Порядок заменен свежим списком с сервера
    RolledBack { message: String },
    /// Перечитать список не удалось; показан последний подтвержденный порядок
    RollbackFailed { message: String, reload_error: String },
}

impl ReorderState {
    pub fn new(items: Vec<PricingCategory>) -> Self {
        Self {
            confirmed: items,
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
            gesture: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Порядок, который видит пользователь
    pub fn visible(&self) -> &[PricingCategory] {
        self.pending.as_deref().unwrap_or(&self.confirmed)
    }

    pub fn confirmed(&self) -> &[PricingCategory] {
        &self.confirmed
    }

    pub fn is_saving(&self) -> bool {
        self.pending.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Новый авторитетный список (загрузка, создание, удаление).
    /// Запущенный цикл записи продолжает работу, но его результат
    /// уже не заменит этот список.
    pub fn replace_confirmed(&mut self, items: Vec<PricingCategory>) {
        self.bump();
        self.confirmed = items;
        self.pending = None;
    }

    /// Изменить одну строку на месте (например, `is_active`), не трогая порядок
    pub fn update_item(&mut self, updated: PricingCategory) {
        let replace = |list: &mut Vec<PricingCategory>| {
            if let Some(slot) = list.iter_mut().find(|c| c.id == updated.id) {
                *slot = PricingCategory {
                    sort_order: slot.sort_order,
                    ..updated.clone()
                };
            }
        };
        replace(&mut self.confirmed);
        if let Some(pending) = self.pending.as_mut() {
            replace(pending);
        }
    }

    /// Применить жест оптимистично. `None`, если порядок не изменился
    /// (тогда и запросов к серверу нет).
    pub fn begin(
        &mut self,
        source_id: PricingCategoryId,
        target_id: PricingCategoryId,
    ) -> Option<ReorderTicket> {
        let plan = plan_reorder(self.visible(), source_id, target_id)?;
        let generation = self.bump();
        self.gesture.store(generation, Ordering::SeqCst);
        self.pending = Some(plan.order);
        Some(ReorderTicket {
            generation,
            assignments: plan.assignments,
            latest: self.gesture.clone(),
        })
    }

    pub fn apply(&mut self, outcome: ReorderOutcome) -> ApplyResult {
        if outcome.generation() != self.generation() {
            return self.apply_after_reload(outcome);
        }
        match outcome {
            ReorderOutcome::Persisted { .. } => {
                if let Some(order) = self.pending.take() {
                    self.confirmed = order;
                }
                ApplyResult::Persisted
            }
            // текущее поколение вытесненным не бывает
            ReorderOutcome::Superseded { .. } => ApplyResult::Stale,
            ReorderOutcome::Failed {
                message, refreshed, ..
            } => self.roll_back(message, refreshed),
        }
    }

    /// Результат жеста, после которого список перечитывался, а новых жестов не было
    fn apply_after_reload(&mut self, outcome: ReorderOutcome) -> ApplyResult {
        if outcome.generation() != self.gesture.load(Ordering::SeqCst) {
            return ApplyResult::Stale;
        }
        match outcome {
            ReorderOutcome::Persisted { .. } => ApplyResult::PersistedAfterReload,
            ReorderOutcome::Superseded { .. } => ApplyResult::Stale,
            // список после отказа свежее перезагрузки
            ReorderOutcome::Failed {
                message, refreshed, ..
            } => self.roll_back(message, refreshed),
        }
    }

    fn roll_back(
        &mut self,
        message: String,
        refreshed: Result<Vec<PricingCategory>, String>,
    ) -> ApplyResult {
        self.pending = None;
        match refreshed {
            Ok(items) => {
                self.confirmed = items;
                ApplyResult::RolledBack { message }
            }
            Err(reload_error) => ApplyResult::RollbackFailed {
                message,
                reload_error,
            },
        }
    }
}

/// Последовательно записать `sort_order` из задания.
///
/// Запросы не идут параллельно и не повторяются. При первом отказе
/// оставшиеся записи пропускаются и выполняется ровно один `list()`.
pub async fn persist_reorder<S: CategoryStore + ?Sized>(
    store: &S,
    ticket: &ReorderTicket,
) -> ReorderOutcome {
    let generation = ticket.generation;
    let mut written = 0;

    for (index, assignment) in ticket.assignments.iter().enumerate() {
        if !ticket.is_current() {
            return ReorderOutcome::Superseded {
                generation,
                written,
            };
        }

        let failure = match store
            .update_sort_order(assignment.id, assignment.sort_order)
            .await
        {
            Ok(Some(_)) => None,
            Ok(None) => Some(format!("Category {} was not updated", assignment.id)),
            Err(e) => Some(e),
        };

        if let Some(message) = failure {
            let refreshed = store.list().await;
            return ReorderOutcome::Failed {
                generation,
                attempted: index + 1,
                message,
                refreshed,
            };
        }
        written += 1;
    }

    ReorderOutcome::Persisted {
        generation,
        written,
    }
}
