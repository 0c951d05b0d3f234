pub mod state;

use contracts::domain::a001_pricing_category::aggregate::{
    PricingCategory, PricingCategoryId, PricingCategoryPatch,
};
use contracts::domain::a001_pricing_category::reorder::sort_for_display;
use contracts::domain::common::AggregateRoot;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use std::rc::Rc;
use thaw::*;

use self::state::{create_state, CategoryListState, NoticeKind, NOTICE_TIMEOUT_MS};
use crate::domain::a001_pricing_category::api::{self, HttpCategoryStore};
use crate::domain::a001_pricing_category::reorder::{persist_reorder, ApplyResult, ReorderOutcome};
use crate::domain::a001_pricing_category::ui::details::PricingCategoryDetails;
use crate::domain::a002_service_type::api::list_service_types;
use crate::shared::client_log::report_error;

fn format_timestamp(dt: chrono::DateTime<chrono::Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M").to_string()
}

fn log_category() -> String {
    PricingCategory::full_name()
}

/// Показать уведомление и скрыть его по таймеру
fn notify(state: RwSignal<CategoryListState>, kind: NoticeKind, text: &str) {
    let Some(seq) = state.try_update(|s| s.show_notice(kind, text)) else {
        return;
    };
    wasm_bindgen_futures::spawn_local(async move {
        TimeoutFuture::new(NOTICE_TIMEOUT_MS).await;
        state.try_update(|s| s.hide_notice(seq));
    });
}

fn load(state: RwSignal<CategoryListState>) {
    wasm_bindgen_futures::spawn_local(async move {
        match api::list_categories().await {
            Ok(mut items) => {
                sort_for_display(&mut items);
                state.try_update(|s| {
                    s.reorder.replace_confirmed(items);
                    s.is_loaded = true;
                });
            }
            Err(e) => {
                report_error(&log_category(), &format!("Failed to load categories: {}", e));
                notify(state, NoticeKind::Error, "Не удалось загрузить категории");
            }
        }
        match list_service_types().await {
            Ok(types) => {
                state.try_update(|s| s.service_types = types);
            }
            Err(e) => log::warn!("Service types unavailable: {}", e),
        }
    });
}

/// Бросили перетаскиваемую категорию на `target`
fn handle_drop(state: RwSignal<CategoryListState>, target: PricingCategoryId) {
    let ticket = state
        .try_update(|s| {
            let source = s.dragging;
            s.end_drag();
            source.and_then(|source| s.reorder.begin(source, target))
        })
        .flatten();
    let Some(ticket) = ticket else {
        return;
    };

    wasm_bindgen_futures::spawn_local(async move {
        let outcome = persist_reorder(&HttpCategoryStore, &ticket).await;
        if let ReorderOutcome::Failed {
            attempted, message, ..
        } = &outcome
        {
            report_error(
                &log_category(),
                &format!(
                    "Reorder failed at update {} of {}: {}",
                    attempted,
                    ticket.assignments.len(),
                    message
                ),
            );
        }

        match state.try_update(|s| s.reorder.apply(outcome)) {
            Some(ApplyResult::Persisted) => {
                notify(state, NoticeKind::Success, "Порядок категорий сохранен")
            }
            Some(ApplyResult::PersistedAfterReload) => {
                notify(state, NoticeKind::Success, "Порядок категорий сохранен");
                load(state);
            }
            Some(ApplyResult::RolledBack { .. }) => notify(
                state,
                NoticeKind::Error,
                "Не удалось сохранить порядок. Список загружен заново",
            ),
            Some(ApplyResult::RollbackFailed { reload_error, .. }) => {
                report_error(
                    &log_category(),
                    &format!("Reload after failed reorder failed: {}", reload_error),
                );
                notify(state, NoticeKind::Error, "Не удалось сохранить порядок");
            }
            Some(ApplyResult::Stale) | None => {}
        }
    });
}

fn toggle_active(state: RwSignal<CategoryListState>, category: PricingCategory) {
    wasm_bindgen_futures::spawn_local(async move {
        let patch = PricingCategoryPatch::is_active_only(!category.is_active);
        match api::patch_category(category.id, &patch).await {
            Ok(updated) => {
                state.try_update(|s| s.reorder.update_item(updated));
            }
            Err(e) => {
                report_error(&log_category(), &format!("Failed to toggle category: {}", e));
                notify(state, NoticeKind::Error, &format!("Ошибка: {}", e));
            }
        }
    });
}

fn delete_category(state: RwSignal<CategoryListState>, category: PricingCategory) {
    let confirmed = web_sys::window()
        .and_then(|w| {
            w.confirm_with_message(&format!("Удалить категорию «{}»?", category.name))
                .ok()
        })
        .unwrap_or(false);
    if !confirmed {
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        match api::delete_category(category.id).await {
            Ok(()) => {
                notify(state, NoticeKind::Success, "Категория удалена");
                load(state);
            }
            Err(e) => {
                report_error(&log_category(), &format!("Failed to delete category: {}", e));
                notify(state, NoticeKind::Error, &format!("Ошибка удаления: {}", e));
            }
        }
    });
}

#[component]
#[allow(non_snake_case)]
pub fn PricingCategoryList() -> impl IntoView {
    let state = create_state();
    // Some(None) — новая категория, Some(Some(id)) — редактирование
    let editing = RwSignal::new(None::<Option<PricingCategoryId>>);

    load(state);

    view! {
        <div class="page">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{"Ценовые категории"}</h1>
                    <span class="header__subtitle">{"Перетащите строку, чтобы изменить порядок"}</span>
                </div>
                <div class="header__actions">
                    <Button
                        appearance=ButtonAppearance::Primary
                        on_click=move |_| editing.set(Some(None))
                    >
                        {"Новая категория"}
                    </Button>
                    <Button
                        appearance=ButtonAppearance::Secondary
                        on_click=move |_| load(state)
                    >
                        {"Обновить"}
                    </Button>
                </div>
            </div>

            {move || state.with(|s| s.notice.clone()).map(|notice| {
                let class = match notice.kind {
                    NoticeKind::Success => "notice notice--success",
                    NoticeKind::Error => "notice notice--error",
                };
                view! { <div class=class>{notice.text}</div> }
            })}

            {move || editing.get().map(|id| {
                let on_saved = Rc::new(move |_: ()| {
                    editing.set(None);
                    load(state);
                });
                let on_cancel = Rc::new(move |_: ()| editing.set(None));
                view! {
                    <div class="details-panel">
                        <PricingCategoryDetails id=id on_saved=on_saved on_cancel=on_cancel />
                    </div>
                }
            })}

            <div class="table">
                <table class="table__data table--striped">
                    <thead class="table__head">
                        <tr>
                            <th class="table__header-cell table__header-cell--handle"></th>
                            <th class="table__header-cell">{"#"}</th>
                            <th class="table__header-cell">{"Название"}</th>
                            <th class="table__header-cell">{"Описание"}</th>
                            <th class="table__header-cell">{"Типы услуг"}</th>
                            <th class="table__header-cell">{"Автомобили"}</th>
                            <th class="table__header-cell">{"Активна"}</th>
                            <th class="table__header-cell">{"Изменено"}</th>
                            <th class="table__header-cell"></th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let (items, saving) = state.with(|s| (s.reorder.visible().to_vec(), s.reorder.is_saving()));
                            if items.is_empty() && state.with(|s| s.is_loaded) {
                                return view! {
                                    <tr><td class="table__cell" colspan="9">{"Категорий пока нет"}</td></tr>
                                }.into_any();
                            }
                            items.into_iter().map(|category| {
                                let id = category.id;
                                let badges = state.with(|s| {
                                    category
                                        .service_type_ids
                                        .iter()
                                        .map(|st| s.service_type_name(*st))
                                        .collect::<Vec<_>>()
                                });
                                let for_toggle = category.clone();
                                let for_delete = category.clone();
                                let for_edit = category.id;
                                view! {
                                    <tr
                                        class="table__row"
                                        class:table__row--dragging=move || state.with(|s| s.dragging == Some(id))
                                        class:table__row--drop-target=move || state.with(|s| s.drag_over == Some(id))
                                        class:table__row--saving=saving
                                        draggable="true"
                                        on:dragstart=move |ev| {
                                            if let Some(dt) = ev.data_transfer() {
                                                let _ = dt.set_data("text/plain", &id.to_string());
                                            }
                                            state.update(|s| s.dragging = Some(id));
                                        }
                                        on:dragover=move |ev| {
                                            ev.prevent_default();
                                            if state.with_untracked(|s| s.drag_over != Some(id)) {
                                                state.update(|s| s.drag_over = Some(id));
                                            }
                                        }
                                        on:drop=move |ev| {
                                            ev.prevent_default();
                                            handle_drop(state, id);
                                        }
                                        on:dragend=move |_| state.update(|s| s.end_drag())
                                    >
                                        <td class="table__cell table__cell--handle">{"⋮⋮"}</td>
                                        <td class="table__cell">{category.sort_order}</td>
                                        <td class="table__cell">{category.name.clone()}</td>
                                        <td class="table__cell">{category.description.clone().unwrap_or_else(|| "-".to_string())}</td>
                                        <td class="table__cell">
                                            {badges.into_iter().map(|name| view! { <span class="badge">{name}</span> }).collect_view()}
                                        </td>
                                        <td class="table__cell">{category.vehicle_ids.len()}</td>
                                        <td class="table__cell">
                                            <input
                                                type="checkbox"
                                                class="table__checkbox"
                                                prop:checked=category.is_active
                                                on:change=move |_| toggle_active(state, for_toggle.clone())
                                            />
                                        </td>
                                        <td class="table__cell">{format_timestamp(category.updated_at)}</td>
                                        <td class="table__cell table__cell--actions">
                                            <button class="button button--ghost" on:click=move |_| editing.set(Some(Some(for_edit)))>
                                                {"Изменить"}
                                            </button>
                                            <button class="button button--ghost" on:click=move |_| delete_category(state, for_delete.clone())>
                                                {"Удалить"}
                                            </button>
                                        </td>
                                    </tr>
                                }
                            }).collect_view().into_any()
                        }}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
