use super::view_model::CategoryDetailsViewModel;
use contracts::domain::a001_pricing_category::aggregate::PricingCategoryId;
use leptos::prelude::*;
use std::rc::Rc;

#[component]
pub fn PricingCategoryDetails(
    id: Option<PricingCategoryId>,
    on_saved: Rc<dyn Fn(())>,
    on_cancel: Rc<dyn Fn(())>,
) -> impl IntoView {
    let vm = CategoryDetailsViewModel::new();
    vm.load(id);

    let vm_clone = vm.clone();

    view! {
        <div class="details-container pricing-category-details">
            <div class="details-header">
                <h3>
                    {
                        let vm = vm_clone.clone();
                        move || if vm.is_edit_mode() { "Редактирование категории" } else { "Новая категория" }
                    }
                </h3>
            </div>

            {
                let vm = vm_clone.clone();
                move || vm.error.get().map(|e| view! { <div class="error">{e}</div> })
            }

            <div class="details-form">
                <div class="form-group">
                    <label for="category_name">{"Название"}</label>
                    <input
                        type="text"
                        id="category_name"
                        prop:value={
                            let vm = vm_clone.clone();
                            move || vm.form.get().name
                        }
                        on:input={
                            let vm = vm_clone.clone();
                            move |ev| vm.form.update(|f| f.name = event_target_value(&ev))
                        }
                        placeholder="Например, Airport Transfers"
                    />
                </div>

                <div class="form-group">
                    <label for="category_description">{"Описание"}</label>
                    <textarea
                        id="category_description"
                        prop:value={
                            let vm = vm_clone.clone();
                            move || vm.form.get().description
                        }
                        on:input={
                            let vm = vm_clone.clone();
                            move |ev| vm.form.update(|f| f.description = event_target_value(&ev))
                        }
                        rows="3"
                    />
                </div>

                <div class="form-group form-group--inline">
                    <label>
                        <input
                            type="checkbox"
                            prop:checked={
                                let vm = vm_clone.clone();
                                move || vm.form.get().is_active
                            }
                            on:change={
                                let vm = vm_clone.clone();
                                move |ev| vm.form.update(|f| f.is_active = event_target_checked(&ev))
                            }
                        />
                        {" Активна"}
                    </label>
                </div>

                <div class="form-group">
                    <label>{"Типы услуг"}</label>
                    {
                        let vm = vm_clone.clone();
                        move || {
                            let types = vm.service_types.get();
                            if types.is_empty() {
                                return view! { <div class="text-muted">{"Нет типов услуг"}</div> }.into_any();
                            }
                            let form = vm.form;
                            types
                                .into_iter()
                                .map(|st| {
                                    let st_id = st.id;
                                    view! {
                                        <label class="checkbox-row">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || form.get().service_type_ids.contains(&st_id)
                                                on:change=move |ev| {
                                                    let checked = event_target_checked(&ev);
                                                    form.update(|f| f.toggle_service_type(st_id, checked));
                                                }
                                            />
                                            {format!(" {}", st.name)}
                                        </label>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }
                    }
                </div>
            </div>

            <div class="details-actions">
                <button
                    class="btn btn-primary"
                    on:click={
                        let vm = vm_clone.clone();
                        let on_saved = on_saved.clone();
                        move |_| vm.save_command(on_saved.clone())
                    }
                    disabled={
                        let vm = vm_clone.clone();
                        move || vm.saving.get() || !vm.is_form_valid()
                    }
                >
                    {
                        let vm = vm_clone.clone();
                        move || if vm.is_edit_mode() { "Сохранить" } else { "Создать" }
                    }
                </button>
                <button class="btn btn-secondary" on:click=move |_| (on_cancel)(())>
                    {"Отмена"}
                </button>
            </div>
        </div>
    }
}
