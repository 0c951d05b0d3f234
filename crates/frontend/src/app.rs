use crate::domain::a001_pricing_category::ui::list::PricingCategoryList;
use crate::usecases::u501_new_booking::ServiceDuration;
use leptos::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppTab {
    PricingCategories,
    NewBooking,
}

impl AppTab {
    fn title(self) -> &'static str {
        match self {
            AppTab::PricingCategories => "Категории",
            AppTab::NewBooking => "Новое бронирование",
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let active = RwSignal::new(AppTab::PricingCategories);

    let tab_button = move |tab: AppTab| {
        view! {
            <button
                class="tabs__item"
                class:tabs__item--active=move || active.get() == tab
                on:click=move |_| active.set(tab)
            >
                {tab.title()}
            </button>
        }
    };

    view! {
        <div class="app">
            <nav class="tabs">
                {tab_button(AppTab::PricingCategories)}
                {tab_button(AppTab::NewBooking)}
            </nav>
            <main class="app__content">
                {move || match active.get() {
                    AppTab::PricingCategories => view! { <PricingCategoryList /> }.into_any(),
                    AppTab::NewBooking => view! { <ServiceDuration /> }.into_any(),
                }}
            </main>
        </div>
    }
}
