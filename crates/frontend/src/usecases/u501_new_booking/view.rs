use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u501_new_booking::service_duration::{
    BookingDurationForm, ServiceKind, AIRPORT_TRANSFER_HANEDA, AIRPORT_TRANSFER_NARITA,
    CHARTER_SERVICES, HOURS_PER_DAY_CHOICES, MAX_SERVICE_DAYS,
};
use contracts::usecases::u501_new_booking::NewBooking;
use leptos::prelude::*;

const SERVICES: [&str; 3] = [
    AIRPORT_TRANSFER_HANEDA,
    AIRPORT_TRANSFER_NARITA,
    CHARTER_SERVICES,
];

fn parse_positive(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok().filter(|v| *v > 0)
}

/// Шаг мастера бронирования: услуга и длительность
#[component]
pub fn ServiceDuration() -> impl IntoView {
    let form = RwSignal::new(BookingDurationForm::new());

    let on_service = move |ev: leptos::ev::Event| {
        let name = event_target_value(&ev);
        if name.is_empty() {
            return;
        }
        log::debug!("{}: service '{}' selected", NewBooking::full_name(), name);
        form.update(|f| f.select_service(&name));
    };

    view! {
        <div class="page booking-duration">
            <div class="header">
                <div class="header__content">
                    <h1 class="header__title">{NewBooking::display_name()}</h1>
                </div>
            </div>

            <div class="details-form">
                <div class="form-group">
                    <label for="service_name">{"Услуга"}</label>
                    <select id="service_name" on:change=on_service>
                        <option value="" selected=move || form.with(|f| f.service_name.is_none())>
                            {"Выберите услугу"}
                        </option>
                        {SERVICES
                            .iter()
                            .map(|name| {
                                let name = *name;
                                view! {
                                    <option
                                        value=name
                                        selected=move || form.with(|f| f.service_name.as_deref() == Some(name))
                                    >
                                        {name}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </div>

                {move || match form.with(|f| f.kind()) {
                    Some(ServiceKind::Charter) => view! {
                        <div class="form-row">
                            <div class="form-group">
                                <label for="service_days">{"Дней"}</label>
                                <input
                                    type="number"
                                    id="service_days"
                                    min="1"
                                    max=MAX_SERVICE_DAYS.to_string()
                                    prop:value=move || form.with(|f| f.service_days.map(|d| d.to_string()).unwrap_or_default())
                                    on:input=move |ev| {
                                        if let Some(days) = parse_positive(&event_target_value(&ev)) {
                                            form.update(|f| f.set_service_days(days));
                                        }
                                    }
                                />
                            </div>
                            <div class="form-group">
                                <label for="hours_per_day">{"Часов в день"}</label>
                                <select
                                    id="hours_per_day"
                                    on:change=move |ev| {
                                        if let Some(hours) = parse_positive(&event_target_value(&ev)) {
                                            form.update(|f| f.set_hours_per_day(hours));
                                        }
                                    }
                                >
                                    {HOURS_PER_DAY_CHOICES
                                        .map(|h| view! {
                                            <option
                                                value=h.to_string()
                                                selected=move || form.with(|f| f.hours_per_day == Some(h))
                                            >
                                                {format!("{} ч", h)}
                                            </option>
                                        })
                                        .collect_view()}
                                </select>
                            </div>
                        </div>
                    }.into_any(),
                    Some(ServiceKind::AirportTransfer) => view! {
                        <div class="text-muted">{"Трансфер: фиксированная длительность 1 ч"}</div>
                    }.into_any(),
                    Some(ServiceKind::Other) => view! {
                        <div class="form-group">
                            <label for="duration_hours">{"Длительность, ч"}</label>
                            <input
                                type="number"
                                id="duration_hours"
                                min="1"
                                prop:value=move || form.with(|f| f.duration_hours.map(|d| d.to_string()).unwrap_or_default())
                                on:input=move |ev| {
                                    if let Some(hours) = parse_positive(&event_target_value(&ev)) {
                                        form.update(|f| f.set_duration_hours(hours));
                                    }
                                }
                            />
                        </div>
                    }.into_any(),
                    None => ().into_any(),
                }}

                <div class="form-group">
                    <label for="vehicle_id">{"Автомобиль"}</label>
                    <input
                        type="text"
                        id="vehicle_id"
                        prop:value=move || form.with(|f| f.selected_vehicle_id.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            let vehicle = Some(value.trim().to_string()).filter(|v| !v.is_empty());
                            form.update(|f| f.select_vehicle(vehicle));
                        }
                        placeholder="ID автомобиля"
                    />
                </div>

                <div class="booking-summary">
                    {move || form.with(|f| match (f.kind(), f.total_hours()) {
                        (Some(ServiceKind::Charter), Some(total)) => format!(
                            "{} дн. × {} ч = {} ч",
                            f.service_days.unwrap_or_default(),
                            f.hours_per_day.unwrap_or_default(),
                            total
                        ),
                        (Some(_), _) => f
                            .duration_hours
                            .map(|h| format!("Длительность: {} ч", h))
                            .unwrap_or_default(),
                        (None, _) => String::new(),
                    })}
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive(" 4 "), Some(4));
        assert_eq!(parse_positive("0"), None);
        assert_eq!(parse_positive("abc"), None);
    }
}
