//! Производное состояние длительности услуги в мастере бронирования.
//!
//! `duration_hours` пересчитывается как `service_days * hours_per_day` для
//! чартера; значения, выбранные для каждой услуги, запоминаются по имени
//! услуги и восстанавливаются при возврате к ней.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const AIRPORT_TRANSFER_HANEDA: &str = "Airport Transfer Haneda";
pub const AIRPORT_TRANSFER_NARITA: &str = "Airport Transfer Narita";
pub const CHARTER_SERVICES: &str = "Charter Services";

/// Варианты кнопок "часов в день"
pub const HOURS_PER_DAY_CHOICES: std::ops::RangeInclusive<u32> = 1..=12;
pub const MAX_SERVICE_DAYS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    AirportTransfer,
    Charter,
    Other,
}

impl ServiceKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            AIRPORT_TRANSFER_HANEDA | AIRPORT_TRANSFER_NARITA => ServiceKind::AirportTransfer,
            CHARTER_SERVICES => ServiceKind::Charter,
            _ => ServiceKind::Other,
        }
    }
}

/// Снимок значений, сохраненный для одной услуги
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CachedServiceData {
    pub duration_hours: Option<u32>,
    pub hours_per_day: Option<u32>,
    pub service_days: Option<u32>,
    pub selected_vehicle_id: Option<String>,
}

/// Ключ кэша — строка имени услуги
pub type ServiceDataCache = HashMap<String, CachedServiceData>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDurationForm {
    pub service_name: Option<String>,
    pub service_days: Option<u32>,
    pub hours_per_day: Option<u32>,
    pub duration_hours: Option<u32>,
    pub selected_vehicle_id: Option<String>,
    #[serde(skip)]
    pub cache: ServiceDataCache,
}

fn positive_or_one(value: Option<u32>) -> Option<u32> {
    Some(value.filter(|v| *v > 0).unwrap_or(1))
}

impl BookingDurationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> Option<ServiceKind> {
        self.service_name.as_deref().map(ServiceKind::from_name)
    }

    fn snapshot(&self) -> CachedServiceData {
        CachedServiceData {
            duration_hours: self.duration_hours,
            hours_per_day: self.hours_per_day,
            service_days: self.service_days,
            selected_vehicle_id: self.selected_vehicle_id.clone(),
        }
    }

    fn remember_current(&mut self) {
        if let Some(name) = self.service_name.clone() {
            let snapshot = self.snapshot();
            self.cache.insert(name, snapshot);
        }
    }

    fn recompute_charter_duration(&mut self) {
        if self.kind() != Some(ServiceKind::Charter) {
            return;
        }
        if let (Some(days), Some(hours)) = (self.service_days, self.hours_per_day) {
            if let Some(total) = days.checked_mul(hours).filter(|t| *t > 0) {
                self.duration_hours = Some(total);
            }
        }
    }

    /// Переключить услугу.
    ///
    /// Значения текущей услуги сохраняются под ее именем; трансфер
    /// в аэропорт всегда сбрасывается на 1/1/1, чартер восстанавливается
    /// из кэша (или получает 1/1/1).
    pub fn select_service(&mut self, name: &str) {
        let previous = self.service_name.clone();
        let changed = previous.as_deref() != Some(name);

        if changed && previous.is_some() {
            self.remember_current();
        }
        self.service_name = Some(name.to_string());

        if changed {
            let cached = self.cache.get(name).cloned();
            match ServiceKind::from_name(name) {
                ServiceKind::AirportTransfer => {
                    self.duration_hours = Some(1);
                    self.hours_per_day = Some(1);
                    self.service_days = Some(1);
                    if let Some(vehicle) = cached.and_then(|c| c.selected_vehicle_id) {
                        self.selected_vehicle_id = Some(vehicle);
                    }
                }
                ServiceKind::Charter => match cached {
                    Some(c) => {
                        self.duration_hours = positive_or_one(c.duration_hours);
                        self.hours_per_day = positive_or_one(c.hours_per_day);
                        self.service_days = positive_or_one(c.service_days);
                        self.selected_vehicle_id = c.selected_vehicle_id;
                    }
                    None => {
                        self.duration_hours = Some(1);
                        self.hours_per_day = Some(1);
                        self.service_days = Some(1);
                    }
                },
                ServiceKind::Other => {}
            }
        }

        self.recompute_charter_duration();
    }

    pub fn set_service_days(&mut self, days: u32) {
        self.service_days = Some(days.min(MAX_SERVICE_DAYS));
        self.recompute_charter_duration();
        self.remember_current();
    }

    pub fn set_hours_per_day(&mut self, hours: u32) {
        self.hours_per_day = Some(hours.min(*HOURS_PER_DAY_CHOICES.end()));
        self.recompute_charter_duration();
        self.remember_current();
    }

    pub fn set_duration_hours(&mut self, hours: u32) {
        self.duration_hours = Some(hours);
        self.remember_current();
    }

    pub fn select_vehicle(&mut self, vehicle_id: Option<String>) {
        self.selected_vehicle_id = vehicle_id;
        self.remember_current();
    }

    /// Итоговое количество часов для строки "N days × M hours"
    pub fn total_hours(&self) -> Option<u32> {
        match (self.service_days, self.hours_per_day) {
            (Some(days), Some(hours)) if days > 0 && hours > 0 => days.checked_mul(hours),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_kind_from_name() {
        assert_eq!(ServiceKind::from_name(AIRPORT_TRANSFER_NARITA), ServiceKind::AirportTransfer);
        assert_eq!(ServiceKind::from_name(CHARTER_SERVICES), ServiceKind::Charter);
        assert_eq!(ServiceKind::from_name("City Tour"), ServiceKind::Other);
    }

    #[test]
    fn test_charter_duration_follows_inputs() {
        let mut form = BookingDurationForm::new();
        form.select_service(CHARTER_SERVICES);
        assert_eq!(form.duration_hours, Some(1));

        form.set_service_days(3);
        form.set_hours_per_day(8);
        assert_eq!(form.duration_hours, Some(24));
        assert_eq!(form.total_hours(), Some(24));
    }

    #[test]
    fn test_airport_transfer_is_fixed_to_one_hour() {
        let mut form = BookingDurationForm::new();
        form.select_service(CHARTER_SERVICES);
        form.set_service_days(2);
        form.set_hours_per_day(5);

        form.select_service(AIRPORT_TRANSFER_HANEDA);
        assert_eq!(form.duration_hours, Some(1));
        assert_eq!(form.hours_per_day, Some(1));
        assert_eq!(form.service_days, Some(1));
    }

    #[test]
    fn test_switching_back_restores_charter_selection() {
        let mut form = BookingDurationForm::new();
        form.select_service(CHARTER_SERVICES);
        form.set_service_days(3);
        form.set_hours_per_day(6);
        form.select_vehicle(Some("alphard-01".into()));

        form.select_service(AIRPORT_TRANSFER_NARITA);
        form.select_vehicle(Some("crown-07".into()));

        form.select_service(CHARTER_SERVICES);
        assert_eq!(form.service_days, Some(3));
        assert_eq!(form.hours_per_day, Some(6));
        assert_eq!(form.duration_hours, Some(18));
        assert_eq!(form.selected_vehicle_id.as_deref(), Some("alphard-01"));

        form.select_service(AIRPORT_TRANSFER_NARITA);
        assert_eq!(form.selected_vehicle_id.as_deref(), Some("crown-07"));
    }

    #[test]
    fn test_other_service_keeps_values() {
        let mut form = BookingDurationForm::new();
        form.select_service(CHARTER_SERVICES);
        form.set_service_days(2);
        form.set_hours_per_day(4);

        form.select_service("City Tour");
        assert_eq!(form.duration_hours, Some(8));
        assert_eq!(form.kind(), Some(ServiceKind::Other));
    }

    #[test]
    fn test_service_days_are_capped() {
        let mut form = BookingDurationForm::new();
        form.select_service(CHARTER_SERVICES);
        form.set_service_days(45);
        assert_eq!(form.service_days, Some(MAX_SERVICE_DAYS));
    }

    #[test]
    fn test_reselecting_same_service_does_not_reset() {
        let mut form = BookingDurationForm::new();
        form.select_service(CHARTER_SERVICES);
        form.set_service_days(4);
        form.set_hours_per_day(3);
        form.select_service(CHARTER_SERVICES);
        assert_eq!(form.duration_hours, Some(12));
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let mut form = BookingDurationForm::new();
        form.select_service(CHARTER_SERVICES);

        form.set_service_days(u32::MAX);
        form.set_hours_per_day(u32::MAX);
        assert_eq!(form.service_days, Some(MAX_SERVICE_DAYS));
        assert_eq!(form.hours_per_day, Some(12));
        assert_eq!(form.duration_hours, Some(360));
    }

    #[test]
    fn test_overflowing_cached_values_do_not_panic() {
        let mut form = BookingDurationForm::new();
        form.cache.insert(
            CHARTER_SERVICES.to_string(),
            CachedServiceData {
                duration_hours: Some(5),
                hours_per_day: Some(u32::MAX),
                service_days: Some(u32::MAX),
                selected_vehicle_id: None,
            },
        );

        form.select_service(CHARTER_SERVICES);
        assert_eq!(form.duration_hours, Some(5));
        assert_eq!(form.total_hours(), None);
    }
}
