//! Opening hours of service channels
//!
//! Three kinds of hours are kept per channel version. Normal hours repeat
//! weekly, special hours cover one period spanning several days, exceptional
//! hours override everything on the dates they cover.

mod error;
mod resolve;
mod store;
mod validate;

pub use crate::orm::service_hours::ServiceHoursType;
pub use error::OpeningHoursError;
pub use resolve::{effective_hours, is_open_at, DayHours, TimeInterval};
pub use store::{copy_service_hours, load_opening_hours, replace_opening_hours};
pub use validate::{validate_all, validate_hours};

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyOpeningTime {
    pub day_from: Weekday,
    /// Last day of a special hours period
    #[serde(default)]
    pub day_to: Option<Weekday>,
    pub from: NaiveTime,
    /// Earlier than `from` when the interval runs past midnight
    pub to: NaiveTime,
    #[serde(default)]
    pub order_number: i32,
}

impl DailyOpeningTime {
    pub fn is_overnight(&self) -> bool {
        self.to < self.from
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceHours {
    pub hours_type: ServiceHoursType,
    #[serde(default)]
    pub valid_from: Option<NaiveDate>,
    #[serde(default)]
    pub valid_to: Option<NaiveDate>,
    #[serde(default)]
    pub is_closed: bool,
    /// Valid from now on, with no end date
    #[serde(default)]
    pub valid_for_now: bool,
    #[serde(default)]
    pub order_number: i32,
    #[serde(default)]
    pub additional_information: Option<String>,
    #[serde(default)]
    pub daily: Vec<DailyOpeningTime>,
}

impl ServiceHours {
    /// Whether the validity range of these hours includes `date`.
    ///
    /// Exceptional hours without an end date cover a single day.
    pub fn covers(&self, date: NaiveDate) -> bool {
        match self.hours_type {
            ServiceHoursType::Exceptional => match self.valid_from {
                Some(from) => from <= date && date <= self.valid_to.unwrap_or(from),
                None => false,
            },
            _ => {
                self.valid_from.map_or(true, |from| from <= date)
                    && self.valid_to.map_or(true, |to| date <= to)
            }
        }
    }
}

/// Stored day index, Monday = 0.
pub(crate) fn weekday_index(day: Weekday) -> i32 {
    day.num_days_from_monday() as i32
}

pub(crate) fn weekday_from_index(index: i32) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    #[test]
    fn test_weekday_index() {
        for i in 0..7 {
            let day = weekday_from_index(i).unwrap();
            assert_eq!(weekday_index(day), i);
        }
        assert_eq!(weekday_from_index(7), None);
    }

    #[test]
    fn test_exceptional_single_day() {
        let hours = ServiceHours {
            hours_type: ServiceHoursType::Exceptional,
            valid_from: Some(date(24)),
            valid_to: None,
            is_closed: true,
            valid_for_now: false,
            order_number: 0,
            additional_information: None,
            daily: vec![],
        };
        assert!(hours.covers(date(24)));
        assert!(!hours.covers(date(25)));
    }

    #[test]
    fn test_open_ended_normal() {
        let hours = ServiceHours {
            hours_type: ServiceHoursType::Normal,
            valid_from: None,
            valid_to: None,
            is_closed: false,
            valid_for_now: true,
            order_number: 0,
            additional_information: None,
            daily: vec![],
        };
        assert!(hours.covers(date(1)));
        assert!(hours.covers(date(31)));
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "hours_type": "normal",
            "valid_for_now": true,
            "daily": [{ "day_from": "Mon", "from": "08:00:00", "to": "16:00:00" }]
        }"#;
        let hours: ServiceHours = serde_json::from_str(json).unwrap();
        assert_eq!(hours.daily[0].day_from, Weekday::Mon);
        assert_eq!(hours.daily[0].day_to, None);
        assert!(!hours.daily[0].is_overnight());
    }
}
