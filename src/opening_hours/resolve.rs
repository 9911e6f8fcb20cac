use super::{ServiceHours, ServiceHoursType};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Part of a day the channel is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeInterval {
    pub from: NaiveTime,
    /// `None` when open until midnight
    pub to: Option<NaiveTime>,
}

impl TimeInterval {
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.from <= time && self.to.map_or(true, |to| time < to)
    }
}

/// Resolved opening hours of one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayHours {
    pub date: NaiveDate,
    /// Kind of hours that decided the day, `None` when nothing covers it
    pub source: Option<ServiceHoursType>,
    pub is_closed: bool,
    pub intervals: Vec<TimeInterval>,
    pub additional_information: Option<String>,
}

/// Opening hours in effect on `date`.
///
/// Exceptional hours covering the date win over special hours, which win over
/// normal hours. An interval that runs past midnight on the previous day
/// carries over into the morning of `date`.
pub fn effective_hours(hours: &[ServiceHours], date: NaiveDate) -> DayHours {
    let today = deciding_hours(hours, date);

    let mut intervals: Vec<TimeInterval> = date
        .pred_opt()
        .and_then(|prev| deciding_hours(hours, prev).map(|h| overnight_tails(h, prev)))
        .unwrap_or_default();
    if let Some(h) = today {
        intervals.extend(own_intervals(h, date));
    }
    intervals.sort_by_key(|i| i.from);

    DayHours {
        date,
        source: today.map(|h| h.hours_type),
        is_closed: intervals.is_empty(),
        intervals,
        additional_information: today.and_then(|h| h.additional_information.clone()),
    }
}

pub fn is_open_at(hours: &[ServiceHours], at: NaiveDateTime) -> bool {
    effective_hours(hours, at.date())
        .intervals
        .iter()
        .any(|i| i.contains(at.time()))
}

fn deciding_hours(hours: &[ServiceHours], date: NaiveDate) -> Option<&ServiceHours> {
    let exceptional = hours
        .iter()
        .filter(|h| h.hours_type == ServiceHoursType::Exceptional && h.covers(date))
        .min_by_key(|h| h.order_number);
    if exceptional.is_some() {
        return exceptional;
    }

    let special = hours
        .iter()
        .filter(|h| {
            h.hours_type == ServiceHoursType::Special
                && h.covers(date)
                && (h.is_closed || special_day_offset(h, date).is_some())
        })
        .min_by_key(|h| h.order_number);
    if special.is_some() {
        return special;
    }

    // Hours with an explicit date range take precedence over open-ended ones
    hours
        .iter()
        .filter(|h| h.hours_type == ServiceHoursType::Normal && h.covers(date))
        .min_by_key(|h| (h.valid_for_now || h.valid_from.is_none(), h.order_number))
}

/// Position of `date` within a special period as (days since start, period length).
/// The period must start on a date the hours cover.
fn special_day_offset(hours: &ServiceHours, date: NaiveDate) -> Option<(u32, u32)> {
    let period = hours.daily.iter().find(|d| d.day_to.is_some())?;
    let start = period.day_from.num_days_from_monday();
    let end = period.day_to?.num_days_from_monday();
    let mut length = (end + 7 - start) % 7;
    if length == 0 && period.to <= period.from {
        length = 7;
    }
    let offset = (date.weekday().num_days_from_monday() + 7 - start) % 7;
    if offset > length {
        return None;
    }
    let start_date = date.checked_sub_signed(Duration::days(offset as i64))?;
    hours.covers(start_date).then_some((offset, length))
}

/// Intervals starting on `date`, cut at midnight.
fn own_intervals(hours: &ServiceHours, date: NaiveDate) -> Vec<TimeInterval> {
    if hours.is_closed {
        return Vec::new();
    }
    match hours.hours_type {
        ServiceHoursType::Special => {
            let period = match hours.daily.iter().find(|d| d.day_to.is_some()) {
                Some(p) => p,
                None => return Vec::new(),
            };
            let (offset, length) = match special_day_offset(hours, date) {
                Some(position) => position,
                None => return Vec::new(),
            };
            let interval = if length == 0 {
                TimeInterval {
                    from: period.from,
                    to: Some(period.to),
                }
            } else if offset == 0 {
                TimeInterval {
                    from: period.from,
                    to: None,
                }
            } else if offset == length {
                TimeInterval {
                    from: NaiveTime::MIN,
                    to: Some(period.to),
                }
            } else {
                TimeInterval {
                    from: NaiveTime::MIN,
                    to: None,
                }
            };
            if interval.to == Some(NaiveTime::MIN) {
                Vec::new()
            } else {
                vec![interval]
            }
        }
        ServiceHoursType::Normal | ServiceHoursType::Exceptional => {
            day_times(hours, date)
                .map(|d| TimeInterval {
                    from: d.from,
                    to: if d.is_overnight() { None } else { Some(d.to) },
                })
                .collect()
        }
    }
}

/// Morning parts on the day after `date` of intervals running past midnight.
fn overnight_tails(hours: &ServiceHours, date: NaiveDate) -> Vec<TimeInterval> {
    if hours.is_closed || hours.hours_type == ServiceHoursType::Special {
        return Vec::new();
    }
    day_times(hours, date)
        .filter(|d| d.is_overnight() && d.to > NaiveTime::MIN)
        .map(|d| TimeInterval {
            from: NaiveTime::MIN,
            to: Some(d.to),
        })
        .collect()
}

/// Daily times that apply on `date`. Exceptional times apply on every date
/// the hours cover, normal times on their weekday.
fn day_times<'a>(
    hours: &'a ServiceHours,
    date: NaiveDate,
) -> impl Iterator<Item = &'a super::DailyOpeningTime> + 'a {
    let weekday = date.weekday();
    let exceptional = hours.hours_type == ServiceHoursType::Exceptional;
    hours
        .daily
        .iter()
        .filter(move |d| exceptional || d.day_from == weekday)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opening_hours::DailyOpeningTime;
    use chrono::Weekday;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    // 2024-12-23 is a Monday
    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    fn time(day: Weekday, from: NaiveTime, to: NaiveTime) -> DailyOpeningTime {
        DailyOpeningTime {
            day_from: day,
            day_to: None,
            from,
            to,
            order_number: 0,
        }
    }

    fn normal() -> ServiceHours {
        ServiceHours {
            hours_type: ServiceHoursType::Normal,
            valid_from: None,
            valid_to: None,
            is_closed: false,
            valid_for_now: true,
            order_number: 0,
            additional_information: None,
            daily: vec![
                time(Weekday::Mon, t(8, 0), t(16, 0)),
                time(Weekday::Tue, t(8, 0), t(16, 0)),
                time(Weekday::Wed, t(8, 0), t(16, 0)),
                time(Weekday::Thu, t(8, 0), t(16, 0)),
                time(Weekday::Fri, t(8, 0), t(16, 0)),
                time(Weekday::Fri, t(20, 0), t(2, 0)),
            ],
        }
    }

    #[test]
    fn test_normal_day() {
        let day = effective_hours(&[normal()], date(23));
        assert_eq!(day.source, Some(ServiceHoursType::Normal));
        assert!(!day.is_closed);
        assert_eq!(
            day.intervals,
            vec![TimeInterval {
                from: t(8, 0),
                to: Some(t(16, 0))
            }]
        );
    }

    #[test]
    fn test_weekend_closed() {
        let day = effective_hours(&[normal()], date(29));
        assert_eq!(day.source, Some(ServiceHoursType::Normal));
        assert!(day.is_closed);
    }

    #[test]
    fn test_overnight_carries_over() {
        let hours = [normal()];
        // Friday 27th, 20:00 - 02:00
        assert!(is_open_at(&hours, date(27).and_hms_opt(23, 0, 0).unwrap()));
        assert!(is_open_at(&hours, date(28).and_hms_opt(1, 30, 0).unwrap()));
        assert!(!is_open_at(&hours, date(28).and_hms_opt(2, 0, 0).unwrap()));
    }

    #[test]
    fn test_exceptional_wins() {
        let christmas = ServiceHours {
            hours_type: ServiceHoursType::Exceptional,
            valid_from: Some(date(24)),
            valid_to: Some(date(26)),
            is_closed: true,
            valid_for_now: false,
            order_number: 0,
            additional_information: Some("Christmas".to_string()),
            daily: vec![],
        };
        let hours = [normal(), christmas];

        let day = effective_hours(&hours, date(25));
        assert_eq!(day.source, Some(ServiceHoursType::Exceptional));
        assert!(day.is_closed);
        assert_eq!(day.additional_information.as_deref(), Some("Christmas"));
        assert!(!is_open_at(&hours, date(24).and_hms_opt(10, 0, 0).unwrap()));
        assert!(is_open_at(&hours, date(23).and_hms_opt(10, 0, 0).unwrap()));
    }

    #[test]
    fn test_special_period() {
        let mut period = time(Weekday::Fri, t(18, 0), t(6, 0));
        period.day_to = Some(Weekday::Mon);
        let special = ServiceHours {
            hours_type: ServiceHoursType::Special,
            valid_from: Some(date(23)),
            valid_to: Some(date(31)),
            is_closed: false,
            valid_for_now: false,
            order_number: 0,
            additional_information: None,
            daily: vec![period],
        };
        let hours = [normal(), special];

        // Thursday falls back to normal hours
        assert_eq!(
            effective_hours(&hours, date(26)).source,
            Some(ServiceHoursType::Normal)
        );
        let friday = effective_hours(&hours, date(27));
        assert_eq!(friday.source, Some(ServiceHoursType::Special));
        assert!(!is_open_at(&hours, date(27).and_hms_opt(10, 0, 0).unwrap()));
        assert!(is_open_at(&hours, date(27).and_hms_opt(19, 0, 0).unwrap()));
        assert!(is_open_at(&hours, date(28).and_hms_opt(3, 0, 0).unwrap()));
        assert!(is_open_at(&hours, date(30).and_hms_opt(5, 59, 0).unwrap()));
        assert!(!is_open_at(&hours, date(30).and_hms_opt(6, 0, 0).unwrap()));

        // The period that would have started on the 20th is outside validity
        assert_eq!(
            effective_hours(&hours, date(23)).source,
            Some(ServiceHoursType::Normal)
        );
    }

    #[test]
    fn test_nothing_covers() {
        let mut h = normal();
        h.valid_for_now = false;
        h.valid_from = Some(date(30));
        let day = effective_hours(&[h], date(23));
        assert_eq!(day.source, None);
        assert!(day.is_closed);
    }
}
