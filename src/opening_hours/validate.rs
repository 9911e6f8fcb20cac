use super::{DailyOpeningTime, OpeningHoursError, ServiceHours, ServiceHoursType};
use std::collections::BTreeMap;

/// Check one block of opening hours against the editing rules.
pub fn validate_hours(hours: &ServiceHours, max_intervals: usize) -> Result<(), OpeningHoursError> {
    if let (Some(valid_from), Some(valid_to)) = (hours.valid_from, hours.valid_to) {
        if valid_to < valid_from {
            return Err(OpeningHoursError::InvalidRange {
                valid_from,
                valid_to,
            });
        }
    }
    if hours.is_closed && !hours.daily.is_empty() {
        return Err(OpeningHoursError::ClosedWithTimes);
    }

    match hours.hours_type {
        ServiceHoursType::Normal => {
            if hours.valid_for_now && hours.valid_to.is_some() {
                return Err(OpeningHoursError::EndOnValidForNow);
            }
            validate_days(&hours.daily, max_intervals)
        }
        ServiceHoursType::Special => {
            if hours.is_closed {
                return Ok(());
            }
            match hours.daily.as_slice() {
                [period] if period.day_to.is_some() => {
                    if period.day_to == Some(period.day_from) && period.from == period.to {
                        return Err(OpeningHoursError::EmptyInterval {
                            day: period.day_from,
                        });
                    }
                    Ok(())
                }
                _ => Err(OpeningHoursError::SpecialNeedsPeriod),
            }
        }
        ServiceHoursType::Exceptional => {
            if hours.valid_from.is_none() {
                return Err(OpeningHoursError::ExceptionalNeedsDate);
            }
            if !hours.is_closed && hours.daily.is_empty() {
                return Err(OpeningHoursError::OpenWithoutTimes);
            }
            validate_days(&hours.daily, max_intervals)
        }
    }
}

pub fn validate_all(hours: &[ServiceHours], max_intervals: usize) -> Result<(), OpeningHoursError> {
    hours
        .iter()
        .try_for_each(|h| validate_hours(h, max_intervals))
}

/// Per-day interval rules shared by normal and exceptional hours.
fn validate_days(daily: &[DailyOpeningTime], max_intervals: usize) -> Result<(), OpeningHoursError> {
    let mut days: BTreeMap<u32, Vec<&DailyOpeningTime>> = BTreeMap::new();
    for time in daily {
        if time.day_to.is_some() {
            return Err(OpeningHoursError::UnexpectedPeriod {
                day: time.day_from,
            });
        }
        if time.from == time.to {
            return Err(OpeningHoursError::EmptyInterval {
                day: time.day_from,
            });
        }
        days.entry(time.day_from.num_days_from_monday())
            .or_default()
            .push(time);
    }

    for mut times in days.into_values() {
        let day = times[0].day_from;
        if times.len() > max_intervals {
            return Err(OpeningHoursError::TooManyIntervals {
                day,
                count: times.len(),
                max: max_intervals,
            });
        }

        times.sort_by_key(|t| t.from);
        for (i, time) in times.iter().enumerate() {
            let last = i + 1 == times.len();
            if time.is_overnight() && !last {
                return Err(OpeningHoursError::MidnightNotLast { day });
            }
            if let Some(next) = times.get(i + 1) {
                if next.from < time.to {
                    return Err(OpeningHoursError::Overlap { day });
                }
            }
        }
    }
    Ok(())
}
