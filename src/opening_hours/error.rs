use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::{NaiveDate, Weekday};
use std::fmt;

/// Opening hours that break one of the editing rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpeningHoursError {
    InvalidRange {
        valid_from: NaiveDate,
        valid_to: NaiveDate,
    },
    /// Hours valid from now on cannot end
    EndOnValidForNow,
    EmptyInterval { day: Weekday },
    TooManyIntervals {
        day: Weekday,
        count: usize,
        max: usize,
    },
    Overlap { day: Weekday },
    /// Only the last interval of a day may run past midnight
    MidnightNotLast { day: Weekday },
    UnexpectedPeriod { day: Weekday },
    SpecialNeedsPeriod,
    ExceptionalNeedsDate,
    ClosedWithTimes,
    OpenWithoutTimes,
}

impl fmt::Display for OpeningHoursError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpeningHoursError::InvalidRange {
                valid_from,
                valid_to,
            } => write!(f, "valid_to {} is before valid_from {}", valid_to, valid_from),
            OpeningHoursError::EndOnValidForNow => {
                write!(f, "hours valid for now cannot have an end date")
            }
            OpeningHoursError::EmptyInterval { day } => {
                write!(f, "interval on {} opens and closes at the same time", day)
            }
            OpeningHoursError::TooManyIntervals { day, count, max } => write!(
                f,
                "{} has {} intervals, at most {} allowed",
                day, count, max
            ),
            OpeningHoursError::Overlap { day } => write!(f, "intervals on {} overlap", day),
            OpeningHoursError::MidnightNotLast { day } => write!(
                f,
                "only the last interval on {} may run past midnight",
                day
            ),
            OpeningHoursError::UnexpectedPeriod { day } => {
                write!(f, "interval starting {} cannot span several days", day)
            }
            OpeningHoursError::SpecialNeedsPeriod => {
                write!(f, "special hours need exactly one period with an end day")
            }
            OpeningHoursError::ExceptionalNeedsDate => {
                write!(f, "exceptional hours need a valid_from date")
            }
            OpeningHoursError::ClosedWithTimes => write!(f, "closed hours cannot have times"),
            OpeningHoursError::OpenWithoutTimes => {
                write!(f, "open exceptional hours need at least one interval")
            }
        }
    }
}

impl std::error::Error for OpeningHoursError {}

impl ResponseError for OpeningHoursError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
