use super::Availability;
use chrono::NaiveDateTime;

/// One language row of a non-ignored versioned row.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<'a> {
    pub versioned_id: i32,
    pub availability: &'a Availability,
}

/// Pick the version visible at `now` for one language: the candidate with the
/// latest `publish_at <= now` whose `archive_at` is unset or after `now`.
/// Ties go to the newer row.
pub fn select_current(candidates: &[Candidate<'_>], now: NaiveDateTime) -> Option<i32> {
    candidates
        .iter()
        .filter(|c| c.availability.is_current(now))
        .max_by_key(|c| (c.availability.publish_at, c.versioned_id))
        .map(|c| c.versioned_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versioning::PublishingStatus;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn published(at: NaiveDateTime, archive_at: Option<NaiveDateTime>) -> Availability {
        let mut a = Availability::new(PublishingStatus::Published);
        a.publish_at = Some(at);
        a.archive_at = archive_at;
        a
    }

    #[test]
    fn test_latest_publication_wins() {
        let old = published(now() - Duration::days(10), None);
        let new = published(now() - Duration::days(1), None);
        let candidates = [
            Candidate {
                versioned_id: 1,
                availability: &old,
            },
            Candidate {
                versioned_id: 2,
                availability: &new,
            },
        ];
        assert_eq!(select_current(&candidates, now()), Some(2));
        // Before the second publication only the first one is visible
        assert_eq!(
            select_current(&candidates, now() - Duration::days(5)),
            Some(1)
        );
    }

    #[test]
    fn test_future_and_archived_are_skipped() {
        let archived = published(now() - Duration::days(3), Some(now() - Duration::hours(1)));
        let scheduled = published(now() + Duration::days(1), None);
        let draft = Availability::new(PublishingStatus::Draft);
        let candidates = [
            Candidate {
                versioned_id: 1,
                availability: &archived,
            },
            Candidate {
                versioned_id: 2,
                availability: &scheduled,
            },
            Candidate {
                versioned_id: 3,
                availability: &draft,
            },
        ];
        assert_eq!(select_current(&candidates, now()), None);
        assert_eq!(
            select_current(&candidates, now() + Duration::days(2)),
            Some(2)
        );
    }

    #[test]
    fn test_archive_at_boundary_is_exclusive() {
        let a = published(now() - Duration::days(1), Some(now()));
        let candidates = [Candidate {
            versioned_id: 7,
            availability: &a,
        }];
        assert_eq!(select_current(&candidates, now()), None);
        assert_eq!(
            select_current(&candidates, now() - Duration::seconds(1)),
            Some(7)
        );
    }
}
