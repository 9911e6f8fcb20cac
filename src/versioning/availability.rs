//! Per-language publication state of one versioned row

use super::PublishingStatus;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransitionError {
    Illegal {
        from: PublishingStatus,
        to: PublishingStatus,
    },
    /// A scheduled timestamp must lie in the future
    NotInFuture {
        at: NaiveDateTime,
    },
    /// Archive date set before the publish date
    ArchiveBeforePublish {
        publish_at: NaiveDateTime,
        archive_at: NaiveDateTime,
    },
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionError::Illegal { from, to } => {
                write!(f, "cannot move from {} to {}", from, to)
            }
            TransitionError::NotInFuture { at } => {
                write!(f, "scheduled time {} is not in the future", at)
            }
            TransitionError::ArchiveBeforePublish {
                publish_at,
                archive_at,
            } => write!(
                f,
                "archive time {} is before publish time {}",
                archive_at, publish_at
            ),
        }
    }
}

impl std::error::Error for TransitionError {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub status: PublishingStatus,
    pub publish_at: Option<NaiveDateTime>,
    pub archive_at: Option<NaiveDateTime>,
    pub reviewed: Option<NaiveDateTime>,
    pub reviewed_by: Option<String>,
    pub set_for_archived: Option<NaiveDateTime>,
    pub set_for_archived_by: Option<String>,
    pub last_failed_publish_at: Option<NaiveDateTime>,
}

impl Availability {
    pub fn new(status: PublishingStatus) -> Self {
        Self {
            status,
            publish_at: None,
            archive_at: None,
            reviewed: None,
            reviewed_by: None,
            set_for_archived: None,
            set_for_archived_by: None,
            last_failed_publish_at: None,
        }
    }

    fn transition(&mut self, to: PublishingStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(to) {
            return Err(TransitionError::Illegal {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Publish immediately. Publishing a published row is a no-op.
    pub fn publish(&mut self, now: NaiveDateTime) -> Result<(), TransitionError> {
        if self.status == PublishingStatus::Published {
            return Ok(());
        }
        self.transition(PublishingStatus::Published)?;
        self.publish_at = Some(now);
        if let Some(archive_at) = self.archive_at {
            if archive_at <= now {
                self.archive_at = None;
            }
        }
        Ok(())
    }

    /// Record a future publication time. The status stays draft-like until
    /// the scheduler picks it up.
    pub fn schedule_publish(
        &mut self,
        at: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Result<(), TransitionError> {
        if !self.status.is_draft_like() {
            return Err(TransitionError::Illegal {
                from: self.status,
                to: PublishingStatus::Published,
            });
        }
        if at <= now {
            return Err(TransitionError::NotInFuture { at });
        }
        if let Some(archive_at) = self.archive_at {
            if archive_at <= at {
                return Err(TransitionError::ArchiveBeforePublish {
                    publish_at: at,
                    archive_at,
                });
            }
        }
        self.publish_at = Some(at);
        Ok(())
    }

    /// Record a future archive time.
    pub fn schedule_archive(
        &mut self,
        at: NaiveDateTime,
        by: &str,
        now: NaiveDateTime,
    ) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Illegal {
                from: self.status,
                to: PublishingStatus::Archived,
            });
        }
        if at <= now {
            return Err(TransitionError::NotInFuture { at });
        }
        if let Some(publish_at) = self.publish_at {
            if at <= publish_at {
                return Err(TransitionError::ArchiveBeforePublish {
                    publish_at,
                    archive_at: at,
                });
            }
        }
        self.archive_at = Some(at);
        self.set_for_archived = Some(now);
        self.set_for_archived_by = Some(by.to_string());
        Ok(())
    }

    /// Archive immediately. Archiving an archived row is a no-op.
    pub fn archive(&mut self, by: &str, now: NaiveDateTime) -> Result<(), TransitionError> {
        if self.status == PublishingStatus::Archived {
            return Ok(());
        }
        self.transition(PublishingStatus::Archived)?;
        // A superseded row keeps the time it stopped being visible
        if self.archive_at.map_or(true, |at| at > now) {
            self.archive_at = Some(now);
        }
        if self.set_for_archived.is_none() {
            self.set_for_archived = Some(now);
            self.set_for_archived_by = Some(by.to_string());
        }
        // A publication that never happened is dropped
        if let Some(publish_at) = self.publish_at {
            if publish_at > now {
                self.publish_at = None;
            }
        }
        Ok(())
    }

    /// A newer version of the same language was published. The old
    /// publication stops being visible at `now`.
    pub fn supersede(&mut self, now: NaiveDateTime) -> Result<(), TransitionError> {
        self.transition(PublishingStatus::OldPublished)?;
        match self.archive_at {
            Some(at) if at <= now => {}
            _ => self.archive_at = Some(now),
        }
        Ok(())
    }

    pub fn mark_reviewed(&mut self, by: &str, now: NaiveDateTime) {
        self.reviewed = Some(now);
        self.reviewed_by = Some(by.to_string());
    }

    /// A publication attempt failed. The status does not change.
    pub fn record_failed_publish(&mut self, now: NaiveDateTime) {
        self.last_failed_publish_at = Some(now);
    }

    pub fn is_publish_due(&self, now: NaiveDateTime) -> bool {
        self.status.is_draft_like() && matches!(self.publish_at, Some(at) if at <= now)
    }

    /// Superseded rows already stopped being visible and are left alone.
    pub fn is_archive_due(&self, now: NaiveDateTime) -> bool {
        !self.status.is_terminal()
            && matches!(self.archive_at, Some(at) if at <= now)
    }

    /// Visible at `now`: published at or before `now` and not yet archived.
    pub fn is_current(&self, now: NaiveDateTime) -> bool {
        let published = matches!(self.publish_at, Some(at) if at <= now);
        let live = match self.archive_at {
            Some(at) => at > now,
            None => true,
        };
        published && live
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_publish_then_archive() {
        let mut a = Availability::new(PublishingStatus::Draft);
        a.publish(now()).unwrap();
        assert_eq!(a.status, PublishingStatus::Published);
        assert_eq!(a.publish_at, Some(now()));
        assert!(a.is_current(now()));

        let later = now() + Duration::hours(1);
        a.archive("admin", later).unwrap();
        assert_eq!(a.status, PublishingStatus::Archived);
        assert_eq!(a.archive_at, Some(later));
        assert_eq!(a.set_for_archived_by.as_deref(), Some("admin"));
        assert!(!a.is_current(later));
        assert!(a.is_current(now()));
    }

    #[test]
    fn test_archived_cannot_be_published() {
        let mut a = Availability::new(PublishingStatus::Draft);
        a.archive("admin", now()).unwrap();
        assert_eq!(
            a.publish(now()),
            Err(TransitionError::Illegal {
                from: PublishingStatus::Archived,
                to: PublishingStatus::Published
            })
        );
    }

    #[test]
    fn test_schedule_publish_keeps_status() {
        let mut a = Availability::new(PublishingStatus::Modified);
        let at = now() + Duration::days(1);
        a.schedule_publish(at, now()).unwrap();
        assert_eq!(a.status, PublishingStatus::Modified);
        assert!(!a.is_publish_due(now()));
        assert!(a.is_publish_due(at));
        assert!(!a.is_current(now()));
        assert!(a.is_current(at));
    }

    #[test]
    fn test_schedule_publish_rejects_past() {
        let mut a = Availability::new(PublishingStatus::Draft);
        let at = now() - Duration::minutes(1);
        assert_eq!(
            a.schedule_publish(at, now()),
            Err(TransitionError::NotInFuture { at })
        );
    }

    #[test]
    fn test_schedule_archive_before_publish_rejected() {
        let mut a = Availability::new(PublishingStatus::Draft);
        let publish_at = now() + Duration::days(2);
        a.schedule_publish(publish_at, now()).unwrap();
        let archive_at = now() + Duration::days(1);
        assert_eq!(
            a.schedule_archive(archive_at, "admin", now()),
            Err(TransitionError::ArchiveBeforePublish {
                publish_at,
                archive_at
            })
        );
    }

    #[test]
    fn test_scheduled_archive_is_due() {
        let mut a = Availability::new(PublishingStatus::Draft);
        a.publish(now()).unwrap();
        let at = now() + Duration::days(3);
        a.schedule_archive(at, "editor", now()).unwrap();
        assert_eq!(a.set_for_archived, Some(now()));
        assert!(!a.is_archive_due(now()));
        assert!(a.is_archive_due(at));
        assert!(a.is_current(at - Duration::seconds(1)));
        assert!(!a.is_current(at));
    }

    #[test]
    fn test_failed_publish_is_not_terminal() {
        let mut a = Availability::new(PublishingStatus::Draft);
        a.record_failed_publish(now());
        assert_eq!(a.status, PublishingStatus::Draft);
        assert_eq!(a.last_failed_publish_at, Some(now()));
        a.publish(now()).unwrap();
        assert_eq!(a.status, PublishingStatus::Published);
    }

    #[test]
    fn test_supersede() {
        let mut a = Availability::new(PublishingStatus::Draft);
        assert!(a.supersede(now()).is_err());
        a.publish(now()).unwrap();
        let later = now() + Duration::days(1);
        a.supersede(later).unwrap();
        assert!(!a.is_archive_due(later));
        assert_eq!(a.status, PublishingStatus::OldPublished);
        assert_eq!(a.archive_at, Some(later));
        assert!(a.is_current(now()));
        assert!(!a.is_current(later));
    }

    #[test]
    fn test_mark_reviewed() {
        let mut a = Availability::new(PublishingStatus::Published);
        a.mark_reviewed("reviewer", now());
        assert_eq!(a.reviewed, Some(now()));
        assert_eq!(a.reviewed_by.as_deref(), Some("reviewer"));
    }
}
