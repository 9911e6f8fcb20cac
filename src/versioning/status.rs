//! Publishing status of a language availability or a versioned row

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "lowercase")]
pub enum PublishingStatus {
    /// Never published, editable
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Editable copy of a version that was published
    #[sea_orm(string_value = "modified")]
    Modified,
    #[sea_orm(string_value = "published")]
    Published,
    /// Replaced by a newer publication of the same language
    #[sea_orm(string_value = "oldpublished")]
    OldPublished,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl PublishingStatus {
    /// Position in the lifecycle. A status may only move to an equal or higher rank.
    pub fn rank(self) -> u8 {
        match self {
            PublishingStatus::Draft | PublishingStatus::Modified => 0,
            PublishingStatus::Published => 1,
            PublishingStatus::OldPublished | PublishingStatus::Archived => 2,
        }
    }

    pub fn is_draft_like(self) -> bool {
        self.rank() == 0
    }

    pub fn is_terminal(self) -> bool {
        self.rank() == 2
    }

    /// Whether `self -> next` is a legal lifecycle step.
    pub fn can_transition_to(self, next: PublishingStatus) -> bool {
        use PublishingStatus::*;
        match (self, next) {
            (Draft, Modified) | (Modified, Draft) => false,
            (Draft | Modified, Published) => true,
            (Draft | Modified, Archived) => true,
            (Published, OldPublished | Archived) => true,
            (OldPublished, Archived) => true,
            (a, b) => a == b,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PublishingStatus::Draft => "draft",
            PublishingStatus::Modified => "modified",
            PublishingStatus::Published => "published",
            PublishingStatus::OldPublished => "oldpublished",
            PublishingStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for PublishingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity-level status of a versioned row, derived from its language rows.
pub fn derive_entity_status<I>(statuses: I) -> PublishingStatus
where
    I: IntoIterator<Item = PublishingStatus>,
{
    let statuses: Vec<PublishingStatus> = statuses.into_iter().collect();

    if statuses.contains(&PublishingStatus::Published) {
        return PublishingStatus::Published;
    }
    if statuses.contains(&PublishingStatus::Modified) {
        return PublishingStatus::Modified;
    }
    if statuses.is_empty() || statuses.contains(&PublishingStatus::Draft) {
        return PublishingStatus::Draft;
    }
    if statuses.iter().all(|s| *s == PublishingStatus::Archived) {
        return PublishingStatus::Archived;
    }
    PublishingStatus::OldPublished
}
