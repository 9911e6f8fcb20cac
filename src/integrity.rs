//! Consistency checks over the stored version data of root entities

use crate::lifecycle::LifecycleError;
use crate::orm::roots::EntityKind;
use crate::orm::{language_availabilities, roots, versioned_entities, versionings};
use crate::versioning::{derive_entity_status, validate_chain, PublishingStatus};
use sea_orm::{entity::*, query::*, ConnectionTrait};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Violation {
    /// The root has no versioned row at all
    NoVersions,
    KindMismatch {
        versioned_id: i32,
        root_kind: EntityKind,
        row_kind: EntityKind,
    },
    /// The versioning row of a versioned row belongs to another root or is missing
    ForeignVersioning {
        versioned_id: i32,
        versioning_id: i32,
    },
    BrokenChain {
        message: String,
    },
    VersioningWithoutRow {
        versioning_id: i32,
    },
    SharedVersioning {
        versioning_id: i32,
        versioned_ids: Vec<i32>,
    },
    StatusMismatch {
        versioned_id: i32,
        stored: PublishingStatus,
        derived: PublishingStatus,
    },
    /// More than one version is published in the same language
    MultiplePublished {
        language: String,
        versioned_ids: Vec<i32>,
    },
    ArchiveBeforePublish {
        versioned_id: i32,
        language: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::NoVersions => write!(f, "root has no versions"),
            Violation::KindMismatch {
                versioned_id,
                root_kind,
                row_kind,
            } => write!(
                f,
                "version {} is a {:?} but its root is a {:?}",
                versioned_id, row_kind, root_kind
            ),
            Violation::ForeignVersioning {
                versioned_id,
                versioning_id,
            } => write!(
                f,
                "version {} points at versioning {} outside its root",
                versioned_id, versioning_id
            ),
            Violation::BrokenChain { message } => write!(f, "{}", message),
            Violation::VersioningWithoutRow { versioning_id } => {
                write!(f, "versioning {} has no versioned row", versioning_id)
            }
            Violation::SharedVersioning {
                versioning_id,
                versioned_ids,
            } => write!(
                f,
                "versioning {} is shared by versions {:?}",
                versioning_id, versioned_ids
            ),
            Violation::StatusMismatch {
                versioned_id,
                stored,
                derived,
            } => write!(
                f,
                "version {} is stored as {} but its languages say {}",
                versioned_id, stored, derived
            ),
            Violation::MultiplePublished {
                language,
                versioned_ids,
            } => write!(
                f,
                "language '{}' is published in versions {:?}",
                language, versioned_ids
            ),
            Violation::ArchiveBeforePublish {
                versioned_id,
                language,
            } => write!(
                f,
                "version {} in '{}' is archived before it is published",
                versioned_id, language
            ),
        }
    }
}

/// Every violation found for one root.
pub async fn check_root<C: ConnectionTrait>(
    db: &C,
    root_id: i32,
) -> Result<Vec<Violation>, LifecycleError> {
    let root = roots::Entity::find_by_id(root_id)
        .one(db)
        .await?
        .ok_or_else(|| LifecycleError::NotFound(format!("root {}", root_id)))?;

    let rows = versioned_entities::Entity::find()
        .filter(versioned_entities::Column::UnificRootId.eq(root_id))
        .order_by_asc(versioned_entities::Column::Id)
        .all(db)
        .await?;
    let versionings = versionings::Entity::find()
        .filter(versionings::Column::UnificRootId.eq(root_id))
        .all(db)
        .await?;

    let mut violations = Vec::new();
    if rows.is_empty() {
        violations.push(Violation::NoVersions);
    }

    let mut by_versioning: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for row in &rows {
        if row.kind != root.kind {
            violations.push(Violation::KindMismatch {
                versioned_id: row.id,
                root_kind: root.kind,
                row_kind: row.kind,
            });
        }
        if !versionings.iter().any(|v| v.id == row.versioning_id) {
            violations.push(Violation::ForeignVersioning {
                versioned_id: row.id,
                versioning_id: row.versioning_id,
            });
        }
        by_versioning
            .entry(row.versioning_id)
            .or_default()
            .push(row.id);
    }

    if !versionings.is_empty() {
        let records: Vec<_> = versionings.iter().map(|v| v.chain_record()).collect();
        if let Err(e) = validate_chain(&records) {
            violations.push(Violation::BrokenChain {
                message: e.to_string(),
            });
        }
    }
    for versioning in &versionings {
        match by_versioning.get(&versioning.id) {
            None => violations.push(Violation::VersioningWithoutRow {
                versioning_id: versioning.id,
            }),
            Some(ids) if ids.len() > 1 => violations.push(Violation::SharedVersioning {
                versioning_id: versioning.id,
                versioned_ids: ids.clone(),
            }),
            Some(_) => {}
        }
    }

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let availabilities = if ids.is_empty() {
        Vec::new()
    } else {
        language_availabilities::Entity::find()
            .filter(language_availabilities::Column::VersionedId.is_in(ids))
            .order_by_asc(language_availabilities::Column::VersionedId)
            .all(db)
            .await?
    };

    let mut statuses: HashMap<i32, Vec<PublishingStatus>> = HashMap::new();
    let mut published: BTreeMap<&str, Vec<i32>> = BTreeMap::new();
    for la in &availabilities {
        statuses.entry(la.versioned_id).or_default().push(la.status);
        if la.status == PublishingStatus::Published {
            published
                .entry(la.language.as_str())
                .or_default()
                .push(la.versioned_id);
        }
        if let (Some(publish_at), Some(archive_at)) = (la.publish_at, la.archive_at) {
            if archive_at < publish_at {
                violations.push(Violation::ArchiveBeforePublish {
                    versioned_id: la.versioned_id,
                    language: la.language.clone(),
                });
            }
        }
    }

    for row in &rows {
        let derived = derive_entity_status(statuses.remove(&row.id).unwrap_or_default());
        if derived != row.publishing_status {
            violations.push(Violation::StatusMismatch {
                versioned_id: row.id,
                stored: row.publishing_status,
                derived,
            });
        }
    }

    for (language, versioned_ids) in published {
        if versioned_ids.len() > 1 {
            violations.push(Violation::MultiplePublished {
                language: language.to_string(),
                versioned_ids,
            });
        }
    }

    for violation in &violations {
        log::error!("Root {}: {}", root_id, violation);
    }
    Ok(violations)
}

/// Violations of every root that has any.
pub async fn check_all<C: ConnectionTrait>(
    db: &C,
) -> Result<BTreeMap<i32, Vec<Violation>>, LifecycleError> {
    let root_ids: Vec<i32> = roots::Entity::find()
        .order_by_asc(roots::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.id)
        .collect();

    let mut report = BTreeMap::new();
    for root_id in root_ids {
        let violations = check_root(db, root_id).await?;
        if !violations.is_empty() {
            report.insert(root_id, violations);
        }
    }
    log::info!("Integrity check: {} root(s) with violations", report.len());
    Ok(report)
}
