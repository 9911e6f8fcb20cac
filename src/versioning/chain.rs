//! Validation of a root entity's version chain
//!
//! Versions of one root form a singly linked list through
//! `previous_version_id`. The list must have one head, no cycles, no
//! dangling links, and every link must point to an older version.

use super::VersionNumber;
use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// The fields of a versioning row the chain rules look at.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainRecord {
    pub id: i32,
    pub previous_id: Option<i32>,
    pub version: VersionNumber,
    pub created: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChainError {
    Empty,
    Dangling { id: i32, previous_id: i32 },
    Cycle { id: i32 },
    ForwardPointer { id: i32, previous_id: i32 },
    /// Two versions claim the same predecessor
    Branch { previous_id: i32 },
    MultipleHeads(Vec<i32>),
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::Empty => write!(f, "version chain is empty"),
            ChainError::Dangling { id, previous_id } => write!(
                f,
                "version {} points to missing previous version {}",
                id, previous_id
            ),
            ChainError::Cycle { id } => write!(f, "version chain cycles through {}", id),
            ChainError::ForwardPointer { id, previous_id } => write!(
                f,
                "version {} points forward to newer version {}",
                id, previous_id
            ),
            ChainError::Branch { previous_id } => write!(
                f,
                "more than one version follows version {}",
                previous_id
            ),
            ChainError::MultipleHeads(heads) => {
                write!(f, "version chain has several heads: {:?}", heads)
            }
        }
    }
}

impl std::error::Error for ChainError {}

/// Validate the chain and return the record ids ordered newest first.
pub fn validate_chain(records: &[ChainRecord]) -> Result<Vec<i32>, ChainError> {
    if records.is_empty() {
        return Err(ChainError::Empty);
    }

    let by_id: HashMap<i32, &ChainRecord> = records.iter().map(|r| (r.id, r)).collect();
    let mut successors: HashSet<i32> = HashSet::new();

    for record in records {
        let Some(previous_id) = record.previous_id else {
            continue;
        };
        let previous = by_id.get(&previous_id).ok_or(ChainError::Dangling {
            id: record.id,
            previous_id,
        })?;
        if previous_id == record.id {
            return Err(ChainError::Cycle { id: record.id });
        }
        if previous.version >= record.version || previous.created > record.created {
            return Err(ChainError::ForwardPointer {
                id: record.id,
                previous_id,
            });
        }
        if !successors.insert(previous_id) {
            return Err(ChainError::Branch { previous_id });
        }
    }

    let heads: Vec<i32> = records
        .iter()
        .map(|r| r.id)
        .filter(|id| !successors.contains(id))
        .collect();

    // Every node has a successor: the links close on themselves.
    let head = match heads.as_slice() {
        [] => return Err(ChainError::Cycle { id: records[0].id }),
        [head] => *head,
        _ => return Err(ChainError::MultipleHeads(heads)),
    };

    let mut ordered = Vec::with_capacity(records.len());
    let mut seen = HashSet::new();
    let mut cursor = Some(head);
    while let Some(id) = cursor {
        if !seen.insert(id) {
            return Err(ChainError::Cycle { id });
        }
        ordered.push(id);
        cursor = by_id.get(&id).and_then(|r| r.previous_id);
    }

    // Records unreachable from the head hang off a separate loop.
    if ordered.len() != records.len() {
        let stray = records
            .iter()
            .map(|r| r.id)
            .find(|id| !seen.contains(id))
            .unwrap_or(head);
        return Err(ChainError::Cycle { id: stray });
    }

    Ok(ordered)
}
