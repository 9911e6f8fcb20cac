//! Versioning and publishing operations on the database
//!
//! Every operation runs in a single transaction. Versions are never edited in
//! place: an edit clones the latest version into a new row, and publishing or
//! archiving only moves the per-language state of a row forward.

mod error;
mod input;
pub mod scheduler;
mod view;

pub use error::LifecycleError;
pub use input::{
    ArchiveRequest, DraftInput, FailedPublishRequest, PublishRequest, RestoreRequest,
    ReviewRequest, TextInput,
};
pub use view::{get_version, LanguageView, TextView, VersionView};

use crate::app_config;
use crate::orm::localized_texts::TextType;
use crate::orm::roots::EntityKind;
use crate::orm::{
    language_availabilities, localized_texts, roots, versioned_entities, versionings,
};
use crate::versioning::{
    derive_entity_status, select_current, validate_chain, Availability, Candidate,
    PublishingStatus, VersionNumber,
};
use chrono::NaiveDateTime;
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DatabaseTransaction};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use validator::Validate;

/// Create a root entity with its first draft (version 0.1).
pub async fn create_root(
    db: &DatabaseConnection,
    kind: EntityKind,
    input: &DraftInput,
    now: NaiveDateTime,
) -> Result<VersionView, LifecycleError> {
    input.check(&app_config::publishing())?;

    let txn = db.begin().await?;
    check_organization(&txn, input.organization_id).await?;

    let root = roots::ActiveModel {
        kind: Set(kind),
        created: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let first = VersionNumber::initial();
    let versioning = versionings::ActiveModel {
        unific_root_id: Set(root.id),
        previous_version_id: Set(None),
        version_major: Set(first.major),
        version_minor: Set(first.minor),
        ignored: Set(false),
        created: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let row = insert_version_row(&txn, root.id, kind, versioning.id, None, input, now).await?;
    let draft = Availability::new(PublishingStatus::Draft);
    for language in input.name_languages() {
        insert_availability(&txn, row.id, language, &draft, now).await?;
    }

    let view = view::build_view(&txn, row).await?;
    txn.commit().await?;

    log::info!(
        "Created {:?} root {} with draft version {}",
        kind,
        view.root_id,
        view.id
    );
    Ok(view)
}

/// Clone the latest version of a root into a new draft carrying `input`.
pub async fn edit(
    db: &DatabaseConnection,
    versioned_id: i32,
    input: &DraftInput,
    now: NaiveDateTime,
) -> Result<VersionView, LifecycleError> {
    input.check(&app_config::publishing())?;

    let txn = db.begin().await?;
    let source = find_version(&txn, versioned_id).await?;
    if source.publishing_status == PublishingStatus::Archived {
        return Err(LifecycleError::Conflict(format!(
            "version {} is archived and must be restored before editing",
            versioned_id
        )));
    }
    check_organization(&txn, input.organization_id).await?;

    let head = head_versioning(&txn, source.unific_root_id).await?;
    if head.id != source.versioning_id {
        return Err(LifecycleError::Conflict(format!(
            "version {} is not the latest version of root {}",
            versioned_id, source.unific_root_id
        )));
    }

    let row = clone_version(&txn, &source, &head, input, now).await?;
    let view = view::build_view(&txn, row).await?;
    txn.commit().await?;

    log::info!(
        "Version {} of root {} cloned into draft {} ({})",
        versioned_id,
        view.root_id,
        view.id,
        view.version
    );
    Ok(view)
}

/// Publish languages of a version now, or schedule them.
pub async fn publish(
    db: &DatabaseConnection,
    versioned_id: i32,
    request: &PublishRequest,
    now: NaiveDateTime,
) -> Result<VersionView, LifecycleError> {
    request.validate()?;

    let txn = db.begin().await?;
    let row = find_version(&txn, versioned_id).await?;
    let versioning = find_versioning(&txn, row.versioning_id).await?;
    if versioning.ignored {
        return Err(LifecycleError::Conflict(format!(
            "version {} was replaced by a newer draft",
            versioned_id
        )));
    }

    let rows = availability_rows(&txn, row.id).await?;
    let selected = select_languages(rows, &request.languages, versioned_id)?;
    let names = name_languages(&txn, row.id).await?;
    let immediate = request.publish_at.map_or(true, |at| at <= now);

    // Only the head of the chain can take a new major number; an older
    // version keeps the one it was published with.
    let needs_number = !versioning.version().is_published_number();
    if immediate && needs_number {
        let head = head_versioning(&txn, row.unific_root_id).await?;
        if head.id != versioning.id {
            return Err(LifecycleError::Conflict(format!(
                "version {} is not the latest version of root {}",
                versioned_id, row.unific_root_id
            )));
        }
    }

    // A publication time already passed takes effect as given, but never
    // before the version existed or before the publication it replaces.
    let languages: Vec<String> = selected.iter().map(|la| la.language.clone()).collect();
    let replaced_at = latest_publication(&txn, &row, &languages).await?;
    let effective = request
        .publish_at
        .filter(|at| *at <= now)
        .unwrap_or(now)
        .max(row.created)
        .max(replaced_at.unwrap_or(row.created));

    let mut published = Vec::new();
    for la in selected {
        if !names.contains(&la.language) {
            return Err(LifecycleError::Validation(format!(
                "language '{}' of version {} has no name",
                la.language, versioned_id
            )));
        }
        let mut state = la.availability();
        match request.publish_at {
            Some(at) if !immediate => state.schedule_publish(at, now)?,
            _ => {
                state.publish(effective)?;
                published.push(la.language.clone());
            }
        }
        if let Some(archive_at) = request.archive_at {
            state.schedule_archive(archive_at, &request.user, now)?;
        }
        save_availability(&txn, la, &state, now).await?;
    }

    if !published.is_empty() {
        supersede_others(&txn, &row, &published, &request.user, effective, now).await?;
        if needs_number {
            let next = versioning.version().published();
            let mut active: versionings::ActiveModel = versioning.into();
            active.version_major = Set(next.major);
            active.version_minor = Set(next.minor);
            active.update(&txn).await?;
        }
    }

    let row = refresh_entity_status(&txn, row, &request.user, now).await?;
    let view = view::build_view(&txn, row).await?;
    txn.commit().await?;

    if published.is_empty() {
        log::info!("Version {} scheduled for publishing", versioned_id);
    } else {
        log::info!(
            "Version {} published as {} in {:?}",
            versioned_id,
            view.version,
            published
        );
    }
    Ok(view)
}

/// Archive languages of a version now, or schedule it.
pub async fn archive(
    db: &DatabaseConnection,
    versioned_id: i32,
    request: &ArchiveRequest,
    now: NaiveDateTime,
) -> Result<VersionView, LifecycleError> {
    request.validate()?;

    let txn = db.begin().await?;
    let row = find_version(&txn, versioned_id).await?;
    let rows = availability_rows(&txn, row.id).await?;
    let selected = select_languages(rows, &request.languages, versioned_id)?;

    for la in selected {
        let mut state = la.availability();
        match request.archive_at {
            Some(at) if at > now => state.schedule_archive(at, &request.user, now)?,
            _ => state.archive(&request.user, now)?,
        }
        save_availability(&txn, la, &state, now).await?;
    }

    let row = refresh_entity_status(&txn, row, &request.user, now).await?;
    let view = view::build_view(&txn, row).await?;
    txn.commit().await?;

    log::info!("Version {} archived ({})", versioned_id, view.status);
    Ok(view)
}

pub async fn mark_reviewed(
    db: &DatabaseConnection,
    versioned_id: i32,
    request: &ReviewRequest,
    now: NaiveDateTime,
) -> Result<VersionView, LifecycleError> {
    request.validate()?;

    let txn = db.begin().await?;
    let row = find_version(&txn, versioned_id).await?;
    let la = find_availability(&txn, row.id, &request.language).await?;
    let mut state = la.availability();
    state.mark_reviewed(&request.user, now);
    save_availability(&txn, la, &state, now).await?;

    let view = view::build_view(&txn, row).await?;
    txn.commit().await?;
    Ok(view)
}

/// Record a failed publication attempt. The status is left as it was.
pub async fn record_failed_publish(
    db: &DatabaseConnection,
    versioned_id: i32,
    language: &str,
    now: NaiveDateTime,
) -> Result<VersionView, LifecycleError> {
    let txn = db.begin().await?;
    let row = find_version(&txn, versioned_id).await?;
    let la = find_availability(&txn, row.id, language).await?;
    let mut state = la.availability();
    state.record_failed_publish(now);
    save_availability(&txn, la, &state, now).await?;

    let view = view::build_view(&txn, row).await?;
    txn.commit().await?;

    log::warn!(
        "Publishing version {} in '{}' failed at {}",
        versioned_id,
        language,
        now
    );
    Ok(view)
}

/// Bring an archived version back as a new draft on top of the chain.
pub async fn restore(
    db: &DatabaseConnection,
    versioned_id: i32,
    request: &RestoreRequest,
    now: NaiveDateTime,
) -> Result<VersionView, LifecycleError> {
    request.validate()?;

    let txn = db.begin().await?;
    let source = find_version(&txn, versioned_id).await?;
    if source.publishing_status != PublishingStatus::Archived {
        return Err(LifecycleError::Conflict(format!(
            "version {} is {}, only archived versions can be restored",
            versioned_id, source.publishing_status
        )));
    }

    let source_view = view::build_view(&txn, source.clone()).await?;
    let input = DraftInput {
        organization_id: source.organization_id,
        texts: source_view
            .texts
            .into_iter()
            .map(|t| TextInput {
                language: t.language,
                text_type: t.text_type,
                value: t.value,
            })
            .collect(),
        data: source_view.data,
        user: request.user.clone(),
    };

    let head = head_versioning(&txn, source.unific_root_id).await?;
    let row = clone_version(&txn, &source, &head, &input, now).await?;
    let view = view::build_view(&txn, row).await?;
    txn.commit().await?;

    log::info!(
        "Archived version {} restored as draft {} ({})",
        versioned_id,
        view.id,
        view.version
    );
    Ok(view)
}

/// The version of a root visible in `language` at `now`, if any.
pub async fn current_version<C: ConnectionTrait>(
    db: &C,
    root_id: i32,
    language: &str,
    now: NaiveDateTime,
) -> Result<Option<VersionView>, LifecycleError> {
    find_root(db, root_id).await?;
    let live = live_rows(db, root_id).await?;
    let ids: Vec<i32> = live.keys().copied().collect();

    let rows = language_availabilities::Entity::find()
        .filter(language_availabilities::Column::VersionedId.is_in(ids))
        .filter(language_availabilities::Column::Language.eq(language))
        .all(db)
        .await?;

    match pick_current(&rows, now) {
        Some(id) => match live.get(&id) {
            Some(row) => Ok(Some(view::build_view(db, row.clone()).await?)),
            None => Ok(None),
        },
        None => Ok(None),
    }
}

/// The visible version of a root for every language it has content in.
pub async fn current_versions<C: ConnectionTrait>(
    db: &C,
    root_id: i32,
    now: NaiveDateTime,
) -> Result<BTreeMap<String, VersionView>, LifecycleError> {
    find_root(db, root_id).await?;
    let live = live_rows(db, root_id).await?;
    let ids: Vec<i32> = live.keys().copied().collect();

    let rows = language_availabilities::Entity::find()
        .filter(language_availabilities::Column::VersionedId.is_in(ids))
        .all(db)
        .await?;

    let mut by_language: BTreeMap<String, Vec<language_availabilities::Model>> = BTreeMap::new();
    for row in rows {
        by_language.entry(row.language.clone()).or_default().push(row);
    }

    let mut current = BTreeMap::new();
    for (language, rows) in by_language {
        if let Some(row) = pick_current(&rows, now).and_then(|id| live.get(&id)) {
            current.insert(language, view::build_view(db, row.clone()).await?);
        }
    }
    Ok(current)
}

/// Every version of a root, newest first, including ignored drafts.
pub async fn history<C: ConnectionTrait>(
    db: &C,
    root_id: i32,
) -> Result<Vec<VersionView>, LifecycleError> {
    find_root(db, root_id).await?;

    let versionings = versionings::Entity::find()
        .filter(versionings::Column::UnificRootId.eq(root_id))
        .all(db)
        .await?;
    let records: Vec<_> = versionings.iter().map(|v| v.chain_record()).collect();
    let ordered = validate_chain(&records)?;

    let mut rows: HashMap<i32, versioned_entities::Model> = versioned_entities::Entity::find()
        .filter(versioned_entities::Column::UnificRootId.eq(root_id))
        .all(db)
        .await?
        .into_iter()
        .map(|row| (row.versioning_id, row))
        .collect();

    let mut views = Vec::with_capacity(ordered.len());
    for versioning_id in ordered {
        match rows.remove(&versioning_id) {
            Some(row) => views.push(view::build_view(db, row).await?),
            None => log::warn!(
                "Versioning {} of root {} has no versioned row",
                versioning_id,
                root_id
            ),
        }
    }
    Ok(views)
}

pub async fn list_roots<C: ConnectionTrait>(
    db: &C,
    kind: EntityKind,
) -> Result<Vec<roots::Model>, LifecycleError> {
    Ok(roots::Entity::find()
        .filter(roots::Column::Kind.eq(kind))
        .order_by_asc(roots::Column::Id)
        .all(db)
        .await?)
}

pub async fn find_root<C: ConnectionTrait>(
    db: &C,
    root_id: i32,
) -> Result<roots::Model, LifecycleError> {
    roots::Entity::find_by_id(root_id)
        .one(db)
        .await?
        .ok_or_else(|| LifecycleError::NotFound(format!("root {}", root_id)))
}

pub(crate) async fn find_version<C: ConnectionTrait>(
    db: &C,
    versioned_id: i32,
) -> Result<versioned_entities::Model, LifecycleError> {
    versioned_entities::Entity::find_by_id(versioned_id)
        .one(db)
        .await?
        .ok_or_else(|| LifecycleError::NotFound(format!("version {}", versioned_id)))
}

async fn find_versioning<C: ConnectionTrait>(
    db: &C,
    versioning_id: i32,
) -> Result<versionings::Model, LifecycleError> {
    versionings::Entity::find_by_id(versioning_id)
        .one(db)
        .await?
        .ok_or_else(|| LifecycleError::NotFound(format!("versioning {}", versioning_id)))
}

async fn find_availability<C: ConnectionTrait>(
    db: &C,
    versioned_id: i32,
    language: &str,
) -> Result<language_availabilities::Model, LifecycleError> {
    language_availabilities::Entity::find_by_id((versioned_id, language.to_string()))
        .one(db)
        .await?
        .ok_or_else(|| {
            LifecycleError::NotFound(format!(
                "language '{}' of version {}",
                language, versioned_id
            ))
        })
}

/// The newest versioning row of a root, ignored or not.
async fn head_versioning<C: ConnectionTrait>(
    db: &C,
    root_id: i32,
) -> Result<versionings::Model, LifecycleError> {
    versionings::Entity::find()
        .filter(versionings::Column::UnificRootId.eq(root_id))
        .order_by_desc(versionings::Column::VersionMajor)
        .order_by_desc(versionings::Column::VersionMinor)
        .order_by_desc(versionings::Column::Id)
        .one(db)
        .await?
        .ok_or_else(|| LifecycleError::NotFound(format!("versions of root {}", root_id)))
}

/// Versioned rows of a root whose versioning is not ignored, by id.
async fn live_rows<C: ConnectionTrait>(
    db: &C,
    root_id: i32,
) -> Result<BTreeMap<i32, versioned_entities::Model>, LifecycleError> {
    let live_versionings: HashSet<i32> = versionings::Entity::find()
        .filter(versionings::Column::UnificRootId.eq(root_id))
        .filter(versionings::Column::Ignored.eq(false))
        .all(db)
        .await?
        .into_iter()
        .map(|v| v.id)
        .collect();

    Ok(versioned_entities::Entity::find()
        .filter(versioned_entities::Column::UnificRootId.eq(root_id))
        .all(db)
        .await?
        .into_iter()
        .filter(|row| live_versionings.contains(&row.versioning_id))
        .map(|row| (row.id, row))
        .collect())
}

fn pick_current(rows: &[language_availabilities::Model], now: NaiveDateTime) -> Option<i32> {
    let states: Vec<(i32, Availability)> = rows
        .iter()
        .map(|r| (r.versioned_id, r.availability()))
        .collect();
    let candidates: Vec<Candidate<'_>> = states
        .iter()
        .map(|(id, availability)| Candidate {
            versioned_id: *id,
            availability,
        })
        .collect();
    select_current(&candidates, now)
}

async fn availability_rows<C: ConnectionTrait>(
    db: &C,
    versioned_id: i32,
) -> Result<Vec<language_availabilities::Model>, LifecycleError> {
    Ok(language_availabilities::Entity::find()
        .filter(language_availabilities::Column::VersionedId.eq(versioned_id))
        .order_by_asc(language_availabilities::Column::Language)
        .all(db)
        .await?)
}

/// Rows for the requested languages, or all rows when none are requested.
fn select_languages(
    rows: Vec<language_availabilities::Model>,
    languages: &[String],
    versioned_id: i32,
) -> Result<Vec<language_availabilities::Model>, LifecycleError> {
    if languages.is_empty() {
        return Ok(rows);
    }
    let requested: BTreeSet<&str> = languages.iter().map(String::as_str).collect();
    for language in &requested {
        if !rows.iter().any(|r| r.language == *language) {
            return Err(LifecycleError::NotFound(format!(
                "language '{}' of version {}",
                language, versioned_id
            )));
        }
    }
    Ok(rows
        .into_iter()
        .filter(|r| requested.contains(r.language.as_str()))
        .collect())
}

async fn name_languages<C: ConnectionTrait>(
    db: &C,
    versioned_id: i32,
) -> Result<HashSet<String>, LifecycleError> {
    Ok(localized_texts::Entity::find()
        .filter(localized_texts::Column::VersionedId.eq(versioned_id))
        .filter(localized_texts::Column::TextType.eq(TextType::Name))
        .all(db)
        .await?
        .into_iter()
        .filter(|t| !t.value.trim().is_empty())
        .map(|t| t.language)
        .collect())
}

async fn check_organization(
    txn: &DatabaseTransaction,
    organization_id: Option<i32>,
) -> Result<(), LifecycleError> {
    let Some(organization_id) = organization_id else {
        return Ok(());
    };
    let organization = roots::Entity::find_by_id(organization_id)
        .one(txn)
        .await?
        .ok_or_else(|| LifecycleError::Validation(format!(
            "organization {} does not exist",
            organization_id
        )))?;
    if organization.kind != EntityKind::Organization {
        return Err(LifecycleError::Validation(format!(
            "root {} is not an organization",
            organization_id
        )));
    }
    Ok(())
}

async fn insert_version_row(
    txn: &DatabaseTransaction,
    root_id: i32,
    kind: EntityKind,
    versioning_id: i32,
    original_id: Option<i32>,
    input: &DraftInput,
    now: NaiveDateTime,
) -> Result<versioned_entities::Model, LifecycleError> {
    let data = if input.data.is_null() {
        "{}".to_string()
    } else {
        input.data.to_string()
    };

    let row = versioned_entities::ActiveModel {
        unific_root_id: Set(root_id),
        kind: Set(kind),
        versioning_id: Set(versioning_id),
        original_id: Set(original_id),
        publishing_status: Set(PublishingStatus::Draft),
        organization_id: Set(input.organization_id),
        data: Set(data),
        created: Set(now),
        created_by: Set(input.user.clone()),
        modified: Set(now),
        modified_by: Set(input.user.clone()),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    for text in &input.texts {
        localized_texts::ActiveModel {
            versioned_id: Set(row.id),
            language: Set(text.language.clone()),
            text_type: Set(text.text_type),
            value: Set(text.value.clone()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }

    Ok(row)
}

/// Copy-on-write: a new versioning on top of `head` and a new versioned row
/// cloned from `source` with the content of `input`.
async fn clone_version(
    txn: &DatabaseTransaction,
    source: &versioned_entities::Model,
    head: &versionings::Model,
    input: &DraftInput,
    now: NaiveDateTime,
) -> Result<versioned_entities::Model, LifecycleError> {
    ignore_if_draft(txn, head).await?;

    let next = head.version().next_draft();
    let versioning = versionings::ActiveModel {
        unific_root_id: Set(source.unific_root_id),
        previous_version_id: Set(Some(head.id)),
        version_major: Set(next.major),
        version_minor: Set(next.minor),
        ignored: Set(false),
        created: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let row = insert_version_row(
        txn,
        source.unific_root_id,
        source.kind,
        versioning.id,
        Some(source.id),
        input,
        now,
    )
    .await?;

    let previous: HashMap<String, Availability> = availability_rows(txn, source.id)
        .await?
        .into_iter()
        .map(|la| (la.language.clone(), la.availability()))
        .collect();
    for language in input.name_languages() {
        let state = Availability::new(cloned_status(previous.get(language)));
        insert_availability(txn, row.id, language, &state, now).await?;
    }

    crate::opening_hours::copy_service_hours(txn, source.id, row.id).await?;

    let row = refresh_entity_status(txn, row, &input.user, now).await?;
    Ok(row)
}

/// Status of a language in a fresh clone: languages that have been public
/// before come back as `Modified`.
fn cloned_status(source: Option<&Availability>) -> PublishingStatus {
    match source {
        Some(a) => match a.status {
            PublishingStatus::Modified
            | PublishingStatus::Published
            | PublishingStatus::OldPublished => PublishingStatus::Modified,
            PublishingStatus::Archived if a.publish_at.is_some() => PublishingStatus::Modified,
            _ => PublishingStatus::Draft,
        },
        None => PublishingStatus::Draft,
    }
}

/// A draft that gets a successor is no longer a candidate for publishing.
async fn ignore_if_draft(
    txn: &DatabaseTransaction,
    head: &versionings::Model,
) -> Result<(), LifecycleError> {
    let head_row = versioned_entities::Entity::find()
        .filter(versioned_entities::Column::VersioningId.eq(head.id))
        .one(txn)
        .await?;
    let is_draft = head_row
        .map(|row| row.publishing_status.is_draft_like())
        .unwrap_or(false);
    if is_draft && !head.ignored {
        let mut active: versionings::ActiveModel = head.clone().into();
        active.ignored = Set(true);
        active.update(txn).await?;
    }
    Ok(())
}

/// Latest publication time of `languages` on the other versions of the root
/// that are still published.
async fn latest_publication(
    txn: &DatabaseTransaction,
    row: &versioned_entities::Model,
    languages: &[String],
) -> Result<Option<NaiveDateTime>, LifecycleError> {
    let others: Vec<i32> = versioned_entities::Entity::find()
        .filter(versioned_entities::Column::UnificRootId.eq(row.unific_root_id))
        .filter(versioned_entities::Column::Id.ne(row.id))
        .all(txn)
        .await?
        .into_iter()
        .map(|other| other.id)
        .collect();
    if others.is_empty() || languages.is_empty() {
        return Ok(None);
    }

    Ok(language_availabilities::Entity::find()
        .filter(language_availabilities::Column::VersionedId.is_in(others))
        .filter(language_availabilities::Column::Language.is_in(languages.to_vec()))
        .filter(language_availabilities::Column::Status.eq(PublishingStatus::Published))
        .all(txn)
        .await?
        .into_iter()
        .filter_map(|la| la.publish_at)
        .max())
}

/// Move `languages` of every other version of the root from published to old published.
async fn supersede_others(
    txn: &DatabaseTransaction,
    row: &versioned_entities::Model,
    languages: &[String],
    user: &str,
    at: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), LifecycleError> {
    let others = versioned_entities::Entity::find()
        .filter(versioned_entities::Column::UnificRootId.eq(row.unific_root_id))
        .filter(versioned_entities::Column::Id.ne(row.id))
        .all(txn)
        .await?;

    for other in others {
        let rows = language_availabilities::Entity::find()
            .filter(language_availabilities::Column::VersionedId.eq(other.id))
            .filter(language_availabilities::Column::Language.is_in(languages.to_vec()))
            .filter(language_availabilities::Column::Status.eq(PublishingStatus::Published))
            .all(txn)
            .await?;
        if rows.is_empty() {
            continue;
        }
        for la in rows {
            let mut state = la.availability();
            state.supersede(at)?;
            save_availability(txn, la, &state, now).await?;
        }
        refresh_entity_status(txn, other, user, now).await?;
    }
    Ok(())
}

async fn insert_availability(
    txn: &DatabaseTransaction,
    versioned_id: i32,
    language: &str,
    state: &Availability,
    now: NaiveDateTime,
) -> Result<(), LifecycleError> {
    language_availabilities::Entity::insert(language_availabilities::ActiveModel::new_row(
        versioned_id,
        language,
        state,
        now,
    ))
    .exec(txn)
    .await?;
    Ok(())
}

pub(crate) async fn save_availability(
    txn: &DatabaseTransaction,
    row: language_availabilities::Model,
    state: &Availability,
    now: NaiveDateTime,
) -> Result<(), LifecycleError> {
    let mut active: language_availabilities::ActiveModel = row.into();
    active.apply(state, now);
    active.update(txn).await?;
    Ok(())
}

/// Re-derive the entity-level status from the language rows.
pub(crate) async fn refresh_entity_status(
    txn: &DatabaseTransaction,
    row: versioned_entities::Model,
    user: &str,
    now: NaiveDateTime,
) -> Result<versioned_entities::Model, LifecycleError> {
    let statuses: Vec<PublishingStatus> = availability_rows(txn, row.id)
        .await?
        .into_iter()
        .map(|la| la.status)
        .collect();
    let status = derive_entity_status(statuses);

    let mut active: versioned_entities::ActiveModel = row.into();
    active.publishing_status = Set(status);
    active.modified = Set(now);
    active.modified_by = Set(user.to_string());
    Ok(active.update(txn).await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cloned_status() {
        let mut a = Availability::new(PublishingStatus::Draft);
        assert_eq!(cloned_status(None), PublishingStatus::Draft);
        assert_eq!(cloned_status(Some(&a)), PublishingStatus::Draft);

        a.status = PublishingStatus::Published;
        assert_eq!(cloned_status(Some(&a)), PublishingStatus::Modified);

        // Archived without ever being published
        a.status = PublishingStatus::Archived;
        a.publish_at = None;
        assert_eq!(cloned_status(Some(&a)), PublishingStatus::Draft);
    }
}
