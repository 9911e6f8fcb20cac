//! Integration tests for the scheduled publish/archive sweep

mod common;

use common::{database::*, fixtures::*};
use ptv::integrity::check_root;
use ptv::lifecycle::scheduler::{run_due, SweepReport};
use ptv::lifecycle::{self, ArchiveRequest, PublishRequest};
use ptv::orm::language_availabilities;
use ptv::versioning::{Availability, PublishingStatus};
use sea_orm::EntityTrait;

fn schedule(publish_at: i64) -> PublishRequest {
    PublishRequest {
        languages: vec![],
        publish_at: Some(at(publish_at)),
        archive_at: None,
        user: EDITOR.to_string(),
    }
}

#[actix_rt::test]
async fn test_sweep_publishes_due_rows() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");

    let draft = create_service(&db, "Library", &["fi", "sv"]).await;
    lifecycle::publish(&db, draft.id, &schedule(5), at(1))
        .await
        .unwrap();

    // Nothing is due yet
    let report = run_due(&db, at(4)).await.unwrap();
    assert_eq!(report, SweepReport::default());

    let report = run_due(&db, at(6)).await.unwrap();
    assert_eq!(report.published, 2);
    assert_eq!(report.failed, 0);

    let view = lifecycle::get_version(&db, draft.id).await.unwrap();
    assert_eq!(view.status, PublishingStatus::Published);
    assert_eq!(view.version, "1.0");
    // The scheduled time is kept as the publication time
    assert_eq!(view.language("fi").unwrap().publish_at, Some(at(5)));

    // A second sweep has nothing left to do
    let report = run_due(&db, at(7)).await.unwrap();
    assert_eq!(report, SweepReport::default());
}

#[actix_rt::test]
async fn test_sweep_supersedes_previous_publication() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");

    let first = create_published_service(&db, "Library", &["fi"]).await;
    let second = lifecycle::edit(&db, first.id, &named_draft("New library", &["fi"]), at(1))
        .await
        .unwrap();
    lifecycle::publish(&db, second.id, &schedule(5), at(1))
        .await
        .unwrap();

    run_due(&db, at(8)).await.unwrap();
    assert!(check_root(&db, first.root_id).await.unwrap().is_empty());

    let first = lifecycle::get_version(&db, first.id).await.unwrap();
    assert_eq!(first.status, PublishingStatus::OldPublished);
    assert_eq!(first.language("fi").unwrap().archive_at, Some(at(5)));

    let current = lifecycle::current_version(&db, first.root_id, "fi", at(6))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(current.id, second.id);

    // Superseded rows are not archived by later sweeps
    let report = run_due(&db, at(9)).await.unwrap();
    assert_eq!(report.archived, 0);
}

#[actix_rt::test]
async fn test_sweep_archives_due_rows() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");

    let published = create_published_service(&db, "Library", &["fi"]).await;
    let request = ArchiveRequest {
        languages: vec![],
        archive_at: Some(at(10)),
        user: "admin".to_string(),
    };
    let scheduled = lifecycle::archive(&db, published.id, &request, at(1))
        .await
        .unwrap();
    assert_eq!(scheduled.status, PublishingStatus::Published);

    let report = run_due(&db, at(12)).await.unwrap();
    assert_eq!(report.archived, 1);

    let view = lifecycle::get_version(&db, published.id).await.unwrap();
    assert_eq!(view.status, PublishingStatus::Archived);
    let fi = view.language("fi").unwrap();
    assert_eq!(fi.archive_at, Some(at(10)));
    assert_eq!(fi.set_for_archived_by.as_deref(), Some("admin"));
}

#[actix_rt::test]
async fn test_sweep_skips_ignored_drafts() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");

    let first = create_service(&db, "Library", &["fi"]).await;
    lifecycle::publish(&db, first.id, &schedule(5), at(1))
        .await
        .unwrap();
    // The scheduled draft is replaced before its time comes
    lifecycle::edit(&db, first.id, &named_draft("Library 2", &["fi"]), at(2))
        .await
        .unwrap();

    let report = run_due(&db, at(6)).await.unwrap();
    assert_eq!(report.published, 0);

    let first = lifecycle::get_version(&db, first.id).await.unwrap();
    assert!(first.ignored);
    assert_eq!(first.status, PublishingStatus::Draft);
}

#[actix_rt::test]
async fn test_sweep_skips_ignored_archives() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");

    let first = create_service(&db, "Library", &["fi"]).await;
    let request = ArchiveRequest {
        languages: vec![],
        archive_at: Some(at(5)),
        user: "admin".to_string(),
    };
    lifecycle::archive(&db, first.id, &request, at(1))
        .await
        .unwrap();
    lifecycle::edit(&db, first.id, &named_draft("Library 2", &["fi"]), at(2))
        .await
        .unwrap();

    let report = run_due(&db, at(6)).await.unwrap();
    assert_eq!(report.archived, 0);

    let first = lifecycle::get_version(&db, first.id).await.unwrap();
    assert!(first.ignored);
    assert_eq!(first.status, PublishingStatus::Draft);
    assert!(check_root(&db, first.root_id).await.unwrap().is_empty());
}

#[actix_rt::test]
async fn test_sweep_records_failures() {
    let db = setup_test_database()
        .await
        .expect("Failed to set up test database");

    let draft = create_service(&db, "Library", &["fi"]).await;

    // A language row without a name cannot be published
    let mut state = Availability::new(PublishingStatus::Draft);
    state.publish_at = Some(at(2));
    language_availabilities::Entity::insert(language_availabilities::ActiveModel::new_row(
        draft.id, "sv", &state, t0(),
    ))
    .exec(&db)
    .await
    .unwrap();

    let report = run_due(&db, at(3)).await.unwrap();
    assert_eq!(report.published, 0);
    assert_eq!(report.failed, 1);

    let view = lifecycle::get_version(&db, draft.id).await.unwrap();
    let sv = view.language("sv").unwrap();
    assert_eq!(sv.status, PublishingStatus::Draft);
    assert_eq!(sv.last_failed_publish_at, Some(at(3)));

    // Not retried until it is rescheduled
    let report = run_due(&db, at(4)).await.unwrap();
    assert_eq!(report.failed, 0);
}
