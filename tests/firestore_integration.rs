// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running and
//! FIRESTORE_EMULATOR_HOST to point at it. Ids are shared across runs, so
//! assertions use unique emails rather than fixed ids.

use chrono::{NaiveDate, TimeZone, Utc};
use fitness_tracker::db::{TrainingStore, UserStore};
use fitness_tracker::models::{ActivityType, Training, User};

mod common;
use common::test_db;

/// Unique email for test isolation.
fn unique_email(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}@emulator.test")
}

fn test_user(email: &str) -> User {
    User::new(
        "Test",
        "User",
        NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
        email,
    )
}

fn test_training(owner: &User, activity_type: ActivityType) -> Training {
    Training {
        id: None,
        user: owner.clone(),
        start_time: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
        end_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
        activity_type,
        distance: 10.0,
        average_speed: 10.0,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// USER TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_user_lifecycle() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("lifecycle");

    let first = db.save_user(test_user(&email)).await.unwrap();
    let second = db.save_user(test_user(&unique_email("other"))).await.unwrap();
    let first_id = first.id.expect("saved user should have an id");
    assert!(second.id.unwrap() > first_id, "ids should increase");

    let fetched = db.find_user(first_id).await.unwrap();
    assert_eq!(fetched, Some(first.clone()));

    let by_email = db.find_user_by_email(&email).await.unwrap();
    assert_eq!(by_email.and_then(|u| u.id), Some(first_id));

    let mut renamed = first.clone();
    renamed.first_name = "Renamed".to_string();
    db.save_user(renamed).await.unwrap();
    let fetched = db.find_user(first_id).await.unwrap().unwrap();
    assert_eq!(fetched.first_name, "Renamed");

    db.delete_user(first_id).await.unwrap();
    assert!(db.find_user(first_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_creates_get_distinct_ids() {
    require_emulator!();

    let db = test_db().await;
    let first_email = unique_email("race-a");
    let second_email = unique_email("race-b");

    let (first, second) = tokio::join!(
        db.save_user(test_user(&first_email)),
        db.save_user(test_user(&second_email)),
    );
    let first = first.unwrap();
    let second = second.unwrap();

    assert_ne!(first.id, second.id, "concurrent creates must not share an id");

    let stored_first = db.find_user(first.id.unwrap()).await.unwrap().unwrap();
    let stored_second = db.find_user(second.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored_first.email, first_email);
    assert_eq!(stored_second.email, second_email);
}

#[tokio::test]
async fn test_email_search_is_substring() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("needle");
    let saved = db.save_user(test_user(&email)).await.unwrap();

    let fragment = &email[..email.find('@').unwrap()];
    let found = db.search_users_by_email(fragment).await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, saved.id);
}

#[tokio::test]
async fn test_born_on_or_before_is_inclusive() {
    require_emulator!();

    let db = test_db().await;
    let saved = db.save_user(test_user(&unique_email("born"))).await.unwrap();

    let cutoff = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap();
    let found = db.find_users_born_on_or_before(cutoff).await.unwrap();
    assert!(found.iter().any(|u| u.id == saved.id));

    let earlier = NaiveDate::from_ymd_opt(1989, 12, 31).unwrap();
    let found = db.find_users_born_on_or_before(earlier).await.unwrap();
    assert!(!found.iter().any(|u| u.id == saved.id));
}

// ═══════════════════════════════════════════════════════════════════════════
// TRAINING TESTS
// ═══════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn test_training_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let owner = db.save_user(test_user(&unique_email("trainer"))).await.unwrap();

    let saved = db
        .save_training(test_training(&owner, ActivityType::Swimming))
        .await
        .unwrap();
    let id = saved.id.expect("saved training should have an id");

    let fetched = db.find_training(id).await.unwrap().unwrap();
    assert_eq!(fetched.user, owner);
    assert_eq!(fetched.activity_type, ActivityType::Swimming);
    assert_eq!(fetched.end_time, saved.end_time);

    let by_user = db.find_trainings_by_user(owner.id.unwrap()).await.unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].id, Some(id));

    let by_type = db
        .find_trainings_by_activity_type(ActivityType::Swimming)
        .await
        .unwrap();
    assert!(by_type.iter().any(|t| t.id == Some(id)));

    let ended = db.find_trainings_ended_after(saved.end_time).await.unwrap();
    assert!(!ended.iter().any(|t| t.id == Some(id)), "cutoff is exclusive");
}

#[tokio::test]
async fn test_orphaned_trainings_are_skipped() {
    require_emulator!();

    let db = test_db().await;
    let owner = db.save_user(test_user(&unique_email("orphan"))).await.unwrap();
    let saved = db
        .save_training(test_training(&owner, ActivityType::Tennis))
        .await
        .unwrap();

    db.delete_user(owner.id.unwrap()).await.unwrap();

    assert!(db.find_training(saved.id.unwrap()).await.unwrap().is_none());
    let all = db.find_all_trainings().await.unwrap();
    assert!(!all.iter().any(|t| t.id == saved.id));
}
