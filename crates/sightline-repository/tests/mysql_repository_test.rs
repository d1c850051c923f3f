//! Integration tests for the MySQL profile store and view ledger.
//!
//! These tests run against a real MySQL database using testcontainers and
//! need Docker; run them with `cargo test -- --ignored`.

mod common;

use common::TestDatabase;
use sightline_core::{Profile, ProfileId, ProfileUpdate, ViewEvent};
use sightline_repository::{
    MySqlProfileRepository, MySqlViewEventRepository, ProfileRepository, ViewEventRepository,
};

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_save_and_find_profile() {
    let db = TestDatabase::new().await;
    let repo = MySqlProfileRepository::new(db.pool());

    let mut profile = Profile::new(ProfileId::new_unchecked("0xalice")).with_name("Alice");
    profile.links = vec!["https://alice.example".to_string()];
    repo.save(&profile).await.expect("Failed to save profile");

    let found = repo
        .find_by_identity(&profile.identity)
        .await
        .expect("Query failed")
        .expect("Profile not found");

    assert_eq!(found.identity, profile.identity);
    assert_eq!(found.name.as_deref(), Some("Alice"));
    assert_eq!(found.links, profile.links);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_find_missing_profile() {
    let db = TestDatabase::new().await;
    let repo = MySqlProfileRepository::new(db.pool());

    let found = repo
        .find_by_identity(&ProfileId::new_unchecked("0xnobody"))
        .await
        .expect("Query failed");
    assert!(found.is_none());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_update_profile() {
    let db = TestDatabase::new().await;
    let repo = MySqlProfileRepository::new(db.pool());
    let id = ProfileId::new_unchecked("0xbob");
    repo.save(&Profile::new(id.clone())).await.unwrap();

    let updated = repo
        .update(
            &id,
            ProfileUpdate {
                bio: Some("gm".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.bio.as_deref(), Some("gm"));

    let missing = repo
        .update(&ProfileId::new_unchecked("0xnobody"), ProfileUpdate::default())
        .await
        .unwrap_err();
    assert!(missing.is_not_found());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_append_and_find_view_events() {
    let db = TestDatabase::new().await;
    let repo = MySqlViewEventRepository::new(db.pool());
    let viewed = ProfileId::new_unchecked("0xalice");

    repo.append(&ViewEvent::new(viewed.clone(), None, Some("10.0.0.1".to_string()), 2_000))
        .await
        .unwrap();
    repo.append(&ViewEvent::new(
        viewed.clone(),
        Some(ProfileId::new_unchecked("0xbob")),
        None,
        1_000,
    ))
    .await
    .unwrap();

    let events = repo.find_events(&viewed).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].timestamp_ms, 1_000);
    assert_eq!(events[0].viewer.as_ref().map(ProfileId::as_str), Some("0xbob"));
    assert_eq!(events[1].viewer_origin.as_deref(), Some("10.0.0.1"));

    let other = repo
        .find_events(&ProfileId::new_unchecked("0xcarol"))
        .await
        .unwrap();
    assert!(other.is_empty());
}
