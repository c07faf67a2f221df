//! Unit tests for UserRepository.
//!
//! Covers insert/duplicate email, token lookup, and profile/presence updates.

use crate::models::UserRecord;
use crate::sqlite_pool::SqlitePoolManager;
use crate::user_repo::UserRepository;
use crate::StorageError;

async fn test_repo() -> (tempfile::TempDir, UserRepository) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("users.db");
    let pool = SqlitePoolManager::new(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("Failed to create pool");
    let repo = UserRepository::new(pool)
        .await
        .expect("Failed to create repository");
    (dir, repo)
}

fn alice() -> UserRecord {
    UserRecord::new(
        "tok_alice".to_string(),
        "alice@example.com".to_string(),
        "Alice".to_string(),
        Some("https://example.com/alice.png".to_string()),
    )
}

#[tokio::test]
async fn test_insert_and_find_by_token() {
    let (_dir, repo) = test_repo().await;
    let user = alice();

    repo.insert(&user).await.expect("Failed to insert");

    let found = repo
        .find_by_token("tok_alice")
        .await
        .expect("Failed to query")
        .expect("User should exist");
    assert_eq!(found.id, user.id);
    assert_eq!(found.email, "alice@example.com");
    assert!(found.is_online);

    let missing = repo
        .find_by_token("tok_nobody")
        .await
        .expect("Failed to query");
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_insert_rejects_duplicate_email() {
    let (_dir, repo) = test_repo().await;
    repo.insert(&alice()).await.expect("Failed to insert");

    let dup = UserRecord::new(
        "tok_other".to_string(),
        "alice@example.com".to_string(),
        "Alice Again".to_string(),
        None,
    );
    let err = repo.insert(&dup).await.expect_err("Insert should fail");
    assert!(matches!(err, StorageError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_profile_updates() {
    let (_dir, repo) = test_repo().await;
    repo.insert(&alice()).await.expect("Failed to insert");

    assert!(repo
        .set_name("tok_alice", "Alice B.")
        .await
        .expect("Failed to update"));
    assert!(repo
        .set_image("tok_alice", "https://example.com/new.png")
        .await
        .expect("Failed to update"));

    let found = repo
        .find_by_token("tok_alice")
        .await
        .expect("Failed to query")
        .expect("User should exist");
    assert_eq!(found.name, "Alice B.");
    assert_eq!(found.image.as_deref(), Some("https://example.com/new.png"));

    // Unknown token updates nothing.
    assert!(!repo
        .set_name("tok_nobody", "Ghost")
        .await
        .expect("Failed to update"));
}

#[tokio::test]
async fn test_presence_flips() {
    let (_dir, repo) = test_repo().await;
    repo.insert(&alice()).await.expect("Failed to insert");

    assert!(repo
        .set_online("tok_alice", false)
        .await
        .expect("Failed to update"));
    let found = repo
        .find_by_token("tok_alice")
        .await
        .expect("Failed to query")
        .expect("User should exist");
    assert!(!found.is_online);

    assert!(repo
        .set_online("tok_alice", true)
        .await
        .expect("Failed to update"));
    let found = repo
        .find_by_token("tok_alice")
        .await
        .expect("Failed to query")
        .expect("User should exist");
    assert!(found.is_online);
}

#[tokio::test]
async fn test_find_all_returns_everyone() {
    let (_dir, repo) = test_repo().await;
    repo.insert(&alice()).await.expect("Failed to insert");
    repo.insert(&UserRecord::new(
        "tok_bob".to_string(),
        "bob@example.com".to_string(),
        "Bob".to_string(),
        None,
    ))
    .await
    .expect("Failed to insert");

    let users = repo.find_all().await.expect("Failed to query");
    assert_eq!(users.len(), 2);
}
