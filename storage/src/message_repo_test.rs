//! Unit tests for MessageRepository.
//!
//! Covers append, ordering/limits of list_by_conversation, recent_excluding,
//! and delete_by_conversation.

use crate::message_repo::{MessageRepository, SortOrder};
use crate::sqlite_pool::SqlitePoolManager;

async fn test_repo() -> (tempfile::TempDir, MessageRepository) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("messages.db");
    let pool = SqlitePoolManager::new(db_path.to_str().expect("utf-8 path"))
        .await
        .expect("Failed to create pool");
    let repo = MessageRepository::new(pool)
        .await
        .expect("Failed to create repository");
    (dir, repo)
}

#[tokio::test]
async fn test_append_assigns_id_and_timestamp() {
    let (_dir, repo) = test_repo().await;

    let message = repo
        .append("conv-1", "user-1", "Hello World", "text", None)
        .await
        .expect("Failed to append");

    assert!(!message.id.is_empty());
    assert_eq!(message.conversation_id, "conv-1");
    assert_eq!(message.sender, "user-1");
    assert_eq!(message.content, "Hello World");
    assert_eq!(message.kind, "text");
    assert!(message.file_name.is_none());
}

#[tokio::test]
async fn test_append_keeps_file_name_for_file_kind() {
    let (_dir, repo) = test_repo().await;

    let message = repo
        .append("conv-1", "user-1", "https://host/objects/abc", "file", Some("notes.pdf"))
        .await
        .expect("Failed to append");

    assert_eq!(message.file_name.as_deref(), Some("notes.pdf"));
}

#[tokio::test]
async fn test_list_by_conversation_orders_and_limits() {
    let (_dir, repo) = test_repo().await;

    for i in 0..8 {
        repo.append("conv-1", "user-1", &format!("msg {}", i), "text", None)
            .await
            .expect("Failed to append");
    }
    // A second conversation must not leak into the listing.
    repo.append("conv-2", "user-2", "other", "text", None)
        .await
        .expect("Failed to append");

    let asc = repo
        .list_by_conversation("conv-1", SortOrder::Asc, None)
        .await
        .expect("Failed to list");
    assert_eq!(asc.len(), 8);
    assert_eq!(asc[0].content, "msg 0");
    assert_eq!(asc[7].content, "msg 7");

    let desc5 = repo
        .list_by_conversation("conv-1", SortOrder::Desc, Some(5))
        .await
        .expect("Failed to list");
    assert_eq!(desc5.len(), 5);
    assert_eq!(desc5[0].content, "msg 7");
    assert_eq!(desc5[4].content, "msg 3");
}

#[tokio::test]
async fn test_desc_take_then_reverse_equals_tail_of_asc() {
    // Round-trip ordering law: the reversed newest-first window is the
    // last-5 slice of the full ascending listing.
    let (_dir, repo) = test_repo().await;

    for i in 0..9 {
        repo.append("conv-1", "user-1", &format!("msg {}", i), "text", None)
            .await
            .expect("Failed to append");
    }

    let mut window = repo
        .list_by_conversation("conv-1", SortOrder::Desc, Some(5))
        .await
        .expect("Failed to list");
    window.reverse();

    let asc = repo
        .list_by_conversation("conv-1", SortOrder::Asc, None)
        .await
        .expect("Failed to list");
    let tail: Vec<_> = asc[asc.len() - 5..].to_vec();

    let window_ids: Vec<_> = window.iter().map(|m| m.id.clone()).collect();
    let tail_ids: Vec<_> = tail.iter().map(|m| m.id.clone()).collect();
    assert_eq!(window_ids, tail_ids);
}

#[tokio::test]
async fn test_recent_excluding_skips_given_message() {
    let (_dir, repo) = test_repo().await;

    for i in 0..3 {
        repo.append("conv-1", "user-1", &format!("prior {}", i), "text", None)
            .await
            .expect("Failed to append");
    }
    let newest = repo
        .append("conv-1", "user-1", "@gpt question", "text", None)
        .await
        .expect("Failed to append");

    let recent = repo
        .recent_excluding("conv-1", &newest.id, 5)
        .await
        .expect("Failed to query");

    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|m| m.id != newest.id));
    assert_eq!(recent[0].content, "prior 2");
    assert_eq!(recent[2].content, "prior 0");
}

#[tokio::test]
async fn test_recent_excluding_caps_at_limit() {
    let (_dir, repo) = test_repo().await;

    for i in 0..10 {
        repo.append("conv-1", "user-1", &format!("prior {}", i), "text", None)
            .await
            .expect("Failed to append");
    }
    let newest = repo
        .append("conv-1", "user-1", "@gpt question", "text", None)
        .await
        .expect("Failed to append");

    let recent = repo
        .recent_excluding("conv-1", &newest.id, 5)
        .await
        .expect("Failed to query");

    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].content, "prior 9");
    assert_eq!(recent[4].content, "prior 5");
}

#[tokio::test]
async fn test_delete_by_conversation_counts_and_clears() {
    let (_dir, repo) = test_repo().await;

    for i in 0..4 {
        repo.append("conv-1", "user-1", &format!("msg {}", i), "text", None)
            .await
            .expect("Failed to append");
    }
    repo.append("conv-2", "user-2", "keep me", "text", None)
        .await
        .expect("Failed to append");

    let deleted = repo
        .delete_by_conversation("conv-1")
        .await
        .expect("Failed to delete");
    assert_eq!(deleted, 4);

    let remaining = repo
        .list_by_conversation("conv-1", SortOrder::Asc, None)
        .await
        .expect("Failed to list");
    assert!(remaining.is_empty());

    let other = repo
        .list_by_conversation("conv-2", SortOrder::Asc, None)
        .await
        .expect("Failed to list");
    assert_eq!(other.len(), 1);

    // Idempotent: deleting again removes nothing.
    let deleted_again = repo
        .delete_by_conversation("conv-1")
        .await
        .expect("Failed to delete");
    assert_eq!(deleted_again, 0);
}
