//! PostgreSQL link repository tests. Need `DATABASE_URL`; run with
//! `cargo test -- --ignored`.

use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use shorturl::AppError;
use shorturl::domain::entities::NewLink;
use shorturl::domain::repositories::LinkRepository;
use shorturl::infrastructure::persistence::PgLinkRepository;

fn new_link(code: &str, owner: Option<&str>) -> NewLink {
    NewLink {
        code: code.to_string(),
        original_url: "https://example.com".to_string(),
        is_custom: false,
        expires_at: None,
        created_by: owner.map(str::to_string),
    }
}

async fn insert_expired(pool: &PgPool, code: &str) {
    sqlx::query(
        "INSERT INTO links (code, original_url, expires_at) VALUES ($1, $2, NOW() - INTERVAL '1 hour')",
    )
    .bind(code)
    .bind("https://expired.example.com")
    .execute(pool)
    .await
    .unwrap();
}

#[sqlx::test]
#[ignore]
async fn test_insert_and_get(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.insert(new_link("abc123", Some("alice"))).await.unwrap();
    assert!(link.id > 0);
    assert_eq!(link.created_by.as_deref(), Some("alice"));

    let fetched = repo.get_by_code("abc123").await.unwrap();
    assert_eq!(fetched, link);
}

#[sqlx::test]
#[ignore]
async fn test_get_missing_is_not_found(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let err = repo.get_by_code("zzzz").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[sqlx::test]
#[ignore]
async fn test_duplicate_code_is_conflict(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(new_link("dup123", None)).await.unwrap();
    let err = repo.insert(new_link("dup123", None)).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore]
async fn test_codes_are_case_sensitive(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    repo.insert(new_link("AbCd12", None)).await.unwrap();
    repo.insert(new_link("abcd12", None)).await.unwrap();

    assert!(!repo.is_code_available("AbCd12").await.unwrap());
    assert!(repo.is_code_available("ABCD12").await.unwrap());
}

#[sqlx::test]
#[ignore]
async fn test_expired_code_is_available_and_reclaimed(pool: PgPool) {
    insert_expired(&pool, "old123").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    assert!(repo.is_code_available("old123").await.unwrap());
    // Grace period: still resolvable until reclaimed or swept.
    assert!(repo.get_by_code("old123").await.is_ok());

    let link = repo.insert(new_link("old123", None)).await.unwrap();
    assert_eq!(link.original_url, "https://example.com");
    assert!(link.expires_at.is_none());
}

#[sqlx::test]
#[ignore]
async fn test_sweep_removes_only_expired(pool: PgPool) {
    insert_expired(&pool, "gone01").await;
    insert_expired(&pool, "gone02").await;
    let repo = PgLinkRepository::new(Arc::new(pool));

    let mut live = new_link("live01", None);
    live.expires_at = Some(Utc::now() + Duration::hours(1));
    repo.insert(live).await.unwrap();
    repo.insert(new_link("perm01", None)).await.unwrap();

    assert_eq!(repo.sweep_expired().await.unwrap(), 2);
    assert!(repo.get_by_code("gone01").await.is_err());
    assert!(repo.get_by_code("live01").await.is_ok());
    assert!(repo.get_by_code("perm01").await.is_ok());
    assert_eq!(repo.sweep_expired().await.unwrap(), 0);
}

#[sqlx::test]
#[ignore]
async fn test_list_by_owner_in_creation_order(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    for code in ["own001", "own002", "own003"] {
        repo.insert(new_link(code, Some("alice"))).await.unwrap();
    }
    repo.insert(new_link("other1", Some("bob"))).await.unwrap();

    let first = repo.list_by_owner("alice", 2, 0).await.unwrap();
    let rest = repo.list_by_owner("alice", 2, 2).await.unwrap();

    let codes: Vec<_> = first.iter().chain(&rest).map(|l| l.code.as_str()).collect();
    assert_eq!(codes, ["own001", "own002", "own003"]);
}

#[sqlx::test]
#[ignore]
async fn test_delete_is_owner_scoped(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));

    let link = repo.insert(new_link("del001", Some("alice"))).await.unwrap();

    let err = repo.delete_by_id(link.id, "bob").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));

    repo.delete_by_id(link.id, "alice").await.unwrap();
    assert!(repo.get_by_code("del001").await.is_err());
}

#[sqlx::test]
#[ignore]
async fn test_ping(pool: PgPool) {
    let repo = PgLinkRepository::new(Arc::new(pool));
    assert!(repo.ping().await.is_ok());
}
