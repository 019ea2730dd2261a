//! PostgreSQL token repository tests. Need `DATABASE_URL`; run with
//! `cargo test -- --ignored`.

use sqlx::PgPool;
use std::sync::Arc;
use shorturl::AppError;
use shorturl::domain::repositories::TokenRepository;
use shorturl::infrastructure::persistence::PgTokenRepository;

#[sqlx::test]
#[ignore]
async fn test_create_token(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token("ci-bot", "hash123").await.unwrap();

    assert_eq!(token.name, "ci-bot");
    assert_eq!(token.token_hash, "hash123");
    assert!(token.revoked_at.is_none());
    assert!(token.last_used_at.is_none());
}

#[sqlx::test]
#[ignore]
async fn test_duplicate_name_is_conflict(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("ci-bot", "hash1").await.unwrap();
    let err = repo.create_token("ci-bot", "hash2").await.unwrap_err();

    assert!(matches!(err, AppError::Conflict { .. }));
}

#[sqlx::test]
#[ignore]
async fn test_find_active_owner(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("alice", "alicehash").await.unwrap();

    assert_eq!(
        repo.find_active_owner("alicehash").await.unwrap().as_deref(),
        Some("alice")
    );
    assert!(repo.find_active_owner("unknown").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore]
async fn test_revoked_token_has_no_owner(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token("revoked", "revokedhash").await.unwrap();
    repo.revoke_token(token.id).await.unwrap();

    assert!(repo.find_active_owner("revokedhash").await.unwrap().is_none());

    let err = repo.revoke_token(token.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[sqlx::test]
#[ignore]
async fn test_update_last_used(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    let token = repo.create_token("used", "usedhash").await.unwrap();
    repo.update_last_used("usedhash").await.unwrap();

    let reloaded = repo.find_by_id(token.id).await.unwrap().unwrap();
    assert!(reloaded.last_used_at.is_some());
}

#[sqlx::test]
#[ignore]
async fn test_list_and_lookup(pool: PgPool) {
    let repo = PgTokenRepository::new(Arc::new(pool));

    repo.create_token("first", "h1").await.unwrap();
    repo.create_token("second", "h2").await.unwrap();

    let names: Vec<_> = repo
        .list_tokens()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, ["first", "second"]);

    assert!(repo.find_by_name("second").await.unwrap().is_some());
    assert!(repo.find_by_name("third").await.unwrap().is_none());
}
