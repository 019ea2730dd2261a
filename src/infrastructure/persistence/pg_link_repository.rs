//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for link storage and retrieval.
///
/// The `links_code_key` unique constraint is the final arbiter of code
/// uniqueness; concurrent inserts of the same code fail with
/// [`AppError::Conflict`] for all but one caller.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn is_code_available(&self, code: &str) -> Result<bool, AppError> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM links
                WHERE code = $1
                  AND (expires_at IS NULL OR expires_at > NOW())
            )
            "#,
        )
        .bind(code)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(!taken)
    }

    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError> {
        let mut tx = self.pool.begin().await?;

        let reclaimed = sqlx::query(
            r#"
            DELETE FROM links
            WHERE code = $1
              AND expires_at IS NOT NULL
              AND expires_at <= NOW()
            "#,
        )
        .bind(&new_link.code)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if reclaimed > 0 {
            tracing::debug!(code = %new_link.code, "Reclaimed expired code before insert");
        }

        let link: Link = sqlx::query_as(
            r#"
            INSERT INTO links (code, original_url, is_custom, expires_at, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, code, original_url, is_custom, expires_at, created_by, created_at
            "#,
        )
        .bind(&new_link.code)
        .bind(&new_link.original_url)
        .bind(new_link.is_custom)
        .bind(new_link.expires_at)
        .bind(&new_link.created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(link)
    }

    async fn get_by_code(&self, code: &str) -> Result<Link, AppError> {
        sqlx::query_as::<_, Link>(
            r#"
            SELECT id, code, original_url, is_custom, expires_at, created_by, created_at
            FROM links
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(self.pool.as_ref())
        .await?
        .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    async fn list_by_owner(
        &self,
        owner: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Link>, AppError> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, code, original_url, is_custom, expires_at, created_by, created_at
            FROM links
            WHERE created_by = $1
            ORDER BY created_at ASC, id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(links)
    }

    async fn delete_by_id(&self, id: i64, owner: &str) -> Result<(), AppError> {
        let deleted = sqlx::query("DELETE FROM links WHERE id = $1 AND created_by = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if deleted == 0 {
            return Err(AppError::not_found(
                "Link not found",
                json!({ "id": id }),
            ));
        }

        Ok(())
    }

    async fn sweep_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query(
            "DELETE FROM links WHERE expires_at IS NOT NULL AND expires_at <= NOW()",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await?;

        Ok(())
    }
}
