use crate::domain::{DomainError, Post};
use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Post>, DomainError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, DomainError>;
    /// Lowest id wins when several posts share a title.
    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, DomainError>;
    /// `version: None` inserts a new row; `Some(v)` updates the row stored at version `v`.
    /// Anything else (id taken, row gone, stale version) is an `OptimisticLockConflict`.
    async fn save(&self, post: Post) -> Result<Post, DomainError>;
    async fn save_all(&self, posts: Vec<Post>) -> Result<Vec<Post>, DomainError>;
    async fn delete_by_id(&self, id: i32) -> Result<(), DomainError>;
    async fn count(&self) -> Result<i64, DomainError>;
}

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn post_from_row(row: &PgRow) -> Result<Post, DomainError> {
    Ok(Post {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        version: row.try_get("version")?,
    })
}

const INSERT_POST: &str = r#"
    INSERT INTO post (id, user_id, title, body, version)
    VALUES ($1, $2, $3, $4, 0)
    ON CONFLICT (id) DO NOTHING
    RETURNING id, user_id, title, body, version
"#;

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, title, body, version
            FROM post
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        rows.iter().map(post_from_row).collect()
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, body, version
            FROM post
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        row.as_ref().map(post_from_row).transpose()
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, title, body, version
            FROM post
            WHERE title = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(title)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        row.as_ref().map(post_from_row).transpose()
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        let row = match post.version {
            // A versioned post is always an update; a vanished row is a conflict, never a re-insert.
            Some(version) => sqlx::query(
                r#"
                UPDATE post
                SET
                    user_id = $2,
                    title = $3,
                    body = $4,
                    version = version + 1
                WHERE id = $1 AND version = $5
                RETURNING id, user_id, title, body, version
                "#,
            )
            .bind(post.id)
            .bind(post.user_id)
            .bind(&post.title)
            .bind(&post.body)
            .bind(version)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update post {}: {}", post.id, e);
                DomainError::DatabaseError(e.to_string())
            })?,
            None => sqlx::query(INSERT_POST)
                .bind(post.id)
                .bind(post.user_id)
                .bind(&post.title)
                .bind(&post.body)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to insert post {}: {}", post.id, e);
                    DomainError::DatabaseError(e.to_string())
                })?,
        };

        match row {
            Some(row) => post_from_row(&row),
            None => {
                tracing::warn!(
                    "Optimistic lock conflict on post {} (version {:?})",
                    post.id,
                    post.version
                );
                Err(DomainError::OptimisticLockConflict {
                    id: post.id,
                    version: post.version,
                })
            }
        }
    }

    async fn save_all(&self, posts: Vec<Post>) -> Result<Vec<Post>, DomainError> {
        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(posts.len());

        for post in posts {
            let row = sqlx::query(INSERT_POST)
                .bind(post.id)
                .bind(post.user_id)
                .bind(&post.title)
                .bind(&post.body)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to insert post {} in batch: {}", post.id, e);
                    DomainError::DatabaseError(e.to_string())
                })?;

            match row {
                Some(row) => saved.push(post_from_row(&row)?),
                None => {
                    return Err(DomainError::OptimisticLockConflict {
                        id: post.id,
                        version: post.version,
                    })
                }
            }
        }

        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM post
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            Err(DomainError::PostNotFound)
        } else {
            Ok(())
        }
    }

    async fn count(&self) -> Result<i64, DomainError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM post")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(row.try_get("count")?)
    }
}
