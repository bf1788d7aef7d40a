use crate::data::post_repository::PostRepository;
use crate::domain::{DomainError, Post, PostRequest};
use std::sync::Arc;

pub struct PostService {
    post_repo: Arc<dyn PostRepository + Send + Sync>,
}

fn require_text(value: Option<&str>, field: &str) -> Result<(), DomainError> {
    match value {
        Some(text) if !text.is_empty() => Ok(()),
        _ => Err(DomainError::ValidationError(format!(
            "{} must not be empty",
            field
        ))),
    }
}

fn validate(req: &PostRequest) -> Result<(), DomainError> {
    require_text(req.title.as_deref(), "title")?;
    require_text(req.body.as_deref(), "body")
}

impl PostService {
    pub fn new(post_repo: Arc<dyn PostRepository + Send + Sync>) -> Self {
        Self { post_repo }
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.post_repo.find_all().await
    }

    pub async fn get_post(&self, id: i32) -> Result<Post, DomainError> {
        self.post_repo
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound)
    }

    pub async fn create_post(&self, req: PostRequest) -> Result<Post, DomainError> {
        validate(&req)?;

        let id = req
            .id
            .ok_or_else(|| DomainError::ValidationError("id must be provided".to_string()))?;
        let user_id = req
            .user_id
            .ok_or_else(|| DomainError::ValidationError("userId must be provided".to_string()))?;

        let post = Post {
            id,
            user_id,
            title: req.title.unwrap_or_default(),
            body: req.body.unwrap_or_default(),
            version: req.version,
        };

        let post = self.post_repo.save(post).await?;

        tracing::info!("Post created: id={}, user_id={}", post.id, post.user_id);

        Ok(post)
    }

    /// Keeps the stored id, user and version; the incoming title is written to
    /// both title and body.
    pub async fn update_post(&self, id: i32, req: PostRequest) -> Result<Post, DomainError> {
        validate(&req)?;

        let existing = self.get_post(id).await?;
        let title = req.title.unwrap_or_default();

        let updated = Post {
            id: existing.id,
            user_id: existing.user_id,
            body: title.clone(),
            title,
            version: existing.version,
        };

        let post = self.post_repo.save(updated).await?;

        tracing::info!("Post updated: id={}, version={:?}", post.id, post.version);

        Ok(post)
    }

    pub async fn delete_post(&self, id: i32) -> Result<(), DomainError> {
        self.get_post(id).await?;

        self.post_repo.delete_by_id(id).await?;

        tracing::info!("Post deleted: id={}", id);

        Ok(())
    }
}
