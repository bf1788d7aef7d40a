use crate::data::post_repository::PostRepository;
use crate::domain::{DomainError, Posts};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Seed document compiled into the binary.
pub const BUNDLED_POSTS_JSON: &str = include_str!("../../data/posts.json");

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse seed data from {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },

    #[error("Failed to store seed data: {0}")]
    Store(#[from] DomainError),
}

#[derive(Debug, Clone)]
pub enum SeedSource {
    Bundled,
    File(PathBuf),
}

impl SeedSource {
    pub fn from_path(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Bundled,
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Bundled => "bundled data/posts.json".to_string(),
            Self::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<Posts, SeedError> {
        let raw = match self {
            Self::Bundled => BUNDLED_POSTS_JSON.to_string(),
            Self::File(path) => std::fs::read_to_string(path).map_err(|source| SeedError::Read {
                path: path.clone(),
                source,
            })?,
        };

        serde_json::from_str(&raw).map_err(|source| SeedError::Parse {
            origin: self.describe(),
            source,
        })
    }
}

pub struct DataLoader {
    post_repo: Arc<dyn PostRepository + Send + Sync>,
    source: SeedSource,
}

impl DataLoader {
    pub fn new(post_repo: Arc<dyn PostRepository + Send + Sync>, source: SeedSource) -> Self {
        Self { post_repo, source }
    }

    /// Seeds an empty table and returns how many posts were inserted. A table that
    /// already holds rows is left untouched.
    pub async fn run(&self) -> Result<usize, SeedError> {
        let existing = self.post_repo.count().await?;
        if existing > 0 {
            tracing::info!("Skipping seed: {} posts already stored", existing);
            return Ok(0);
        }

        tracing::info!(
            "Loading posts into database from JSON: {}",
            self.source.describe()
        );

        let document = self.source.read()?;
        let saved = self.post_repo.save_all(document.posts).await?;

        tracing::info!("Seeded {} posts", saved.len());
        Ok(saved.len())
    }
}
