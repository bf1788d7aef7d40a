use crate::data::post_repository::PostRepository;
use crate::domain::{DomainError, Post};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// `PostRepository` over a `BTreeMap`, mirroring the version guard of the
/// Postgres implementation. Counts calls so tests can assert short-circuits.
#[derive(Default)]
pub struct InMemoryPostRepository {
    rows: Mutex<BTreeMap<i32, Post>>,
    saves: AtomicUsize,
    deletes: AtomicUsize,
}

impl InMemoryPostRepository {
    pub fn with_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        let repo = Self::default();
        {
            let mut rows = repo.rows.lock().unwrap();
            for post in posts {
                rows.insert(post.id, post);
            }
        }
        repo
    }

    pub fn save_calls(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn insert_or_update(rows: &mut BTreeMap<i32, Post>, post: Post) -> Result<Post, DomainError> {
        let conflict = DomainError::OptimisticLockConflict {
            id: post.id,
            version: post.version,
        };

        match (post.version, rows.get(&post.id)) {
            (None, None) => {
                let stored = Post {
                    version: Some(0),
                    ..post
                };
                rows.insert(stored.id, stored.clone());
                Ok(stored)
            }
            (Some(version), Some(existing)) if existing.version == Some(version) => {
                let stored = Post {
                    version: Some(version + 1),
                    ..post
                };
                rows.insert(stored.id, stored.clone());
                Ok(stored)
            }
            _ => Err(conflict),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all(&self) -> Result<Vec<Post>, DomainError> {
        Ok(self.rows.lock().unwrap().values().cloned().collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, DomainError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> Result<Option<Post>, DomainError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|post| post.title == title)
            .cloned())
    }

    async fn save(&self, post: Post) -> Result<Post, DomainError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Self::insert_or_update(&mut self.rows.lock().unwrap(), post)
    }

    async fn save_all(&self, posts: Vec<Post>) -> Result<Vec<Post>, DomainError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.rows.lock().unwrap();
        let mut staged = rows.clone();
        let mut saved = Vec::with_capacity(posts.len());
        for post in posts {
            if staged.contains_key(&post.id) {
                return Err(DomainError::OptimisticLockConflict {
                    id: post.id,
                    version: post.version,
                });
            }
            saved.push(Self::insert_or_update(&mut staged, post)?);
        }
        *rows = staged;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i32) -> Result<(), DomainError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        match self.rows.lock().unwrap().remove(&id) {
            Some(_) => Ok(()),
            None => Err(DomainError::PostNotFound),
        }
    }

    async fn count(&self) -> Result<i64, DomainError> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }
}
