pub mod post_repository;

#[cfg(test)]
pub mod in_memory;

pub use post_repository::{PostRepository, PostgresPostRepository};
