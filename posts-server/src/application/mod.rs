pub mod data_loader;
pub mod post_service;

pub use data_loader::{DataLoader, SeedError, SeedSource};
pub use post_service::PostService;
