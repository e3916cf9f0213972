pub mod config;
pub mod error;
pub mod fragment;

pub use config::{ChunkStrategy, ChunkingConfig, OverlapGuard};
pub use error::*;
pub use fragment::*;
