//! Configuration management for desk-fences
//!
//! - **settings**: the `GlobalSettings` record and its tolerant on-disk parsing
//! - **store**: `ConfigStore`, the single owner of `options.json`

pub mod settings;
pub mod store;

// Re-export commonly used types
pub use settings::{GlobalSettings, LaunchEffect};
pub use store::{install_dir, ConfigStore};
