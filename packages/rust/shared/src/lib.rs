//! Shared types, error model, and configuration for Vitae.
//!
//! Every other Vitae crate depends on this one for [`VitaeError`], the
//! content vocabulary ([`ContentKind`], [`ContentDate`], [`DatePoint`]) and
//! [`VitaeConfig`] loading.

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    ContentConfig, ExportConfig, PlaceholderConfig, VitaeConfig, config_dir, config_file_path,
    init_config, init_config_at, load_config, load_config_from,
};
pub use error::{Result, VitaeError};
pub use types::{ContentDate, ContentKind, DatePoint, is_url_safe_id};
