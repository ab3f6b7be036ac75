//! Content module discovery.
//!
//! Walks a content directory, keeps the files matching the include globs,
//! and parses each one into its [`ModuleExports`]. The result is a
//! [`ModuleSet`] in sorted path order, ready for the loader.

mod parser;

use std::path::Path;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, info, instrument};
use vitae_shared::{Result, VitaeError};
use walkdir::WalkDir;

pub use parser::ModuleExports;

/// Excluded regardless of configuration.
const DEFAULT_EXCLUDES: &[&str] = &["**/.git/**", "**/target/**", "**/node_modules/**"];

// ---------------------------------------------------------------------------
// ModuleSet
// ---------------------------------------------------------------------------

/// Discovered modules keyed by their path relative to the walked root.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleSet {
    modules: Vec<(String, ModuleExports)>,
}

impl ModuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a module. Discovery order is insertion order.
    pub fn push(&mut self, path: impl Into<String>, exports: ModuleExports) {
        self.modules.push((path.into(), exports));
    }

    /// Parse `content` as a module and append it.
    pub fn push_source(&mut self, path: impl Into<String>, content: &str) -> Result<()> {
        let path = path.into();
        let exports = parser::parse_module(&path, content)?;
        self.push(path, exports);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModuleExports)> {
        self.modules.iter().map(|(p, e)| (p.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl<P: Into<String>> FromIterator<(P, ModuleExports)> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = (P, ModuleExports)>>(iter: I) -> Self {
        Self {
            modules: iter.into_iter().map(|(p, e)| (p.into(), e)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Discovery options
// ---------------------------------------------------------------------------

/// File selection for the discovery walk.
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Patterns a relative path must match to be a module.
    pub include_globs: Vec<String>,
    /// Patterns excluded on top of [`DEFAULT_EXCLUDES`].
    pub exclude_globs: Vec<String>,
    /// Follow symlinks while walking.
    pub follow_symlinks: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            include_globs: vec!["**/*.toml".into()],
            exclude_globs: Vec::new(),
            follow_symlinks: false,
        }
    }
}

impl From<&vitae_shared::ContentConfig> for DiscoveryOptions {
    fn from(config: &vitae_shared::ContentConfig) -> Self {
        Self {
            include_globs: config.include_globs.clone(),
            exclude_globs: config.exclude_globs.clone(),
            follow_symlinks: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Main entry point
// ---------------------------------------------------------------------------

/// Discover and parse every content module under `root`.
///
/// Paths in the returned set are relative to `root`, `/`-separated, and
/// sorted, so repeated runs over the same tree agree.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn discover(root: &Path, opts: &DiscoveryOptions) -> Result<ModuleSet> {
    if !root.is_dir() {
        return Err(VitaeError::Discovery(format!(
            "content directory does not exist: {}",
            root.display()
        )));
    }

    let include_set = build_globset(&opts.include_globs)?;
    let mut excludes: Vec<String> = DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect();
    excludes.extend(opts.exclude_globs.iter().cloned());
    let exclude_set = build_globset(&excludes)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(opts.follow_symlinks) {
        let entry = entry.map_err(|e| VitaeError::Discovery(e.to_string()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(root).unwrap_or(path);
        let rel_str = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if exclude_set.is_match(&rel_str) || !include_set.is_match(&rel_str) {
            continue;
        }
        files.push((rel_str, path.to_path_buf()));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));

    let mut modules = ModuleSet::new();
    for (rel, path) in files {
        let content = std::fs::read_to_string(&path).map_err(|e| VitaeError::io(&path, e))?;
        let exports = parser::parse_module(&rel, &content)?;
        debug!(module = %rel, named = exports.named.len(), "module parsed");
        modules.push(rel, exports);
    }

    info!(modules = modules.len(), "content modules discovered");
    Ok(modules)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| VitaeError::Discovery(format!("invalid glob '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| VitaeError::Discovery(e.to_string()))
}
