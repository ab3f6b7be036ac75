//! Application configuration for Vitae.
//!
//! Config lives at `./vitae.toml` or `~/.vitae/vitae.toml`.
//! CLI flags override config file values, which override defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VitaeError};
use crate::types::ContentKind;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "vitae.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".vitae";

// ---------------------------------------------------------------------------
// Config structs (matching vitae.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VitaeConfig {
    /// Where content modules live and which files count as modules.
    #[serde(default)]
    pub content: ContentConfig,

    /// Template/scaffold ids never published.
    #[serde(default)]
    pub placeholders: PlaceholderConfig,

    /// JSON hand-off settings.
    #[serde(default)]
    pub export: ExportConfig,
}

/// `[content]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Content root; each kind reads `<root>/<kind dir>/`.
    #[serde(default = "default_content_root")]
    pub root: PathBuf,

    /// Glob patterns (relative to a kind directory) selecting module files.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,

    /// Glob patterns excluded on top of the built-in excludes.
    #[serde(default)]
    pub exclude_globs: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            root: default_content_root(),
            include_globs: default_include_globs(),
            exclude_globs: Vec::new(),
        }
    }
}

fn default_content_root() -> PathBuf {
    PathBuf::from("content")
}
fn default_include_globs() -> Vec<String> {
    vec!["**/*.toml".into()]
}

/// `[placeholders]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    /// Ids excluded from every kind.
    #[serde(default = "default_placeholder_ids")]
    pub ids: Vec<String>,

    /// Extra ids per kind, keyed by kind directory name (e.g. `publications`).
    #[serde(default)]
    pub kinds: BTreeMap<String, Vec<String>>,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            ids: default_placeholder_ids(),
            kinds: BTreeMap::new(),
        }
    }
}

fn default_placeholder_ids() -> Vec<String> {
    vec!["template".into(), "_template".into(), "example".into()]
}

impl PlaceholderConfig {
    /// Global ids plus any configured for `kind`.
    pub fn ids_for(&self, kind: ContentKind) -> Vec<String> {
        let mut ids = self.ids.clone();
        if let Some(extra) = self.kinds.get(kind.dir_name()) {
            ids.extend(extra.iter().cloned());
        }
        ids
    }
}

/// `[export]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Directory receiving `<kind>.json` and `manifest.json`.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    /// Pretty-print JSON output.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            pretty: true,
        }
    }
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("dist/data")
}
fn default_true() -> bool {
    true
}

impl VitaeConfig {
    /// Reject configs that cannot drive a build.
    pub fn validate(&self) -> Result<()> {
        if self.content.include_globs.is_empty() {
            return Err(VitaeError::config(
                "content.include_globs must list at least one pattern",
            ));
        }
        for key in self.placeholders.kinds.keys() {
            if !ContentKind::ALL.iter().any(|k| k.dir_name() == key) {
                return Err(VitaeError::config(format!(
                    "placeholders.kinds.{key} does not name a content kind"
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.vitae/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| VitaeError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the user config file (`~/.vitae/vitae.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the config: `./vitae.toml`, then the user config, then defaults.
pub fn load_config() -> Result<VitaeConfig> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return load_config_from(&local);
    }

    let path = config_file_path()?;
    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(VitaeConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<VitaeConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| VitaeError::io(path, e))?;

    let config: VitaeConfig = toml::from_str(&content).map_err(|e| {
        VitaeError::config(format!("failed to parse {}: {e}", path.display()))
    })?;
    config.validate()?;
    tracing::debug!(?path, "loaded config");
    Ok(config)
}

/// Write a default config file at `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<PathBuf> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| VitaeError::io(dir, e))?;
    }

    let config = VitaeConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| VitaeError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| VitaeError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path.to_path_buf())
}

/// Create the user config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    init_config_at(&config_file_path()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = VitaeConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("include_globs"));
        assert!(toml_str.contains("template"));
    }

    #[test]
    fn config_roundtrip() {
        let config = VitaeConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: VitaeConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.content.root, PathBuf::from("content"));
        assert_eq!(parsed.placeholders.ids.len(), 3);
        assert!(parsed.export.pretty);
    }

    #[test]
    fn per_kind_placeholders_extend_global_ids() {
        let toml_str = r#"
[placeholders]
ids = ["template"]

[placeholders.kinds]
publications = ["publication-template"]
"#;
        let config: VitaeConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(
            config.placeholders.ids_for(ContentKind::Publication),
            vec!["template".to_string(), "publication-template".to_string()]
        );
        assert_eq!(
            config.placeholders.ids_for(ContentKind::Grant),
            vec!["template".to_string()]
        );
        config.validate().expect("valid config");
    }

    #[test]
    fn unknown_placeholder_kind_is_rejected() {
        let toml_str = r#"
[placeholders.kinds]
posters = ["poster-template"]
"#;
        let config: VitaeConfig = toml::from_str(toml_str).expect("parse");
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("posters"));
    }

    #[test]
    fn empty_include_globs_are_rejected() {
        let mut config = VitaeConfig::default();
        config.content.include_globs.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn init_then_load_from_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);
        init_config_at(&path).expect("init config");
        let loaded = load_config_from(&path).expect("load config");
        assert_eq!(loaded.export.out_dir, PathBuf::from("dist/data"));
    }
}
