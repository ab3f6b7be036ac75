//! Content module parser.
//!
//! A content module is one TOML file. Its exports are read as:
//! - a root table carrying an `id` key is the **default export**;
//! - otherwise every top-level table is a **named export**
//!   (`[publication]`, `[talk]`, ...), scalar keys are ignored;
//! - an empty file exports nothing.

use vitae_shared::{Result, VitaeError};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The bindings a content module makes available to the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModuleExports {
    /// The whole-file record, when the file is a single record.
    pub default: Option<toml::Value>,
    /// Named tables, in file order.
    pub named: Vec<(String, toml::Value)>,
}

impl ModuleExports {
    /// A module whose default export is `value`.
    pub fn with_default(value: toml::Value) -> Self {
        Self {
            default: Some(value),
            named: Vec::new(),
        }
    }

    /// A module with only named exports.
    pub fn with_named(named: Vec<(String, toml::Value)>) -> Self {
        Self {
            default: None,
            named,
        }
    }

    /// All exports, default first, each with its binding name.
    pub fn candidates(&self) -> impl Iterator<Item = (&str, &toml::Value)> {
        self.default
            .iter()
            .map(|v| ("default", v))
            .chain(self.named.iter().map(|(name, v)| (name.as_str(), v)))
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.named.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse module source text. `path` is only used in error messages.
pub(crate) fn parse_module(path: &str, content: &str) -> Result<ModuleExports> {
    let table: toml::Table = content
        .parse()
        .map_err(|e: toml::de::Error| VitaeError::parse(path, e.message().to_string()))?;

    if table.is_empty() {
        return Ok(ModuleExports::default());
    }

    if table.contains_key("id") {
        return Ok(ModuleExports::with_default(toml::Value::Table(table)));
    }

    // toml::Table is a BTreeMap unless `preserve_order` is enabled; either
    // way the order is deterministic.
    let named = table
        .into_iter()
        .filter(|(_, v)| v.is_table())
        .collect();

    Ok(ModuleExports::with_named(named))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_table_with_id_is_default_export() {
        let exports = parse_module(
            "a.toml",
            r#"
id = "smith-2021"
title = "Ritual and Record"
date = 2021
"#,
        )
        .expect("parse");
        let default = exports.default.expect("default export");
        assert_eq!(default["id"].as_str(), Some("smith-2021"));
        assert!(exports.named.is_empty());
    }

    #[test]
    fn top_level_tables_are_named_exports() {
        let exports = parse_module(
            "b.toml",
            r#"
schema = 1

[talk]
id = "ias-2024"
title = "Fieldnotes"
"#,
        )
        .expect("parse");
        assert!(exports.default.is_none());
        assert_eq!(exports.named.len(), 1);
        assert_eq!(exports.named[0].0, "talk");
    }

    #[test]
    fn empty_file_exports_nothing() {
        let exports = parse_module("c.toml", "  \n# only a comment\n").expect("parse");
        assert!(exports.is_empty());
    }

    #[test]
    fn syntax_error_names_the_file() {
        let err = parse_module("broken.toml", "id = \"unterminated").unwrap_err();
        assert!(matches!(err, VitaeError::Parse { ref path, .. } if path == "broken.toml"));
    }

    #[test]
    fn candidates_list_default_before_named() {
        let mut exports = ModuleExports::with_default(toml::Value::Integer(1));
        exports
            .named
            .push(("extra".into(), toml::Value::Integer(2)));
        let names: Vec<_> = exports.candidates().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["default", "extra"]);
    }
}
