//! Turn discovered content modules into a validated collection of one kind.
//!
//! Every module must export exactly one record of the target kind. Missing or
//! malformed records are authoring errors and abort the load; placeholder
//! records are dropped quietly.

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info, instrument, warn};
use vitae_discovery::{ModuleExports, ModuleSet};
use vitae_shared::{ContentDate, Result, VitaeError, is_url_safe_id};

use crate::records::ContentRecord;

// ---------------------------------------------------------------------------
// PlaceholderIds
// ---------------------------------------------------------------------------

/// Ids reserved for authoring scaffolds. Never published.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderIds(BTreeSet<String>);

impl PlaceholderIds {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for PlaceholderIds {
    fn from(id: &str) -> Self {
        Self(BTreeSet::from([id.to_string()]))
    }
}

impl<S: Into<String>> FromIterator<S> for PlaceholderIds {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for PlaceholderIds {
    fn from(ids: Vec<String>) -> Self {
        ids.into_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// Loader
// ---------------------------------------------------------------------------

/// Load every module in `modules` as a `T`.
///
/// Output keeps discovery order; callers sort before display. `kind_label`
/// only appears in error messages.
#[instrument(
    skip_all,
    fields(kind = kind_label, modules = modules.len(), placeholders = placeholders.len())
)]
pub fn load<T: ContentRecord>(
    modules: &ModuleSet,
    placeholders: &PlaceholderIds,
    kind_label: &str,
) -> Result<Vec<T>> {
    let mut records: Vec<T> = Vec::with_capacity(modules.len());
    let mut seen: HashMap<String, &str> = HashMap::new();
    let mut skipped = 0usize;

    for (path, exports) in modules.iter() {
        let record: T = extract(path, exports, kind_label)?;

        if record.id().trim().is_empty() {
            return Err(VitaeError::load(kind_label, path, "record id is empty"));
        }

        if placeholders.contains(record.id()) {
            debug!(module = path, id = record.id(), "skipping placeholder record");
            skipped += 1;
            continue;
        }

        validate(&record, path, kind_label)?;

        if let Some(first) = seen.get(record.id()) {
            return Err(VitaeError::DuplicateId {
                kind: kind_label.to_string(),
                id: record.id().to_string(),
                first: first.to_string(),
                second: path.to_string(),
            });
        }

        if let ContentDate::Unparsed { raw } = record.date() {
            warn!(module = path, id = record.id(), raw = %raw, "unparseable date, record will sort last");
        }

        seen.insert(record.id().to_string(), path);
        records.push(record);
    }

    info!(loaded = records.len(), skipped, "records loaded");
    Ok(records)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Take the one export that deserializes as `T`.
fn extract<T: ContentRecord>(path: &str, exports: &ModuleExports, kind_label: &str) -> Result<T> {
    if exports.is_empty() {
        return Err(VitaeError::load(kind_label, path, "module exports nothing"));
    }

    let mut matches: Vec<(&str, T)> = Vec::new();
    let mut rejections: Vec<String> = Vec::new();

    for (name, value) in exports.candidates() {
        match value.clone().try_into::<T>() {
            Ok(record) => matches.push((name, record)),
            Err(e) => rejections.push(format!("{name}: {}", e.message().trim())),
        }
    }

    match matches.len() {
        0 => Err(VitaeError::load(
            kind_label,
            path,
            format!(
                "exports no usable {kind_label} record ({})",
                rejections.join("; ")
            ),
        )),
        1 => Ok(matches.remove(0).1),
        n => {
            let names: Vec<&str> = matches.iter().map(|(name, _)| *name).collect();
            Err(VitaeError::load(
                kind_label,
                path,
                format!(
                    "exports {n} {kind_label} records ({}), expected exactly one",
                    names.join(", ")
                ),
            ))
        }
    }
}

/// Shape checks shared by every kind.
fn validate<T: ContentRecord>(record: &T, path: &str, kind_label: &str) -> Result<()> {
    if !is_url_safe_id(record.id()) {
        return Err(VitaeError::load(
            kind_label,
            path,
            format!("record id '{}' is not URL-safe", record.id()),
        ));
    }
    if record.title().trim().is_empty() {
        return Err(VitaeError::load(
            kind_label,
            path,
            format!("record '{}' has an empty title", record.id()),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
