//! JSON hand-off consumed by the site templates.
//!
//! Writes one `<kind>.json` per content kind plus a `manifest.json`:
//!
//! ```text
//! <out_dir>/
//! ├── manifest.json
//! ├── publications.json
//! ├── grants.json
//! └── ...
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, instrument};
use vitae_shared::{ContentKind, Result, VitaeError};

use crate::aggregate;
use crate::catalog::{Catalog, Collection, RecordSummary};

/// Manifest file name inside the export directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Options for [`export_catalog`].
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Directory receiving the JSON files.
    pub out_dir: PathBuf,
    /// Pretty-print JSON.
    pub pretty: bool,
    /// Version string recorded in the manifest.
    pub tool_version: String,
}

/// `manifest.json` contents.
#[derive(Debug, Clone, Serialize)]
pub struct ExportManifest {
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub files: Vec<ExportedFile>,
}

/// One entry in the manifest.
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    pub kind: ContentKind,
    pub file: String,
    pub records: usize,
    /// SHA-256 of the file bytes, hex encoded.
    pub sha256: String,
}

/// Ids of one year's records, most recent first.
#[derive(Debug, Clone, Serialize)]
struct YearBucket {
    year: i32,
    ids: Vec<String>,
}

/// Body of `<kind>.json`.
#[derive(Debug, Serialize)]
struct KindDocument {
    kind: ContentKind,
    count: usize,
    records: serde_json::Value,
    by_year: Vec<YearBucket>,
    undated: Vec<String>,
}

/// Write every collection in `catalog` to `opts.out_dir`.
#[instrument(skip_all, fields(out_dir = %opts.out_dir.display()))]
pub fn export_catalog(catalog: &Catalog, opts: &ExportOptions) -> Result<ExportManifest> {
    std::fs::create_dir_all(&opts.out_dir).map_err(|e| VitaeError::io(&opts.out_dir, e))?;

    let mut files = Vec::with_capacity(ContentKind::ALL.len());
    for kind in ContentKind::ALL {
        let collection = catalog.collection(kind);
        let document = kind_document(collection)?;
        let file = format!("{}.json", kind.dir_name());
        let path = opts.out_dir.join(&file);
        let sha256 = write_json(&path, &document, opts.pretty)?;

        debug!(%kind, records = document.count, file = %file, "collection exported");
        files.push(ExportedFile {
            kind,
            file,
            records: document.count,
            sha256,
        });
    }

    let manifest = ExportManifest {
        tool_version: opts.tool_version.clone(),
        generated_at: Utc::now(),
        total_records: files.iter().map(|f| f.records).sum(),
        files,
    };
    write_json(&opts.out_dir.join(MANIFEST_FILE), &manifest, opts.pretty)?;

    info!(
        files = manifest.files.len(),
        records = manifest.total_records,
        "catalog exported"
    );
    Ok(manifest)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn kind_document(collection: &dyn Collection) -> Result<KindDocument> {
    let summaries = collection.summaries();
    let groups = aggregate::group_by_year(&summaries);

    let by_year = groups
        .years_desc()
        .map(|(year, records)| YearBucket {
            year,
            ids: ids(records),
        })
        .collect();

    Ok(KindDocument {
        kind: collection.kind(),
        count: collection.len(),
        records: collection
            .records_json()
            .map_err(|e| VitaeError::Export(e.to_string()))?,
        by_year,
        undated: ids(groups.undated()),
    })
}

fn ids(records: &[RecordSummary]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

/// Serialize `value` to `path`, returning the SHA-256 of the bytes written.
fn write_json<T: Serialize>(path: &Path, value: &T, pretty: bool) -> Result<String> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(value)
    } else {
        serde_json::to_vec(value)
    }
    .map_err(|e| VitaeError::Export(format!("{}: {e}", path.display())))?;

    std::fs::write(path, &bytes).map_err(|e| VitaeError::io(path, e))?;
    Ok(format!("{:x}", Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use vitae_discovery::ModuleSet;
    use vitae_shared::PlaceholderConfig;

    fn catalog() -> Catalog {
        let mut grants = ModuleSet::new();
        for (path, src) in [
            (
                "grants/old.toml",
                "id = \"old\"\ntitle = \"Old\"\nperiod = { start = \"2018-10-01\", end = 2020 }\n",
            ),
            (
                "grants/open.toml",
                "id = \"open\"\ntitle = \"Open\"\nperiod = { start = \"2026-01-01\" }\n",
            ),
            (
                "grants/vague.toml",
                "id = \"vague\"\ntitle = \"Vague\"\nperiod = \"one day\"\n",
            ),
        ] {
            grants.push_source(path, src).expect("valid toml");
        }
        let mut modules = BTreeMap::new();
        modules.insert(ContentKind::Grant, grants);
        Catalog::from_modules(modules, &PlaceholderConfig::default()).expect("catalog")
    }

    fn options(dir: &Path) -> ExportOptions {
        ExportOptions {
            out_dir: dir.join("data"),
            pretty: true,
            tool_version: "0.0.0-test".into(),
        }
    }

    #[test]
    fn writes_one_file_per_kind_and_a_manifest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = options(dir.path());
        let manifest = export_catalog(&catalog(), &opts).expect("export");

        assert_eq!(manifest.files.len(), ContentKind::ALL.len());
        assert_eq!(manifest.total_records, 3);
        for file in &manifest.files {
            assert!(opts.out_dir.join(&file.file).exists(), "{}", file.file);
            assert_eq!(file.sha256.len(), 64);
        }
        assert!(opts.out_dir.join(MANIFEST_FILE).exists());
    }

    #[test]
    fn kind_document_carries_sorted_records_and_year_buckets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = options(dir.path());
        export_catalog(&catalog(), &opts).expect("export");

        let raw = std::fs::read_to_string(opts.out_dir.join("grants.json")).expect("read");
        let doc: serde_json::Value = serde_json::from_str(&raw).expect("json");

        assert_eq!(doc["kind"], "grant");
        assert_eq!(doc["count"], 3);
        let order: Vec<_> = doc["records"]
            .as_array()
            .expect("records array")
            .iter()
            .map(|r| r["id"].as_str().expect("id"))
            .collect();
        assert_eq!(order, vec!["open", "old", "vague"]);
        assert_eq!(doc["records"][0]["period"]["kind"], "range");
        assert_eq!(doc["by_year"][0]["year"], 2026);
        assert_eq!(doc["by_year"][1]["ids"][0], "old");
        assert_eq!(doc["undated"][0], "vague");
    }

    #[test]
    fn manifest_hash_matches_file_bytes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let opts = options(dir.path());
        let manifest = export_catalog(&catalog(), &opts).expect("export");

        let grants = manifest
            .files
            .iter()
            .find(|f| f.kind == ContentKind::Grant)
            .expect("grants entry");
        let bytes = std::fs::read(opts.out_dir.join(&grants.file)).expect("read");
        assert_eq!(grants.sha256, format!("{:x}", Sha256::digest(&bytes)));
    }
}
