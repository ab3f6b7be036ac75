//! The full set of published collections, built once per run.
//!
//! [`Catalog::build`] discovers, loads, and sorts every content kind and
//! returns an owned value; there is no global state to initialize.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use tracing::{info, instrument, warn};
use vitae_discovery::{DiscoveryOptions, ModuleSet};
use vitae_shared::{
    ContentDate, ContentKind, PlaceholderConfig, Result, VitaeConfig, VitaeError,
};

use crate::aggregate::{self, Dated};
use crate::loader::{self, PlaceholderIds};
use crate::records::{
    Activity, Appointment, Award, Communication, ContentRecord, DhProject, Education,
    EditorialMembership, Fieldwork, Grant, Language, MediaAppearance, PeerReview, Publication,
    ResearchRole, TeachingExperience,
};

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for reporting build status.
pub trait ProgressReporter {
    /// Called before a kind's modules are discovered.
    fn kind_started(&self, kind: ContentKind);
    /// Called once a kind is loaded and sorted.
    fn kind_loaded(&self, kind: ContentKind, records: usize);
    /// Called when every kind has loaded.
    fn done(&self, catalog: &Catalog);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn kind_started(&self, _kind: ContentKind) {}
    fn kind_loaded(&self, _kind: ContentKind, _records: usize) {}
    fn done(&self, _catalog: &Catalog) {}
}

// ---------------------------------------------------------------------------
// Collection view
// ---------------------------------------------------------------------------

/// The fields every kind shares, for listings that do not care about kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub id: String,
    pub title: String,
    pub date: ContentDate,
}

impl Dated for RecordSummary {
    fn date(&self) -> &ContentDate {
        &self.date
    }
}

/// Kind-erased access to one loaded collection.
pub trait Collection {
    fn kind(&self) -> ContentKind;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Id, title, and date of each record, in collection order.
    fn summaries(&self) -> Vec<RecordSummary>;
    /// Full records as JSON, in collection order.
    fn records_json(&self) -> serde_json::Result<serde_json::Value>;
}

impl<T: ContentRecord> Collection for Vec<T> {
    fn kind(&self) -> ContentKind {
        T::KIND
    }

    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn summaries(&self) -> Vec<RecordSummary> {
        self.iter()
            .map(|r| RecordSummary {
                id: r.id().to_string(),
                title: r.title().to_string(),
                date: r.date().clone(),
            })
            .collect()
    }

    fn records_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Every published collection, each sorted most recent first.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    publications: Vec<Publication>,
    communications: Vec<Communication>,
    activities: Vec<Activity>,
    grants: Vec<Grant>,
    awards: Vec<Award>,
    appointments: Vec<Appointment>,
    education: Vec<Education>,
    fieldwork: Vec<Fieldwork>,
    media: Vec<MediaAppearance>,
    peer_reviews: Vec<PeerReview>,
    editorial: Vec<EditorialMembership>,
    languages: Vec<Language>,
    research_roles: Vec<ResearchRole>,
    teaching: Vec<TeachingExperience>,
    dh_projects: Vec<DhProject>,
}

impl Catalog {
    /// Discover and load every kind under `config.content.root`.
    ///
    /// The content root must exist. A kind whose directory is missing is
    /// empty. The first authoring error aborts the build.
    #[instrument(skip_all, fields(root = %config.content.root.display()))]
    pub fn build(config: &VitaeConfig, progress: &dyn ProgressReporter) -> Result<Self> {
        config.validate()?;
        let root = config.content.root.as_path();
        if !root.is_dir() {
            return Err(VitaeError::Discovery(format!(
                "content root does not exist: {}",
                root.display()
            )));
        }

        let start = Instant::now();
        let opts = DiscoveryOptions::from(&config.content);

        let catalog = Self::assemble(
            |kind| discover_kind(root, kind, &opts),
            &config.placeholders,
            progress,
        )?;

        info!(
            records = catalog.total(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "catalog built"
        );
        Ok(catalog)
    }

    /// Build from already-discovered modules. Kinds absent from the map are
    /// empty.
    pub fn from_modules(
        mut modules: BTreeMap<ContentKind, ModuleSet>,
        placeholders: &PlaceholderConfig,
    ) -> Result<Self> {
        Self::assemble(
            |kind| Ok(modules.remove(&kind).unwrap_or_default()),
            placeholders,
            &SilentProgress,
        )
    }

    fn assemble<F>(
        mut source: F,
        placeholders: &PlaceholderConfig,
        progress: &dyn ProgressReporter,
    ) -> Result<Self>
    where
        F: FnMut(ContentKind) -> Result<ModuleSet>,
    {
        let catalog = Self {
            publications: load_sorted(&mut source, placeholders, progress)?,
            communications: load_sorted(&mut source, placeholders, progress)?,
            activities: load_sorted(&mut source, placeholders, progress)?,
            grants: load_sorted(&mut source, placeholders, progress)?,
            awards: load_sorted(&mut source, placeholders, progress)?,
            appointments: load_sorted(&mut source, placeholders, progress)?,
            education: load_sorted(&mut source, placeholders, progress)?,
            fieldwork: load_sorted(&mut source, placeholders, progress)?,
            media: load_sorted(&mut source, placeholders, progress)?,
            peer_reviews: load_sorted(&mut source, placeholders, progress)?,
            editorial: load_sorted(&mut source, placeholders, progress)?,
            languages: load_sorted(&mut source, placeholders, progress)?,
            research_roles: load_sorted(&mut source, placeholders, progress)?,
            teaching: load_sorted(&mut source, placeholders, progress)?,
            dh_projects: load_sorted(&mut source, placeholders, progress)?,
        };
        progress.done(&catalog);
        Ok(catalog)
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }
    pub fn communications(&self) -> &[Communication] {
        &self.communications
    }
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }
    pub fn grants(&self) -> &[Grant] {
        &self.grants
    }
    pub fn awards(&self) -> &[Award] {
        &self.awards
    }
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }
    pub fn education(&self) -> &[Education] {
        &self.education
    }
    pub fn fieldwork(&self) -> &[Fieldwork] {
        &self.fieldwork
    }
    pub fn media(&self) -> &[MediaAppearance] {
        &self.media
    }
    pub fn peer_reviews(&self) -> &[PeerReview] {
        &self.peer_reviews
    }
    pub fn editorial(&self) -> &[EditorialMembership] {
        &self.editorial
    }
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }
    pub fn research_roles(&self) -> &[ResearchRole] {
        &self.research_roles
    }
    pub fn teaching(&self) -> &[TeachingExperience] {
        &self.teaching
    }
    pub fn dh_projects(&self) -> &[DhProject] {
        &self.dh_projects
    }

    /// The collection for `kind`, kind-erased.
    pub fn collection(&self, kind: ContentKind) -> &dyn Collection {
        match kind {
            ContentKind::Publication => &self.publications,
            ContentKind::Communication => &self.communications,
            ContentKind::Activity => &self.activities,
            ContentKind::Grant => &self.grants,
            ContentKind::Award => &self.awards,
            ContentKind::Appointment => &self.appointments,
            ContentKind::Education => &self.education,
            ContentKind::Fieldwork => &self.fieldwork,
            ContentKind::MediaAppearance => &self.media,
            ContentKind::PeerReview => &self.peer_reviews,
            ContentKind::EditorialMembership => &self.editorial,
            ContentKind::Language => &self.languages,
            ContentKind::ResearchRole => &self.research_roles,
            ContentKind::TeachingExperience => &self.teaching,
            ContentKind::DhProject => &self.dh_projects,
        }
    }

    /// Record count per kind, in [`ContentKind::ALL`] order.
    pub fn summary(&self) -> Vec<(ContentKind, usize)> {
        ContentKind::ALL
            .into_iter()
            .map(|kind| (kind, self.collection(kind).len()))
            .collect()
    }

    /// Records across every kind.
    pub fn total(&self) -> usize {
        self.summary().iter().map(|(_, n)| n).sum()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_sorted<T, F>(
    source: &mut F,
    placeholders: &PlaceholderConfig,
    progress: &dyn ProgressReporter,
) -> Result<Vec<T>>
where
    T: ContentRecord,
    F: FnMut(ContentKind) -> Result<ModuleSet>,
{
    let kind = T::KIND;
    progress.kind_started(kind);

    let modules = source(kind)?;
    let ids: PlaceholderIds = placeholders.ids_for(kind).into();
    let records: Vec<T> = loader::load(&modules, &ids, kind.label())?;
    let sorted = aggregate::sort_by_date(&records);

    progress.kind_loaded(kind, sorted.len());
    Ok(sorted)
}

fn discover_kind(root: &Path, kind: ContentKind, opts: &DiscoveryOptions) -> Result<ModuleSet> {
    let dir = root.join(kind.dir_name());
    if !dir.is_dir() {
        warn!(kind = %kind, dir = %dir.display(), "no content directory, collection is empty");
        return Ok(ModuleSet::new());
    }

    // Paths are reported relative to the content root, not the kind dir.
    let found = vitae_discovery::discover(&dir, opts)?;
    Ok(found
        .iter()
        .map(|(path, exports)| (format!("{}/{path}", kind.dir_name()), exports.clone()))
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
