//! Typed content records, one struct per content kind.
//!
//! Each struct is the explicit schema for its module files: unknown keys
//! are rejected, so a misspelled field fails the load instead of silently
//! disappearing from the site.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;
use vitae_shared::{ContentDate, ContentKind};

use crate::aggregate::Dated;

/// A record the loader can extract, validate, and publish.
pub trait ContentRecord: Dated + Serialize + DeserializeOwned + Clone + Debug {
    /// The collection this record belongs to.
    const KIND: ContentKind;

    /// Natural key, unique within the kind.
    fn id(&self) -> &str;

    /// Primary title or name.
    fn title(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Publications & communications
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicationType {
    Article,
    Chapter,
    Book,
    EditedVolume,
    Review,
    Report,
    Thesis,
    #[default]
    Other,
}

/// A published work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Publication {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default, rename = "type")]
    pub publication_type: PublicationType,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub date: ContentDate,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default, rename = "abstract")]
    pub summary: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommunicationKind {
    #[default]
    Talk,
    Keynote,
    Panel,
    Poster,
    Workshop,
    Seminar,
}

/// A talk, paper presentation, or poster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Communication {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub kind: CommunicationKind,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub date: ContentDate,
    #[serde(default)]
    pub invited: bool,
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default)]
    pub tags: Vec<String>,
}

// ---------------------------------------------------------------------------
// Service & recognition
// ---------------------------------------------------------------------------

/// Organizing, outreach, committee work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub date: ContentDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<Url>,
}

/// Research funding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Grant {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub funder: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub period: ContentDate,
    #[serde(default)]
    pub url: Option<Url>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Award {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub issuer: Option<String>,
    #[serde(default)]
    pub date: ContentDate,
    #[serde(default)]
    pub description: Option<String>,
}

/// Peer review carried out for a journal or press.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeerReview {
    pub id: String,
    /// Journal or press name.
    pub title: String,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub date: ContentDate,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Editorial board or committee membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EditorialMembership {
    pub id: String,
    /// Journal, series, or board name.
    pub title: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub period: ContentDate,
    #[serde(default)]
    pub url: Option<Url>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    Print,
    Radio,
    Television,
    Podcast,
    #[default]
    Web,
}

/// Press, radio, podcast, or other outreach appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MediaAppearance {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub outlet: Option<String>,
    #[serde(default)]
    pub medium: MediaKind,
    #[serde(default)]
    pub date: ContentDate,
    #[serde(default)]
    pub url: Option<Url>,
}

// ---------------------------------------------------------------------------
// Career
// ---------------------------------------------------------------------------

/// Employment or affiliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appointment {
    pub id: String,
    /// Position held.
    pub title: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub period: ContentDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub id: String,
    /// Degree or diploma.
    pub title: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub thesis: Option<String>,
    #[serde(default)]
    pub supervisors: Vec<String>,
    #[serde(default)]
    pub period: ContentDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResearchRole {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub period: ContentDate,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeachingExperience {
    pub id: String,
    /// Course title.
    pub title: String,
    #[serde(default)]
    pub institution: Option<String>,
    /// e.g. `undergraduate`, `graduate`, `summer school`.
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub period: ContentDate,
}

// ---------------------------------------------------------------------------
// Research
// ---------------------------------------------------------------------------

/// A fieldwork campaign or archival trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Fieldwork {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub date: ContentDate,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

/// A digital-humanities project (database, edition, tool, map).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DhProject {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub period: ContentDate,
    #[serde(default)]
    pub url: Option<Url>,
    #[serde(default)]
    pub repository: Option<Url>,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Proficiency {
    Native,
    Fluent,
    Advanced,
    #[default]
    Intermediate,
    Basic,
    Reading,
}

/// A spoken or read language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Language {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub proficiency: Proficiency,
    /// When study began, if worth showing.
    #[serde(default)]
    pub since: ContentDate,
}

// ---------------------------------------------------------------------------
// Trait impls
// ---------------------------------------------------------------------------

impl Dated for Publication {
    fn date(&self) -> &ContentDate {
        &self.date
    }
}
impl ContentRecord for Publication {
    const KIND: ContentKind = ContentKind::Publication;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Communication {
    fn date(&self) -> &ContentDate {
        &self.date
    }
}
impl ContentRecord for Communication {
    const KIND: ContentKind = ContentKind::Communication;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Activity {
    fn date(&self) -> &ContentDate {
        &self.date
    }
}
impl ContentRecord for Activity {
    const KIND: ContentKind = ContentKind::Activity;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Grant {
    fn date(&self) -> &ContentDate {
        &self.period
    }
}
impl ContentRecord for Grant {
    const KIND: ContentKind = ContentKind::Grant;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Award {
    fn date(&self) -> &ContentDate {
        &self.date
    }
}
impl ContentRecord for Award {
    const KIND: ContentKind = ContentKind::Award;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Appointment {
    fn date(&self) -> &ContentDate {
        &self.period
    }
}
impl ContentRecord for Appointment {
    const KIND: ContentKind = ContentKind::Appointment;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Education {
    fn date(&self) -> &ContentDate {
        &self.period
    }
}
impl ContentRecord for Education {
    const KIND: ContentKind = ContentKind::Education;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Fieldwork {
    fn date(&self) -> &ContentDate {
        &self.date
    }
}
impl ContentRecord for Fieldwork {
    const KIND: ContentKind = ContentKind::Fieldwork;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for MediaAppearance {
    fn date(&self) -> &ContentDate {
        &self.date
    }
}
impl ContentRecord for MediaAppearance {
    const KIND: ContentKind = ContentKind::MediaAppearance;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for PeerReview {
    fn date(&self) -> &ContentDate {
        &self.date
    }
}
impl ContentRecord for PeerReview {
    const KIND: ContentKind = ContentKind::PeerReview;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for EditorialMembership {
    fn date(&self) -> &ContentDate {
        &self.period
    }
}
impl ContentRecord for EditorialMembership {
    const KIND: ContentKind = ContentKind::EditorialMembership;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for Language {
    fn date(&self) -> &ContentDate {
        &self.since
    }
}
impl ContentRecord for Language {
    const KIND: ContentKind = ContentKind::Language;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.name
    }
}

impl Dated for ResearchRole {
    fn date(&self) -> &ContentDate {
        &self.period
    }
}
impl ContentRecord for ResearchRole {
    const KIND: ContentKind = ContentKind::ResearchRole;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for TeachingExperience {
    fn date(&self) -> &ContentDate {
        &self.period
    }
}
impl ContentRecord for TeachingExperience {
    const KIND: ContentKind = ContentKind::TeachingExperience;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

impl Dated for DhProject {
    fn date(&self) -> &ContentDate {
        &self.period
    }
}
impl ContentRecord for DhProject {
    const KIND: ContentKind = ContentKind::DhProject;
    fn id(&self) -> &str {
        &self.id
    }
    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitae_shared::DatePoint;

    #[test]
    fn publication_parses_with_defaults() {
        let p: Publication = toml::from_str(
            r#"
id = "smith-2021-ritual"
title = "Ritual and Record"
type = "article"
authors = ["A. Smith"]
date = "2021-05-03"
url = "https://doi.org/10.1000/xyz"
abstract = "On registers."
"#,
        )
        .expect("parse publication");
        assert_eq!(p.publication_type, PublicationType::Article);
        assert_eq!(p.date().year(), Some(2021));
        assert_eq!(p.summary.as_deref(), Some("On registers."));
        assert!(!p.featured);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let err = toml::from_str::<Award>("id = \"a\"\ntitle = \"A\"\nissuer = \"X\"\nyaer = 2020\n")
            .unwrap_err();
        assert!(err.to_string().contains("yaer"));
    }

    #[test]
    fn invalid_urls_are_rejected() {
        assert!(
            toml::from_str::<DhProject>("id = \"p\"\ntitle = \"P\"\nurl = \"not a url\"\n").is_err()
        );
    }

    #[test]
    fn grants_date_by_period() {
        let g: Grant = toml::from_str(
            "id = \"erc\"\ntitle = \"ERC\"\nperiod = { start = \"2026-01-01\" }\n",
        )
        .expect("parse grant");
        assert!(g.date().is_open());
        assert_eq!(Grant::KIND, ContentKind::Grant);
    }

    #[test]
    fn language_title_is_its_name() {
        let l: Language = toml::from_str(
            "id = \"fr\"\nname = \"French\"\nproficiency = \"fluent\"\nsince = 2004\n",
        )
        .expect("parse language");
        assert_eq!(l.title(), "French");
        assert_eq!(l.date(), &ContentDate::point(DatePoint::Year(2004)));
    }
}
