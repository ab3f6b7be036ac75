//! Core domain types for Vitae content collections.

use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

// ---------------------------------------------------------------------------
// ContentKind
// ---------------------------------------------------------------------------

/// Every kind of content record the portfolio publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentKind {
    Publication,
    Communication,
    Activity,
    Grant,
    Award,
    Appointment,
    Education,
    Fieldwork,
    MediaAppearance,
    PeerReview,
    EditorialMembership,
    Language,
    ResearchRole,
    TeachingExperience,
    DhProject,
}

impl ContentKind {
    /// All kinds, in the order they are built and reported.
    pub const ALL: [ContentKind; 15] = [
        Self::Publication,
        Self::Communication,
        Self::Activity,
        Self::Grant,
        Self::Award,
        Self::Appointment,
        Self::Education,
        Self::Fieldwork,
        Self::MediaAppearance,
        Self::PeerReview,
        Self::EditorialMembership,
        Self::Language,
        Self::ResearchRole,
        Self::TeachingExperience,
        Self::DhProject,
    ];

    /// Directory under the content root holding this kind's modules.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Publication => "publications",
            Self::Communication => "communications",
            Self::Activity => "activities",
            Self::Grant => "grants",
            Self::Award => "awards",
            Self::Appointment => "appointments",
            Self::Education => "education",
            Self::Fieldwork => "fieldwork",
            Self::MediaAppearance => "media",
            Self::PeerReview => "peer-reviews",
            Self::EditorialMembership => "editorial",
            Self::Language => "languages",
            Self::ResearchRole => "research-roles",
            Self::TeachingExperience => "teaching",
            Self::DhProject => "dh-projects",
        }
    }

    /// Human-readable label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Publication => "publication",
            Self::Communication => "communication",
            Self::Activity => "activity",
            Self::Grant => "grant",
            Self::Award => "award",
            Self::Appointment => "appointment",
            Self::Education => "education entry",
            Self::Fieldwork => "fieldwork entry",
            Self::MediaAppearance => "media appearance",
            Self::PeerReview => "peer review",
            Self::EditorialMembership => "editorial membership",
            Self::Language => "language",
            Self::ResearchRole => "research role",
            Self::TeachingExperience => "teaching experience",
            Self::DhProject => "digital-humanities project",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl std::str::FromStr for ContentKind {
    type Err = String;

    /// Accepts either the directory name (`dh-projects`) or the label
    /// (`digital-humanities project`), case-insensitively.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.dir_name() == needle || k.label() == needle)
            .ok_or_else(|| format!("unknown content kind '{s}'"))
    }
}

// ---------------------------------------------------------------------------
// Record ids
// ---------------------------------------------------------------------------

/// Lowercase slug: ASCII letters, digits, `.`, `_`, `-`, starting with an
/// alphanumeric.
static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9._-]*$").expect("id regex"));

/// Whether `id` can be used verbatim as a URL path segment.
pub fn is_url_safe_id(id: &str) -> bool {
    ID_RE.is_match(id)
}

// ---------------------------------------------------------------------------
// DatePoint
// ---------------------------------------------------------------------------

/// A calendar point at year, month, or day precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePoint {
    Year(i32),
    Month { year: i32, month: u32 },
    Day(NaiveDate),
}

impl DatePoint {
    pub fn year(self) -> i32 {
        match self {
            Self::Year(y) => y,
            Self::Month { year, .. } => year,
            Self::Day(d) => d.year(),
        }
    }

    /// `(year, month, day)` with missing components as zero, so a coarser
    /// point orders before any finer point inside it.
    fn key(self) -> (i32, u32, u32) {
        match self {
            Self::Year(y) => (y, 0, 0),
            Self::Month { year, month } => (year, month, 0),
            Self::Day(d) => (d.year(), d.month(), d.day()),
        }
    }

    fn precision(self) -> u8 {
        match self {
            Self::Year(_) => 0,
            Self::Month { .. } => 1,
            Self::Day(_) => 2,
        }
    }

    /// Parse `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or an RFC 3339 timestamp.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(caps) = POINT_RE.captures(s) {
            let year: i32 = caps[1].parse().ok()?;
            return match (caps.get(2), caps.get(3)) {
                (None, _) => Some(Self::Year(year)),
                (Some(m), None) => {
                    let month: u32 = m.as_str().parse().ok()?;
                    (1..=12)
                        .contains(&month)
                        .then_some(Self::Month { year, month })
                }
                (Some(m), Some(d)) => NaiveDate::from_ymd_opt(
                    year,
                    m.as_str().parse().ok()?,
                    d.as_str().parse().ok()?,
                )
                .map(Self::Day),
            };
        }
        chrono::DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| Self::Day(dt.date_naive()))
    }
}

impl Ord for DatePoint {
    /// Calendar key first; precision only separates points whose keys
    /// collide (a `Month` with month 0 against a `Year`), so `Equal` agrees
    /// with `==`.
    fn cmp(&self, other: &Self) -> Ordering {
        self.key()
            .cmp(&other.key())
            .then_with(|| self.precision().cmp(&other.precision()))
    }
}

impl PartialOrd for DatePoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DatePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(y) => write!(f, "{y:04}"),
            Self::Month { year, month } => write!(f, "{year:04}-{month:02}"),
            Self::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for DatePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

static POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4})(?:-(\d{2})(?:-(\d{2}))?)?$").expect("date point regex")
});

/// `<point> <separator> <tail>`, where the tail may be empty.
static RANGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{4}(?:-\d{2}(?:-\d{2})?)?)\s*(?:-|–|—|to)\s*(.*)$").expect("date range regex")
});

/// Range tails meaning "no end yet".
const OPEN_END_WORDS: &[&str] = &["", "present", "current", "ongoing", "now"];

// ---------------------------------------------------------------------------
// ContentDate
// ---------------------------------------------------------------------------

/// The date-bearing attribute of a content record.
///
/// Authored as a bare year, an ISO date string, a range string
/// (`"2019-2021"`, `"2019-present"`), or a `{ start, end }` table. Anything
/// that cannot be interpreted is kept as [`ContentDate::Unparsed`] rather
/// than failing the load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", from = "toml::Value")]
pub enum ContentDate {
    Point {
        at: DatePoint,
    },
    Range {
        start: DatePoint,
        /// `None` for an open-ended (ongoing) range.
        end: Option<DatePoint>,
    },
    Unparsed {
        raw: String,
    },
    #[default]
    Unknown,
}

impl ContentDate {
    pub fn point(at: DatePoint) -> Self {
        Self::Point { at }
    }

    pub fn open_range(start: DatePoint) -> Self {
        Self::Range { start, end: None }
    }

    pub fn closed_range(start: DatePoint, end: DatePoint) -> Self {
        Self::Range {
            start,
            end: Some(end),
        }
    }

    /// Interpret authored date text.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Unknown;
        }
        if let Some(at) = DatePoint::parse(trimmed) {
            return Self::point(at);
        }
        if let Some(caps) = RANGE_RE.captures(trimmed) {
            if let Some(start) = DatePoint::parse(&caps[1]) {
                let tail = caps[2].trim().to_lowercase();
                if OPEN_END_WORDS.contains(&tail.as_str()) {
                    return Self::open_range(start);
                }
                if let Some(end) = DatePoint::parse(&tail) {
                    return Self::closed_range(start, end);
                }
            }
        }
        Self::Unparsed {
            raw: trimmed.to_string(),
        }
    }

    /// Year used for grouping: the point's year, or a range's start year.
    pub fn year(&self) -> Option<i32> {
        match self {
            Self::Point { at } => Some(at.year()),
            Self::Range { start, .. } => Some(start.year()),
            Self::Unparsed { .. } | Self::Unknown => None,
        }
    }

    /// Whether this is a range with no end.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Range { end: None, .. })
    }

}

impl From<toml::Value> for ContentDate {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::Integer(y) => match i32::try_from(y) {
                Ok(y) => Self::point(DatePoint::Year(y)),
                Err(_) => Self::Unparsed { raw: y.to_string() },
            },
            toml::Value::String(s) => Self::parse(&s),
            toml::Value::Datetime(dt) => match point_from_datetime(&dt) {
                Some(at) => Self::point(at),
                None => Self::Unparsed {
                    raw: dt.to_string(),
                },
            },
            toml::Value::Table(table) => {
                let start = table.get("start").cloned().and_then(point_from_value);
                let end = table.get("end").cloned();
                match (start, end) {
                    (Some(start), None) => Self::open_range(start),
                    (Some(start), Some(toml::Value::String(s)))
                        if OPEN_END_WORDS.contains(&s.trim().to_lowercase().as_str()) =>
                    {
                        Self::open_range(start)
                    }
                    (Some(start), Some(end)) => match point_from_value(end) {
                        Some(end) => Self::closed_range(start, end),
                        None => Self::Unparsed {
                            raw: toml::Value::Table(table).to_string(),
                        },
                    },
                    (None, _) => Self::Unparsed {
                        raw: toml::Value::Table(table).to_string(),
                    },
                }
            }
            other => Self::Unparsed {
                raw: other.to_string(),
            },
        }
    }
}

fn point_from_value(value: toml::Value) -> Option<DatePoint> {
    match value {
        toml::Value::Integer(y) => i32::try_from(y).ok().map(DatePoint::Year),
        toml::Value::String(s) => DatePoint::parse(&s),
        toml::Value::Datetime(dt) => point_from_datetime(&dt),
        _ => None,
    }
}

/// The calendar date of a TOML date or datetime, ignoring time and offset.
fn point_from_datetime(dt: &toml::value::Datetime) -> Option<DatePoint> {
    let date = dt.date?;
    NaiveDate::from_ymd_opt(
        i32::from(date.year),
        u32::from(date.month),
        u32::from(date.day),
    )
    .map(DatePoint::Day)
}

impl fmt::Display for ContentDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point { at } => write!(f, "{at}"),
            Self::Range {
                start,
                end: Some(end),
            } => write!(f, "{start} – {end}"),
            Self::Range { start, end: None } => write!(f, "{start} – present"),
            Self::Unparsed { raw } => f.write_str(raw),
            Self::Unknown => f.write_str("undated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> DatePoint {
        DatePoint::Day(NaiveDate::from_ymd_opt(y, m, d).expect("valid date"))
    }

    #[test]
    fn kind_roundtrips_through_dir_name_and_label() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.dir_name().parse::<ContentKind>(), Ok(kind));
            assert_eq!(kind.label().parse::<ContentKind>(), Ok(kind));
        }
        assert!("posters".parse::<ContentKind>().is_err());
    }

    #[test]
    fn url_safe_ids() {
        assert!(is_url_safe_id("smith-2021-ritual"));
        assert!(is_url_safe_id("erc.2026_starting"));
        assert!(!is_url_safe_id("ERC-Grant"));
        assert!(!is_url_safe_id("a~b"));
        assert!(!is_url_safe_id(""));
        assert!(!is_url_safe_id("-leading-dash"));
        assert!(!is_url_safe_id("has space"));
        assert!(!is_url_safe_id("slash/inside"));
    }

    #[test]
    fn parses_points_at_each_precision() {
        assert_eq!(DatePoint::parse("2021"), Some(DatePoint::Year(2021)));
        assert_eq!(
            DatePoint::parse("2021-05"),
            Some(DatePoint::Month {
                year: 2021,
                month: 5
            })
        );
        assert_eq!(DatePoint::parse("2021-05-03"), Some(day(2021, 5, 3)));
        assert_eq!(
            DatePoint::parse("2021-05-03T10:00:00Z"),
            Some(day(2021, 5, 3))
        );
        assert_eq!(DatePoint::parse("2021-13"), None);
        assert_eq!(DatePoint::parse("2021-02-30"), None);
    }

    #[test]
    fn coarser_points_order_before_finer_ones() {
        assert!(DatePoint::Year(2021) < day(2021, 1, 1));
        assert!(
            DatePoint::Month {
                year: 2021,
                month: 3
            } < day(2021, 3, 1)
        );
        assert!(day(2020, 12, 31) < DatePoint::Year(2021));
    }

    #[test]
    fn parses_range_text() {
        assert_eq!(
            ContentDate::parse("2019-2021"),
            ContentDate::closed_range(DatePoint::Year(2019), DatePoint::Year(2021))
        );
        assert_eq!(
            ContentDate::parse("2019 – present"),
            ContentDate::open_range(DatePoint::Year(2019))
        );
        assert_eq!(
            ContentDate::parse("2019–"),
            ContentDate::open_range(DatePoint::Year(2019))
        );
        assert_eq!(
            ContentDate::parse("2018-10-01 to 2020"),
            ContentDate::closed_range(day(2018, 10, 1), DatePoint::Year(2020))
        );
    }

    #[test]
    fn unparseable_text_is_kept_raw() {
        assert_eq!(
            ContentDate::parse("spring, sometime"),
            ContentDate::Unparsed {
                raw: "spring, sometime".into()
            }
        );
        assert_eq!(ContentDate::parse("   "), ContentDate::Unknown);
    }

    #[derive(Debug, Deserialize)]
    struct Dated {
        #[serde(default)]
        date: ContentDate,
    }

    fn date_of(toml_src: &str) -> ContentDate {
        toml::from_str::<Dated>(toml_src).expect("parse").date
    }

    #[test]
    fn deserializes_authored_forms() {
        assert_eq!(date_of("date = 2021"), ContentDate::point(DatePoint::Year(2021)));
        assert_eq!(
            date_of("date = \"2021-05-03\""),
            ContentDate::point(day(2021, 5, 3))
        );
        assert_eq!(date_of("date = 2021-05-03"), ContentDate::point(day(2021, 5, 3)));
        assert_eq!(
            date_of("date = { start = \"2018-10-01\", end = 2020 }"),
            ContentDate::closed_range(day(2018, 10, 1), DatePoint::Year(2020))
        );
        assert_eq!(
            date_of("date = { start = \"2026-01-01\" }"),
            ContentDate::open_range(day(2026, 1, 1))
        );
        assert_eq!(
            date_of("date = { start = 2022, end = \"present\" }"),
            ContentDate::open_range(DatePoint::Year(2022))
        );
        assert_eq!(date_of(""), ContentDate::Unknown);
        assert!(matches!(date_of("date = true"), ContentDate::Unparsed { .. }));
        assert!(matches!(
            date_of("date = { end = 2020 }"),
            ContentDate::Unparsed { .. }
        ));
    }

    #[test]
    fn unparseable_tables_keep_the_authored_value() {
        let ContentDate::Unparsed { raw } = date_of("date = { start = \"soon\", end = 2020 }")
        else {
            panic!("expected unparsed date");
        };
        assert!(raw.contains("soon"), "{raw}");
        assert!(raw.contains("2020"), "{raw}");

        let ContentDate::Unparsed { raw } =
            date_of("date = { start = 2019, end = \"eventually\" }")
        else {
            panic!("expected unparsed date");
        };
        assert!(raw.contains("eventually"), "{raw}");
    }

    #[test]
    fn toml_datetimes_use_their_calendar_date() {
        assert_eq!(
            date_of("date = 2021-05-03T10:00:00"),
            ContentDate::point(day(2021, 5, 3))
        );
        assert_eq!(
            date_of("date = 2021-05-03T23:30:00-05:00"),
            ContentDate::point(day(2021, 5, 3))
        );
        assert_eq!(
            date_of("date = { start = 2024-09-01T09:00:00 }"),
            ContentDate::open_range(day(2024, 9, 1))
        );
        assert!(matches!(date_of("date = 10:00:00"), ContentDate::Unparsed { .. }));
    }

    #[test]
    fn ordering_agrees_with_equality() {
        let year = DatePoint::Year(2021);
        let month_zero = DatePoint::Month {
            year: 2021,
            month: 0,
        };
        assert_ne!(year, month_zero);
        assert_ne!(year.cmp(&month_zero), Ordering::Equal);
        assert!(year < month_zero);
        assert_eq!(day(2021, 5, 3).cmp(&day(2021, 5, 3)), Ordering::Equal);
    }

    #[test]
    fn year_follows_point_or_range_start() {
        assert_eq!(ContentDate::point(day(2021, 5, 3)).year(), Some(2021));
        assert_eq!(
            ContentDate::closed_range(DatePoint::Year(2018), DatePoint::Year(2020)).year(),
            Some(2018)
        );
        assert_eq!(ContentDate::Unknown.year(), None);
        assert!(ContentDate::open_range(DatePoint::Year(2018)).is_open());
    }

    #[test]
    fn serializes_as_tagged_json() {
        let date = ContentDate::open_range(day(2026, 1, 1));
        let json = serde_json::to_value(&date).expect("serialize");
        assert_eq!(json["kind"], "range");
        assert_eq!(json["start"], "2026-01-01");
        assert!(json["end"].is_null());
    }

    #[test]
    fn display_forms() {
        assert_eq!(
            ContentDate::open_range(DatePoint::Year(2019)).to_string(),
            "2019 – present"
        );
        assert_eq!(ContentDate::Unknown.to_string(), "undated");
    }
}
