//! Display orderings derived from a loaded collection.
//!
//! Both helpers are pure and total: every input record lands in exactly one
//! position or bucket, and records whose date cannot be interpreted sort last
//! instead of raising.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use vitae_shared::{ContentDate, DatePoint};

/// Anything carrying a content date.
pub trait Dated {
    fn date(&self) -> &ContentDate;
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Where a date falls in the "most recent first" order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Open { start: DatePoint },
    Closed { end: DatePoint, start: DatePoint },
    Undated,
}

impl Placement {
    fn of(date: &ContentDate) -> Self {
        match date {
            ContentDate::Range { start, end: None } => Self::Open { start: *start },
            ContentDate::Range {
                start,
                end: Some(end),
            } => Self::Closed {
                end: *end,
                start: *start,
            },
            ContentDate::Point { at } => Self::Closed {
                end: *at,
                start: *at,
            },
            ContentDate::Unparsed { .. } | ContentDate::Unknown => Self::Undated,
        }
    }
}

/// Compare two dates for descending display order.
///
/// `Less` means `a` is shown before `b`. Open ranges come first (latest start
/// first), then closed ranges and points (latest end first, then latest
/// start), then undated records.
pub fn compare_desc(a: &ContentDate, b: &ContentDate) -> Ordering {
    use Placement::*;

    match (Placement::of(a), Placement::of(b)) {
        (Open { start: sa }, Open { start: sb }) => sb.cmp(&sa),
        (Open { .. }, _) => Ordering::Less,
        (_, Open { .. }) => Ordering::Greater,
        (Closed { end: ea, start: sa }, Closed { end: eb, start: sb }) => {
            eb.cmp(&ea).then_with(|| sb.cmp(&sa))
        }
        (Closed { .. }, Undated) => Ordering::Less,
        (Undated, Closed { .. }) => Ordering::Greater,
        (Undated, Undated) => Ordering::Equal,
    }
}

/// A new vector ordered most recent first. Ties keep input order.
pub fn sort_by_date<T: Dated + Clone>(records: &[T]) -> Vec<T> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare_desc(a.date(), b.date()));
    sorted
}

/// The `n` most recent records.
pub fn latest<T: Dated + Clone>(records: &[T], n: usize) -> Vec<T> {
    let mut sorted = sort_by_date(records);
    sorted.truncate(n);
    sorted
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Records bucketed by the year of their primary date.
#[derive(Debug, Clone, PartialEq)]
pub struct YearGroups<T> {
    years: BTreeMap<i32, Vec<T>>,
    undated: Vec<T>,
}

impl<T> YearGroups<T> {
    /// Buckets from the most recent year to the oldest.
    pub fn years_desc(&self) -> impl Iterator<Item = (i32, &[T])> {
        self.years.iter().rev().map(|(y, v)| (*y, v.as_slice()))
    }

    pub fn get(&self, year: i32) -> Option<&[T]> {
        self.years.get(&year).map(Vec::as_slice)
    }

    /// Records with no derivable year.
    pub fn undated(&self) -> &[T] {
        &self.undated
    }

    /// Number of distinct years.
    pub fn year_count(&self) -> usize {
        self.years.len()
    }

    /// Total records across all buckets.
    pub fn len(&self) -> usize {
        self.years.values().map(Vec::len).sum::<usize>() + self.undated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Bucket records by year. Order inside a bucket follows the input; sort
/// first if the bucket order matters.
pub fn group_by_year<T: Dated + Clone>(records: &[T]) -> YearGroups<T> {
    let mut years: BTreeMap<i32, Vec<T>> = BTreeMap::new();
    let mut undated = Vec::new();

    for record in records {
        match record.date().year() {
            Some(year) => years.entry(year).or_default().push(record.clone()),
            None => undated.push(record.clone()),
        }
    }

    YearGroups { years, undated }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
