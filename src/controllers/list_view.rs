//! Filter and sort state for entity tables, and the pure projection from the
//! raw collection to the rows a screen renders.
//!
//! The derived view is recomputed from scratch on every change. It is always
//! an ordered subset of the raw collection: filtering only drops rows and
//! sorting only reorders them.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{parse_instant, EntityId};

/// A comparable cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    /// Absent or unparseable. Sorts before every present value.
    Missing,
    Number(f64),
    Text(String),
    Instant(DateTime<Utc>),
}

impl SortValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Self::Missing
        } else {
            Self::Number(value)
        }
    }

    /// Date-like column: compare by parsed instant.
    pub fn date(raw: Option<&str>) -> Self {
        raw.and_then(parse_instant)
            .map(Self::Instant)
            .unwrap_or(Self::Missing)
    }

    /// Composite full-name column: `first last`, case-folded so "ada" and
    /// "Ada" sort together.
    pub fn full_name(first: &str, last: &str) -> Self {
        Self::Text(format!("{} {}", first.trim(), last.trim()).to_lowercase())
    }

    fn rank(&self) -> u8 {
        match self {
            Self::Missing => 0,
            Self::Number(_) => 1,
            Self::Text(_) => 2,
            Self::Instant(_) => 3,
        }
    }

    /// Three-way comparison. Mixed kinds order by kind so the comparator
    /// stays total.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Instant(a), Self::Instant(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// A row in an entity table.
pub trait ListItem: Clone {
    /// Discrete filter columns (status, class, category...).
    type Filter: Copy + Ord + Debug;
    /// Sortable columns.
    type Sort: Copy + Eq + Debug;

    fn id(&self) -> &EntityId;

    /// Fixed concatenation of the searchable fields.
    fn search_text(&self) -> String;

    fn filter_value(&self, key: Self::Filter) -> Option<String>;

    fn sort_value(&self, key: Self::Sort) -> SortValue;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Search text plus discrete filters. Everything combines with AND.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState<F: Ord> {
    pub search: String,
    pub discrete: BTreeMap<F, String>,
}

impl<F: Ord> Default for FilterState<F> {
    fn default() -> Self {
        Self {
            search: String::new(),
            discrete: BTreeMap::new(),
        }
    }
}

/// A partial update to a [`FilterState`]. `None` leaves a field alone; for a
/// discrete filter, `Some(None)` clears it.
#[derive(Debug, Clone)]
pub struct FilterPatch<F> {
    pub search: Option<String>,
    pub discrete: Vec<(F, Option<String>)>,
}

impl<F> Default for FilterPatch<F> {
    fn default() -> Self {
        Self {
            search: None,
            discrete: Vec::new(),
        }
    }
}

impl<F> FilterPatch<F> {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            discrete: Vec::new(),
        }
    }

    pub fn with(mut self, key: F, value: impl Into<String>) -> Self {
        self.discrete.push((key, Some(value.into())));
        self
    }

    pub fn without(mut self, key: F) -> Self {
        self.discrete.push((key, None));
        self
    }
}

impl<F: Ord + Copy> FilterState<F> {
    pub fn apply(&mut self, patch: FilterPatch<F>) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        for (key, value) in patch.discrete {
            match value {
                // "All" in a dropdown arrives as an empty value.
                Some(v) if !v.trim().is_empty() => {
                    self.discrete.insert(key, v);
                }
                _ => {
                    self.discrete.remove(&key);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty() && self.discrete.is_empty()
    }

    pub fn matches<T>(&self, item: &T) -> bool
    where
        T: ListItem<Filter = F>,
    {
        // Blanks around the typed term are ignored; inner spaces must match.
        let needle = self.search.trim().to_lowercase();
        if !needle.is_empty() && !item.search_text().to_lowercase().contains(&needle) {
            return false;
        }
        self.discrete.iter().all(|(key, wanted)| {
            item.filter_value(*key)
                .is_some_and(|actual| actual.eq_ignore_ascii_case(wanted.trim()))
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<K> {
    pub key: Option<K>,
    pub direction: SortDirection,
}

impl<K> Default for SortState<K> {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Ascending,
        }
    }
}

impl<K: Copy + Eq> SortState<K> {
    /// Reselecting the active key flips the direction; any other key starts
    /// ascending.
    pub fn select(&mut self, key: K) {
        if self.key == Some(key) {
            self.direction = self.direction.flip();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Ascending;
        }
    }

    /// Back to backend order.
    pub fn clear(&mut self) {
        self.key = None;
        self.direction = SortDirection::Ascending;
    }
}

/// Filter, then stable-sort. Items are cloned into the view; the raw slice is
/// never touched.
pub fn derive<T: ListItem>(
    raw: &[T],
    filter: &FilterState<T::Filter>,
    sort: &SortState<T::Sort>,
) -> Vec<T> {
    let mut rows: Vec<T> = raw.iter().filter(|item| filter.matches(*item)).cloned().collect();

    if let Some(key) = sort.key {
        let mut keyed: Vec<(SortValue, T)> = rows
            .into_iter()
            .map(|item| (item.sort_value(key), item))
            .collect();
        // `sort_by` is stable: equal keys keep their filtered order in both
        // directions.
        match sort.direction {
            SortDirection::Ascending => keyed.sort_by(|a, b| a.0.compare(&b.0)),
            SortDirection::Descending => keyed.sort_by(|a, b| b.0.compare(&a.0)),
        }
        rows = keyed.into_iter().map(|(_, item)| item).collect();
    }

    rows
}
