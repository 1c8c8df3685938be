pub mod fallback;
pub mod preference;
pub mod similar;

use std::collections::HashSet;
use std::fmt::{self, Debug};

use serde::{Deserialize, Serialize};

use crate::recommender::corpus::CatalogEntry;
use crate::utils::sort::score_desc;

/// Where a recommended entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// item-item borrower similarity, score in [0, 1]
    Similarity,
    /// genre popularity fallback, score always 0.0
    Fallback,
    /// reader preference vector similarity
    Preference,
}

/// How candidates are picked from a ranked pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// head of the ranking, repeatable
    #[default]
    Deterministic,
    /// unordered random draw from the top of the ranking
    Hybrid,
}

/// Usage-tag filter applied to candidate books
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AvailabilityFilter {
    #[default]
    Any,
    /// usage tag must contain this substring
    Contains(String),
}

impl AvailabilityFilter {
    /// `None` and blank patterns disable filtering
    pub fn from_pattern(pattern: Option<&str>) -> Self {
        match pattern {
            Some(p) if !p.is_empty() => AvailabilityFilter::Contains(p.to_string()),
            _ => AvailabilityFilter::Any,
        }
    }

    pub fn admits(&self, usage: &str) -> bool {
        match self {
            AvailabilityFilter::Any => true,
            AvailabilityFilter::Contains(p) => usage.contains(p.as_str()),
        }
    }
}

/// One recommended book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub title: String,
    pub genre: String,
    pub author: String,
    pub score: f64,
    pub source: Source,
}

impl Recommendation {
    pub fn from_entry(entry: &CatalogEntry, score: f64, source: Source) -> Self {
        Self {
            id: entry.book.id.clone(),
            title: entry.book.title.clone(),
            genre: entry.book.genre.clone(),
            author: entry.book.author.clone(),
            score,
            source,
        }
    }
}

/// Ordered list of recommendations
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub list: Vec<Recommendation>,
}

impl Recommendations {
    pub fn new(list: Vec<Recommendation>) -> Self {
        Self { list }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.list.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recommendation> + '_ {
        self.list.iter()
    }

    /// Stable sort by descending score; equal scores keep their order
    pub fn sort_by_score(&mut self) -> &mut Self {
        self.list.sort_by(|a, b| score_desc(a.score, b.score));
        self
    }

    /// Drop later entries whose id already appeared
    pub fn dedup_by_id(&mut self) -> &mut Self {
        let mut seen = HashSet::with_capacity(self.list.len());
        self.list.retain(|r| seen.insert(r.id.clone()));
        self
    }

    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    pub fn extend(&mut self, other: Recommendations) -> &mut Self {
        self.list.extend(other.list);
        self
    }
}

impl IntoIterator for Recommendations {
    type Item = Recommendation;
    type IntoIter = std::vec::IntoIter<Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

impl Debug for Recommendations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Recommendations [")?;
            for r in &self.list {
                writeln!(f, "    {:?} {:?}: {:.6} ({:?})", r.id, r.title, r.score, r.source)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}
