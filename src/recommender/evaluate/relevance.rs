use std::fmt;

use serde::{Deserialize, Serialize};

use crate::recommender::feature::FeatureRow;

/// Which attributes make a book relevant to a reader
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelevanceMode {
    /// book genres intersect the reader's favorite genres
    #[default]
    Genre,
    /// genre intersection, or the book language equals the preferred one
    GenreOrLanguage,
}

/// How a book relates to a reader's declared taste
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Both,
    Genre,
    Language,
    NoMatch,
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchKind::Both => "BOTH",
            MatchKind::Genre => "GENRE",
            MatchKind::Language => "LANGUAGE",
            MatchKind::NoMatch => "NO MATCH",
        };
        f.write_str(label)
    }
}

/// Relevance judge for one reader, over canonical labels
#[derive(Debug, Clone)]
pub struct RelevanceOracle<'a> {
    reader: &'a FeatureRow,
    mode: RelevanceMode,
}

impl<'a> RelevanceOracle<'a> {
    pub fn new(reader: &'a FeatureRow, mode: RelevanceMode) -> Self {
        Self { reader, mode }
    }

    /// Whether the reader declared anything the mode can match on
    pub fn has_criterion(&self) -> bool {
        match self.mode {
            RelevanceMode::Genre => !self.reader.genres.is_empty(),
            RelevanceMode::GenreOrLanguage => !self.reader.genres.is_empty() || self.reader.language.is_some(),
        }
    }

    pub fn classify(&self, book: &FeatureRow) -> MatchKind {
        let genre = book.genres.iter().any(|g| self.reader.genres.contains(g));
        let language = self.reader.language.is_some() && self.reader.language == book.language;
        match (genre, language) {
            (true, true) => MatchKind::Both,
            (true, false) => MatchKind::Genre,
            (false, true) => MatchKind::Language,
            (false, false) => MatchKind::NoMatch,
        }
    }

    pub fn is_relevant(&self, book: &FeatureRow) -> bool {
        match (self.mode, self.classify(book)) {
            (_, MatchKind::NoMatch) => false,
            (RelevanceMode::Genre, MatchKind::Language) => false,
            _ => true,
        }
    }
}
