//! Feature encoding of categorical book attributes and reader preferences.

pub mod canonical;

use std::collections::BTreeSet;

use indexmap::IndexSet;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::recommender::record::{Book, PreferenceProfile};
use crate::utils::compare::{Compare, DefaultCompare};

pub use canonical::Field;

/// Canonicalized categorical attributes of one book or one reader
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRow {
    pub genres: Vec<String>,
    pub cover_types: Vec<String>,
    pub content_types: Vec<String>,
    pub language: Option<String>,
}

impl FeatureRow {
    pub fn from_book(book: &Book) -> Self {
        Self {
            genres: Field::Genre.canonical_values(&book.genre),
            cover_types: Field::CoverType.canonical_values(&book.cover_type),
            content_types: Field::ContentType.canonical_values(&book.content_type),
            language: Field::Language.canonical_values(&book.language).into_iter().next(),
        }
    }

    /// List elements may themselves carry delimited values; they are split too.
    pub fn from_profile(profile: &PreferenceProfile) -> Self {
        fn values(field: Field, raw: &[String]) -> Vec<String> {
            raw.iter().flat_map(|r| field.canonical_values(r)).collect()
        }
        Self {
            genres: values(Field::Genre, &profile.favorite_genres),
            cover_types: values(Field::CoverType, &profile.preferred_formats),
            content_types: values(Field::ContentType, &profile.preferred_book_types),
            language: Field::Language.canonical_values(&profile.preferred_language).into_iter().next(),
        }
    }

    /// Every (field, label) pair carried by this row
    pub fn categories(&self) -> impl Iterator<Item = (Field, &str)> + '_ {
        self.genres.iter().map(|g| (Field::Genre, g.as_str()))
            .chain(self.cover_types.iter().map(|c| (Field::CoverType, c.as_str())))
            .chain(self.content_types.iter().map(|c| (Field::ContentType, c.as_str())))
            .chain(self.language.iter().map(|l| (Field::Language, l.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.categories().next().is_none()
    }
}

/// Outcome of looking a category up in a fitted feature space
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedCategory {
    /// column index in the fitted space
    Known(usize),
    /// never seen while fitting, encodes to nothing
    Unseen(Box<str>),
}

/// Binary sparse vector, column indices ascending and unique
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    indices: Vec<usize>,
}

impl FeatureVector {
    fn from_indices(mut indices: Vec<usize>) -> Self {
        indices.sort_unstable();
        indices.dedup();
        Self { indices }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().map(|&i| (i, 1.0))
    }

    pub fn to_dense(&self, dim: usize) -> Vec<f64> {
        let mut dense = vec![0.0; dim];
        for &i in &self.indices {
            if i < dim {
                dense[i] = 1.0;
            }
        }
        dense
    }

    pub fn cosine(&self, other: &FeatureVector) -> f64 {
        <DefaultCompare as Compare<f64>>::cosine_similarity(self.raw_iter(), other.raw_iter())
    }
}

/// Ordered feature columns named `{field}_{label}`.
///
/// Fitted once on the union of item and reader rows, sorted by name.
/// Both sides encode onto this single ordering so their vectors are
/// comparable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpace {
    columns: IndexSet<Box<str>>,
}

impl FeatureSpace {
    pub fn column_name(field: Field, label: &str) -> String {
        format!("{}_{}", field.prefix(), label)
    }

    /// Fit the sorted union of columns observed in both corpora
    pub fn fit<'a, I, U>(item_rows: I, user_rows: U) -> Self
    where
        I: IntoIterator<Item = &'a FeatureRow>,
        U: IntoIterator<Item = &'a FeatureRow>,
    {
        let columns: BTreeSet<String> = item_rows
            .into_iter()
            .chain(user_rows)
            .flat_map(|row| row.categories().map(|(f, l)| Self::column_name(f, l)).collect::<Vec<_>>())
            .collect();
        Self {
            columns: columns.into_iter().map(String::into_boxed_str).collect(),
        }
    }

    pub fn dim(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.iter().map(|c| c.as_ref())
    }

    pub fn encode_category(&self, field: Field, label: &str) -> EncodedCategory {
        match self.columns.get_index_of(Self::column_name(field, label).as_str()) {
            Some(idx) => EncodedCategory::Known(idx),
            None => EncodedCategory::Unseen(label.into()),
        }
    }

    /// Encode a row, also returning the labels the space has never seen
    pub fn encode_with_unseen(&self, row: &FeatureRow) -> (FeatureVector, Vec<(Field, Box<str>)>) {
        let mut indices = Vec::new();
        let mut unseen = Vec::new();
        for (field, label) in row.categories() {
            match self.encode_category(field, label) {
                EncodedCategory::Known(idx) => indices.push(idx),
                EncodedCategory::Unseen(label) => unseen.push((field, label)),
            }
        }
        (FeatureVector::from_indices(indices), unseen)
    }

    /// Encode a row against the already fitted columns (transform only).
    /// Unseen categories become zero columns and are logged.
    pub fn transform(&self, row: &FeatureRow) -> FeatureVector {
        let (vector, unseen) = self.encode_with_unseen(row);
        for (field, label) in unseen {
            warn!("unseen {} category {:?} encoded as zero", field.prefix(), label);
        }
        vector
    }
}
