use std::sync::Arc;

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use log::{info, warn};

use crate::recommender::{
    feature::{FeatureRow, FeatureSpace, FeatureVector},
    interaction::{InteractionMatrix, SimilarityMatrix},
    record::{Book, Loan, PreferenceProfile, PreferenceStore},
};

/// Catalog book with its canonical attributes and encoded vector
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub book: Book,
    pub features: FeatureRow,
    pub vector: FeatureVector,
}

/// Reader profile with its canonical attributes and encoded vector
#[derive(Debug, Clone)]
pub struct ReaderEntry {
    pub profile: PreferenceProfile,
    pub features: FeatureRow,
    pub vector: FeatureVector,
}

/// Everything the recommenders read, built once per data load.
///
/// Immutable after `build`. Share it as `Arc<Corpus>`; refresh by building
/// a new one and publishing it through `CorpusHandle`.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    catalog: IndexMap<Box<str>, CatalogEntry>,
    readers: IndexMap<Box<str>, ReaderEntry>,
    interactions: InteractionMatrix,
    similarity: SimilarityMatrix,
    features: FeatureSpace,
}

impl Corpus {
    /// Build every derived structure from raw records.
    /// Duplicate ids keep their first occurrence.
    pub fn build(books: Vec<Book>, loans: &[Loan], profiles: Vec<PreferenceProfile>) -> Self {
        let mut catalog: IndexMap<Box<str>, (Book, FeatureRow)> = IndexMap::with_capacity(books.len());
        for book in books {
            if catalog.contains_key(book.id.as_str()) {
                warn!("duplicate book id {:?} ignored", book.id);
                continue;
            }
            let row = FeatureRow::from_book(&book);
            catalog.insert(book.id.as_str().into(), (book, row));
        }

        let mut readers: IndexMap<Box<str>, (PreferenceProfile, FeatureRow)> = IndexMap::with_capacity(profiles.len());
        for profile in profiles {
            if readers.contains_key(profile.id.as_str()) {
                warn!("duplicate preference id {:?} ignored", profile.id);
                continue;
            }
            let row = FeatureRow::from_profile(&profile);
            readers.insert(profile.id.as_str().into(), (profile, row));
        }

        let features = FeatureSpace::fit(
            catalog.values().map(|(_, row)| row),
            readers.values().map(|(_, row)| row),
        );
        let interactions = InteractionMatrix::from_loans(loans);
        let similarity = SimilarityMatrix::from_interactions(&interactions);

        let catalog: IndexMap<Box<str>, CatalogEntry> = catalog
            .into_iter()
            .map(|(id, (book, row))| {
                let vector = features.transform(&row);
                (id, CatalogEntry { book, features: row, vector })
            })
            .collect();
        let readers: IndexMap<Box<str>, ReaderEntry> = readers
            .into_iter()
            .map(|(id, (profile, row))| {
                let vector = features.transform(&row);
                (id, ReaderEntry { profile, features: row, vector })
            })
            .collect();

        info!(
            "corpus built: {} books, {} readers, {} loans, {} borrowed items, {} feature columns",
            catalog.len(),
            readers.len(),
            loans.len(),
            similarity.len(),
            features.dim()
        );

        Self {
            catalog,
            readers,
            interactions,
            similarity,
            features,
        }
    }

    pub fn book(&self, id: &str) -> Option<&CatalogEntry> {
        self.catalog.get(id)
    }

    pub fn books(&self) -> impl Iterator<Item = &CatalogEntry> + '_ {
        self.catalog.values()
    }

    pub fn book_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn reader(&self, id: &str) -> Option<&ReaderEntry> {
        self.readers.get(id)
    }

    pub fn readers(&self) -> impl Iterator<Item = &ReaderEntry> + '_ {
        self.readers.values()
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    pub fn interactions(&self) -> &InteractionMatrix {
        &self.interactions
    }

    pub fn similarity(&self) -> &SimilarityMatrix {
        &self.similarity
    }

    pub fn features(&self) -> &FeatureSpace {
        &self.features
    }
}

impl PreferenceStore for Corpus {
    fn preference(&self, id: &str) -> Option<PreferenceProfile> {
        self.reader(id).map(|r| r.profile.clone())
    }
}

/// Atomically replaceable reference to the current corpus.
///
/// Readers take a snapshot with `load` and keep using it for the whole
/// request even if a new corpus is published meanwhile.
#[derive(Debug)]
pub struct CorpusHandle {
    current: ArcSwap<Corpus>,
}

impl CorpusHandle {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            current: ArcSwap::from_pointee(corpus),
        }
    }

    pub fn load(&self) -> Arc<Corpus> {
        self.current.load_full()
    }

    /// Swap in a fully built corpus, returning the previous one
    pub fn publish(&self, corpus: Corpus) -> Arc<Corpus> {
        info!("publishing corpus with {} books", corpus.book_count());
        self.current.swap(Arc::new(corpus))
    }
}

impl Default for CorpusHandle {
    fn default() -> Self {
        Self::new(Corpus::default())
    }
}
