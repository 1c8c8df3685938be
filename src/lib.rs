/// This crate is a hybrid book recommendation engine.
/// It ranks books by borrowing co-occurrence and by declared reader taste,
/// and measures ranking quality offline.
pub mod config;
pub mod error;
pub mod recommender;
pub mod utils;

/// Recommender
/// The top-level struct of this crate. It answers item-to-item and
/// user-to-item requests and runs the evaluation harness.
///
/// Internally, it holds:
/// - A swappable handle to the current `Corpus`
/// - A validated `RecommenderConfig`
/// - An optional external `PreferenceStore`
/// - A `RandomSource` for hybrid sampling
///
/// `Recommender<R>` is generic over the random source. The default
/// `ThreadRandom` draws fresh randomness per call; `SeededRandom` makes
/// hybrid results reproducible.
pub use recommender::{EvaluationReport, Recommender, UserQuery};

/// Corpus
/// Every derived structure the recommenders read: the catalog, reader
/// profiles, the borrow count matrix, the item-item similarity matrix and
/// the fitted feature space.
///
/// Immutable once built. `CorpusHandle` publishes a rebuilt corpus
/// atomically while readers keep the snapshot they loaded.
pub use recommender::corpus::{Corpus, CorpusHandle};

/// Input records
/// - `Book`: catalog row with raw categorical fields
/// - `Loan`: one borrow event
/// - `PreferenceProfile`: declared taste of one reader
/// - `PreferenceStore`: lookup of profiles by id
pub use recommender::record::{Book, InMemoryPreferenceStore, Loan, PreferenceProfile, PreferenceStore};

/// Item query and selection options
/// `ItemQuery` is built with `ItemQuery::new(anchor, n)` and refined with
/// its builder methods.
pub use recommender::rank::similar::ItemQuery;
pub use recommender::rank::{AvailabilityFilter, Recommendation, Recommendations, SelectionMode, Source};

/// Evaluation results and relevance definitions
pub use recommender::evaluate::relevance::{MatchKind, RelevanceMode};
pub use recommender::evaluate::Evaluation;

pub use config::{EvaluationConfig, RecommenderConfig};
pub use error::{RecommendError, Result};
pub use utils::random::{RandomSource, SeededRandom, ThreadRandom};
