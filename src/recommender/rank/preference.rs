use rayon::prelude::*;

use crate::recommender::corpus::{CatalogEntry, Corpus};
use crate::recommender::feature::{FeatureRow, FeatureVector};
use crate::recommender::rank::{Recommendation, Recommendations, Source};
use crate::recommender::record::PreferenceProfile;
use crate::utils::sort::by_score_desc_then_id;

/// Every catalog book scored against `vector`, best first, ties by id
pub fn score_catalog<'a>(corpus: &'a Corpus, vector: &FeatureVector) -> Vec<(&'a CatalogEntry, f64)> {
    let entries: Vec<&CatalogEntry> = corpus.books().collect();
    let mut scored: Vec<(&CatalogEntry, f64)> = entries
        .into_par_iter()
        .map(|e| (e, vector.cosine(&e.vector)))
        .collect();
    scored.sort_by(|a, b| by_score_desc_then_id((a.0.book.id.as_str(), a.1), (b.0.book.id.as_str(), b.1)));
    scored
}

/// Top `n` books for a reader profile by cosine of the encoded vectors.
///
/// The profile is encoded against the corpus' fitted columns only; unseen
/// categories contribute nothing. A profile matching nothing still yields
/// `n` books, all scored 0.0. An empty catalog or feature space yields
/// nothing.
pub fn recommend_for_profile(corpus: &Corpus, profile: &PreferenceProfile, n: usize) -> Recommendations {
    if n == 0 || !has_feature_matrix(corpus) {
        return Recommendations::default();
    }
    let vector = corpus.features().transform(&FeatureRow::from_profile(profile));
    recommend_for_vector(corpus, &vector, n)
}

/// Whether there is anything to score against
pub fn has_feature_matrix(corpus: &Corpus) -> bool {
    corpus.book_count() > 0 && corpus.features().dim() > 0
}

/// Top `n` books for an already encoded vector
pub fn recommend_for_vector(corpus: &Corpus, vector: &FeatureVector, n: usize) -> Recommendations {
    if !has_feature_matrix(corpus) {
        return Recommendations::default();
    }
    Recommendations::new(
        score_catalog(corpus, vector)
            .into_iter()
            .take(n)
            .map(|(e, score)| Recommendation::from_entry(e, score, Source::Preference))
            .collect(),
    )
}
