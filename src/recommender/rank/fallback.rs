use std::collections::HashSet;

use crate::recommender::corpus::{CatalogEntry, Corpus};
use crate::recommender::rank::{AvailabilityFilter, Recommendation, Recommendations, SelectionMode, Source};
use crate::utils::random::RandomSource;
use crate::utils::sort::by_score_desc_then_id;

/// Parameters of a genre/popularity fallback lookup
#[derive(Debug, Clone)]
pub struct FallbackRequest<'a> {
    /// canonical genres of the anchor
    pub genres: &'a [String],
    pub anchor: &'a str,
    pub count: usize,
    pub availability: &'a AvailabilityFilter,
    pub exclude: &'a HashSet<String>,
    pub mode: SelectionMode,
}

/// Popular books sharing a genre with the anchor.
///
/// Candidates must be borrowable at least in principle: present in the
/// similarity index, admitted by the availability filter, neither the
/// anchor nor excluded. Every entry scores exactly 0.0. Returns fewer than
/// `count` when the pool is smaller.
pub fn recommend_fallback<R>(corpus: &Corpus, request: &FallbackRequest<'_>, rng: &R) -> Recommendations
where
    R: RandomSource + ?Sized,
{
    if request.count == 0 || request.genres.is_empty() {
        return Recommendations::default();
    }
    let interactions = corpus.interactions();
    let mut pool: Vec<(&CatalogEntry, u64)> = corpus
        .books()
        .filter(|e| {
            let id = e.book.id.as_str();
            id != request.anchor
                && !request.exclude.contains(id)
                && corpus.similarity().contains(id)
                && request.availability.admits(&e.book.usage)
                && e.features.genres.iter().any(|g| request.genres.contains(g))
        })
        .map(|e| (e, interactions.popularity(&e.book.id)))
        .collect();
    // popularity descending, id ascending on ties
    pool.sort_by(|a, b| by_score_desc_then_id((a.0.book.id.as_str(), a.1 as f64), (b.0.book.id.as_str(), b.1 as f64)));

    let picked: Vec<&CatalogEntry> = match request.mode {
        SelectionMode::Deterministic => pool.iter().take(request.count).map(|(e, _)| *e).collect(),
        SelectionMode::Hybrid => rng
            .sample_indices(pool.len(), request.count)
            .into_iter()
            .map(|i| pool[i].0)
            .collect(),
    };

    let mut out = Recommendations::new(
        picked
            .into_iter()
            .map(|e| Recommendation::from_entry(e, 0.0, Source::Fallback))
            .collect(),
    );
    out.dedup_by_id();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommender::fixtures;
    use crate::utils::random::SeededRandom;

    fn request<'a>(
        genres: &'a [String],
        anchor: &'a str,
        count: usize,
        availability: &'a AvailabilityFilter,
        exclude: &'a HashSet<String>,
        mode: SelectionMode,
    ) -> FallbackRequest<'a> {
        FallbackRequest { genres, anchor, count, availability, exclude, mode }
    }

    #[test]
    fn ranks_same_genre_by_popularity_with_zero_score() {
        let corpus = fixtures::corpus();
        let genres = vec!["Fantasy".to_string()];
        let any = AvailabilityFilter::Any;
        let none = HashSet::new();
        let out = recommend_fallback(
            &corpus,
            &request(&genres, "A", 5, &any, &none, SelectionMode::Deterministic),
            &SeededRandom::new(0),
        );
        // B and C tie on popularity, id breaks the tie; E was never borrowed
        assert_eq!(out.ids(), vec!["B", "C"]);
        assert!(out.iter().all(|r| r.score == 0.0 && r.source == Source::Fallback));
    }

    #[test]
    fn honours_exclusions_and_availability() {
        let corpus = fixtures::corpus();
        let genres = vec!["Fantasy".to_string()];
        let exclude: HashSet<String> = ["B".to_string()].into_iter().collect();
        let rent = AvailabilityFilter::Contains("For Rent".into());
        let out = recommend_fallback(
            &corpus,
            &request(&genres, "A", 5, &rent, &exclude, SelectionMode::Deterministic),
            &SeededRandom::new(0),
        );
        assert_eq!(out.ids(), vec!["C"]);

        let sale = AvailabilityFilter::Contains("For Sale".into());
        let out = recommend_fallback(
            &corpus,
            &request(&genres, "A", 5, &sale, &HashSet::new(), SelectionMode::Deterministic),
            &SeededRandom::new(0),
        );
        assert!(out.is_empty());
    }

    #[test]
    fn unknown_genre_or_zero_count_is_empty() {
        let corpus = fixtures::corpus();
        let any = AvailabilityFilter::Any;
        let none = HashSet::new();
        let out = recommend_fallback(&corpus, &request(&[], "Z", 3, &any, &none, SelectionMode::Deterministic), &SeededRandom::new(0));
        assert!(out.is_empty());
        let genres = vec!["Fantasy".to_string()];
        let out = recommend_fallback(&corpus, &request(&genres, "A", 0, &any, &none, SelectionMode::Deterministic), &SeededRandom::new(0));
        assert!(out.is_empty());
    }

    #[test]
    fn hybrid_draws_distinct_members_of_the_pool() {
        let corpus = fixtures::corpus();
        let genres = vec!["Fantasy".to_string()];
        let any = AvailabilityFilter::Any;
        let none = HashSet::new();
        let rng = SeededRandom::new(7);
        for _ in 0..20 {
            let out = recommend_fallback(&corpus, &request(&genres, "A", 1, &any, &none, SelectionMode::Hybrid), &rng);
            assert_eq!(out.len(), 1);
            assert!(["B", "C"].contains(&out.ids()[0]));
        }
    }
}
