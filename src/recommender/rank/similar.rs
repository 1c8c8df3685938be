use std::collections::HashSet;

use log::debug;

use crate::config::RecommenderConfig;
use crate::error::{check_threshold, Result};
use crate::recommender::corpus::Corpus;
use crate::recommender::rank::fallback::{recommend_fallback, FallbackRequest};
use crate::recommender::rank::{AvailabilityFilter, Recommendation, Recommendations, SelectionMode, Source};
use crate::utils::random::RandomSource;
use crate::utils::sort::by_score_desc_then_id;

/// Item-to-item request.
///
/// ```ignore
/// let query = ItemQuery::new("B-102", 5)
///     .mode(SelectionMode::Hybrid)
///     .threshold(0.2)
///     .exclude(["B-007"]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ItemQuery {
    pub anchor: String,
    pub n: usize,
    pub mode: SelectionMode,
    /// overrides `RecommenderConfig::min_similarity`
    pub threshold: Option<f64>,
    /// overrides `RecommenderConfig::availability`
    pub availability: Option<AvailabilityFilter>,
    /// ids that must not appear in the response
    pub exclude: HashSet<String>,
}

impl ItemQuery {
    pub fn new(anchor: impl Into<String>, n: usize) -> Self {
        Self {
            anchor: anchor.into(),
            n,
            mode: SelectionMode::Deterministic,
            threshold: None,
            availability: None,
            exclude: HashSet::new(),
        }
    }

    pub fn mode(mut self, mode: SelectionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn availability(mut self, availability: AvailabilityFilter) -> Self {
        self.availability = Some(availability);
        self
    }

    pub fn exclude<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(ids.into_iter().map(Into::into));
        self
    }
}

/// Books borrowed by the same readers as the anchor.
///
/// Neighbours scoring above zero and at least the threshold are ranked by
/// similarity. When fewer than `n` survive the catalog join and filters the
/// gap is topped up from the genre fallback, never beyond the configured
/// fallback share. An anchor nobody borrowed is answered by the fallback alone.
pub fn recommend_similar<R>(
    corpus: &Corpus,
    query: &ItemQuery,
    config: &RecommenderConfig,
    rng: &R,
) -> Result<Recommendations>
where
    R: RandomSource + ?Sized,
{
    let threshold = query.threshold.unwrap_or(config.min_similarity);
    check_threshold("threshold", threshold)?;
    let n = query.n;
    if n == 0 {
        return Ok(Recommendations::default());
    }

    let anchor = query.anchor.as_str();
    let availability = query
        .availability
        .clone()
        .unwrap_or_else(|| AvailabilityFilter::from_pattern(config.availability.as_deref()));
    let genres: &[String] = corpus
        .book(anchor)
        .map(|e| e.features.genres.as_slice())
        .unwrap_or(&[]);

    let Some(neighbours) = corpus.similarity().neighbours(anchor) else {
        debug!("anchor {:?} has no borrowing history, using genre fallback", anchor);
        let request = FallbackRequest {
            genres,
            anchor,
            count: n,
            availability: &availability,
            exclude: &query.exclude,
            mode: query.mode,
        };
        return Ok(recommend_fallback(corpus, &request, rng));
    };

    let mut ranked: Vec<(&str, f64)> = neighbours
        .filter(|&(_, score)| score > 0.0 && score >= threshold)
        .collect();
    ranked.sort_by(|a, b| by_score_desc_then_id(*a, *b));

    let selected: Vec<(&str, f64)> = match query.mode {
        SelectionMode::Deterministic => ranked.into_iter().take(n).collect(),
        SelectionMode::Hybrid => {
            ranked.truncate(config.hybrid_pool_size);
            rng.sample_indices(ranked.len(), n)
                .into_iter()
                .map(|i| ranked[i])
                .collect()
        }
    };

    let mut out = Recommendations::new(
        selected
            .into_iter()
            .filter(|&(id, _)| id != anchor && !query.exclude.contains(id))
            .filter_map(|(id, score)| {
                corpus
                    .book(id)
                    .filter(|e| availability.admits(&e.book.usage))
                    .map(|e| Recommendation::from_entry(e, score, Source::Similarity))
            })
            .collect(),
    );
    out.dedup_by_id();

    if out.len() < n {
        let count = (n - out.len()).min(config.fallback_cap(n));
        if count > 0 {
            let mut exclude = query.exclude.clone();
            exclude.extend(out.iter().map(|r| r.id.clone()));
            let request = FallbackRequest {
                genres,
                anchor,
                count,
                availability: &availability,
                exclude: &exclude,
                mode: query.mode,
            };
            let fallback = recommend_fallback(corpus, &request, rng);
            debug!(
                "anchor {:?}: {} similar, {} fallback of {} requested",
                anchor,
                out.len(),
                fallback.len(),
                n
            );
            out.extend(fallback);
        }
    }

    out.dedup_by_id().sort_by_score().truncate(n);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RecommendError;
    use crate::recommender::fixtures;
    use crate::recommender::record::Loan;
    use crate::utils::random::SeededRandom;

    fn config() -> RecommenderConfig {
        RecommenderConfig::default()
    }

    #[test]
    fn ranks_neighbours_and_tops_up_with_fallback() {
        let corpus = fixtures::corpus();
        let query = ItemQuery::new("A", 2).threshold(0.0);
        let out = recommend_similar(&corpus, &query, &config(), &SeededRandom::new(0)).unwrap();
        assert_eq!(out.ids(), vec!["B", "C"]);
        assert_eq!(out.list[0].source, Source::Similarity);
        assert!((out.list[0].score - 1.0).abs() < 1e-9);
        assert_eq!(out.list[1].source, Source::Fallback);
        assert_eq!(out.list[1].score, 0.0);
    }

    #[test]
    fn fallback_share_caps_the_top_up() {
        let corpus = fixtures::corpus();
        // one similar neighbour, cap floor(4 * 0.5) = 2, only C is eligible
        let out = recommend_similar(&corpus, &ItemQuery::new("A", 4), &config(), &SeededRandom::new(0)).unwrap();
        assert_eq!(out.ids(), vec!["B", "C"]);

        let mut strict = config();
        strict.fallback_share = 0.0;
        let out = recommend_similar(&corpus, &ItemQuery::new("A", 4), &strict, &SeededRandom::new(0)).unwrap();
        assert_eq!(out.ids(), vec!["B"]);
    }

    #[test]
    fn never_returns_anchor_or_excluded_ids() {
        let corpus = fixtures::corpus();
        for anchor in ["A", "B", "C", "D", "E", "missing"] {
            let query = ItemQuery::new(anchor, 5).exclude(["B"]);
            let out = recommend_similar(&corpus, &query, &config(), &SeededRandom::new(1)).unwrap();
            assert!(out.len() <= 5);
            assert!(out.iter().all(|r| r.id != anchor && r.id != "B"));
            let mut ids = out.ids();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), out.len());
        }
    }

    #[test]
    fn unborrowed_anchor_gets_pure_fallback() {
        let corpus = fixtures::corpus();
        let query = ItemQuery::new("E", 3);
        let out = recommend_similar(&corpus, &query, &config(), &SeededRandom::new(0)).unwrap();
        let availability = AvailabilityFilter::from_pattern(config().availability.as_deref());
        let genres = vec!["Fantasy".to_string()];
        let expected = recommend_fallback(
            &corpus,
            &FallbackRequest {
                genres: &genres,
                anchor: "E",
                count: 3,
                availability: &availability,
                exclude: &HashSet::new(),
                mode: SelectionMode::Deterministic,
            },
            &SeededRandom::new(0),
        );
        assert_eq!(out, expected);
        assert_eq!(out.ids(), vec!["A", "B", "C"]);
        assert!(out.iter().all(|r| r.score == 0.0));
    }

    #[test]
    fn unknown_anchor_without_genre_is_empty() {
        let corpus = fixtures::corpus();
        let out = recommend_similar(&corpus, &ItemQuery::new("missing", 3), &config(), &SeededRandom::new(0)).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn deterministic_mode_is_repeatable() {
        let corpus = fixtures::corpus();
        let query = ItemQuery::new("A", 3);
        let first = recommend_similar(&corpus, &query, &config(), &SeededRandom::new(3)).unwrap();
        let second = recommend_similar(&corpus, &query, &config(), &SeededRandom::new(99)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn hybrid_picks_come_from_the_top_pool() {
        let corpus = fixtures::corpus();
        let mut cfg = config();
        cfg.hybrid_pool_size = 1;
        let query = ItemQuery::new("A", 1).mode(SelectionMode::Hybrid);
        let rng = SeededRandom::new(11);
        for _ in 0..10 {
            let out = recommend_similar(&corpus, &query, &cfg, &rng).unwrap();
            assert_eq!(out.ids(), vec!["B"]);
        }
    }

    /// Anchor X borrowed by u00..u19; N{i} borrowed by u00..u{i},
    /// so similarity to X grows with i and all twenty neighbours are positive.
    fn wide_corpus() -> Corpus {
        let mut books = vec![fixtures::books().remove(0)];
        books[0].id = "X".into();
        let mut loans = Vec::new();
        for u in 0..20 {
            loans.push(Loan::new(format!("u{u:02}"), "X"));
        }
        for i in 0..20 {
            let mut book = fixtures::books().remove(1);
            book.id = format!("N{i:02}");
            books.push(book);
            for u in 0..=i {
                loans.push(Loan::new(format!("u{u:02}"), format!("N{i:02}")));
            }
        }
        Corpus::build(books, &loans, Vec::new())
    }

    #[test]
    fn hybrid_draws_only_from_the_deterministic_top_pool() {
        let corpus = wide_corpus();
        let cfg = config();
        assert!(corpus.similarity().neighbours("X").unwrap().filter(|(_, s)| *s > 0.0).count() > cfg.hybrid_pool_size);

        let top = recommend_similar(&corpus, &ItemQuery::new("X", cfg.hybrid_pool_size), &cfg, &SeededRandom::new(0)).unwrap();
        assert_eq!(top.len(), 15);
        assert_eq!(top.list[0].id, "N19");
        let top_ids: HashSet<&str> = top.ids().into_iter().collect();

        let n = 5;
        let query = ItemQuery::new("X", n).mode(SelectionMode::Hybrid);
        let rng = SeededRandom::new(2024);
        let mut seen = HashSet::new();
        for _ in 0..50 {
            let out = recommend_similar(&corpus, &query, &cfg, &rng).unwrap();
            assert!(out.len() <= n);
            let fallback = out.iter().filter(|r| r.source == Source::Fallback).count();
            assert!(fallback <= n / 2);
            for r in out.iter().filter(|r| r.source == Source::Similarity) {
                assert!(top_ids.contains(r.id.as_str()), "{} outside the top pool", r.id);
                seen.insert(r.id.clone());
            }
        }
        // N00..N04 rank below the pool and must never be drawn
        assert!(seen.iter().all(|id| id.as_str() >= "N05"));
        assert!(seen.len() > n);
    }

    #[test]
    fn zero_count_and_bad_threshold() {
        let corpus = fixtures::corpus();
        let out = recommend_similar(&corpus, &ItemQuery::new("A", 0), &config(), &SeededRandom::new(0)).unwrap();
        assert!(out.is_empty());
        let err = recommend_similar(&corpus, &ItemQuery::new("A", 3).threshold(f64::NAN), &config(), &SeededRandom::new(0))
            .unwrap_err();
        assert!(matches!(err, RecommendError::InvalidParameter { param: "threshold", .. }));
    }

    #[test]
    fn availability_override_filters_candidates() {
        let corpus = fixtures::corpus();
        let query = ItemQuery::new("A", 3).availability(AvailabilityFilter::Contains("For Sale".into()));
        let out = recommend_similar(&corpus, &query, &config(), &SeededRandom::new(0)).unwrap();
        assert!(out.is_empty());
    }
}
