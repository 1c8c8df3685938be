//! Offline evaluation of preference ranking against declared taste.
//!
//! Every reader with a usable criterion is ranked against the whole catalog
//! and scored with Precision@K and Recall@K; the per-reader values are then
//! averaged. Readers are evaluated in parallel.

pub mod explain;
pub mod metrics;
pub mod relevance;

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{check_threshold, RecommendError, Result};
use crate::recommender::corpus::{Corpus, ReaderEntry};
use crate::recommender::rank::preference::{has_feature_matrix, score_catalog};

use self::metrics::{mean, precision_at_k, recall_at_k};
use self::relevance::{RelevanceMode, RelevanceOracle};

/// Averaged metrics of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub k: usize,
    pub mode: RelevanceMode,
    /// acceptance threshold, `None` when every book was eligible
    pub threshold: Option<f64>,
    pub avg_precision: f64,
    pub avg_recall: f64,
    /// readers that contributed to the averages
    pub evaluated_users: usize,
}

/// Precision and recall of one reader, `None` when the reader is skipped
fn score_reader(
    corpus: &Corpus,
    reader: &ReaderEntry,
    k: usize,
    mode: RelevanceMode,
    threshold: Option<f64>,
) -> Option<(f64, f64)> {
    let oracle = RelevanceOracle::new(&reader.features, mode);
    if !oracle.has_criterion() {
        return None;
    }
    let relevant_total = corpus.books().filter(|e| oracle.is_relevant(&e.features)).count();
    if relevant_total == 0 {
        return None;
    }

    let ranked = score_catalog(corpus, &reader.vector);
    let top: Vec<_> = match threshold {
        Some(t) => ranked.into_iter().filter(|(_, s)| *s > t).take(k).collect(),
        None => ranked.into_iter().take(k).collect(),
    };
    if threshold.is_some() && top.is_empty() {
        return None;
    }

    let hits = top.iter().filter(|(e, _)| oracle.is_relevant(&e.features)).count();
    Some((precision_at_k(hits, k), recall_at_k(hits, relevant_total)))
}

/// Average Precision@K and Recall@K over all readers of the corpus.
///
/// With a threshold only books scoring strictly above it are eligible and
/// readers left with none are skipped. No evaluable reader, an empty
/// catalog or an empty feature space yields 0 for both averages.
pub fn evaluate(corpus: &Corpus, k: usize, mode: RelevanceMode, threshold: Option<f64>) -> Result<Evaluation> {
    if k == 0 {
        return Err(RecommendError::invalid("k", "must be at least 1"));
    }
    if let Some(t) = threshold {
        check_threshold("threshold", t)?;
    }

    if !has_feature_matrix(corpus) {
        debug!("nothing to evaluate: {} books, {} feature columns", corpus.book_count(), corpus.features().dim());
        return Ok(Evaluation {
            k,
            mode,
            threshold,
            avg_precision: 0.0,
            avg_recall: 0.0,
            evaluated_users: 0,
        });
    }

    let readers: Vec<&ReaderEntry> = corpus.readers().collect();
    let scores: Vec<(f64, f64)> = readers
        .par_iter()
        .filter_map(|reader| score_reader(corpus, reader, k, mode, threshold))
        .collect();
    let (precisions, recalls): (Vec<f64>, Vec<f64>) = scores.into_iter().unzip();

    let evaluation = Evaluation {
        k,
        mode,
        threshold,
        avg_precision: mean(&precisions),
        avg_recall: mean(&recalls),
        evaluated_users: precisions.len(),
    };
    debug!(
        "evaluated {} of {} readers at k={} ({:?}, threshold {:?})",
        evaluation.evaluated_users,
        readers.len(),
        k,
        mode,
        threshold
    );
    Ok(evaluation)
}

/// One evaluation per threshold, in the given order
pub fn sweep_thresholds(corpus: &Corpus, k: usize, mode: RelevanceMode, thresholds: &[f64]) -> Result<Vec<Evaluation>> {
    let points = thresholds
        .iter()
        .map(|&t| evaluate(corpus, k, mode, Some(t)))
        .collect::<Result<Vec<_>>>()?;
    for p in &points {
        info!(
            "threshold {:.2}: precision@{} {:.4}, recall@{} {:.4}",
            p.threshold.unwrap_or_default(),
            k,
            p.avg_precision,
            k,
            p.avg_recall
        );
    }
    Ok(points)
}

/// One evaluation per K, in the given order
pub fn sweep_k(corpus: &Corpus, k_values: &[usize], mode: RelevanceMode, threshold: Option<f64>) -> Result<Vec<Evaluation>> {
    let points = k_values
        .iter()
        .map(|&k| evaluate(corpus, k, mode, threshold))
        .collect::<Result<Vec<_>>>()?;
    for p in &points {
        info!("k {}: precision {:.4}, recall {:.4}", p.k, p.avg_precision, p.avg_recall);
    }
    Ok(points)
}
