//! Hybrid book recommendation.
//!
//! Two signals feed the rankings: who borrowed what (item-item cosine of
//! borrower counts) and what readers say they like (cosine of multi-hot
//! category vectors). `Recommender` ties both to one shared, swappable
//! `Corpus`.

pub mod corpus;
pub mod evaluate;
pub mod feature;
pub mod interaction;
pub mod rank;
pub mod record;

use std::sync::Arc;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::RecommenderConfig;
use crate::error::Result;
use crate::utils::random::{RandomSource, ThreadRandom};

use self::corpus::{Corpus, CorpusHandle};
use self::evaluate::explain::{self, UserExplanation};
use self::evaluate::relevance::RelevanceMode;
use self::evaluate::Evaluation;
use self::rank::preference::recommend_for_profile;
use self::rank::similar::{recommend_similar, ItemQuery};
use self::rank::Recommendations;
use self::record::{Book, Loan, PreferenceProfile, PreferenceStore};

/// Who to recommend for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserQuery {
    /// stored reader, looked up in the preference store
    Id(String),
    /// profile supplied with the request, not necessarily stored anywhere
    Profile(PreferenceProfile),
}

/// Evaluation at the configured K plus the threshold sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub overall: Evaluation,
    pub threshold_sweep: Vec<Evaluation>,
}

/// Entry point for every recommendation and evaluation call.
///
/// Each call takes one snapshot of the current corpus and uses it
/// throughout, so a concurrent `reload` never mixes two corpora in a
/// single response.
pub struct Recommender<R = ThreadRandom>
where
    R: RandomSource,
{
    handle: CorpusHandle,
    config: RecommenderConfig,
    /// overrides the profiles the corpus was built from
    store: Option<Arc<dyn PreferenceStore>>,
    rng: R,
}

impl Recommender<ThreadRandom> {
    pub fn new(corpus: Corpus, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            handle: CorpusHandle::new(corpus),
            config,
            store: None,
            rng: ThreadRandom,
        })
    }
}

impl<R> Recommender<R>
where
    R: RandomSource,
{
    /// Replace the random source, e.g. with `SeededRandom` in tests
    pub fn with_random<S: RandomSource>(self, rng: S) -> Recommender<S> {
        Recommender {
            handle: self.handle,
            config: self.config,
            store: self.store,
            rng,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn PreferenceStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Snapshot of the corpus currently published
    pub fn corpus(&self) -> Arc<Corpus> {
        self.handle.load()
    }

    /// Query for `anchor` with the configured default count
    pub fn item_query(&self, anchor: impl Into<String>) -> ItemQuery {
        ItemQuery::new(anchor, self.config.default_count)
    }

    pub fn recommend_by_item(&self, query: &ItemQuery) -> Result<Recommendations> {
        let corpus = self.handle.load();
        recommend_similar(&corpus, query, &self.config, &self.rng)
    }

    /// Preference ranking for a stored reader or a supplied profile.
    /// An unknown reader id yields an empty list.
    pub fn recommend_by_user(&self, query: &UserQuery, n: usize) -> Recommendations {
        let corpus = self.handle.load();
        match query {
            UserQuery::Profile(profile) => recommend_for_profile(&corpus, profile, n),
            UserQuery::Id(id) => {
                let profile = match &self.store {
                    Some(store) => store.preference(id),
                    None => corpus.preference(id),
                };
                match profile {
                    Some(profile) => recommend_for_profile(&corpus, &profile, n),
                    None => {
                        warn!("no preference profile for user {:?}", id);
                        Recommendations::default()
                    }
                }
            }
        }
    }

    /// Evaluate at `k` and sweep `thresholds` (the configured ones when `None`)
    pub fn evaluate(&self, k: usize, mode: RelevanceMode, thresholds: Option<&[f64]>) -> Result<EvaluationReport> {
        let corpus = self.handle.load();
        let thresholds = thresholds.unwrap_or(self.config.evaluation.thresholds.as_slice());
        let overall = evaluate::evaluate(&corpus, k, mode, None)?;
        let threshold_sweep = evaluate::sweep_thresholds(&corpus, k, mode, thresholds)?;
        info!(
            "precision@{} {:.4}, recall@{} {:.4} over {} readers",
            k, overall.avg_precision, k, overall.avg_recall, overall.evaluated_users
        );
        Ok(EvaluationReport { overall, threshold_sweep })
    }

    /// `evaluate` with K, relevance mode and thresholds from the config
    pub fn evaluate_configured(&self) -> Result<EvaluationReport> {
        let eval = &self.config.evaluation;
        self.evaluate(eval.k, eval.relevance, None)
    }

    /// Evaluation for each configured K
    pub fn sweep_k(&self, mode: RelevanceMode, threshold: Option<f64>) -> Result<Vec<Evaluation>> {
        let corpus = self.handle.load();
        evaluate::sweep_k(&corpus, &self.config.evaluation.k_values, mode, threshold)
    }

    pub fn explain_user(&self, user_id: &str, k: usize) -> Option<UserExplanation> {
        explain::explain_user(&self.handle.load(), user_id, k)
    }

    pub fn sample_explanations(&self, k: usize, num_users: usize) -> Vec<UserExplanation> {
        explain::sample_explanations(&self.handle.load(), k, num_users, &self.rng)
    }

    /// Build a corpus from fresh records and publish it.
    /// Returns the corpus it replaced.
    pub fn reload(&self, books: Vec<Book>, loans: &[Loan], profiles: Vec<PreferenceProfile>) -> Arc<Corpus> {
        self.handle.publish(Corpus::build(books, loans, profiles))
    }
}
