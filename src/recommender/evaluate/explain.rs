use std::fmt;

use serde::{Deserialize, Serialize};

use crate::recommender::corpus::{Corpus, ReaderEntry};
use crate::recommender::evaluate::relevance::{MatchKind, RelevanceMode, RelevanceOracle};
use crate::recommender::rank::preference::score_catalog;
use crate::utils::random::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplainedItem {
    pub id: String,
    pub title: String,
    pub score: f64,
    pub genres: Vec<String>,
    pub language: Option<String>,
    pub kind: MatchKind,
}

/// A reader's top-K with how each book matches their declared taste
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserExplanation {
    pub user_id: String,
    pub genres: Vec<String>,
    pub language: Option<String>,
    pub items: Vec<ExplainedItem>,
}

impl fmt::Display for UserExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User {}", self.user_id)?;
        writeln!(f, "  genres: {:?}", self.genres)?;
        writeln!(f, "  language: {}", self.language.as_deref().unwrap_or("-"))?;
        for (rank, item) in self.items.iter().enumerate() {
            writeln!(
                f,
                "  {}. {} ({}) score {:.4} genres {:?} language {} [{}]",
                rank + 1,
                item.title,
                item.id,
                item.score,
                item.genres,
                item.language.as_deref().unwrap_or("-"),
                item.kind
            )?;
        }
        Ok(())
    }
}

fn explain_reader(corpus: &Corpus, reader: &ReaderEntry, k: usize) -> UserExplanation {
    // classification reports both kinds of match regardless of mode
    let oracle = RelevanceOracle::new(&reader.features, RelevanceMode::GenreOrLanguage);
    let items = score_catalog(corpus, &reader.vector)
        .into_iter()
        .take(k)
        .map(|(e, score)| ExplainedItem {
            id: e.book.id.clone(),
            title: e.book.title.clone(),
            score,
            genres: e.features.genres.clone(),
            language: e.features.language.clone(),
            kind: oracle.classify(&e.features),
        })
        .collect();
    UserExplanation {
        user_id: reader.profile.id.clone(),
        genres: reader.features.genres.clone(),
        language: reader.features.language.clone(),
        items,
    }
}

/// Top-`k` of one reader, `None` for an unknown id
pub fn explain_user(corpus: &Corpus, user_id: &str, k: usize) -> Option<UserExplanation> {
    corpus.reader(user_id).map(|r| explain_reader(corpus, r, k))
}

/// Explanations for up to `num_users` readers drawn at random
pub fn sample_explanations<R>(corpus: &Corpus, k: usize, num_users: usize, rng: &R) -> Vec<UserExplanation>
where
    R: RandomSource + ?Sized,
{
    let readers: Vec<&ReaderEntry> = corpus.readers().collect();
    rng.sample_indices(readers.len(), num_users)
        .into_iter()
        .map(|i| explain_reader(corpus, readers[i], k))
        .collect()
}
