use ahash::RandomState;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Catalog row as supplied by the loading layer.
///
/// Categorical fields stay raw here; multi-valued ones may be wrapped in
/// braces or brackets and comma separated (`"{Romance,Fantasy & Sci-Fi}"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub cover_type: String,
    #[serde(default)]
    pub content_type: String,
    /// usage / availability tag, e.g. "For Rent"
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub themes: Option<String>,
}

/// One borrow event. Only the (user, book) pair matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loan {
    pub user_id: String,
    pub book_id: String,
}

impl Loan {
    pub fn new(user_id: impl Into<String>, book_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            book_id: book_id.into(),
        }
    }
}

/// Declared reading taste of one user.
///
/// Language, favorite genres, book types and formats feed the feature
/// vector. Everything else is descriptive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceProfile {
    pub id: String,
    pub age_group: String,
    pub education_level: String,
    pub city: String,
    pub reading_frequency: String,
    pub reading_time_availability: String,
    pub reader_type: String,
    pub reading_habits: String,
    pub preferred_language: String,
    pub favorite_genres: Vec<String>,
    /// content types, e.g. "fiction"
    pub preferred_book_types: Vec<String>,
    /// cover types, e.g. "paperback"
    pub preferred_formats: Vec<String>,
    pub desired_feelings: Vec<String>,
    pub disliked_genres: Vec<String>,
}

/// Lookup of preference profiles by user id.
/// An unknown id is `None`, never an error.
pub trait PreferenceStore: Send + Sync {
    fn preference(&self, id: &str) -> Option<PreferenceProfile>;
}

/// Thread-safe in-process preference store
#[derive(Debug, Default)]
pub struct InMemoryPreferenceStore {
    profiles: DashMap<Box<str>, PreferenceProfile, RandomState>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self {
            profiles: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Insert or replace the profile stored under `profile.id`
    pub fn upsert(&self, profile: PreferenceProfile) {
        self.profiles.insert(profile.id.as_str().into(), profile);
    }

    pub fn remove(&self, id: &str) -> Option<PreferenceProfile> {
        self.profiles.remove(id).map(|(_, p)| p)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl FromIterator<PreferenceProfile> for InMemoryPreferenceStore {
    fn from_iter<T: IntoIterator<Item = PreferenceProfile>>(iter: T) -> Self {
        let store = Self::new();
        for profile in iter {
            store.upsert(profile);
        }
        store
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn preference(&self, id: &str) -> Option<PreferenceProfile> {
        self.profiles.get(id).map(|entry| entry.value().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: &str, language: &str) -> PreferenceProfile {
        PreferenceProfile {
            id: id.to_string(),
            preferred_language: language.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn store_lookup_and_upsert() {
        let store: InMemoryPreferenceStore = vec![profile("u1", "english")].into_iter().collect();
        assert_eq!(store.len(), 1);
        assert_eq!(store.preference("u1").unwrap().preferred_language, "english");
        assert!(store.preference("missing").is_none());

        store.upsert(profile("u1", "indonesian"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.preference("u1").unwrap().preferred_language, "indonesian");

        assert!(store.remove("u1").is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn profile_deserializes_with_missing_fields() {
        let json = r#"{"id":"7","favorite_genres":["romance"]}"#;
        let p: PreferenceProfile = serde_json::from_str(json).unwrap();
        assert_eq!(p.id, "7");
        assert_eq!(p.favorite_genres, vec!["romance".to_string()]);
        assert!(p.preferred_language.is_empty());
    }

    #[test]
    fn book_deserializes_with_optional_metadata_missing() {
        let json = r#"{"id":"b1","title":"Dune","genre":"{Fantasy & Sci-Fi}"}"#;
        let b: Book = serde_json::from_str(json).unwrap();
        assert!(b.author.is_empty());
        assert!(b.themes.is_none());
    }
}
