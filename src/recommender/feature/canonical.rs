//! Canonical display names for categorical attributes.

use serde::{Deserialize, Serialize};

/// Categorical attribute that contributes feature columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Genre,
    CoverType,
    ContentType,
    Language,
}

impl Field {
    /// Column name prefix
    pub fn prefix(self) -> &'static str {
        match self {
            Field::Genre => "genre",
            Field::CoverType => "cover_type",
            Field::ContentType => "content_type",
            Field::Language => "language",
        }
    }

    pub fn is_multi_valued(self) -> bool {
        !matches!(self, Field::Language)
    }

    /// Merge runs of parts that together spell a display name, longest run first
    fn rejoin_display_names(self, parts: Vec<String>) -> Vec<String> {
        let table = self.table();
        let mut out = Vec::with_capacity(parts.len());
        let mut i = 0;
        while i < parts.len() {
            let joined = (i + 2..=parts.len())
                .rev()
                .map(|end| (end, parts[i..end].join(", ")))
                .find(|(_, candidate)| table.iter().any(|(_, display)| *display == candidate.as_str()));
            match joined {
                Some((end, display)) => {
                    out.push(display);
                    i = end;
                }
                None => {
                    out.push(parts[i].clone());
                    i += 1;
                }
            }
        }
        out
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Field::Genre => GENRES,
            Field::CoverType => COVER_TYPES,
            Field::ContentType => CONTENT_TYPES,
            Field::Language => LANGUAGES,
        }
    }

    /// Map a raw value onto its display name.
    ///
    /// Known slugs use the table; values that already are display names
    /// are kept; anything else goes through the field's fallback. Blank
    /// input yields `None`.
    pub fn canonical(self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let table = self.table();
        if let Some((_, display)) = table.iter().find(|(slug, _)| *slug == raw) {
            return Some((*display).to_string());
        }
        if table.iter().any(|(_, display)| *display == raw) {
            return Some(raw.to_string());
        }
        Some(match self {
            Field::Genre => title_case(&raw.replace('_', " ")),
            Field::CoverType | Field::ContentType => title_case(raw),
            // languages outside the table pass through untouched
            Field::Language => raw.to_string(),
        })
    }

    /// Split, trim and canonicalize a raw value. Never fails; unparseable
    /// input degrades to an empty list.
    ///
    /// Display names that contain the delimiter themselves survive the
    /// split as one value.
    pub fn canonical_values(self, raw: &str) -> Vec<String> {
        if self.is_multi_valued() {
            self.rejoin_display_names(split_multi_value(raw))
                .into_iter()
                .filter_map(|v| self.canonical(&v))
                .collect()
        } else {
            self.canonical(strip_wrapping(raw.trim())).into_iter().collect()
        }
    }
}

/// Parse `"{a, b}"`, `"[a,b]"` or `"a,b"` into trimmed, unquoted, non-empty parts
pub fn split_multi_value(raw: &str) -> Vec<String> {
    strip_wrapping(raw.trim())
        .split(',')
        .map(|part| part.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}

fn strip_wrapping(raw: &str) -> &str {
    raw.trim_start_matches(['{', '[']).trim_end_matches(['}', ']'])
}

/// Uppercase the first letter of each run of letters, lowercase the rest
pub fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

const LANGUAGES: &[(&str, &str)] = &[
    ("indonesian", "Indonesia"),
    ("english", "Inggris"),
    ("other", "Other"),
];

const CONTENT_TYPES: &[(&str, &str)] = &[
    ("fiction", "Fiction"),
    ("non-fiction", "Nonfiction"),
];

const COVER_TYPES: &[(&str, &str)] = &[
    ("paperback", "Paperback"),
    ("hardcover", "Hardcover"),
    ("ebook", "Ebook"),
    ("audiobook", "Audiobook"),
];

const GENRES: &[(&str, &str)] = &[
    ("arts_architecture", "Arts & Architecture"),
    ("business", "Business"),
    ("children_book", "Children's Books"),
    ("chinese_literature", "Chinese Literature"),
    ("climate_change", "Climate Change"),
    ("colonialism", "Colonialism"),
    ("crc_fict", "Colonialism, Race, Class (Fict.)"),
    ("crime_mystery", "Crime & Mystery"),
    ("critiques_capitalism", "Critiques on Capitalism"),
    ("dystopian_postapocalyptic", "Dystopian & Post-Apocalyptic"),
    ("education", "Education"),
    ("family", "Family"),
    ("fantasy_scifi", "Fantasy & Sci-Fi"),
    ("feminism", "Feminism"),
    ("graphic_novels", "Graphic Novels"),
    ("historical_fiction", "Historical Fiction"),
    ("history", "History"),
    ("indonesian_literature", "Indonesian Literature"),
    ("japanese_literature", "Japanese Literature"),
    ("korean_literature", "Korean Literature"),
    ("literacy_criticalism", "Literacy Criticalism"),
    ("magazine_zine", "Magazine & Zine"),
    ("memoirs_biography", "Memoirs & Biography"),
    ("natural_science", "Natural Science"),
    ("on_womanhood", "On Womanhood"),
    ("other_people", "Other People's Book"),
    ("pets", "Pets!"),
    ("philosophy", "Philosophy"),
    ("poetry_literacy", "Poetry & Literacy Criticism"),
    ("politics_sociology", "Politics & Sociology"),
    ("psychology_selfhelp", "Psychology & Self Help"),
    ("religions", "Religions"),
    ("romance", "Romance"),
    ("russian_literature", "Russian Literature"),
    ("science", "Science"),
    ("self_discovery", "Self Discovery"),
    ("self_help", "Self Help"),
    ("travel", "Travel"),
    ("western_classic_lit", "Western Classic Lit."),
    ("western_classics", "Western Classics"),
    ("western_contemporary", "Western Contemporary Lit."),
    ("world_literature", "World Literature"),
];
