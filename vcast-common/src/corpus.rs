//! Corpus index
//!
//! In-memory store of the four translation corpora. Each translation loads
//! all-or-nothing from its own JSON file; a failed load disables that
//! translation only. Read-only after load.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

/// Identifier of one translation corpus
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum TranslationId {
    Kjv,
    Asv,
    Web,
    Nlt,
}

impl TranslationId {
    /// All known translations, in preference order for cardinality queries
    pub const ALL: [TranslationId; 4] = [
        TranslationId::Kjv,
        TranslationId::Asv,
        TranslationId::Web,
        TranslationId::Nlt,
    ];

    /// Uppercase display form ("KJV")
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationId::Kjv => "KJV",
            TranslationId::Asv => "ASV",
            TranslationId::Web => "WEB",
            TranslationId::Nlt => "NLT",
        }
    }

    /// Corpus file stem ("kjv" for kjv.json)
    pub fn file_stem(&self) -> &'static str {
        match self {
            TranslationId::Kjv => "kjv",
            TranslationId::Asv => "asv",
            TranslationId::Web => "web",
            TranslationId::Nlt => "nlt",
        }
    }
}

impl fmt::Display for TranslationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranslationId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "KJV" => Ok(TranslationId::Kjv),
            "ASV" => Ok(TranslationId::Asv),
            "WEB" => Ok(TranslationId::Web),
            "NLT" => Ok(TranslationId::Nlt),
            other => Err(Error::UnknownTranslation(other.to_string())),
        }
    }
}

/// One book of one translation as stored on disk
#[derive(Debug, Clone, Deserialize)]
pub struct CorpusBook {
    /// Display name as the corpus file spells it (unused for joins)
    #[serde(default)]
    pub name: String,
    /// Canonical short code, the cross-translation join key
    #[serde(rename = "shortCode")]
    pub short_code: String,
    /// Chapters in order, each an ordered list of verse strings
    pub chapters: Vec<Vec<String>>,
}

/// One complete translation, keyed by canonical short code
#[derive(Debug, Default)]
pub struct TranslationCorpus {
    books: HashMap<String, CorpusBook>,
}

impl TranslationCorpus {
    /// Build from a parsed book list.
    ///
    /// Books with short codes outside the canonical table are kept but are
    /// unreachable by any parsed reference.
    pub fn from_books(books: Vec<CorpusBook>) -> Self {
        Self {
            books: books.into_iter().map(|b| (b.short_code.clone(), b)).collect(),
        }
    }

    /// Parse a corpus file (all-or-nothing)
    pub fn load_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let books: Vec<CorpusBook> = serde_json::from_str(&raw)?;
        Ok(Self::from_books(books))
    }

    /// Look up a book by canonical short code
    pub fn book(&self, code: &str) -> Option<&CorpusBook> {
        self.books.get(code)
    }

    /// Verse list of one chapter (chapter is 1-indexed)
    pub fn chapter(&self, code: &str, chapter: u32) -> Option<&[String]> {
        let book = self.book(code)?;
        let idx = (chapter as usize).checked_sub(1)?;
        book.chapters.get(idx).map(|c| c.as_slice())
    }
}

/// All loaded translations
#[derive(Debug, Default)]
pub struct CorpusIndex {
    translations: HashMap<TranslationId, TranslationCorpus>,
}

impl CorpusIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every translation found under `dir` (`<stem>.json` per
    /// translation). A missing or malformed file is logged and skipped;
    /// the remaining translations stay available.
    pub fn load_dir(dir: &Path) -> Self {
        let mut index = Self::new();
        for id in TranslationId::ALL {
            let path = dir.join(format!("{}.json", id.file_stem()));
            match TranslationCorpus::load_file(&path) {
                Ok(corpus) => {
                    info!("Loaded {} corpus from {}", id, path.display());
                    index.insert(id, corpus);
                }
                Err(e) => {
                    warn!("Skipping {} corpus ({}): {}", id, path.display(), e);
                }
            }
        }
        index
    }

    pub fn insert(&mut self, id: TranslationId, corpus: TranslationCorpus) {
        self.translations.insert(id, corpus);
    }

    pub fn translation(&self, id: TranslationId) -> Option<&TranslationCorpus> {
        self.translations.get(&id)
    }

    /// Translations currently available, in preference order
    pub fn loaded(&self) -> Vec<TranslationId> {
        TranslationId::ALL
            .into_iter()
            .filter(|id| self.translations.contains_key(id))
            .collect()
    }

    /// Chapter count for a book, from the first loaded translation that
    /// carries it. Used by the rapid-selection engine for its grids.
    pub fn chapter_count(&self, code: &str) -> Option<u32> {
        self.first_book(code).map(|b| b.chapters.len() as u32)
    }

    /// Verse count of one chapter, from the first loaded translation that
    /// carries the book (chapter is 1-indexed)
    pub fn verse_count(&self, code: &str, chapter: u32) -> Option<u32> {
        let book = self.first_book(code)?;
        let idx = (chapter as usize).checked_sub(1)?;
        book.chapters.get(idx).map(|c| c.len() as u32)
    }

    fn first_book(&self, code: &str) -> Option<&CorpusBook> {
        TranslationId::ALL
            .into_iter()
            .filter_map(|id| self.translations.get(&id))
            .find_map(|t| t.book(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn book(code: &str, chapters: &[usize]) -> CorpusBook {
        CorpusBook {
            name: code.to_string(),
            short_code: code.to_string(),
            chapters: chapters
                .iter()
                .enumerate()
                .map(|(c, &n)| {
                    (1..=n).map(|v| format!("{code} {}:{v} text", c + 1)).collect()
                })
                .collect(),
        }
    }

    #[test]
    fn cardinalities_come_from_first_loaded_translation() {
        let mut index = CorpusIndex::new();
        index.insert(
            TranslationId::Asv,
            TranslationCorpus::from_books(vec![book("zc", &[21, 13, 10])]),
        );
        assert_eq!(index.chapter_count("zc"), Some(3));
        assert_eq!(index.verse_count("zc", 3), Some(10));
        assert_eq!(index.verse_count("zc", 4), None);
        assert_eq!(index.chapter_count("jo"), None);
    }

    #[test]
    fn chapter_access_is_one_indexed() {
        let corpus = TranslationCorpus::from_books(vec![book("ob", &[21])]);
        assert_eq!(corpus.chapter("ob", 1).unwrap().len(), 21);
        assert!(corpus.chapter("ob", 0).is_none());
        assert!(corpus.chapter("ob", 2).is_none());
    }

    #[test]
    fn load_dir_skips_broken_translations() {
        let dir = tempfile::tempdir().unwrap();
        let kjv = serde_json::json!([
            {"name": "John", "shortCode": "jo", "chapters": [["In the beginning was the Word"]]}
        ]);
        std::fs::write(dir.path().join("kjv.json"), kjv.to_string()).unwrap();
        let mut bad = std::fs::File::create(dir.path().join("asv.json")).unwrap();
        bad.write_all(b"{ not json").unwrap();

        let index = CorpusIndex::load_dir(dir.path());
        assert_eq!(index.loaded(), vec![TranslationId::Kjv]);
        assert!(index.translation(TranslationId::Asv).is_none());
        assert_eq!(index.chapter_count("jo"), Some(1));
    }

    #[test]
    fn translation_id_round_trips_through_strings() {
        for id in TranslationId::ALL {
            assert_eq!(id.as_str().parse::<TranslationId>().unwrap(), id);
        }
        assert!("NIV".parse::<TranslationId>().is_err());
    }
}
