//! Reference resolution
//!
//! Pure functions over the corpus index: a structured reference plus a
//! translation selection becomes per-translation text. Resolution fails
//! per-translation, never globally; versification differences between
//! translations surface as gaps, not errors.

use crate::corpus::{CorpusIndex, TranslationId};
use crate::reference::VerseReference;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One rendered passage for one translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageBlock {
    pub translation: TranslationId,
    /// Display label ("John 3:16", "Psalms 23:1-6")
    pub label: String,
    /// Space-joined verse text in increasing verse order
    pub text: String,
}

/// A translation that could not supply a requested passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionGap {
    pub translation: TranslationId,
    pub label: String,
}

/// Outcome of resolving a reference batch: rendered blocks in input order,
/// plus the per-translation gaps. Gaps never suppress the blocks that did
/// resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolved {
    pub blocks: Vec<PassageBlock>,
    pub gaps: Vec<ResolutionGap>,
}

impl Resolved {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Resolve one reference against a translation selection.
///
/// Translations lacking the book, the chapter, or every verse at or past
/// `start_verse` contribute no entry; a chapter that ends inside the range
/// contributes the verses it has.
pub fn resolve(
    corpus: &CorpusIndex,
    reference: &VerseReference,
    translations: &[TranslationId],
) -> BTreeMap<TranslationId, String> {
    let mut out = BTreeMap::new();
    for &id in translations {
        let Some(translation) = corpus.translation(id) else {
            continue;
        };
        let Some(chapter) = translation.chapter(reference.book_code(), reference.chapter())
        else {
            continue;
        };
        let verses: Vec<&str> = (reference.start_verse()..=reference.end_verse())
            .filter_map(|v| chapter.get(v as usize - 1))
            .map(String::as_str)
            .collect();
        if verses.is_empty() {
            continue;
        }
        out.insert(id, verses.join(" "));
    }
    out
}

/// Resolve a parsed batch in input order, translation order within each
/// reference following the caller's selection order.
pub fn resolve_batch(
    corpus: &CorpusIndex,
    references: &[VerseReference],
    translations: &[TranslationId],
) -> Resolved {
    let mut resolved = Resolved::default();
    for reference in references {
        let texts = resolve(corpus, reference, translations);
        let label = reference.label();
        for &id in translations {
            match texts.get(&id) {
                Some(text) => resolved.blocks.push(PassageBlock {
                    translation: id,
                    label: label.clone(),
                    text: text.clone(),
                }),
                None => resolved.gaps.push(ResolutionGap {
                    translation: id,
                    label: label.clone(),
                }),
            }
        }
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{CorpusBook, TranslationCorpus};
    use crate::reference;

    fn corpus() -> CorpusIndex {
        let mut index = CorpusIndex::new();
        // KJV John 3 has 3 verses here; ASV John 3 only 2.
        index.insert(
            TranslationId::Kjv,
            TranslationCorpus::from_books(vec![CorpusBook {
                name: "John".into(),
                short_code: "jo".into(),
                chapters: vec![
                    vec!["kjv 1:1".into()],
                    vec!["kjv 2:1".into()],
                    vec!["kjv 3:1".into(), "kjv 3:2".into(), "kjv 3:3".into()],
                ],
            }]),
        );
        index.insert(
            TranslationId::Asv,
            TranslationCorpus::from_books(vec![CorpusBook {
                name: "John".into(),
                short_code: "jo".into(),
                chapters: vec![
                    vec!["asv 1:1".into()],
                    vec!["asv 2:1".into()],
                    vec!["asv 3:1".into(), "asv 3:2".into()],
                ],
            }]),
        );
        index
    }

    fn refs(text: &str) -> Vec<crate::reference::VerseReference> {
        reference::parse(text).unwrap()
    }

    #[test]
    fn range_joins_verses_in_order() {
        let index = corpus();
        let r = &refs("John 3:1-3")[0];
        let texts = resolve(&index, r, &[TranslationId::Kjv]);
        assert_eq!(texts[&TranslationId::Kjv], "kjv 3:1 kjv 3:2 kjv 3:3");
    }

    #[test]
    fn missing_verse_is_absent_not_defaulted() {
        let index = corpus();
        let r = &refs("John 3:3")[0];
        let texts = resolve(&index, r, &[TranslationId::Kjv, TranslationId::Asv]);
        assert_eq!(texts.get(&TranslationId::Kjv).unwrap(), "kjv 3:3");
        assert!(!texts.contains_key(&TranslationId::Asv));
    }

    #[test]
    fn range_past_chapter_end_is_truncated_to_existing_verses() {
        let index = corpus();
        let r = &refs("John 3:2-9")[0];
        let texts = resolve(&index, r, &[TranslationId::Asv]);
        assert_eq!(texts[&TranslationId::Asv], "asv 3:2");
    }

    #[test]
    fn unloaded_translation_contributes_nothing() {
        let index = corpus();
        let r = &refs("John 3:1")[0];
        let texts = resolve(&index, r, &[TranslationId::Nlt]);
        assert!(texts.is_empty());
    }

    #[test]
    fn batch_blocks_follow_input_order_and_record_gaps() {
        let index = corpus();
        let resolved = resolve_batch(
            &index,
            &refs("John 3:3, John 1:1"),
            &[TranslationId::Kjv, TranslationId::Asv],
        );
        let labels: Vec<_> = resolved
            .blocks
            .iter()
            .map(|b| (b.translation, b.label.as_str()))
            .collect();
        assert_eq!(
            labels,
            vec![
                (TranslationId::Kjv, "John 3:3"),
                (TranslationId::Kjv, "John 1:1"),
                (TranslationId::Asv, "John 1:1"),
            ]
        );
        assert_eq!(
            resolved.gaps,
            vec![ResolutionGap {
                translation: TranslationId::Asv,
                label: "John 3:3".into()
            }]
        );
    }
}
