//! Scripture reference parsing
//!
//! Turns free text like `"John 3:16"`, `"1 Corinthians 13:4-8"` or the
//! comma-separated batch `"John 3:16, Genesis 1:1"` into structured
//! references. Parsing is pure: no corpus access, no side effects; whether
//! the verse actually exists in a given translation is the resolver's
//! problem.

use crate::books;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed verse reference.
///
/// Only the parser produces these; the fields are immutable once built.
/// `end_verse == start_verse` for a single verse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerseReference {
    book_code: String,
    chapter: u32,
    start_verse: u32,
    end_verse: u32,
}

impl VerseReference {
    pub fn book_code(&self) -> &str {
        &self.book_code
    }

    pub fn chapter(&self) -> u32 {
        self.chapter
    }

    pub fn start_verse(&self) -> u32 {
        self.start_verse
    }

    pub fn end_verse(&self) -> u32 {
        self.end_verse
    }

    /// Display label, e.g. `"John 3:16"` or `"Psalms 23:1-6"`.
    ///
    /// Re-parsing a label yields a structurally equal reference.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VerseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = books::by_code(&self.book_code)
            .map(|b| b.name)
            .unwrap_or(self.book_code.as_str());
        write!(f, "{} {}:{}", name, self.chapter, self.start_verse)?;
        if self.end_verse > self.start_verse {
            write!(f, "-{}", self.end_verse)?;
        }
        Ok(())
    }
}

/// Parse a reference line, possibly comma-separated into a batch.
///
/// Every substring must parse; the first failure fails the whole batch with
/// the offending substring in the error.
pub fn parse(input: &str) -> Result<Vec<VerseReference>> {
    let parts: Vec<&str> = input
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    if parts.is_empty() {
        return Err(Error::parse_reference(input.trim()));
    }
    parts.into_iter().map(parse_single).collect()
}

/// Parse one `<book> <chapter>:<verse>[-<verse>]` reference
fn parse_single(raw: &str) -> Result<VerseReference> {
    let err = || Error::parse_reference(raw);
    let trimmed = raw.trim();

    // The numeric part is the last whitespace-separated token; everything
    // before it is the book designator ("1 Corinthians", "Song of Solomon").
    let (designator, numbers) = trimmed
        .rsplit_once(|c: char| c.is_whitespace())
        .ok_or_else(err)?;

    let book = books::match_designator(designator).ok_or_else(err)?;

    let (chapter_part, verse_part) = numbers.split_once(':').ok_or_else(err)?;
    let chapter = parse_number(chapter_part).ok_or_else(err)?;

    let (start_verse, end_verse) = match verse_part.split_once('-') {
        None => {
            let v = parse_number(verse_part).ok_or_else(err)?;
            (v, v)
        }
        Some((start, end)) => {
            let start = parse_number(start).ok_or_else(err)?;
            let end = parse_number(end).ok_or_else(err)?;
            // An inverted range is rejected, never silently swapped.
            if end < start {
                return Err(err());
            }
            (start, end)
        }
    };

    Ok(VerseReference {
        book_code: book.code.to_string(),
        chapter,
        start_verse,
        end_verse,
    })
}

/// Decimal integer >= 1, with no stray characters
fn parse_number(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok().filter(|&n| n >= 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(input: &str) -> VerseReference {
        let mut refs = parse(input).unwrap();
        assert_eq!(refs.len(), 1);
        refs.pop().unwrap()
    }

    #[test]
    fn parses_single_verse() {
        let r = one("John 3:16");
        assert_eq!(r.book_code(), "jo");
        assert_eq!(r.chapter(), 3);
        assert_eq!(r.start_verse(), 16);
        assert_eq!(r.end_verse(), 16);
    }

    #[test]
    fn parses_by_alias_and_code_with_odd_casing() {
        assert_eq!(one("psalm 23:1").book_code(), "ps");
        assert_eq!(one("ZECH 4:6").book_code(), "zc");
        assert_eq!(one("1co 13:4").book_code(), "1co");
        assert_eq!(one("1   Corinthians  13:4").book_code(), "1co");
        assert_eq!(one("Song of Solomon 2:1").book_code(), "so");
    }

    #[test]
    fn parses_verse_range() {
        let r = one("Psalm 23:1-6");
        assert_eq!(r.start_verse(), 1);
        assert_eq!(r.end_verse(), 6);
        // Equal endpoints are a legal one-verse range.
        let r = one("Psalm 23:4-4");
        assert_eq!((r.start_verse(), r.end_verse()), (4, 4));
    }

    #[test]
    fn inverted_range_is_an_error_not_a_swap() {
        match parse("Psalm 23:6-1") {
            Err(Error::ParseReference { input }) => assert_eq!(input, "Psalm 23:6-1"),
            other => panic!("expected ParseReference, got {other:?}"),
        }
    }

    #[test]
    fn batch_preserves_input_order() {
        let refs = parse("John 3:16, Genesis 1:1").unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].book_code(), "jo");
        assert_eq!(refs[1].book_code(), "gn");
    }

    #[test]
    fn batch_failure_names_the_offending_substring() {
        match parse("John 3:16, Xyzzy 9:9") {
            Err(Error::ParseReference { input }) => assert_eq!(input, "Xyzzy 9:9"),
            other => panic!("expected ParseReference, got {other:?}"),
        }
    }

    #[test]
    fn malformed_and_unknown_book_report_the_same_kind() {
        for bad in ["John", "John 3", "John 3:", "John x:1", "3:16", "", "  ,  "] {
            assert!(
                matches!(parse(bad), Err(Error::ParseReference { .. })),
                "{bad:?} should fail to parse"
            );
        }
    }

    #[test]
    fn zero_chapter_or_verse_is_rejected() {
        assert!(parse("John 0:16").is_err());
        assert!(parse("John 3:0").is_err());
    }

    #[test]
    fn label_round_trips() {
        for input in ["John 3:16", "Psalm 23:1-6", "1 cor 13:4-8"] {
            let r = one(input);
            assert_eq!(one(&r.label()), r);
        }
    }
}
