//! Rapid verse selection
//!
//! Keystroke-driven narrowing from free text to a fully specified
//! reference: Book → Chapter → Verse, forward only, full reset otherwise.
//! The machine never blocks on invalid input; when the text stops looking
//! like a single in-progress reference (empty, comma-separated batch, or a
//! verse range) it steps aside and lets ordinary parsing handle it.
//!
//! The machine is pure state: it consumes input text and key presses and
//! reports what the surrounding UI should show. Completion (a fully
//! qualified reference plus an auto-triggered lookup) is reported in the
//! update, not performed here.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use vcast_common::books::{self, Book};
use vcast_common::corpus::CorpusIndex;

/// Chapter grids render this many columns.
///
/// Row width is fixed rather than derived from rendered cell geometry,
/// so keyboard navigation stays independent of the UI toolkit.
pub const CHAPTER_GRID_COLUMNS: usize = 5;
/// Verse grids render this many columns
pub const VERSE_GRID_COLUMNS: usize = 6;

/// Narrowing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Book,
    Chapter,
    Verse,
}

/// Navigation keys the machine consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyInput {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Escape,
}

/// One book candidate for the dropdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookCandidate {
    pub code: String,
    pub name: String,
}

/// Candidate list to render
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Candidates {
    /// Book matches, rendered as a vertical list
    Books { items: Vec<BookCandidate> },
    /// Chapter or verse numbers, rendered as a grid
    Grid { items: Vec<u32>, columns: usize },
}

/// What the UI should show after an input or key event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionUpdate {
    pub mode: SelectionMode,
    /// When set, the machine rewrote the input field to this text
    pub input: Option<String>,
    /// Candidate list; `None` means no dropdown
    pub candidates: Option<Candidates>,
    /// Highlighted candidate index
    pub cursor: Option<usize>,
    /// Fully qualified reference text; the caller auto-triggers a lookup
    pub completed: Option<String>,
    /// The machine stepped aside; treat the event as ordinary input
    pub pass_through: bool,
}

#[derive(Debug, Default)]
struct Outcome {
    input: Option<String>,
    completed: Option<String>,
    pass_through: bool,
}

#[derive(Debug)]
enum CandidateList {
    Hidden,
    Books(Vec<&'static Book>),
    Numbers(Vec<u32>),
}

enum Pick {
    Book(&'static Book),
    Number(u32),
}

/// The rapid-selection state machine
pub struct RapidSelector {
    corpus: Arc<CorpusIndex>,
    mode: SelectionMode,
    book: Option<&'static Book>,
    chapter: Option<u32>,
    candidates: CandidateList,
    cursor: Option<usize>,
}

impl RapidSelector {
    pub fn new(corpus: Arc<CorpusIndex>) -> Self {
        Self {
            corpus,
            mode: SelectionMode::Book,
            book: None,
            chapter: None,
            candidates: CandidateList::Hidden,
            cursor: None,
        }
    }

    /// Feed the current input-field text through the machine
    pub fn handle_input(&mut self, text: &str) -> SelectionUpdate {
        let mut out = Outcome::default();
        let trimmed = text.trim();

        if trimmed.is_empty() {
            self.reset();
            out.pass_through = true;
        } else if trimmed.contains(',') || has_range_marker(trimmed) {
            // Batches and verse ranges belong to the ordinary parser.
            self.reset();
            out.pass_through = true;
        } else if self.book.is_some() && self.chapter.is_some() {
            let segment = last_segment(trimmed);
            if is_digits(segment) {
                self.show_verse_options(Some(segment), &mut out);
            }
        } else if self.book.is_some() {
            let segment = last_segment(trimmed);
            if is_digits(segment) {
                self.show_chapter_options(Some(segment), &mut out);
            } else {
                self.show_chapter_options(None, &mut out);
            }
        } else {
            self.show_book_options(trimmed, &mut out);
        }

        self.snapshot(out)
    }

    /// Feed a navigation key through the machine
    pub fn handle_key(&mut self, key: KeyInput) -> SelectionUpdate {
        let mut out = Outcome::default();
        match key {
            // Escape clears the candidates but keeps the book/chapter lock.
            KeyInput::Escape => self.hide(),
            KeyInput::Enter => match self.cursor {
                Some(index) => self.activate(index, &mut out),
                None => out.pass_through = true,
            },
            _ => self.move_cursor(key),
        }
        self.snapshot(out)
    }

    /// Activate a candidate by index, as a mouse click would
    pub fn select_candidate(&mut self, index: usize) -> SelectionUpdate {
        let mut out = Outcome::default();
        self.activate(index, &mut out);
        self.snapshot(out)
    }

    /// Drop all locks and candidates
    pub fn reset(&mut self) {
        self.mode = SelectionMode::Book;
        self.book = None;
        self.chapter = None;
        self.hide();
    }

    fn hide(&mut self) {
        self.candidates = CandidateList::Hidden;
        self.cursor = None;
    }

    fn show_book_options(&mut self, query: &str, out: &mut Outcome) {
        let q = query.to_lowercase();
        let matches: Vec<&'static Book> = books::BOOKS
            .iter()
            .filter(|b| {
                b.name.to_lowercase().contains(&q)
                    || b.code.starts_with(&q)
                    || b.aliases.iter().any(|a| a.starts_with(&q))
            })
            .collect();

        if matches.is_empty() {
            self.hide();
            return;
        }

        // A lone candidate auto-advances only on an exact short code or
        // alias, never on a bare prefix.
        if matches.len() == 1 {
            let book = matches[0];
            if book.code == q || book.aliases.contains(&q.as_str()) {
                self.select_book(book, out);
                return;
            }
        }

        self.mode = SelectionMode::Book;
        self.candidates = CandidateList::Books(matches);
        self.cursor = None;
    }

    fn select_book(&mut self, book: &'static Book, out: &mut Outcome) {
        self.book = Some(book);
        self.chapter = None;
        self.mode = SelectionMode::Chapter;
        self.cursor = None;
        out.input = Some(format!("{} ", book.name));

        // Single-chapter books skip straight to verse selection.
        if self.corpus.chapter_count(book.code) == Some(1) {
            self.chapter = Some(1);
            self.mode = SelectionMode::Verse;
            out.input = Some(format!("{} 1:", book.name));
            self.show_verse_options(None, out);
        } else {
            self.show_chapter_options(None, out);
        }
    }

    fn show_chapter_options(&mut self, prefix: Option<&str>, out: &mut Outcome) {
        let Some(book) = self.book else {
            self.hide();
            return;
        };
        let Some(count) = self.corpus.chapter_count(book.code) else {
            self.hide();
            return;
        };
        let filtered = filter_numbers(count, prefix);
        if filtered.is_empty() {
            self.hide();
            return;
        }
        if filtered.len() == 1 && prefix.is_some() {
            self.select_chapter(filtered[0], out);
            return;
        }
        self.mode = SelectionMode::Chapter;
        self.candidates = CandidateList::Numbers(filtered);
        self.cursor = None;
    }

    fn select_chapter(&mut self, chapter: u32, out: &mut Outcome) {
        let Some(book) = self.book else { return };
        self.chapter = Some(chapter);
        self.mode = SelectionMode::Verse;
        self.cursor = None;
        out.input = Some(format!("{} {}:", book.name, chapter));
        self.show_verse_options(None, out);
    }

    fn show_verse_options(&mut self, prefix: Option<&str>, out: &mut Outcome) {
        let (Some(book), Some(chapter)) = (self.book, self.chapter) else {
            self.hide();
            return;
        };
        let Some(count) = self.corpus.verse_count(book.code, chapter) else {
            self.hide();
            return;
        };
        let filtered = filter_numbers(count, prefix);
        if filtered.is_empty() {
            self.hide();
            return;
        }
        if filtered.len() == 1 && prefix.is_some() {
            self.complete_verse(filtered[0], out);
            return;
        }
        self.mode = SelectionMode::Verse;
        self.candidates = CandidateList::Numbers(filtered);
        self.cursor = None;
    }

    fn complete_verse(&mut self, verse: u32, out: &mut Outcome) {
        let (Some(book), Some(chapter)) = (self.book, self.chapter) else {
            return;
        };
        let text = format!("{} {}:{}", book.name, chapter, verse);
        out.input = Some(text.clone());
        out.completed = Some(text);
        self.hide();
    }

    fn activate(&mut self, index: usize, out: &mut Outcome) {
        let pick = match &self.candidates {
            CandidateList::Books(items) => items.get(index).copied().map(Pick::Book),
            CandidateList::Numbers(items) => items.get(index).copied().map(Pick::Number),
            CandidateList::Hidden => None,
        };
        match pick {
            Some(Pick::Book(book)) => self.select_book(book, out),
            Some(Pick::Number(n)) => match self.mode {
                SelectionMode::Chapter => self.select_chapter(n, out),
                SelectionMode::Verse => self.complete_verse(n, out),
                SelectionMode::Book => {}
            },
            None => {}
        }
    }

    fn move_cursor(&mut self, key: KeyInput) {
        let (len, grid) = match &self.candidates {
            CandidateList::Hidden => return,
            CandidateList::Books(items) => (items.len(), false),
            CandidateList::Numbers(items) => (items.len(), true),
        };
        if len == 0 {
            return;
        }
        let width = if grid { self.columns() } else { 1 };
        let last = len - 1;
        // Clamped movement, no wraparound.
        self.cursor = match (key, grid) {
            (KeyInput::Down, _) => Some(self.cursor.map_or(0, |i| (i + width).min(last))),
            (KeyInput::Up, _) => Some(self.cursor.map_or(0, |i| i.saturating_sub(width))),
            (KeyInput::Right, true) => Some(self.cursor.map_or(0, |i| (i + 1).min(last))),
            (KeyInput::Left, true) => Some(self.cursor.map_or(0, |i| i.saturating_sub(1))),
            _ => self.cursor,
        };
    }

    fn columns(&self) -> usize {
        match self.mode {
            SelectionMode::Chapter => CHAPTER_GRID_COLUMNS,
            SelectionMode::Verse => VERSE_GRID_COLUMNS,
            SelectionMode::Book => 1,
        }
    }

    fn snapshot(&self, out: Outcome) -> SelectionUpdate {
        SelectionUpdate {
            mode: self.mode,
            input: out.input,
            candidates: self.render_candidates(),
            cursor: self.cursor,
            completed: out.completed,
            pass_through: out.pass_through,
        }
    }

    fn render_candidates(&self) -> Option<Candidates> {
        match &self.candidates {
            CandidateList::Hidden => None,
            CandidateList::Books(items) => Some(Candidates::Books {
                items: items
                    .iter()
                    .map(|b| BookCandidate {
                        code: b.code.to_string(),
                        name: b.name.to_string(),
                    })
                    .collect(),
            }),
            CandidateList::Numbers(items) => Some(Candidates::Grid {
                items: items.clone(),
                columns: self.columns(),
            }),
        }
    }
}

/// True when the text carries a `chapter:verse-` range shape
fn has_range_marker(text: &str) -> bool {
    text.match_indices(':').any(|(pos, _)| {
        let rest = &text.as_bytes()[pos + 1..];
        let digits = rest.iter().take_while(|b| b.is_ascii_digit()).count();
        digits > 0 && rest.get(digits) == Some(&b'-')
    })
}

/// Last whitespace/colon-separated segment of the input
fn last_segment(text: &str) -> &str {
    text.split(|c: char| c.is_whitespace() || c == ':')
        .filter(|s| !s.is_empty())
        .last()
        .unwrap_or("")
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn filter_numbers(count: u32, prefix: Option<&str>) -> Vec<u32> {
    (1..=count)
        .filter(|n| prefix.map_or(true, |p| n.to_string().starts_with(p)))
        .collect()
}
