//! Card projection for note lists.
//!
//! # Responsibility
//! - Build presentation-neutral card models from notes.
//! - Derive a plain-text excerpt when markdown rendering is switched off.
//!
//! # Invariants
//! - Projection never mutates notes.
//! - Plain-text excerpts are capped at `PLAIN_EXCERPT_MAX_CHARS` chars.

use crate::controller::modal::ViewMode;
use crate::model::note::{format_timestamp, Note};
use once_cell::sync::Lazy;
use regex::Regex;

const PLAIN_EXCERPT_MAX_CHARS: usize = 100;

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)]\([^)]*\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\*_`#>~]+|^\s*[-+]\s+").expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Read model for one note card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteCard {
    pub id: String,
    /// Raw content in markdown mode, stripped text in plain-text mode.
    pub excerpt: String,
    /// ISO-8601 creation timestamp.
    pub created_at: String,
    /// ISO-8601 last update timestamp.
    pub updated_at: String,
    /// Whether the note was edited after creation.
    pub edited: bool,
}

impl NoteCard {
    pub fn project(note: &Note, view_mode: ViewMode) -> Self {
        let excerpt = match view_mode {
            ViewMode::Markdown => note.content().to_string(),
            ViewMode::PlainText => plain_text_excerpt(note.content()),
        };
        Self {
            id: note.id().to_string(),
            excerpt,
            created_at: format_timestamp(note.created_at()),
            updated_at: format_timestamp(note.updated_at()),
            edited: note.is_edited(),
        }
    }
}

/// Projects a whole ordered collection.
pub fn project_cards(notes: &[Note], view_mode: ViewMode) -> Vec<NoteCard> {
    notes
        .iter()
        .map(|note| NoteCard::project(note, view_mode))
        .collect()
}

/// Strips markdown syntax and collapses whitespace.
///
/// Image alt text and link labels are kept; URLs are dropped.
pub fn plain_text_excerpt(content: &str) -> String {
    let stripped_lines = content
        .lines()
        .map(|line| {
            let without_images = MARKDOWN_IMAGE_RE.replace_all(line, "$1");
            let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
            MARKDOWN_SYMBOL_RE
                .replace_all(&without_links, " ")
                .into_owned()
        })
        .collect::<Vec<_>>()
        .join(" ");
    let normalized = WHITESPACE_RE.replace_all(&stripped_lines, " ");
    normalized
        .trim()
        .chars()
        .take(PLAIN_EXCERPT_MAX_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{plain_text_excerpt, project_cards, PLAIN_EXCERPT_MAX_CHARS};
    use crate::controller::modal::ViewMode;
    use crate::store::note_store::NoteStore;

    #[test]
    fn plain_text_excerpt_strips_markdown_and_keeps_labels() {
        let source = "# Title\n\n- [docs](https://example.com) and ![cover](a.png)\n**bold** `code`";
        let excerpt = plain_text_excerpt(source);
        assert_eq!(excerpt, "Title docs and cover bold code");
    }

    #[test]
    fn plain_text_excerpt_is_capped() {
        let excerpt = plain_text_excerpt(&"word ".repeat(100));
        assert_eq!(excerpt.chars().count(), PLAIN_EXCERPT_MAX_CHARS);
    }

    #[test]
    fn markdown_mode_keeps_raw_content() {
        let mut store = NoteStore::new();
        store.add("**raw**").unwrap();
        let cards = project_cards(store.list(), ViewMode::Markdown);
        assert_eq!(cards[0].excerpt, "**raw**");
        assert!(!cards[0].edited);
        assert!(cards[0].created_at.ends_with('Z'));
    }
}
