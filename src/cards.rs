//! Card sequence building.
//!
//! Every source line becomes exactly one card whose answer is that line. The prompt is the
//! two lines before it, joined by `<br>` so Anki renders them on separate lines:
//!
//! ```text
//! card 1: [First Line] (Artist - Title)   -> line 1
//! card 2: [Beginning]<br>line 1           -> line 2
//! card i: line i-2<br>line i-1            -> line i
//! ```
//!
//! The first two cards are special because there aren't two lines of context to show yet.

use serde::Serialize;

use crate::metadata::Metadata;
use crate::{Error, Result};

/// Separator Anki renders as a line break inside a field.
pub const LINE_BREAK: &str = "<br>";

/// Marker shown in place of the missing context line on the second card.
pub const BEGINNING_MARKER: &str = "[Beginning]";

/// A single recall card: show `prompt`, recall `answer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    prompt: String,
    answer: String,
    title: String,
    artist: String,
}

impl CardRecord {
    pub fn new(
        prompt: impl Into<String>,
        answer: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            answer: answer.into(),
            title: title.into(),
            artist: artist.into(),
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// The record's fields in host-import column order.
    pub fn columns(&self) -> [&str; 4] {
        [&self.prompt, &self.answer, &self.title, &self.artist]
    }
}

/// Build one card per line, in source order.
///
/// Fails with [`Error::InsufficientInput`] when `lines` has fewer than two entries.
/// Empty lines are kept as ordinary content.
pub fn build<S: AsRef<str>>(lines: &[S], meta: &Metadata) -> Result<Vec<CardRecord>> {
    if lines.len() < 2 {
        return Err(Error::InsufficientInput { found: lines.len() });
    }

    let card = |prompt: String, answer: &str| {
        CardRecord::new(prompt, answer, meta.title(), meta.artist())
    };

    let mut cards = Vec::with_capacity(lines.len());

    let first = lines[0].as_ref();
    cards.push(card(first_line_prompt(meta), first));
    cards.push(card(
        format!("{BEGINNING_MARKER}{LINE_BREAK}{first}"),
        lines[1].as_ref(),
    ));

    for i in 2..lines.len() {
        let (before, previous) = (lines[i - 2].as_ref(), lines[i - 1].as_ref());
        cards.push(card(format!("{before}{LINE_BREAK}{previous}"), lines[i].as_ref()));
    }

    Ok(cards)
}

fn first_line_prompt(meta: &Metadata) -> String {
    format!("[First Line] ({} - {})", meta.artist(), meta.title())
}
