use std::io::{Read, Write};

use csv::{ReaderBuilder, Terminator, WriterBuilder};

use crate::card_encoder::CardEncoder;
use crate::cards::CardRecord;
use crate::{Error, Result};

/// Prefix of the optional first line that hands tags to Anki's importer.
pub const TAGS_PREFIX: &str = "tags:";

/// A `CardEncoder` that writes the four-column CSV Anki's text importer expects.
///
/// Layout:
/// - optional `tags:<space separated tags>` line (only when tags were given)
/// - one `prompt,answer,title,artist` row per card
///
/// The tags line is not a CSV record: it is written verbatim so tag text is never quoted.
/// Tags are split on whitespace before writing, so a tag can't break the line apart.
/// The line is emitted lazily on the first card or on close, so constructing an encoder
/// writes nothing.
pub struct CsvEncoder<W: Write> {
    /// The writer before the tags line went out.
    pending: Option<W>,

    /// The row writer, created once the tags line is written.
    rows: Option<csv::Writer<W>>,

    tags: Vec<String>,

    /// Whether the encoder has been closed.
    closed: bool,
}

impl<W: Write> CsvEncoder<W> {
    /// Create a new CSV encoder that writes to the provided writer.
    pub fn new(w: W, tags: &[String]) -> Self {
        Self {
            pending: Some(w),
            rows: None,
            tags: tags
                .iter()
                .flat_map(|t| t.split_whitespace())
                .map(str::to_string)
                .collect(),
            closed: false,
        }
    }

    /// Write the tags line (if any) and switch over to the row writer.
    fn start_if_needed(&mut self) -> Result<()> {
        let Some(mut w) = self.pending.take() else {
            return Ok(());
        };

        let tags_res = if self.tags.is_empty() {
            Ok(())
        } else {
            writeln!(w, "{TAGS_PREFIX}{}", self.tags.join(" "))
        };

        self.rows = Some(
            WriterBuilder::new()
                .has_headers(false)
                .terminator(Terminator::Any(b'\n'))
                .from_writer(w),
        );

        Ok(tags_res?)
    }

    fn row_writer(&mut self) -> Result<&mut csv::Writer<W>> {
        self.start_if_needed()?;
        self.rows
            .as_mut()
            .ok_or_else(|| Error::msg("CSV row writer was not initialized"))
    }
}

impl<W: Write> CardEncoder for CsvEncoder<W> {
    fn write_card(&mut self, card: &CardRecord) -> Result<()> {
        if self.closed {
            return Err(Error::msg("cannot write card: encoder is already closed"));
        }

        self.row_writer()?.write_record(card.columns())?;
        Ok(())
    }

    /// Flush the underlying writer. This is idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.row_writer()?.flush()?;
        self.closed = true;

        Ok(())
    }
}

/// Encode a whole card sequence in one go.
pub fn encode<W: Write>(cards: &[CardRecord], tags: &[String], w: W) -> Result<()> {
    let mut encoder = CsvEncoder::new(w, tags);
    for card in cards {
        encoder.write_card(card)?;
    }
    encoder.close()
}

/// Cards and tags recovered from an encoded deck.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub tags: Vec<String>,
    pub cards: Vec<CardRecord>,
}

/// Parse a deck written by [`CsvEncoder`].
///
/// A first line starting with `tags:` is read as the tags line. Every other row must have
/// exactly four fields.
///
/// A deck without tags whose first prompt itself starts with an unquoted `tags:` can't be
/// told apart from a tagged deck; that row is read as the tags line. Decks built by
/// [`crate::cards::build`] never hit this because their first prompt starts with
/// `[First Line]`. Any tag at all avoids it too, since the real tags line then comes
/// first.
pub fn decode<R: Read>(mut r: R) -> Result<Deck> {
    let mut text = String::new();
    r.read_to_string(&mut text).map_err(Error::Input)?;

    let mut deck = Deck::default();
    let mut body = text.as_str();
    if let Some(rest) = body.strip_prefix(TAGS_PREFIX) {
        let (tags, remainder) = rest.split_once('\n').unwrap_or((rest, ""));
        deck.tags = tags.split_whitespace().map(str::to_string).collect();
        body = remainder;
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body.as_bytes());

    for (idx, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| Error::msg(format!("invalid CSV row {}: {e}", idx + 1)))?;
        if record.len() != 4 {
            return Err(Error::msg(format!(
                "row {} has {} fields, expected 4",
                idx + 1,
                record.len()
            )));
        }
        deck.cards.push(CardRecord::new(
            &record[0], &record[1], &record[2], &record[3],
        ));
    }

    Ok(deck)
}
