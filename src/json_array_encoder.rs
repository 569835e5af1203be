use std::io::Write;

use serde::Serialize;

use crate::Result;
use crate::card_encoder::CardEncoder;
use crate::cards::CardRecord;

/// A `CardEncoder` that writes cards as a single JSON array.
///
/// Design:
/// - We stream output directly to a `Write` implementation to avoid buffering
///   all cards in memory.
/// - The encoder is stateful so we can emit a well-formed JSON array incrementally.
/// - Deck tags, when present, are repeated on every element so each object stands alone.
///
/// Example output:
/// ```json
/// [
///   { "prompt": "[First Line] (A - T)", "answer": "Line1", "title": "T", "artist": "A" },
///   { "prompt": "[Beginning]<br>Line1", "answer": "Line2", "title": "T", "artist": "A" }
/// ]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    /// The underlying writer we stream JSON into.
    w: W,

    tags: Vec<String>,

    /// Whether we have written the opening `[` of the JSON array.
    started: bool,

    /// Whether the next element will be the first element in the array.
    /// This lets us correctly place commas between elements.
    first: bool,

    /// Whether the encoder has been closed.
    /// Once closed, no further writes are allowed.
    closed: bool,
}

#[derive(Serialize)]
struct JsonCard<'a> {
    #[serde(flatten)]
    card: &'a CardRecord,

    #[serde(skip_serializing_if = "no_tags")]
    tags: &'a [String],
}

fn no_tags(tags: &&[String]) -> bool {
    tags.is_empty()
}

impl<W: Write> JsonArrayEncoder<W> {
    /// Create a new JSON array encoder that writes to the given writer.
    ///
    /// The JSON array is opened lazily on the first write or on close.
    pub fn new(w: W, tags: &[String]) -> Self {
        Self {
            w,
            tags: tags.to_vec(),
            started: false,
            first: true,
            closed: false,
        }
    }

    /// Write the opening `[` of the JSON array if we have not already done so.
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"[")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> CardEncoder for JsonArrayEncoder<W> {
    /// Serialize a single card and append it to the JSON array.
    fn write_card(&mut self, card: &CardRecord) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write card: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        // Write a comma before every element except the first.
        if !self.first {
            self.w.write_all(b",")?;
        }
        self.first = false;

        let element = JsonCard {
            card,
            tags: &self.tags,
        };
        serde_json::to_writer(&mut self.w, &element)?;

        Ok(())
    }

    /// Finalize the JSON array and flush the underlying writer.
    ///
    /// This method is idempotent:
    /// - Calling `close()` multiple times is safe.
    /// - After closing, no further cards may be written.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        // Ensure we still output a valid JSON array even if no cards were written.
        self.start_if_needed()?;

        self.w.write_all(b"]")?;
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}
