//! High-level API for turning a lyrics file into a deck.
//!
//! This module wires up read lines → build cards → encode, while keeping the lower-level
//! pieces testable in their own modules.
//!
//! Output discipline:
//! - Cards are built before the destination receives a single byte, so a too-short input
//!   never leaves a half-written deck behind.
//! - The encoder is always closed, even when encoding fails part-way.
//! - File outputs go through a temp file that only becomes visible once it was written
//!   completely; on any error the temp file is removed.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, info, warn};

use crate::card_encoder::CardEncoder;
use crate::cards::{self, CardRecord};
use crate::csv_encoder::CsvEncoder;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::lines::read_lines;
use crate::metadata::Metadata;
use crate::opts::Opts;
use crate::output_type::OutputType;
use crate::{Error, Result};

/// Prefix for decks written to the system temp directory.
const TEMP_PREFIX: &str = "lyricloze-";

/// Read lyrics from `r`, build the cards and encode them into `w`.
///
/// Returns the number of cards written.
pub fn generate<R, W>(r: R, w: W, meta: &Metadata, opts: &Opts) -> Result<usize>
where
    R: BufRead,
    W: Write,
{
    let lines = read_lines(r, opts)?;
    debug!(lines = lines.len(), "read input");

    let cards = cards::build(&lines, meta)?;
    encode_cards(&cards, w, meta.tags(), opts.output_type)?;

    Ok(cards.len())
}

/// Encode already-built cards with the encoder selected by `output_type`.
pub fn encode_cards<W: Write>(
    cards: &[CardRecord],
    w: W,
    tags: &[String],
    output_type: OutputType,
) -> Result<()> {
    // Buffer output for efficiency (especially important for files and stdout).
    let writer = BufWriter::new(w);

    // We keep this explicit (no trait objects) to avoid lifetime surprises.
    match output_type {
        OutputType::Csv => {
            let mut encoder = CsvEncoder::new(writer, tags);
            let run_res = write_all_cards(cards, &mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
        OutputType::Json => {
            let mut encoder = JsonArrayEncoder::new(writer, tags);
            let run_res = write_all_cards(cards, &mut encoder);
            merge_run_and_close(run_res, encoder.close())
        }
    }
}

/// Generate a deck from the file at `input` into a fresh temp file and return its path.
///
/// `dir` overrides the temp directory. The file is kept on success and removed on failure.
pub fn write_deck_file(
    input: &Path,
    meta: &Metadata,
    opts: &Opts,
    dir: Option<&Path>,
) -> Result<PathBuf> {
    let reader = open_input(input)?;

    let suffix = format!(".{}", opts.output_type.extension());
    let mut builder = Builder::new();
    builder.prefix(TEMP_PREFIX).suffix(&suffix);
    let tmp = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    let (tmp, cards) = fill_temp_file(tmp, reader, meta, opts)?;
    let (_, path) = tmp.keep()?;

    info!(path = %path.display(), cards, "wrote deck");
    Ok(path)
}

/// Generate a deck from the file at `input` and place it at `output`.
///
/// The deck is written next to `output` first and renamed over it once complete, so an
/// existing file at `output` is only replaced by a finished deck.
pub fn write_deck_to_path(
    input: &Path,
    output: &Path,
    meta: &Metadata,
    opts: &Opts,
) -> Result<usize> {
    let reader = open_input(input)?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = Builder::new().prefix(TEMP_PREFIX).tempfile_in(dir)?;

    let (tmp, cards) = fill_temp_file(tmp, reader, meta, opts)?;
    tmp.persist(output)?;

    info!(path = %output.display(), cards, "wrote deck");
    Ok(cards)
}

fn open_input(input: &Path) -> Result<BufReader<File>> {
    let file = File::open(input).map_err(|err| {
        Error::Input(std::io::Error::new(
            err.kind(),
            format!("{}: {err}", input.display()),
        ))
    })?;
    Ok(BufReader::new(file))
}

/// Write the deck into `tmp`. Dropping `tmp` on the error path deletes it.
fn fill_temp_file<R: BufRead>(
    mut tmp: NamedTempFile,
    reader: R,
    meta: &Metadata,
    opts: &Opts,
) -> Result<(NamedTempFile, usize)> {
    let cards = generate(reader, tmp.as_file_mut(), meta, opts)?;
    tmp.as_file().sync_all()?;
    Ok((tmp, cards))
}

fn write_all_cards<E: CardEncoder>(cards: &[CardRecord], encoder: &mut E) -> Result<()> {
    for card in cards {
        encoder.write_card(card)?;
    }
    Ok(())
}

fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!(error = %close_err, "closing output after a failed write also failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    fn meta() -> Metadata {
        Metadata::new("T", "A").expect("valid metadata")
    }

    /// A writer that accepts `limit` bytes and then fails.
    struct FailingWriter {
        written: usize,
        limit: usize,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written + buf.len() > self.limit {
                return Err(io::Error::other("disk full"));
            }
            self.written += buf.len();
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn generate_writes_csv_by_default() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let meta = meta().with_tags(["poetry", "practice"]);
        let n = generate(
            Cursor::new("Line1\nLine2\nLine3\n"),
            &mut out,
            &meta,
            &Opts::default(),
        )?;

        assert_eq!(n, 3);
        assert_eq!(
            String::from_utf8(out)?,
            "tags:poetry practice\n\
             [First Line] (A - T),Line1,T,A\n\
             [Beginning]<br>Line1,Line2,T,A\n\
             Line1<br>Line2,Line3,T,A\n"
        );
        Ok(())
    }

    #[test]
    fn generate_can_write_json() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let opts = Opts {
            output_type: OutputType::Json,
            ..Opts::default()
        };
        generate(Cursor::new("a\nb\n"), &mut out, &meta(), &opts)?;

        let parsed: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(parsed[1]["prompt"], "[Beginning]<br>a");
        Ok(())
    }

    #[test]
    fn short_input_writes_nothing() {
        let mut out = Vec::new();
        let res = generate(Cursor::new("lonely\n"), &mut out, &meta(), &Opts::default());

        assert!(matches!(res, Err(Error::InsufficientInput { found: 1 })));
        assert!(out.is_empty());
    }

    #[test]
    fn write_failures_surface_as_encoding_errors() {
        let long_line = "x".repeat(16 * 1024);
        let input = format!("{long_line}\n{long_line}\n{long_line}\n");
        let w = FailingWriter {
            written: 0,
            limit: 1024,
        };

        let res = generate(Cursor::new(input), w, &meta(), &Opts::default());
        assert!(matches!(res, Err(Error::EncodingIo(_))), "{res:?}");
    }
}
