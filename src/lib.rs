//! `lyricloze` turns lyrics and poems into line-by-line recall flashcards.
//!
//! Every line of the input becomes one card. The card shows the two lines before it and
//! asks for the line itself, so a deck walks the learner through the whole text:
//!
//! ```
//! use lyricloze::{Metadata, cards};
//!
//! let meta = Metadata::new("T", "A")?;
//! let deck = cards::build(&["Line1", "Line2", "Line3"], &meta)?;
//! assert_eq!(deck[2].prompt(), "Line1<br>Line2");
//! assert_eq!(deck[2].answer(), "Line3");
//! # Ok::<(), lyricloze::Error>(())
//! ```
//!
//! This crate provides:
//! - The card builder and its record type
//! - Metadata providers (filename convention, fixed values, interactive prompts)
//! - Streaming output encoders (Anki CSV, JSON)
//! - Locating and launching Anki to import a finished deck

// High-level API (most consumers should start here).
pub mod generator;
pub mod opts;

// Card building and its inputs.
pub mod cards;
pub mod lines;
pub mod metadata;

// Output selection and encoder interfaces.
pub mod card_encoder;
pub mod output_type;

// Output encoders that serialize cards into various formats.
pub mod csv_encoder;
pub mod json_array_encoder;

// Handing decks to Anki.
pub mod launcher;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use cards::CardRecord;
pub use error::{Error, Result};
pub use generator::{generate, write_deck_file, write_deck_to_path};
pub use launcher::{HostLauncher, LauncherConfig};
pub use metadata::{Metadata, MetadataProvider};
pub use opts::Opts;
pub use output_type::OutputType;
