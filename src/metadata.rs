//! Deck metadata and the providers that resolve it.
//!
//! The card builder only ever sees a finished [`Metadata`]. Where it comes from (the input
//! filename, CLI flags, or asking the user) is decided by whichever [`MetadataProvider`] the
//! caller hands in.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{Error, Result};

/// Separator between artist and title in `<artist> - <title>.<ext>` filenames.
pub const FILENAME_SEPARATOR: &str = " - ";

/// Title, artist and tags shared by every card of a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    title: String,
    artist: String,
    tags: Vec<String>,
}

impl Metadata {
    /// Fails with [`Error::MalformedMetadata`] if either field is blank.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let artist = artist.into();

        if title.trim().is_empty() {
            return Err(Error::metadata("title must not be empty"));
        }
        if artist.trim().is_empty() {
            return Err(Error::metadata("artist must not be empty"));
        }

        Ok(Self {
            title,
            artist,
            tags: Vec::new(),
        })
    }

    /// Replace the tag list.
    ///
    /// Anki separates tags with whitespace, so each entry is split on whitespace (including
    /// line breaks) and blank entries are dropped. A tag can never span more than one word.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .flat_map(|t| {
                t.as_ref()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Something that can produce deck metadata.
///
/// `resolve` takes `&mut self` because some providers (like [`PromptMetadata`]) consume input.
pub trait MetadataProvider {
    fn resolve(&mut self) -> Result<Metadata>;
}

/// Metadata that is already known.
#[derive(Debug, Clone)]
pub struct FixedMetadata(pub Metadata);

impl MetadataProvider for FixedMetadata {
    fn resolve(&mut self) -> Result<Metadata> {
        Ok(self.0.clone())
    }
}

/// Derives artist and title from a `<artist> - <title>.<ext>` filename.
#[derive(Debug, Clone)]
pub struct FilenameMetadata {
    path: PathBuf,
    tags: Vec<String>,
}

impl FilenameMetadata {
    pub fn new(path: impl Into<PathBuf>, tags: Vec<String>) -> Self {
        Self {
            path: path.into(),
            tags,
        }
    }
}

impl MetadataProvider for FilenameMetadata {
    fn resolve(&mut self) -> Result<Metadata> {
        let (artist, title) = split_filename(&self.path)?;
        debug!(artist, title, path = %self.path.display(), "derived metadata from filename");
        Ok(Metadata::new(title, artist)?.with_tags(self.tags.clone()))
    }
}

/// Split a path's file stem into `(artist, title)` on the first `" - "`.
pub fn split_filename(path: &Path) -> Result<(&str, &str)> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| {
            Error::metadata(format!("'{}' has no usable file name", path.display()))
        })?;

    stem.split_once(FILENAME_SEPARATOR).ok_or_else(|| {
        Error::metadata(format!(
            "file name '{stem}' does not follow the '<artist>{FILENAME_SEPARATOR}<title>' convention"
        ))
    })
}

/// Merges CLI-style overrides with the filename convention and, optionally, a prompt.
///
/// Each field is taken from the first source that has a non-blank value: the explicit
/// override, then the matching half of a `<artist> - <title>` file name. Whatever is still
/// missing is asked for by the prompt, if one was attached; otherwise resolving fails with
/// [`Error::MalformedMetadata`].
pub struct LayeredMetadata<R: BufRead = io::Empty, W: Write = io::Sink> {
    title: Option<String>,
    artist: Option<String>,
    path: Option<PathBuf>,
    tags: Vec<String>,
    prompt: Option<PromptMetadata<R, W>>,
}

impl LayeredMetadata {
    pub fn new(tags: Vec<String>) -> Self {
        Self {
            title: None,
            artist: None,
            path: None,
            tags,
            prompt: None,
        }
    }
}

impl<R: BufRead, W: Write> LayeredMetadata<R, W> {
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_artist(mut self, artist: Option<String>) -> Self {
        self.artist = artist;
        self
    }

    /// File whose name may carry `<artist> - <title>`.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Ask for fields no other source could supply.
    pub fn with_prompt<R2: BufRead, W2: Write>(
        self,
        prompt: PromptMetadata<R2, W2>,
    ) -> LayeredMetadata<R2, W2> {
        LayeredMetadata {
            title: self.title,
            artist: self.artist,
            path: self.path,
            tags: self.tags,
            prompt: Some(prompt),
        }
    }
}

impl<R: BufRead, W: Write> MetadataProvider for LayeredMetadata<R, W> {
    fn resolve(&mut self) -> Result<Metadata> {
        let (name_artist, name_title, name_err) = match self.path.as_deref().map(split_filename) {
            Some(Ok((artist, title))) => (non_blank(artist), non_blank(title), None),
            Some(Err(err)) => (None, None, Some(err)),
            None => (None, None, None),
        };

        let title = non_blank_owned(self.title.clone()).or(name_title);
        let artist = non_blank_owned(self.artist.clone()).or(name_artist);

        if let (Some(title), Some(artist)) = (&title, &artist) {
            debug!(%title, %artist, "resolved metadata without prompting");
            return Ok(Metadata::new(title.as_str(), artist.as_str())?.with_tags(&self.tags));
        }

        match self.prompt.take() {
            Some(prompt) => {
                let known_tags = (!self.tags.is_empty()).then(|| self.tags.clone());
                prompt
                    .with_title(title)
                    .with_artist(artist)
                    .with_tags(known_tags)
                    .resolve()
            }
            None => Err(name_err.unwrap_or_else(|| {
                let missing = if title.is_none() { "title" } else { "artist" };
                Error::metadata(format!("no {missing} given"))
            })),
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    (!s.trim().is_empty()).then(|| s.to_string())
}

fn non_blank_owned(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.trim().is_empty())
}

/// Remove single or double quotes wrapped around `s`.
///
/// Paths dropped onto a terminal window often arrive quoted.
pub fn strip_quotes(s: &str) -> &str {
    s.trim_matches(['"', '\''])
}

/// Asks for whichever metadata fields aren't already known.
///
/// Reads answers line by line from `input` and writes prompts to `output`, so the CLI can
/// wire it to stdin/stdout while tests use in-memory buffers.
pub struct PromptMetadata<R: BufRead, W: Write> {
    input: R,
    output: W,
    title: Option<String>,
    artist: Option<String>,
    tags: Option<Vec<String>>,
}

impl<R: BufRead, W: Write> PromptMetadata<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            title: None,
            artist: None,
            tags: None,
        }
    }

    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    pub fn with_artist(mut self, artist: Option<String>) -> Self {
        self.artist = artist;
        self
    }

    /// Known tags. When `None`, the user is asked for them (an empty answer means no tags).
    pub fn with_tags(mut self, tags: Option<Vec<String>>) -> Self {
        self.tags = tags;
        self
    }

    fn ask(&mut self, label: &str, required: bool) -> Result<String> {
        loop {
            write!(self.output, "{label}: ")?;
            self.output.flush()?;

            let mut answer = String::new();
            let read = self.input.read_line(&mut answer).map_err(Error::Input)?;
            if read == 0 {
                if required {
                    return Err(Error::metadata(format!(
                        "input ended before {} was given",
                        label.to_lowercase()
                    )));
                }
                return Ok(String::new());
            }

            let answer = answer.trim();
            if !answer.is_empty() || !required {
                return Ok(answer.to_string());
            }
        }
    }
}

impl<R: BufRead, W: Write> MetadataProvider for PromptMetadata<R, W> {
    fn resolve(&mut self) -> Result<Metadata> {
        let title = match self.title.take() {
            Some(title) => title,
            None => self.ask("Title", true)?,
        };
        let artist = match self.artist.take() {
            Some(artist) => artist,
            None => self.ask("Artist", true)?,
        };
        let tags = match self.tags.take() {
            Some(tags) => tags,
            None => self
                .ask("Tags", false)?
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        };

        Ok(Metadata::new(title, artist)?.with_tags(tags))
    }
}
