/// The supported output formats for generated cards.
///
/// Each variant maps to a concrete `CardEncoder` implementation. With the `cli` feature the
/// enum doubles as a `clap` value for the `--output-type` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Four-column CSV that Anki's text importer reads directly.
    #[default]
    Csv,

    /// Cards as a JSON array, for inspection or other tools.
    Json,
}

impl OutputType {
    /// File extension (without the dot) for decks written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}
