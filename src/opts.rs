use crate::output_type::OutputType;

/// Options that control how a deck is generated.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that:
/// - the library remains reusable outside of a CLI context
/// - other frontends (tests, batch jobs) can construct options programmatically
#[derive(Debug, Clone)]
pub struct Opts {
    /// The desired output format for the generated cards.
    pub output_type: OutputType,

    /// Whether to strip trailing whitespace from every input line.
    ///
    /// Lyrics pasted from the web often carry invisible trailing spaces that would
    /// otherwise end up in answers.
    pub trim_trailing_whitespace: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            output_type: OutputType::Csv,
            trim_trailing_whitespace: true,
        }
    }
}
