use anyhow::{Context, Result};
use clap::Parser;

use std::io;
use std::path::{Path, PathBuf};

use lyricloze::launcher::{HostLauncher, LauncherConfig};
use lyricloze::logging;
use lyricloze::metadata::{
    LayeredMetadata, Metadata, MetadataProvider, PromptMetadata, strip_quotes,
};
use lyricloze::{Opts, OutputType, write_deck_file, write_deck_to_path};

fn main() -> Result<()> {
    logging::init();
    let params = Params::parse();

    let input = PathBuf::from(strip_quotes(&params.lyrics_file));
    let meta = resolve_metadata(&params, &input)?;

    let opts = Opts {
        output_type: params.output_type,
        trim_trailing_whitespace: !params.keep_trailing_whitespace,
    };

    let deck = match &params.output {
        Some(output) => {
            write_deck_to_path(&input, output, &meta, &opts)
                .with_context(|| format!("failed to generate a deck from {}", input.display()))?;
            output.clone()
        }
        None => write_deck_file(&input, &meta, &opts, None)
            .with_context(|| format!("failed to generate a deck from {}", input.display()))?,
    };

    let launcher = HostLauncher::new(LauncherConfig {
        custom_location: params.anki_path.clone(),
    });
    let anki = if params.no_launch {
        None
    } else {
        launcher.locate()
    };

    match anki {
        Some(exe) => {
            launcher.launch(&exe, &deck)?;
            println!("* Anki is importing {}. *", deck.display());
            println!("If Anki does not appear, start Anki and open your profile if necessary,");
            println!("then run lyricloze again.");
        }
        None => {
            println!("Done! Now import the file {} into Anki.", deck.display());
            if !params.no_launch {
                println!("Anki could not be found automatically. Pass --anki-path or set");
                println!("LYRICLOZE_ANKI_PATH to import decks without this manual step.");
            }
        }
    }

    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "lyricloze")]
#[command(about = "Turn lyrics or a poem into line-by-line recall flashcards for Anki")]
struct Params {
    /// Lyrics file, ideally named `<artist> - <title>.txt`.
    lyrics_file: String,

    /// Tags to attach to every card.
    #[arg(short = 't', long = "tags", num_args = 1..)]
    tags: Vec<String>,

    /// Title, overriding the one in the file name.
    #[arg(long = "title")]
    title: Option<String>,

    /// Artist or author, overriding the one in the file name.
    #[arg(long = "artist")]
    artist: Option<String>,

    /// Ask for title and artist when they can't be taken from the file name.
    #[arg(short = 'p', long = "prompt", default_value_t = false)]
    prompt: bool,

    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::Csv
    )]
    output_type: OutputType,

    /// Write the deck here instead of a temp file.
    #[arg(long = "output")]
    output: Option<PathBuf>,

    /// Path to the Anki executable when it is installed somewhere non-standard.
    #[arg(long = "anki-path", env = "LYRICLOZE_ANKI_PATH")]
    anki_path: Option<PathBuf>,

    /// Only write the deck; don't start Anki.
    #[arg(long = "no-launch", default_value_t = false)]
    no_launch: bool,

    #[arg(long = "keep-trailing-whitespace", default_value_t = false)]
    keep_trailing_whitespace: bool,
}

/// Flags win over the file name; the prompt fills whatever is still missing.
fn resolve_metadata(params: &Params, input: &Path) -> Result<Metadata> {
    let mut layered = LayeredMetadata::new(params.tags.clone())
        .with_title(params.title.clone())
        .with_artist(params.artist.clone())
        .with_path(input);

    let meta = if params.prompt {
        layered
            .with_prompt(PromptMetadata::new(io::stdin().lock(), io::stdout()))
            .resolve()?
    } else {
        layered
            .resolve()
            .context("pass --title and --artist, or --prompt to enter them")?
    };
    Ok(meta)
}
