use std::fs;
use std::path::Path;

use lyricloze::csv_encoder::decode;
use lyricloze::metadata::{FilenameMetadata, MetadataProvider};
use lyricloze::{CardRecord, Error, Opts, OutputType, write_deck_file, write_deck_to_path};

fn entries(dir: &Path) -> anyhow::Result<usize> {
    Ok(fs::read_dir(dir)?.count())
}

#[test]
fn lyrics_file_becomes_an_importable_deck() -> anyhow::Result<()> {
    let src = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let input = src.path().join("Robert Frost - Stopping by Woods.txt");
    fs::write(
        &input,
        "Whose woods these are I think I know.\r\n\
         His house is in the village, though;\r\n\
         He will not see me stopping here\r\n\
         To watch his woods fill up with \"snow\".\r\n",
    )?;

    let meta = FilenameMetadata::new(&input, vec!["poetry".into(), "practice".into()]).resolve()?;
    let deck = write_deck_file(&input, &meta, &Opts::default(), Some(out.path()))?;

    assert_eq!(deck.parent(), Some(out.path()));
    assert_eq!(deck.extension().and_then(|e| e.to_str()), Some("csv"));

    let text = fs::read_to_string(&deck)?;
    assert!(text.starts_with("tags:poetry practice\n"));

    let parsed = decode(text.as_bytes())?;
    assert_eq!(parsed.tags, vec!["poetry", "practice"]);
    assert_eq!(parsed.cards.len(), 4);
    assert_eq!(
        parsed.cards[0],
        CardRecord::new(
            "[First Line] (Robert Frost - Stopping by Woods)",
            "Whose woods these are I think I know.",
            "Stopping by Woods",
            "Robert Frost",
        )
    );
    assert_eq!(
        parsed.cards[3].prompt(),
        "His house is in the village, though;<br>He will not see me stopping here"
    );
    assert_eq!(
        parsed.cards[3].answer(),
        "To watch his woods fill up with \"snow\"."
    );
    Ok(())
}

#[test]
fn json_decks_get_a_json_extension() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("A - T.txt");
    fs::write(&input, "one\ntwo\n")?;

    let meta = FilenameMetadata::new(&input, Vec::new()).resolve()?;
    let opts = Opts {
        output_type: OutputType::Json,
        ..Opts::default()
    };
    let deck = write_deck_file(&input, &meta, &opts, Some(dir.path()))?;

    assert_eq!(deck.extension().and_then(|e| e.to_str()), Some("json"));
    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&deck)?)?;
    assert_eq!(parsed.as_array().map(Vec::len), Some(2));
    Ok(())
}

#[test]
fn too_short_input_leaves_no_file_behind() -> anyhow::Result<()> {
    let src = tempfile::tempdir()?;
    let out = tempfile::tempdir()?;
    let input = src.path().join("A - T.txt");
    fs::write(&input, "just one line\n")?;

    let meta = FilenameMetadata::new(&input, vec!["tag".into()]).resolve()?;
    let res = write_deck_file(&input, &meta, &Opts::default(), Some(out.path()));

    assert!(matches!(res, Err(Error::InsufficientInput { found: 1 })));
    assert_eq!(entries(out.path())?, 0);
    Ok(())
}

#[test]
fn failed_run_keeps_the_existing_output() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("A - T.txt");
    let output = dir.path().join("deck.csv");
    fs::write(&input, "")?;
    fs::write(&output, "previous deck\n")?;

    let meta = FilenameMetadata::new(&input, Vec::new()).resolve()?;
    let res = write_deck_to_path(&input, &output, &meta, &Opts::default());

    assert!(matches!(res, Err(Error::InsufficientInput { found: 0 })));
    assert_eq!(fs::read_to_string(&output)?, "previous deck\n");
    assert_eq!(entries(dir.path())?, 2);
    Ok(())
}

#[test]
fn write_deck_to_path_replaces_the_output() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("A - T.txt");
    let output = dir.path().join("deck.csv");
    fs::write(&input, "Line1\nLine2\nLine3\n")?;
    fs::write(&output, "previous deck\n")?;

    let meta = FilenameMetadata::new(&input, Vec::new()).resolve()?;
    let n = write_deck_to_path(&input, &output, &meta, &Opts::default())?;

    assert_eq!(n, 3);
    assert_eq!(
        fs::read_to_string(&output)?,
        "[First Line] (A - T),Line1,T,A\n\
         [Beginning]<br>Line1,Line2,T,A\n\
         Line1<br>Line2,Line3,T,A\n"
    );
    Ok(())
}

#[test]
fn missing_input_is_an_input_error() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let input = dir.path().join("A - T.txt");
    let meta = FilenameMetadata::new(&input, Vec::new()).resolve()?;

    let res = write_deck_file(&input, &meta, &Opts::default(), Some(dir.path()));
    assert!(matches!(res, Err(Error::Input(_))));
    assert_eq!(entries(dir.path())?, 0);
    Ok(())
}
