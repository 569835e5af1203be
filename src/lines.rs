use std::io::BufRead;

use crate::opts::Opts;
use crate::{Error, Result};

/// Read every line of `r`, in order.
///
/// Lines are split on `\n` with a trailing `\r` removed, so CRLF files behave like LF files.
/// A final newline does not produce an extra empty line. Blank lines are kept.
pub fn read_lines<R: BufRead>(r: R, opts: &Opts) -> Result<Vec<String>> {
    let mut out = Vec::new();

    for line in r.lines() {
        let line = line.map_err(Error::Input)?;
        if opts.trim_trailing_whitespace {
            out.push(line.trim_end().to_string());
        } else {
            out.push(line);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn keeps_blank_lines_and_order() -> anyhow::Result<()> {
        let lines = read_lines(Cursor::new("one\n\nthree\n"), &Opts::default())?;
        assert_eq!(lines, vec!["one", "", "three"]);
        Ok(())
    }

    #[test]
    fn strips_crlf_and_trailing_whitespace_by_default() -> anyhow::Result<()> {
        let lines = read_lines(Cursor::new("one  \r\ntwo\t\r\nthree"), &Opts::default())?;
        assert_eq!(lines, vec!["one", "two", "three"]);
        Ok(())
    }

    #[test]
    fn trailing_whitespace_can_be_preserved() -> anyhow::Result<()> {
        let opts = Opts {
            trim_trailing_whitespace: false,
            ..Opts::default()
        };
        let lines = read_lines(Cursor::new("  indented  \nnext\n"), &opts)?;
        assert_eq!(lines, vec!["  indented  ", "next"]);
        Ok(())
    }

    #[test]
    fn invalid_utf8_is_an_input_error() {
        let res = read_lines(Cursor::new(vec![b'a', 0xff, b'\n']), &Opts::default());
        assert!(matches!(res, Err(Error::Input(_))));
    }
}
