//! Line tokenizer shared by the OBJ and MTL parsers.
//!
//! Both formats are line oriented: a keyword, then whitespace separated
//! arguments. Blank lines and `#` comments are dropped here so the parsers
//! only ever see directives.

use std::str::SplitWhitespace;

use crate::error::{ParseError, ParseResult};

/// One directive line split into its keyword and arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the source text.
    pub number: usize,
    pub keyword: &'a str,
    /// Everything after the keyword and the whitespace following it, unsplit.
    /// Filenames with embedded spaces survive intact here.
    pub unparsed_args: &'a str,
}

impl<'a> Line<'a> {
    /// Arguments split on runs of whitespace.
    pub fn parts(&self) -> SplitWhitespace<'a> {
        self.unparsed_args.split_whitespace()
    }

    /// Parse the `index`-th argument as `f32`.
    pub fn f32_at(&self, index: usize, field: &'static str) -> ParseResult<f32> {
        let token = self.parts().nth(index).ok_or(ParseError::MissingField {
            line: self.number,
            field,
        })?;
        parse_f32(token, self.number, field)
    }

    /// Parse every argument as `f32`.
    pub fn f32_all(&self, field: &'static str) -> ParseResult<Vec<f32>> {
        self.parts()
            .map(|token| parse_f32(token, self.number, field))
            .collect()
    }
}

/// Lazily yield directive lines from `text`.
pub fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.split('\n')
        .enumerate()
        .filter_map(|(idx, raw)| split_line(idx + 1, raw))
}

fn split_line(number: usize, raw: &str) -> Option<Line<'_>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let (keyword, rest) = match trimmed.find(char::is_whitespace) {
        Some(at) => trimmed.split_at(at),
        None => (trimmed, ""),
    };

    Some(Line {
        number,
        keyword,
        unparsed_args: rest.trim_start(),
    })
}

/// Parse a finite `f32`; `nan`/`inf` spellings count as invalid.
pub(crate) fn parse_f32(token: &str, line: usize, field: &'static str) -> ParseResult<f32> {
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            line,
            field,
            value: token.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_and_comment_lines() {
        let src = "\n   \n# header\n  # indented comment\nv 1 2 3\n";
        let collected: Vec<_> = lines(src).collect();
        assert_eq!(collected.len(), 1);
        assert_eq!(collected[0].keyword, "v");
        assert_eq!(collected[0].number, 5);
    }

    #[test]
    fn keeps_embedded_spaces_in_unparsed_args() {
        let src = "mtllib  my model file.mtl\r\n";
        let line = lines(src).next().unwrap();
        assert_eq!(line.keyword, "mtllib");
        assert_eq!(line.unparsed_args, "my model file.mtl");
        assert_eq!(line.parts().count(), 3);
    }

    #[test]
    fn keyword_without_args() {
        let line = lines("g").next().unwrap();
        assert_eq!(line.keyword, "g");
        assert_eq!(line.unparsed_args, "");
        assert_eq!(line.parts().count(), 0);
    }

    #[test]
    fn tab_separated_parts() {
        let line = lines("v\t1.0\t 2.0   3.0").next().unwrap();
        assert_eq!(line.f32_all("coordinate").unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn rejects_non_finite_numbers() {
        for token in ["nan", "NaN", "inf", "-infinity", "1e39"] {
            assert!(
                matches!(
                    parse_f32(token, 7, "value"),
                    Err(ParseError::InvalidNumber { line: 7, .. })
                ),
                "{token} should be rejected"
            );
        }
        assert_eq!(parse_f32("-1.5e2", 1, "value"), Ok(-150.0));
    }

    #[test]
    fn reports_bad_numbers_with_line() {
        let line = lines("\n\nNs abc").next().unwrap();
        let err = line.f32_at(0, "shininess").unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidNumber {
                line: 3,
                field: "shininess",
                value: "abc".into(),
            }
        );
        assert!(matches!(
            line.f32_at(1, "shininess"),
            Err(ParseError::MissingField { line: 3, .. })
        ));
    }
}
