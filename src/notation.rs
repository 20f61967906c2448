// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//

//! Music macro notation: tokenizing, token shapes and note resolution.
//!
//! A notation document is a whitespace separated list of tokens. `;` starts a
//! comment that runs to the end of the line. Tokens of the form `<type>:<argument>`
//! are commands; bare tokens are notes in the default instrument.

mod command;
mod error;
mod instrument;
mod note;

use pest::Parser;
use pest_derive::Parser;

pub use command::{CommandRecord, RecordKind, COMMAND_NAMES};
pub use error::NotationError;
pub use instrument::{Instrument, InstrumentFamily, Instruments};
pub use note::{resolve_note, Accidental, NoteDefaults, NoteDescriptor, Pitch, Sound, MAX_OCTAVE};

#[derive(Parser)]
#[grammar = "src/notation/grammar.pest"]
pub(crate) struct NotationParser;

/// A single notation token and where it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// The token text.
    pub text: &'a str,
    /// 1-based line.
    pub line: usize,
    /// 1-based column.
    pub column: usize,
}

/// Splits notation text into tokens, dropping whitespace and comments.
pub fn tokenize(content: &str) -> Result<Vec<Token<'_>>, NotationError> {
    let pairs = match NotationParser::parse(Rule::document, content) {
        Ok(pairs) => pairs,
        Err(e) => {
            let (line, column) = match e.line_col {
                pest::error::LineColLocation::Pos((line, col)) => (line, col),
                pest::error::LineColLocation::Span((line, col), _) => (line, col),
            };
            return Err(NotationError::Syntax {
                line,
                column,
                message: e.variant.message().to_string(),
            });
        }
    };

    Ok(pairs
        .flatten()
        .filter(|pair| pair.as_rule() == Rule::token)
        .map(|pair| {
            let (line, column) = pair.as_span().start_pos().line_col();
            Token {
                text: pair.as_str(),
                line,
                column,
            }
        })
        .collect())
}

/// Splits a token into its command type and argument at the first ':'.
/// Tokens without a ':' have no command type.
pub fn split_command(token: &str) -> (Option<&str>, &str) {
    match token.split_once(':') {
        Some((command, argument)) => (Some(command), argument),
        None => (None, token),
    }
}

/// Parses a token of the explicit duration shape (`1s`, `0.25s`, `.5s`) into
/// seconds. Returns `None` if the token does not have that shape.
pub fn explicit_seconds(token: &str) -> Option<f64> {
    let mut pairs = NotationParser::parse(Rule::explicit_duration, token).ok()?;
    let decimal = pairs
        .next()?
        .into_inner()
        .find(|pair| pair.as_rule() == Rule::decimal)?;
    decimal.as_str().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_positions() {
        let tokens = tokenize("tempo:120 sqr:C\n  r:4\tC").unwrap();
        let found: Vec<(&str, usize, usize)> = tokens
            .iter()
            .map(|token| (token.text, token.line, token.column))
            .collect();
        assert_eq!(
            found,
            vec![
                ("tempo:120", 1, 1),
                ("sqr:C", 1, 11),
                ("r:4", 2, 3),
                ("C", 2, 7),
            ]
        );
    }

    #[test]
    fn test_tokenize_strips_comments() {
        let tokens = tokenize("; intro\nC D;trailing comment E\n;\nF ; G").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|token| token.text).collect();
        assert_eq!(texts, vec!["C", "D", "F"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("  \n\t ; nothing here\n").unwrap().is_empty());
    }

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("tempo:120"), (Some("tempo"), "120"));
        assert_eq!(split_command("CHORD:i05:C,E"), (Some("CHORD"), "i05:C,E"));
        assert_eq!(split_command("x:"), (Some("x"), ""));
        assert_eq!(split_command("C#4"), (None, "C#4"));
    }

    #[test]
    fn test_explicit_seconds() {
        assert_eq!(explicit_seconds("1s"), Some(1.0));
        assert_eq!(explicit_seconds("0.25s"), Some(0.25));
        assert_eq!(explicit_seconds(".5s"), Some(0.5));
        assert_eq!(explicit_seconds("2.s"), Some(2.0));
        assert_eq!(explicit_seconds("0s"), Some(0.0));

        assert_eq!(explicit_seconds("s"), None);
        assert_eq!(explicit_seconds("1"), None);
        assert_eq!(explicit_seconds("1ss"), None);
        assert_eq!(explicit_seconds("-1s"), None);
        assert_eq!(explicit_seconds("sqr:C"), None);
        assert_eq!(explicit_seconds("1.5.2s"), None);
    }
}
