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

/// Errors raised while tokenizing notation or resolving its commands.
///
/// `MalformedCommand` and `InvalidParameterValue` are recovered per token by the
/// interpreter. `Syntax` and `NoValidCommands` are terminal for a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotationError {
    #[error("Malformed command '{token}': {reason}")]
    MalformedCommand { token: String, reason: String },

    #[error("Invalid {parameter} value '{value}' (expected {expected})")]
    InvalidParameterValue {
        parameter: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Notation syntax error at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Notation contains no valid commands")]
    NoValidCommands,
}

impl NotationError {
    pub(crate) fn malformed(token: &str, reason: impl Into<String>) -> NotationError {
        NotationError::MalformedCommand {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(
        parameter: &'static str,
        value: &str,
        expected: &'static str,
    ) -> NotationError {
        NotationError::InvalidParameterValue {
            parameter,
            value: value.to_string(),
            expected,
        }
    }
}
