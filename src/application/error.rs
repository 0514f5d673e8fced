use thiserror::Error;

use crate::domain::ParseCentsError;

/// Problems found while parsing a command script. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },

    #[error("line {line}: '{command}' is missing its {argument}")]
    MissingArgument {
        line: usize,
        command: String,
        argument: &'static str,
    },

    #[error("line {line}: unexpected argument '{value}'")]
    UnexpectedArgument { line: usize, value: String },

    #[error("line {line}: invalid account id '{value}'")]
    InvalidAccountId { line: usize, value: String },

    #[error("line {line}: invalid amount '{value}': {source}")]
    InvalidAmount {
        line: usize,
        value: String,
        source: ParseCentsError,
    },
}

impl ScriptError {
    pub fn line(&self) -> usize {
        match self {
            ScriptError::UnknownCommand { line, .. }
            | ScriptError::MissingArgument { line, .. }
            | ScriptError::UnexpectedArgument { line, .. }
            | ScriptError::InvalidAccountId { line, .. }
            | ScriptError::InvalidAmount { line, .. } => *line,
        }
    }
}
