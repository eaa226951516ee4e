//! Error types for parsing, dispatch and typed lookup.
//!
//! [`ParseError`] and [`DispatchError`] describe something the user typed.
//! [`LookupError`] describes a tree whose declarations do not match the
//! handler reading them.

use clap::error::{ContextKind, ContextValue, ErrorKind};
use thiserror::Error;

/// Errors produced while parsing option tokens at one tree level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A token had option syntax but named no registered option.
    #[error("flag provided but not defined: -{name}")]
    UnknownOption { name: String },

    /// The raw value could not be converted to the option's declared type.
    #[error("invalid value {value:?} for flag -{name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },

    /// A non-boolean option was given without a value.
    #[error("flag needs an argument: -{name}")]
    MissingValue { name: String },

    /// A token in the option prefix is not a well-formed option
    /// (`---x`, `-=x`).
    #[error("bad flag syntax: {token}")]
    BadSyntax { token: String },

    /// Any other problem reported by the option parser.
    #[error("{0}")]
    Syntax(String),
}

impl ParseError {
    pub(crate) fn from_clap(err: clap::Error) -> Self {
        let token = match err.get(ContextKind::InvalidArg) {
            Some(ContextValue::String(token)) => Some(token.clone()),
            _ => None,
        };

        match (err.kind(), token) {
            (ErrorKind::UnknownArgument, Some(token)) => {
                let name = option_name(&token).to_string();
                if name.is_empty() {
                    ParseError::BadSyntax { token }
                } else {
                    ParseError::UnknownOption { name }
                }
            }
            (ErrorKind::InvalidValue | ErrorKind::NoEquals, Some(token)) => {
                ParseError::MissingValue {
                    name: option_name(&token).to_string(),
                }
            }
            _ => {
                let rendered = err.to_string();
                let first = rendered.lines().next().unwrap_or_default();
                ParseError::Syntax(first.trim_start_matches("error: ").to_string())
            }
        }
    }
}

/// Option name in a clap argument rendering: `--user <user>`, `--user=x`.
fn option_name(token: &str) -> &str {
    let name = token.trim_start_matches('-');
    name.split([' ', '=']).next().unwrap_or_default()
}

/// Errors that end a dispatch with the usage exit code.
///
/// Both variants carry the names of the commands walked so far (root first),
/// so the caller can render usage for the node where the walk stopped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// Option parsing failed at the last command of `path`.
    #[error("{source}")]
    InvalidOptions {
        path: Vec<String>,
        #[source]
        source: ParseError,
    },

    /// The walk stopped at a command without a handler and tokens were left.
    #[error("command provided but not defined: {name}")]
    UnknownCommand { path: Vec<String>, name: String },
}

impl DispatchError {
    /// The command path (root first) at which dispatch stopped.
    pub fn path(&self) -> &[String] {
        match self {
            DispatchError::InvalidOptions { path, .. } => path,
            DispatchError::UnknownCommand { path, .. } => path,
        }
    }
}

/// Errors from typed option lookup.
///
/// These indicate a mismatch between the tree's declarations and the code
/// reading them, never bad user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// No option with this name is visible to the command.
    #[error("option '{name}' is not declared")]
    Missing { name: String },

    /// The option exists but holds a value of another type.
    #[error("option '{name}' is declared as {declared}, looked up as {requested}")]
    TypeMismatch {
        name: String,
        declared: &'static str,
        requested: &'static str,
    },
}
