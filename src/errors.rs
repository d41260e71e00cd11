// src/errors.rs

//! Defines the error type for the registry surface of this crate.

use thiserror::Error;

/// Errors produced when defaulting an object through the registry. The
/// defaulting pass itself is total and cannot fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no defaulting function registered for kind '{0}'")]
    UnknownKind(String),

    #[error("object does not match the type registered for kind '{0}'")]
    KindMismatch(String),
}
