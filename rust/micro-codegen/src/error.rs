//! Errors raised while turning a schema into bindings.

use std::fmt;

/// Why a generation run was abandoned. No output is produced when any of
/// these is returned.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("service in {file} has an empty name")]
    EmptyServiceName { file: String },

    #[error("method #{index} of service {service} has an empty name")]
    EmptyMethodName { service: String, index: usize },

    /// Two methods of one service derive the same exported Go name.
    #[error("service {service}: methods {first:?} and {second:?} both generate {exported}")]
    DuplicateMethod {
        service: String,
        first: String,
        second: String,
        exported: String,
    },

    /// Two package-level declarations of one file share a name.
    #[error("{first} and {second} both declare {name}")]
    NameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// A declaration would shadow a keyword, builtin or local of the
    /// generated code.
    #[error("{owner} declares {name}, which the generated code needs unshadowed")]
    ReservedName { name: String, owner: String },

    /// Two services in one file would register the same dispatch key.
    #[error("routing key {key:?} is generated more than once")]
    DuplicateRoutingKey { key: String },

    #[error("invalid option {option:?}: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("failed to write generated code")]
    Write(#[from] fmt::Error),
}

pub type Result<T, E = GenerateError> = std::result::Result<T, E>;
