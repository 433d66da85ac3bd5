//! Error handling and error types for the forest inference engine.
//!
//! Loading failures are described by [`MalformedModelError`] and are always
//! fatal to the load call. Everything else funnels into [`ForestError`].

use crate::core::types::{BranchSide, NodeId};
use std::io;
use thiserror::Error;

/// Reasons a model text stream cannot be turned into a forest.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MalformedModelError {
    /// A line or one of its fields could not be parsed
    #[error("Parse error at line {line}: {reason} (line='{content}')")]
    ParseError {
        /// 1-based line number within the stream (the header is line 1)
        line: usize,
        /// Offending line text
        content: String,
        /// What was wrong with it
        reason: String,
    },

    /// A branch points at a node id that is not defined anywhere in the stream
    #[error("Dangling reference at line {line}: node {node_id} {side} branch refers to unknown node {referenced_id}")]
    DanglingReference {
        /// Node owning the branch
        node_id: NodeId,
        /// Id that could not be resolved
        referenced_id: NodeId,
        /// Which continuation carried the reference
        side: BranchSide,
        /// Line on which the owning node was defined
        line: usize,
    },

    /// The stream held no node records at all
    #[error("Empty model: no node records found")]
    EmptyModel,

    /// The node graph contains a cycle (only reported when cycle rejection is enabled)
    #[error("Cyclic reference: node {node_id} is reachable from itself")]
    CyclicReference {
        /// A node lying on the cycle
        node_id: NodeId,
    },
}

impl MalformedModelError {
    /// Create a parse error for a given line
    pub fn parse<C, R>(line: usize, content: C, reason: R) -> Self
    where
        C: Into<String>,
        R: Into<String>,
    {
        MalformedModelError::ParseError {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }

    /// Line number the error refers to, where there is one
    pub fn line(&self) -> Option<usize> {
        match self {
            MalformedModelError::ParseError { line, .. } => Some(*line),
            MalformedModelError::DanglingReference { line, .. } => Some(*line),
            MalformedModelError::EmptyModel => None,
            MalformedModelError::CyclicReference { .. } => None,
        }
    }
}

/// Main error type for the library.
#[derive(Error, Debug)]
pub enum ForestError {
    /// Configuration and validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}, {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    /// Model text could not be loaded
    #[error("Malformed model: {0}")]
    MalformedModel(#[from] MalformedModelError),

    /// Sparse row input could not be read
    #[error("Data loading error: {message}")]
    DataLoading { message: String },

    /// Feature ids violated the scorer's precondition under strict validation
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// File I/O errors
    #[error("I/O error: {source}")]
    IO {
        #[from]
        source: io::Error,
    },

    /// JSON serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Type alias for Results using ForestError
pub type Result<T> = std::result::Result<T, ForestError>;

impl ForestError {
    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        ForestError::Config {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter<P, V, R>(parameter: P, value: V, reason: R) -> Self
    where
        P: Into<String>,
        V: Into<String>,
        R: Into<String>,
    {
        ForestError::InvalidParameter {
            parameter: parameter.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a data loading error
    pub fn data_loading<S: Into<String>>(message: S) -> Self {
        ForestError::DataLoading {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input<S: Into<String>>(message: S) -> Self {
        ForestError::InvalidInput {
            message: message.into(),
        }
    }

    /// The load error behind this error, if it is one
    pub fn as_malformed_model(&self) -> Option<&MalformedModelError> {
        match self {
            ForestError::MalformedModel(err) => Some(err),
            _ => None,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            ForestError::Config { .. } => "config",
            ForestError::InvalidParameter { .. } => "invalid_parameter",
            ForestError::MalformedModel(_) => "malformed_model",
            ForestError::DataLoading { .. } => "data_loading",
            ForestError::InvalidInput { .. } => "invalid_input",
            ForestError::IO { .. } => "io",
            ForestError::Json { .. } => "json",
        }
    }
}
