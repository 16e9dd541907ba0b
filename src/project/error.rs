//! Error types for project parsing

use crate::resolve::ResolveError;
use crate::storage::StorageError;
use crate::validation::ValidationFailure;
use thiserror::Error;

/// Errors that can occur while building a project index
#[derive(Error, Debug)]
pub enum ParseError {
    /// The required project manifest is not among the root's files
    #[error("Manifest not found: expected {file} in the project root")]
    ManifestNotFound { file: String },

    /// A model path spans more than one directory level
    #[error("Nested model paths not yet supported: {0}")]
    NestedModelPath(String),

    /// A model path does not name a directory in the project root
    #[error("Model path not found: {0}")]
    ModelPathNotFound(String),

    /// The tree walk went deeper than the configured limit
    #[error("Maximum directory depth exceeded at {directory}: depth {depth}")]
    MaxDepthExceeded { directory: String, depth: usize },

    /// A single-assignment section of the builder was set twice
    #[error("Cannot set {field} twice")]
    AlreadySet { field: &'static str },

    /// The index was finalized without a project manifest
    #[error("No project found")]
    NoProject,

    /// The index was finalized without any property file
    #[error("No files found")]
    NoFiles,

    /// A file could not be decoded as YAML
    #[error("Failed to decode {path}: {message}")]
    Decode { path: String, message: String },

    /// A file was rejected by its schema
    #[error("Invalid file {path}: {failure}")]
    Validation {
        path: String,
        #[source]
        failure: ValidationFailure,
    },

    /// Invalid parser configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

impl ParseError {
    /// Get a user-friendly error message for CLI output
    pub fn user_message(&self) -> String {
        match self {
            ParseError::ManifestNotFound { file } => {
                format!(
                    "Manifest not found: {file}\n\nHint: Run from the project root, next to {file}."
                )
            }
            ParseError::NestedModelPath(path) => {
                format!(
                    "Nested model paths not yet supported: {path}\n\n\
                    Hint: List only top-level folders under 'model-paths'."
                )
            }
            ParseError::ModelPathNotFound(path) => {
                format!(
                    "Model path not found: {path}\n\n\
                    Hint: Create the folder or remove it from 'model-paths'."
                )
            }
            ParseError::MaxDepthExceeded { directory, depth } => {
                format!(
                    "Directory nesting too deep at {directory} (depth {depth}).\n\n\
                    Hint: Check for symlink loops inside the model folders."
                )
            }
            ParseError::Validation { path, failure } => {
                let mut message = format!("Invalid {}: {path}\n", failure.category);
                for issue in &failure.issues {
                    message.push_str(&format!("  - {issue}\n"));
                }
                message
            }
            _ => self.to_string(),
        }
    }
}
