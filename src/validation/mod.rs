//! Validation functionality
//!
//! Provides the schema validator that turns decoded project files into typed
//! documents, reporting every structural issue found.

pub mod schema;

pub use schema::{
    DefaultSchemaValidator, IssueCode, SchemaCategory, SchemaValidator, ValidatedDocument,
    ValidationFailure, ValidationIssue, validate_packages, validate_project,
    validate_property_file, validate_selectors,
};
