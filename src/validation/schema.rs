//! Structural schema validation for project files
//!
//! Every file category has a bundled JSON Schema describing the keys it may
//! carry, their types and naming constraints. A document is first checked
//! against its schema, collecting every issue, and only then deserialized into
//! its typed model.

use crate::models::{PackagesManifest, ProjectManifest, PropertyFile, SelectorsManifest};
use jsonschema::Validator;
use jsonschema::error::ValidationErrorKind;
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;

static PROJECT_SCHEMA: Lazy<Result<Validator, String>> =
    Lazy::new(|| compile_schema(include_str!("../../schemas/project.schema.json")));
static PACKAGES_SCHEMA: Lazy<Result<Validator, String>> =
    Lazy::new(|| compile_schema(include_str!("../../schemas/packages.schema.json")));
static SELECTORS_SCHEMA: Lazy<Result<Validator, String>> =
    Lazy::new(|| compile_schema(include_str!("../../schemas/selectors.schema.json")));
static PROPERTIES_SCHEMA: Lazy<Result<Validator, String>> =
    Lazy::new(|| compile_schema(include_str!("../../schemas/properties.schema.json")));

fn compile_schema(source: &str) -> Result<Validator, String> {
    let schema: Value =
        serde_json::from_str(source).map_err(|e| format!("Failed to load schema: {}", e))?;
    Validator::new(&schema).map_err(|e| format!("Failed to compile schema: {}", e))
}

/// File category a document is validated as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaCategory {
    Project,
    Packages,
    Selectors,
    Properties,
}

impl fmt::Display for SchemaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaCategory::Project => "project manifest",
            SchemaCategory::Packages => "package manifest",
            SchemaCategory::Selectors => "selector manifest",
            SchemaCategory::Properties => "property file",
        };
        f.write_str(name)
    }
}

/// Machine-readable reason for a validation issue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    InvalidType,
    Required,
    InvalidString,
    InvalidCombination,
    Custom,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCode::InvalidType => "invalid_type",
            IssueCode::Required => "required",
            IssueCode::InvalidString => "invalid_string",
            IssueCode::InvalidCombination => "invalid_combination",
            IssueCode::Custom => "custom",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One problem found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Dotted path to the offending value, `root` for the document itself
    pub path: String,
    pub code: IssueCode,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path, self.message, self.code)
    }
}

/// A document was rejected by its schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub category: SchemaCategory,
    pub issues: Vec<ValidationIssue>,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation failed", self.category)?;
        for issue in &self.issues {
            write!(f, "; {}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}

/// A document that passed validation, typed by its category
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedDocument {
    Project(ProjectManifest),
    Packages(PackagesManifest),
    Selectors(SelectorsManifest),
    Properties(PropertyFile),
}

impl ValidatedDocument {
    pub fn category(&self) -> SchemaCategory {
        match self {
            ValidatedDocument::Project(_) => SchemaCategory::Project,
            ValidatedDocument::Packages(_) => SchemaCategory::Packages,
            ValidatedDocument::Selectors(_) => SchemaCategory::Selectors,
            ValidatedDocument::Properties(_) => SchemaCategory::Properties,
        }
    }
}

/// Validates decoded documents for a file category
pub trait SchemaValidator: Send + Sync {
    fn validate(
        &self,
        category: SchemaCategory,
        document: &Value,
    ) -> Result<ValidatedDocument, ValidationFailure>;
}

macro_rules! typed_validation {
    ($(#[$doc:meta])* $name:ident, $category:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name(
            validator: &dyn SchemaValidator,
            document: &Value,
        ) -> Result<$ty, ValidationFailure> {
            match validator.validate(SchemaCategory::$category, document)? {
                ValidatedDocument::$category(typed) => Ok(typed),
                other => Err(category_mismatch(SchemaCategory::$category, other.category())),
            }
        }
    };
}

typed_validation!(
    /// Validate a project manifest document
    validate_project, Project, ProjectManifest
);
typed_validation!(validate_packages, Packages, PackagesManifest);
typed_validation!(validate_selectors, Selectors, SelectorsManifest);
typed_validation!(
    /// Validate a property file document
    validate_property_file, Properties, PropertyFile
);

fn category_mismatch(expected: SchemaCategory, found: SchemaCategory) -> ValidationFailure {
    root_failure(
        expected,
        format!("validator returned a {} for a {}", found, expected),
    )
}

/// Validator backed by the JSON Schemas bundled with the SDK
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSchemaValidator;

impl DefaultSchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaValidator for DefaultSchemaValidator {
    fn validate(
        &self,
        category: SchemaCategory,
        document: &Value,
    ) -> Result<ValidatedDocument, ValidationFailure> {
        // An empty file decodes to null and declares nothing
        if category == SchemaCategory::Properties && document.is_null() {
            return Ok(ValidatedDocument::Properties(PropertyFile::default()));
        }

        let schema = bundled_schema(category)
            .as_ref()
            .map_err(|message| root_failure(category, message.clone()))?;
        let issues: Vec<ValidationIssue> = schema
            .iter_errors(document)
            .map(|error| issue_from(&error))
            .collect();
        if !issues.is_empty() {
            return Err(ValidationFailure { category, issues });
        }

        let typed = match category {
            SchemaCategory::Project => ValidatedDocument::Project(deserialize(category, document)?),
            SchemaCategory::Packages => {
                ValidatedDocument::Packages(deserialize(category, document)?)
            }
            SchemaCategory::Selectors => {
                ValidatedDocument::Selectors(deserialize(category, document)?)
            }
            SchemaCategory::Properties => {
                ValidatedDocument::Properties(deserialize(category, document)?)
            }
        };
        Ok(typed)
    }
}

fn bundled_schema(category: SchemaCategory) -> &'static Result<Validator, String> {
    match category {
        SchemaCategory::Project => &*PROJECT_SCHEMA,
        SchemaCategory::Packages => &*PACKAGES_SCHEMA,
        SchemaCategory::Selectors => &*SELECTORS_SCHEMA,
        SchemaCategory::Properties => &*PROPERTIES_SCHEMA,
    }
}

fn deserialize<T: DeserializeOwned>(
    category: SchemaCategory,
    document: &Value,
) -> Result<T, ValidationFailure> {
    serde_json::from_value(document.clone()).map_err(|e| root_failure(category, e.to_string()))
}

fn root_failure(category: SchemaCategory, message: String) -> ValidationFailure {
    ValidationFailure {
        category,
        issues: vec![ValidationIssue {
            path: "root".to_string(),
            code: IssueCode::Custom,
            message,
        }],
    }
}

/// Map a schema error onto an issue, keyed by the dotted path of the offending value.
///
/// A missing key is reported at the key's own path rather than at its parent.
fn issue_from(error: &jsonschema::ValidationError<'_>) -> ValidationIssue {
    let path = dotted_path(&error.instance_path().to_string());
    let (code, path) = match error.kind() {
        ValidationErrorKind::Required { property } => (
            IssueCode::Required,
            child_path(&path, property.as_str().unwrap_or_default()),
        ),
        ValidationErrorKind::Type { .. } => (IssueCode::InvalidType, path),
        ValidationErrorKind::Pattern { .. } => (IssueCode::InvalidString, path),
        ValidationErrorKind::Not { .. } | ValidationErrorKind::FalseSchema => {
            (IssueCode::InvalidCombination, path)
        }
        _ => (IssueCode::Custom, path),
    };
    ValidationIssue {
        path,
        code,
        message: error.to_string(),
    }
}

fn dotted_path(pointer: &str) -> String {
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.replace('/', ".")
    }
}

fn child_path(parent: &str, key: &str) -> String {
    if parent == "root" {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codes(failure: &ValidationFailure) -> Vec<(&str, IssueCode)> {
        let mut codes: Vec<_> = failure
            .issues
            .iter()
            .map(|i| (i.path.as_str(), i.code))
            .collect();
        codes.sort_by_key(|(path, _)| *path);
        codes
    }

    #[test]
    fn test_project_manifest_accepts_minimal() {
        let project = validate_project(
            &DefaultSchemaValidator,
            &json!({ "name": "jaffle_shop", "version": 1.0, "profile": "jaffle" }),
        )
        .unwrap();

        assert_eq!(project.name, "jaffle_shop");
        assert_eq!(project.model_paths, vec!["models".to_string()]);
    }

    #[test]
    fn test_project_manifest_collects_every_issue() {
        let failure = DefaultSchemaValidator
            .validate(
                SchemaCategory::Project,
                &json!({ "name": "9lives", "model-paths": "models", "vars": [] }),
            )
            .unwrap_err();

        assert_eq!(
            codes(&failure),
            vec![
                ("model-paths", IssueCode::InvalidType),
                ("name", IssueCode::InvalidString),
                ("vars", IssueCode::InvalidType),
            ]
        );
    }

    #[test]
    fn test_project_manifest_requires_name() {
        let failure = DefaultSchemaValidator
            .validate(SchemaCategory::Project, &json!({ "profile": "x" }))
            .unwrap_err();
        assert_eq!(codes(&failure), vec![("name", IssueCode::Required)]);
    }

    #[test]
    fn test_null_manifest_is_rejected() {
        let failure = DefaultSchemaValidator
            .validate(SchemaCategory::Selectors, &Value::Null)
            .unwrap_err();
        assert_eq!(codes(&failure), vec![("root", IssueCode::InvalidType)]);
    }

    #[test]
    fn test_empty_property_file_is_empty_document() {
        let file = validate_property_file(&DefaultSchemaValidator, &Value::Null).unwrap();
        assert_eq!(file.entity_count(), 0);
    }

    #[test]
    fn test_property_elements_need_names() {
        let failure = DefaultSchemaValidator
            .validate(
                SchemaCategory::Properties,
                &json!({ "version": 2, "models": [{ "name": "orders" }, { "description": "x" }] }),
            )
            .unwrap_err();
        assert_eq!(codes(&failure), vec![("models.1.name", IssueCode::Required)]);
    }

    #[test]
    fn test_composite_with_own_dimensions_is_rejected() {
        let failure = DefaultSchemaValidator
            .validate(
                SchemaCategory::Properties,
                &json!({ "semantic_models": [{
                    "label": "Sales",
                    "unique_name": "sales",
                    "models": ["orders"],
                    "dimensions": [{ "name": "region" }]
                }] }),
            )
            .unwrap_err();
        assert_eq!(
            codes(&failure),
            vec![("semantic_models.0.dimensions", IssueCode::InvalidCombination)]
        );
    }

    #[test]
    fn test_package_entries_are_checked() {
        let failure = DefaultSchemaValidator
            .validate(
                SchemaCategory::Packages,
                &json!({ "packages": [{ "package": "dbt-labs/dbt_utils", "version": "1.1.1" }, { "package": "bad name!" }] }),
            )
            .unwrap_err();
        assert_eq!(
            codes(&failure),
            vec![("packages.1.package", IssueCode::InvalidString)]
        );
    }

    #[test]
    fn test_selectors_are_typed() {
        let selectors = validate_selectors(
            &DefaultSchemaValidator,
            &json!({ "selectors": [{ "name": "nightly", "definition": "tag:nightly" }] }),
        )
        .unwrap();
        assert_eq!(selectors.selectors[0].name, "nightly");
    }

    #[test]
    fn test_failure_display_lists_issues() {
        let failure = ValidationFailure {
            category: SchemaCategory::Packages,
            issues: vec![ValidationIssue {
                path: "packages".to_string(),
                code: IssueCode::Required,
                message: "missing required key 'packages'".to_string(),
            }],
        };
        assert_eq!(
            failure.to_string(),
            "package manifest validation failed; packages: missing required key 'packages' (required)"
        );
    }

    #[test]
    fn test_composite_references_must_be_names() {
        let failure = DefaultSchemaValidator
            .validate(
                SchemaCategory::Properties,
                &json!({ "semantic_models": [{
                    "label": "Sales",
                    "unique_name": "sales",
                    "models": ["orders", 3]
                }] }),
            )
            .unwrap_err();
        assert_eq!(
            codes(&failure),
            vec![("semantic_models.0.models.1", IssueCode::InvalidType)]
        );
    }

    #[test]
    fn test_tests_and_data_tests_together_are_rejected() {
        let failure = DefaultSchemaValidator
            .validate(
                SchemaCategory::Properties,
                &json!({ "models": [{
                    "name": "orders",
                    "tests": ["unique"],
                    "data_tests": ["not_null"],
                    "columns": [{ "name": "id", "tests": [], "data_tests": [] }]
                }] }),
            )
            .unwrap_err();
        assert_eq!(
            codes(&failure),
            vec![
                ("models.0", IssueCode::InvalidCombination),
                ("models.0.columns.0", IssueCode::InvalidCombination),
            ]
        );
    }

    #[test]
    fn test_legacy_tests_key_is_accepted() {
        let file = validate_property_file(
            &DefaultSchemaValidator,
            &json!({ "models": [{ "name": "orders", "columns": [{ "name": "id", "tests": ["unique"] }] }] }),
        )
        .unwrap();
        assert_eq!(file.models[0].columns[0].data_tests, vec![json!("unique")]);
    }
}
