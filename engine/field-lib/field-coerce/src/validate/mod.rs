mod check;

use field_types::{FieldType, FieldValue};

pub use check::TypeChecker;

/// Tracks where in a model the value being checked lives.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    scope: Vec<String>,
}

impl CheckContext {
    pub fn new(root: &str) -> CheckContext {
        CheckContext {
            scope: vec![root.to_string()],
        }
    }

    pub fn display_scope(&self) -> String {
        if self.scope.is_empty() {
            return "<root>".to_string();
        }
        self.scope.join(".")
    }

    pub fn enter_scope(&self, scope: &str) -> CheckContext {
        let mut new_scope = self.scope.clone();
        new_scope.push(scope.to_string());
        CheckContext { scope: new_scope }
    }

    fn error(&self, reason: String) -> ValidationError {
        ValidationError {
            reason,
            scope: self.scope.clone(),
        }
    }

    pub(crate) fn error_unexpected_type(
        &self,
        target: &FieldType,
        got: &FieldValue,
    ) -> ValidationError {
        self.error(format!("Expected {}, got {}: {}", target, got.r#type(), got))
    }

    pub(crate) fn error_wrong_length(
        &self,
        target: &FieldType,
        expected: usize,
        got: usize,
    ) -> ValidationError {
        self.error(format!(
            "Expected {} with {} items, got {}",
            target, expected, got
        ))
    }

    pub(crate) fn error_missing_required_fields<T: AsRef<str>>(
        &self,
        missing_fields: &[T],
    ) -> ValidationError {
        let fields = missing_fields
            .iter()
            .map(|c| c.as_ref())
            .collect::<Vec<_>>()
            .join(", ");
        match missing_fields.len() {
            1 => self.error(format!("Missing required field: {}", fields)),
            _ => self.error(format!("Missing required fields: {}", fields)),
        }
    }

    pub(crate) fn error_extra_field(&self) -> ValidationError {
        self.error("Extra fields are not permitted".to_string())
    }

    pub(crate) fn error_no_such_field(&self, field: &str) -> ValidationError {
        self.error(format!("No field named {:?}", field))
    }

    pub(crate) fn error_not_an_object(&self, got: &serde_json::Value) -> ValidationError {
        self.error(format!("Expected an object of fields, got {}", got))
    }

    /// Folds several errors under this scope into one, keeping each error's
    /// path relative to this scope.
    pub(crate) fn error_merge_multiple<'a>(
        &self,
        summary: &str,
        errors: impl IntoIterator<Item = &'a ValidationError>,
    ) -> ValidationError {
        let reasons = errors
            .into_iter()
            .map(|e| {
                let remaining = e
                    .scope
                    .iter()
                    .skip(self.scope.len())
                    .cloned()
                    .collect::<Vec<_>>()
                    .join(".");
                if remaining.is_empty() {
                    e.reason.clone()
                } else {
                    format!("{}: {}", remaining, e.reason.replace('\n', "\n  "))
                }
            })
            .collect::<Vec<_>>();

        self.error(format!(
            "{}:\n  {}",
            summary,
            reasons.join("\n").replace('\n', "\n  ")
        ))
    }
}

/// Raised when a value does not fit its declared type, or a model is built
/// or assigned with fields its schema does not allow.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    reason: String,
    scope: Vec<String>,
}

impl ValidationError {
    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.scope.is_empty() {
            return write!(f, "Error validating '<root>': {}", self.reason);
        }
        write!(
            f,
            "Error validating '{}': {}",
            self.scope.join("."),
            self.reason
        )
    }
}

impl std::error::Error for ValidationError {}
