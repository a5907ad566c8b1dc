/// What a model does with fields its schema does not declare.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraFields {
    /// Reject them.
    #[default]
    Forbid,
    /// Drop them at construction.
    Ignore,
    /// Keep them, unchecked.
    Allow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Re-run coercion and the type check on every assignment, not only at
    /// construction.
    pub validate_assignment: bool,
    pub extra: ExtraFields,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            validate_assignment: true,
            extra: ExtraFields::Forbid,
        }
    }
}
