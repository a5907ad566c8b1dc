mod builder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TypeValue {
    String,
    Int,
    Float,
    Bool,
    Null,
}

impl std::fmt::Display for TypeValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeValue::String => write!(f, "string"),
            TypeValue::Int => write!(f, "int"),
            TypeValue::Float => write!(f, "float"),
            TypeValue::Bool => write!(f, "bool"),
            TypeValue::Null => write!(f, "null"),
        }
    }
}

/// FieldType is the declared type of a model field.
///
/// Built once when the schema is declared and only read afterwards; the
/// coercer never needs runtime type reflection, every question it asks is a
/// structural walk over this tree.
#[derive(serde::Serialize, Debug, Clone, PartialEq)]
pub enum FieldType {
    Primitive(TypeValue),
    List(Box<FieldType>),
    Set(Box<FieldType>),
    Map(Box<FieldType>, Box<FieldType>),
    Tuple(Vec<FieldType>),
    Union(Vec<FieldType>),
    Optional(Box<FieldType>),
}

static NULL_TYPE: FieldType = FieldType::Primitive(TypeValue::Null);

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Primitive(t) => write!(f, "{}", t),
            FieldType::Union(choices) => {
                write!(
                    f,
                    "({})",
                    choices
                        .iter()
                        .map(|t| t.to_string())
                        .collect::<Vec<_>>()
                        .join(" | ")
                )
            }
            FieldType::Tuple(choices) => {
                write!(
                    f,
                    "({})",
                    choices
                        .iter()
                        .map(|t| t.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            }
            FieldType::Map(k, v) => write!(f, "map<{}, {}>", k, v),
            FieldType::List(t) => write!(f, "{}[]", t),
            FieldType::Set(t) => write!(f, "set<{}>", t),
            FieldType::Optional(t) => write!(f, "{}?", t),
        }
    }
}

impl FieldType {
    /// The flattened set of alternatives this type may take on.
    ///
    /// A plain type (including a parameterized collection) is its own only
    /// candidate. `Optional(t)` contributes the candidates of `t` plus `null`,
    /// and unions are flattened recursively. Duplicates are dropped while the
    /// declaration order is kept.
    pub fn candidate_types(&self) -> Vec<&FieldType> {
        let mut candidates = Vec::new();
        self.collect_candidates(&mut candidates);
        candidates
    }

    fn collect_candidates<'a>(&'a self, out: &mut Vec<&'a FieldType>) {
        match self {
            FieldType::Union(choices) => {
                for choice in choices {
                    choice.collect_candidates(out);
                }
            }
            FieldType::Optional(inner) => {
                inner.collect_candidates(out);
                if !out.contains(&&NULL_TYPE) {
                    out.push(&NULL_TYPE);
                }
            }
            other => {
                if !out.contains(&other) {
                    out.push(other);
                }
            }
        }
    }

    /// True when `primitive` itself (not merely as an element type) is one of
    /// the candidates.
    pub fn has_candidate(&self, primitive: TypeValue) -> bool {
        self.candidate_types()
            .iter()
            .any(|t| matches!(t, FieldType::Primitive(p) if *p == primitive))
    }
}
