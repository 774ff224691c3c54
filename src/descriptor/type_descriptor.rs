use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::types::{PresentationTable, TypeExpr};

/// Keywords of the target language, not usable as class-syntax attribute names
const RESERVED_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

fn default_required() -> bool {
    true
}

/// One field of a composite type descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub type_expr: TypeExpr,
    #[serde(default = "default_required")]
    pub required: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, type_expr: TypeExpr, required: bool) -> Self {
        Self {
            name: name.into(),
            type_expr,
            required,
        }
    }

    /// Whether the field name is a keyword of the target language
    pub fn is_reserved(&self) -> bool {
        RESERVED_KEYWORDS.contains(&self.name.as_str())
    }

    /// `"Name": Type` entry for the functional mapping-type syntax
    pub fn render(&self, presentation: &PresentationTable) -> String {
        format!("{:?}: {}", self.name, self.type_expr.render(presentation))
    }
}

/// Named record type with ordered fields
///
/// Field order is the generated order and is never re-sorted. Descriptors
/// compare and order by `name` only; use [`TypeDescriptor::is_same`] for a
/// structural comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    pub docstring: String,
}

impl TypeDescriptor {
    /// Build a descriptor, rewriting references to `name` inside `fields` to [`TypeExpr::SelfRef`]
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = Field>) -> Self {
        let mut descriptor = Self {
            name: name.into(),
            fields: fields.into_iter().collect(),
            docstring: String::new(),
        };
        descriptor.resolve_self_references();
        descriptor
    }

    pub fn with_docstring(mut self, docstring: impl Into<String>) -> Self {
        self.docstring = docstring.into();
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn add_field(&mut self, name: impl Into<String>, type_expr: TypeExpr, required: bool) {
        let mut field = Field::new(name, type_expr, required);
        field.type_expr.replace_self_reference(&self.name);
        self.fields.push(field);
    }

    pub fn get_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Rewrite every reference to this descriptor's own name into [`TypeExpr::SelfRef`]
    ///
    /// Returns the names of the fields that changed. Running it again returns
    /// an empty list.
    pub fn resolve_self_references(&mut self) -> Vec<String> {
        let name = self.name.clone();
        self.fields
            .iter_mut()
            .filter_map(|field| {
                field
                    .type_expr
                    .replace_self_reference(&name)
                    .then(|| field.name.clone())
            })
            .collect()
    }

    /// Structural comparison: name, field names, types and requiredness
    pub fn is_same(&self, other: &TypeDescriptor) -> bool {
        self.name == other.name && self.fields == other.fields
    }

    /// Leaf types of all fields
    pub fn children_types(&self) -> BTreeSet<TypeExpr> {
        self.fields
            .iter()
            .flat_map(|f| f.type_expr.atoms())
            .collect()
    }

    /// Names of descriptors referenced by the fields, one level deep
    pub fn children_names(&self) -> BTreeSet<String> {
        self.fields
            .iter()
            .flat_map(|f| f.type_expr.referenced_names())
            .filter(|n| *n != self.name)
            .collect()
    }

    pub fn has_required(&self) -> bool {
        self.fields.iter().any(|f| f.required)
    }

    pub fn has_optional(&self) -> bool {
        self.fields.iter().any(|f| !f.required)
    }

    pub fn has_both(&self) -> bool {
        self.has_required() && self.has_optional()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn optional_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.required)
    }

    /// Name of the matching data class
    pub fn dataclass_name(&self) -> String {
        dataclass_name(&self.name)
    }

    /// Mapping-type definition in functional syntax
    ///
    /// A descriptor with both required and optional keys is split into a
    /// required and an optional base combined by a class.
    pub fn render_definition(&self, presentation: &PresentationTable) -> String {
        let entries = |fields: Vec<&Field>| {
            fields
                .iter()
                .map(|f| f.render(presentation))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let name = &self.name;
        if self.has_both() {
            let required = entries(self.required_fields().collect());
            let optional = entries(self.optional_fields().collect());
            return format!(
                "_Required{name} = TypedDict(\"_Required{name}\", {{{required}}})\n\
                 _Optional{name} = TypedDict(\"_Optional{name}\", {{{optional}}}, total=False)\n\n\
                 class {name}(_Required{name}, _Optional{name}):\n    pass"
            );
        }
        let all = entries(self.fields.iter().collect());
        if self.has_optional() {
            format!("{name} = TypedDict(\"{name}\", {{{all}}}, total=False)")
        } else {
            format!("{name} = TypedDict(\"{name}\", {{{all}}})")
        }
    }
}

/// `FooTypeDef` → `FooDataClassDef`
pub fn dataclass_name(name: &str) -> String {
    name.replace("TypeDef", "DataClassDef")
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for TypeDescriptor {}

impl PartialOrd for TypeDescriptor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TypeDescriptor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
