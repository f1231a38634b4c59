//! Type descriptors for generated input objects
//!
//! Generated input types describe themselves through a [`TypeDescriptor`]
//! table instead of runtime reflection: each field lists its generated
//! identifier, its wire name, its declared type and the compiled rule and
//! message attached during generation. A [`TypeCatalog`] holds every
//! descriptor of one generated schema and is the lookup table the evaluator
//! and path reconstruction dispatch through.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Declared type of a generated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    String,
    Int,
    Float,
    Boolean,
    Id,
    /// Enum values travel as their string name
    Enum(String),
    /// Custom scalar, carried as raw JSON
    Scalar(String),
    /// Another input object in the same catalog
    Object(String),
    List(Box<FieldType>),
    /// String-keyed map; keys never appear in error paths
    Map(Box<FieldType>),
    /// Nullable wrapper
    Optional(Box<FieldType>),
}

impl FieldType {
    /// Shorthand for `Optional(inner)`
    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    /// Shorthand for `List(inner)`
    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    /// Shorthand for `Map(inner)`
    pub fn map(inner: FieldType) -> Self {
        FieldType::Map(Box::new(inner))
    }

    /// Shorthand for `Object(name)`
    pub fn object(name: impl Into<String>) -> Self {
        FieldType::Object(name.into())
    }

    /// Strip every optional wrapper
    pub fn deref(&self) -> &FieldType {
        let mut current = self;
        while let FieldType::Optional(inner) = current {
            current = inner;
        }
        current
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }

    /// Element type of a list or value type of a map, after dereferencing
    pub fn element(&self) -> Option<&FieldType> {
        match self.deref() {
            FieldType::List(inner) | FieldType::Map(inner) => Some(inner),
            _ => None,
        }
    }

    /// Input object name, after dereferencing
    pub fn object_name(&self) -> Option<&str> {
        match self.deref() {
            FieldType::Object(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.deref(), FieldType::Int | FieldType::Float)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn inner(ty: &FieldType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match ty {
                FieldType::String => write!(f, "String"),
                FieldType::Int => write!(f, "Int"),
                FieldType::Float => write!(f, "Float"),
                FieldType::Boolean => write!(f, "Boolean"),
                FieldType::Id => write!(f, "ID"),
                FieldType::Enum(name) | FieldType::Scalar(name) | FieldType::Object(name) => {
                    write!(f, "{}", name)
                }
                FieldType::List(element) => {
                    write!(f, "[")?;
                    write_required(element, f)?;
                    write!(f, "]")
                }
                FieldType::Map(value) => {
                    write!(f, "Map<")?;
                    write_required(value, f)?;
                    write!(f, ">")
                }
                FieldType::Optional(wrapped) => inner(wrapped, f),
            }
        }

        fn write_required(ty: &FieldType, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            inner(ty, f)?;
            if !ty.is_optional() {
                write!(f, "!")?;
            }
            Ok(())
        }

        write_required(self, f)
    }
}

/// One field of a generated input object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Generated identifier; validation namespaces are built from these
    pub ident: String,

    /// External name on the wire, when it differs from the identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_name: Option<String>,

    pub field_type: FieldType,

    /// Compiled rule string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,

    /// Author supplied message overriding every generated message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FieldDescriptor {
    pub fn new(ident: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            ident: ident.into(),
            wire_name: None,
            field_type,
            rules: None,
            message: None,
        }
    }

    pub fn with_wire_name(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = Some(wire_name.into());
        self
    }

    pub fn with_rules(mut self, rules: impl Into<String>) -> Self {
        self.rules = Some(rules.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Key of this field in a wire-format object
    pub fn wire_key(&self) -> &str {
        match self.wire_name.as_deref() {
            Some(name) if !name.is_empty() && name != "-" => name,
            _ => &self.ident,
        }
    }

    pub fn has_rules(&self) -> bool {
        self.rules
            .as_deref()
            .map(|rules| !rules.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Descriptor of one generated input object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub name: String,
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, keeping declaration order
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Find a field by generated identifier
    pub fn find(&self, ident: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.ident == ident)
    }

    /// Whether any field carries a compiled rule
    pub fn has_rules(&self) -> bool {
        self.fields.iter().any(FieldDescriptor::has_rules)
    }
}

/// All generated input descriptors of a schema, keyed by type name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeCatalog {
    types: BTreeMap<String, TypeDescriptor>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_type(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Insert a descriptor, replacing any previous one with the same name
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.name.clone(), descriptor);
    }

    pub fn get(&self, type_name: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_name)
    }

    /// A type is validatable iff it carries at least one compiled rule
    pub fn is_validatable(&self, type_name: &str) -> bool {
        self.get(type_name)
            .map(TypeDescriptor::has_rules)
            .unwrap_or(false)
    }

    /// Names of every validatable type, sorted
    pub fn validatable_types(&self) -> Vec<&str> {
        self.types
            .values()
            .filter(|descriptor| descriptor.has_rules())
            .map(|descriptor| descriptor.name.as_str())
            .collect()
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Parse a catalog manifest
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a catalog manifest from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Render the catalog as a pretty-printed manifest
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Capability implemented by every generated input object
pub trait InputObject: Serialize {
    /// Schema name of the type; the key into the [`TypeCatalog`]
    const TYPE_NAME: &'static str;
}

/// Marker implemented by generated input objects that carry compiled rules
pub trait Validatable: InputObject {}

/// Capability of a resolved argument, decided where arguments enter the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ArgumentValue {
    /// Carries compiled rules and must be validated
    Validatable {
        type_name: String,
        value: Value,
    },
    /// Passed through untouched
    NotValidatable(Value),
}

/// A resolver argument after input coercion
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedArgument {
    pub name: String,
    pub value: ArgumentValue,
}

impl ResolvedArgument {
    /// Wrap a typed validatable input
    pub fn validatable<T: Validatable>(name: impl Into<String>, input: &T) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            value: ArgumentValue::Validatable {
                type_name: T::TYPE_NAME.to_string(),
                value: serde_json::to_value(input)?,
            },
        })
    }

    /// Wrap any other serializable argument
    pub fn plain<T: Serialize>(name: impl Into<String>, input: &T) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            value: ArgumentValue::NotValidatable(serde_json::to_value(input)?),
        })
    }

    /// Classify a wire-format argument against the catalog
    ///
    /// Only an object value of a rule-bearing type is validatable. Null and
    /// list values pass through, matching a nil pointer or a slice of inputs.
    pub fn classify(
        name: impl Into<String>,
        type_name: Option<&str>,
        value: Value,
        catalog: &TypeCatalog,
    ) -> Self {
        let value = match type_name {
            Some(type_name) if value.is_object() && catalog.is_validatable(type_name) => {
                ArgumentValue::Validatable {
                    type_name: type_name.to_string(),
                    value,
                }
            }
            _ => ArgumentValue::NotValidatable(value),
        };

        Self {
            name: name.into(),
            value,
        }
    }

    pub fn is_validatable(&self) -> bool {
        matches!(self.value, ArgumentValue::Validatable { .. })
    }
}

/// Resolve a type name against the catalog or fail with [`Error::UnknownType`]
pub(crate) fn require_type<'a>(catalog: &'a TypeCatalog, type_name: &str) -> Result<&'a TypeDescriptor> {
    catalog.get(type_name).ok_or_else(|| Error::UnknownType {
        type_name: type_name.to_string(),
    })
}
