//! Host schema model
//!
//! A small owned view of a GraphQL schema built from SDL with
//! `graphql-parser`. Only what generation needs is kept: type kinds,
//! fields with their arguments, directive uses with their argument values,
//! directive definitions and the root operation type names.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::{Error, Result};
use graphql_parser::schema as gql;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::debug;

/// Scalars every schema has without declaring them
pub const BUILTIN_SCALARS: &[&str] = &["String", "Int", "Float", "Boolean", "ID"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

/// Reference to a type from a field or argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named(String),
    List(Box<TypeRef>),
    NonNull(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    pub fn non_null(inner: TypeRef) -> Self {
        TypeRef::NonNull(Box::new(inner))
    }

    pub fn list(inner: TypeRef) -> Self {
        TypeRef::List(Box::new(inner))
    }

    /// Innermost named type
    pub fn named_type(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.named_type(),
        }
    }

    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }

    fn from_parsed(parsed: &gql::Type<'_, String>) -> Self {
        match parsed {
            gql::Type::NamedType(name) => TypeRef::Named(name.clone()),
            gql::Type::ListType(inner) => TypeRef::List(Box::new(Self::from_parsed(inner))),
            gql::Type::NonNullType(inner) => TypeRef::NonNull(Box::new(Self::from_parsed(inner))),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name),
            TypeRef::List(inner) => write!(f, "[{}]", inner),
            TypeRef::NonNull(inner) => write!(f, "{}!", inner),
        }
    }
}

/// Literal value of a directive argument
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    Variable(String),
    List(Vec<ArgValue>),
    Object(BTreeMap<String, ArgValue>),
}

impl ArgValue {
    /// Raw text of the value: strings unquoted, `None` for null
    pub fn raw(&self) -> Option<String> {
        match self {
            ArgValue::Null => None,
            ArgValue::String(value) => Some(value.clone()),
            other => Some(other.to_string()),
        }
    }

    fn from_parsed(parsed: &gql::Value<'_, String>) -> Self {
        match parsed {
            gql::Value::Variable(name) => ArgValue::Variable(name.clone()),
            gql::Value::Int(number) => number
                .as_i64()
                .map(ArgValue::Int)
                .unwrap_or(ArgValue::Null),
            gql::Value::Float(value) => ArgValue::Float(*value),
            gql::Value::String(value) => ArgValue::String(value.clone()),
            gql::Value::Boolean(value) => ArgValue::Boolean(*value),
            gql::Value::Null => ArgValue::Null,
            gql::Value::Enum(name) => ArgValue::Enum(name.clone()),
            gql::Value::List(items) => ArgValue::List(items.iter().map(Self::from_parsed).collect()),
            gql::Value::Object(entries) => ArgValue::Object(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), Self::from_parsed(value)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Null => write!(f, "null"),
            ArgValue::Int(value) => write!(f, "{}", value),
            ArgValue::Float(value) => write!(f, "{}", value),
            ArgValue::String(value) => write!(f, "{:?}", value),
            ArgValue::Boolean(value) => write!(f, "{}", value),
            ArgValue::Enum(name) => write!(f, "{}", name),
            ArgValue::Variable(name) => write!(f, "${}", name),
            ArgValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            ArgValue::Object(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// One directive applied to a schema element
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveUse {
    pub name: String,
    /// Arguments in source order
    pub arguments: Vec<(String, ArgValue)>,
}

impl DirectiveUse {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: ArgValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    pub fn argument(&self, name: &str) -> Option<&ArgValue> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }

    fn from_parsed(parsed: &gql::Directive<'_, String>) -> Self {
        Self {
            name: parsed.name.clone(),
            arguments: parsed
                .arguments
                .iter()
                .map(|(name, value)| (name.clone(), ArgValue::from_parsed(value)))
                .collect(),
        }
    }
}

fn directives_from(parsed: &[gql::Directive<'_, String>]) -> Vec<DirectiveUse> {
    parsed.iter().map(DirectiveUse::from_parsed).collect()
}

/// Argument of a field or directive definition
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDef {
    pub name: String,
    pub value_type: TypeRef,
    pub directives: Vec<DirectiveUse>,
}

impl InputValueDef {
    pub fn new(name: impl Into<String>, value_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            value_type,
            directives: Vec::new(),
        }
    }

    fn from_parsed(parsed: &gql::InputValue<'_, String>) -> Self {
        Self {
            name: parsed.name.clone(),
            value_type: TypeRef::from_parsed(&parsed.value_type),
            directives: directives_from(&parsed.directives),
        }
    }
}

/// A field of an object, interface or input object
///
/// Input object fields never carry arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub field_type: TypeRef,
    pub description: Option<String>,
    pub arguments: Vec<InputValueDef>,
    pub directives: Vec<DirectiveUse>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            field_type,
            description: None,
            arguments: Vec::new(),
            directives: Vec::new(),
        }
    }

    pub fn with_directive(mut self, directive: DirectiveUse) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn with_argument(mut self, argument: InputValueDef) -> Self {
        self.arguments.push(argument);
        self
    }

    /// Every use of the named directive, in source order
    pub fn directives_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DirectiveUse> {
        self.directives.iter().filter(move |d| d.name == name)
    }

    fn from_input_value(parsed: &gql::InputValue<'_, String>) -> Self {
        Self {
            name: parsed.name.clone(),
            field_type: TypeRef::from_parsed(&parsed.value_type),
            description: parsed.description.clone(),
            arguments: Vec::new(),
            directives: directives_from(&parsed.directives),
        }
    }

    fn from_field(parsed: &gql::Field<'_, String>) -> Self {
        Self {
            name: parsed.name.clone(),
            field_type: TypeRef::from_parsed(&parsed.field_type),
            description: parsed.description.clone(),
            arguments: parsed.arguments.iter().map(InputValueDef::from_parsed).collect(),
            directives: directives_from(&parsed.directives),
        }
    }
}

/// A named type definition, with extensions merged in
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub kind: TypeKind,
    pub description: Option<String>,
    /// Fields in declaration order, extension fields appended
    pub fields: Vec<FieldDef>,
    pub directives: Vec<DirectiveUse>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            fields: Vec::new(),
            directives: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_directive(mut self, directive: DirectiveUse) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveUse> {
        self.directives.iter().find(|d| d.name == name)
    }

    pub fn is_input_object(&self) -> bool {
        self.kind == TypeKind::InputObject
    }

    /// Introspection types start with `__`
    pub fn is_reserved(&self) -> bool {
        self.name.starts_with("__")
    }

    fn from_parsed(parsed: &gql::TypeDefinition<'_, String>) -> Self {
        match parsed {
            gql::TypeDefinition::Scalar(scalar) => Self {
                description: scalar.description.clone(),
                directives: directives_from(&scalar.directives),
                ..Self::new(scalar.name.clone(), TypeKind::Scalar)
            },
            gql::TypeDefinition::Object(object) => Self {
                description: object.description.clone(),
                fields: object.fields.iter().map(FieldDef::from_field).collect(),
                directives: directives_from(&object.directives),
                ..Self::new(object.name.clone(), TypeKind::Object)
            },
            gql::TypeDefinition::Interface(interface) => Self {
                description: interface.description.clone(),
                fields: interface.fields.iter().map(FieldDef::from_field).collect(),
                directives: directives_from(&interface.directives),
                ..Self::new(interface.name.clone(), TypeKind::Interface)
            },
            gql::TypeDefinition::Union(union) => Self {
                description: union.description.clone(),
                directives: directives_from(&union.directives),
                ..Self::new(union.name.clone(), TypeKind::Union)
            },
            gql::TypeDefinition::Enum(enumeration) => Self {
                description: enumeration.description.clone(),
                directives: directives_from(&enumeration.directives),
                ..Self::new(enumeration.name.clone(), TypeKind::Enum)
            },
            gql::TypeDefinition::InputObject(input) => Self {
                description: input.description.clone(),
                fields: input.fields.iter().map(FieldDef::from_input_value).collect(),
                directives: directives_from(&input.directives),
                ..Self::new(input.name.clone(), TypeKind::InputObject)
            },
        }
    }
}

/// A directive definition
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveDef {
    pub name: String,
    pub arguments: Vec<InputValueDef>,
    /// Location names such as `INPUT_FIELD_DEFINITION`
    pub locations: Vec<String>,
}

impl DirectiveDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
            locations: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: InputValueDef) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }
}

/// Parsed schema: types, directive definitions and root operation names
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    types: BTreeMap<String, TypeDef>,
    directives: BTreeMap<String, DirectiveDef>,
    query: Option<String>,
    mutation: Option<String>,
    subscription: Option<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a single SDL document
    pub fn parse(sdl: &str) -> Result<Self> {
        Self::from_sources(&[("schema".to_string(), sdl.to_string())])
    }

    /// Parse and read every schema file, in order
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut sources = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let sdl = std::fs::read_to_string(path).map_err(|e| Error::Io {
                message: format!("Failed to read schema {}: {}", path.display(), e),
                source: e,
            })?;
            sources.push((path.display().to_string(), sdl));
        }
        Self::from_sources(&sources)
    }

    /// Merge several SDL documents into one schema
    ///
    /// Definitions from every source are registered before any extension
    /// is applied, so `extend input` may precede its base definition.
    pub fn from_sources(sources: &[(String, String)]) -> Result<Self> {
        let mut documents = Vec::with_capacity(sources.len());
        for (name, sdl) in sources {
            let document = gql::parse_schema::<String>(sdl).map_err(|e| Error::SchemaParse {
                source_name: name.clone(),
                message: e.to_string(),
            })?;
            documents.push(document);
        }

        let mut schema = Schema::new();
        let mut explicit_roots = false;

        for document in &documents {
            for definition in &document.definitions {
                match definition {
                    gql::Definition::SchemaDefinition(roots) => {
                        explicit_roots = true;
                        schema.query = roots.query.clone();
                        schema.mutation = roots.mutation.clone();
                        schema.subscription = roots.subscription.clone();
                    }
                    gql::Definition::TypeDefinition(parsed) => {
                        let type_def = TypeDef::from_parsed(parsed);
                        if schema.types.contains_key(&type_def.name) {
                            return Err(Error::invalid_schema(format!(
                                "type {} is defined more than once",
                                type_def.name
                            )));
                        }
                        schema.types.insert(type_def.name.clone(), type_def);
                    }
                    gql::Definition::DirectiveDefinition(parsed) => {
                        let directive = DirectiveDef {
                            name: parsed.name.clone(),
                            arguments: parsed.arguments.iter().map(InputValueDef::from_parsed).collect(),
                            locations: parsed
                                .locations
                                .iter()
                                .map(|location| location.as_str().to_string())
                                .collect(),
                        };
                        schema.directives.insert(directive.name.clone(), directive);
                    }
                    gql::Definition::TypeExtension(_) => {}
                }
            }
        }

        for document in &documents {
            for definition in &document.definitions {
                if let gql::Definition::TypeExtension(extension) = definition {
                    schema.apply_extension(extension)?;
                }
            }
        }

        if !explicit_roots {
            for (slot, default) in [
                (&mut schema.query, "Query"),
                (&mut schema.mutation, "Mutation"),
                (&mut schema.subscription, "Subscription"),
            ] {
                if schema.types.contains_key(default) {
                    *slot = Some(default.to_string());
                }
            }
        }

        debug!(
            sources = sources.len(),
            types = schema.types.len(),
            directives = schema.directives.len(),
            "Loaded schema"
        );
        Ok(schema)
    }

    fn apply_extension(&mut self, extension: &gql::TypeExtension<'_, String>) -> Result<()> {
        let (name, fields, directives) = match extension {
            gql::TypeExtension::Scalar(ext) => (&ext.name, Vec::new(), &ext.directives),
            gql::TypeExtension::Object(ext) => (
                &ext.name,
                ext.fields.iter().map(FieldDef::from_field).collect(),
                &ext.directives,
            ),
            gql::TypeExtension::Interface(ext) => (
                &ext.name,
                ext.fields.iter().map(FieldDef::from_field).collect(),
                &ext.directives,
            ),
            gql::TypeExtension::Union(ext) => (&ext.name, Vec::new(), &ext.directives),
            gql::TypeExtension::Enum(ext) => (&ext.name, Vec::new(), &ext.directives),
            gql::TypeExtension::InputObject(ext) => (
                &ext.name,
                ext.fields.iter().map(FieldDef::from_input_value).collect(),
                &ext.directives,
            ),
        };

        let type_def = self
            .types
            .get_mut(name)
            .ok_or_else(|| Error::invalid_schema(format!("cannot extend undefined type {}", name)))?;
        type_def.fields.extend(fields);
        type_def.directives.extend(directives_from(directives));
        Ok(())
    }

    pub fn get_type(&self, name: &str) -> Option<&TypeDef> {
        self.types.get(name)
    }

    /// Add or replace a type definition
    pub fn insert_type(&mut self, type_def: TypeDef) {
        self.types.insert(type_def.name.clone(), type_def);
    }

    /// Every type, sorted by name
    pub fn types(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.values()
    }

    /// Non-reserved input object types, sorted by name
    pub fn input_objects(&self) -> impl Iterator<Item = &TypeDef> {
        self.types
            .values()
            .filter(|def| def.is_input_object() && !def.is_reserved())
    }

    pub fn is_input_object(&self, name: &str) -> bool {
        self.types.get(name).map(TypeDef::is_input_object).unwrap_or(false)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDef> {
        self.directives.get(name)
    }

    pub fn directives(&self) -> impl Iterator<Item = &DirectiveDef> {
        self.directives.values()
    }

    /// Register a directive definition unless one with the same name exists
    ///
    /// Returns whether the definition was added.
    pub fn add_directive(&mut self, directive: DirectiveDef) -> bool {
        if self.directives.contains_key(&directive.name) {
            return false;
        }
        self.directives.insert(directive.name.clone(), directive);
        true
    }

    pub fn set_roots(&mut self, query: Option<&str>, mutation: Option<&str>, subscription: Option<&str>) {
        self.query = query.map(str::to_string);
        self.mutation = mutation.map(str::to_string);
        self.subscription = subscription.map(str::to_string);
    }

    pub fn query_type(&self) -> Option<&TypeDef> {
        self.query.as_deref().and_then(|name| self.types.get(name))
    }

    pub fn mutation_type(&self) -> Option<&TypeDef> {
        self.mutation.as_deref().and_then(|name| self.types.get(name))
    }

    pub fn subscription_type(&self) -> Option<&TypeDef> {
        self.subscription.as_deref().and_then(|name| self.types.get(name))
    }

    /// Root operation types present in the schema: mutation, query, subscription
    pub fn operation_types(&self) -> Vec<&TypeDef> {
        [self.mutation_type(), self.query_type(), self.subscription_type()]
            .into_iter()
            .flatten()
            .collect()
    }
}
