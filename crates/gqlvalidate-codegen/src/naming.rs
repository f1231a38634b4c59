//! Naming conventions and the field name map
//!
//! Rules reference sibling fields by their schema names; the evaluator only
//! knows generated identifiers. The [`FieldNameMap`] bridges the two: it is
//! seeded from the naming convention for every input type and refined with
//! the identifier the model generator actually chose.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::schema::Schema;
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Words kept fully upper case in Pascal identifiers
pub const COMMON_INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
    "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern", "false",
    "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "static", "struct", "trait", "true", "type", "unsafe", "use", "where", "while",
    "abstract", "become", "box", "do", "final", "macro", "override", "priv", "try", "typeof",
    "unsized", "virtual", "yield",
];

/// Keywords that cannot be written as raw identifiers
const RESERVED_PATH_KEYWORDS: &[&str] = &["crate", "self", "Self", "super"];

/// How generated field identifiers are derived from schema names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    /// `questionId -> QuestionID`
    #[default]
    Pascal,
    /// `userOwned -> user_owned`
    Snake,
}

impl NamingConvention {
    pub fn apply(self, name: &str) -> String {
        match self {
            NamingConvention::Pascal => to_pascal(name),
            NamingConvention::Snake => name.to_case(Case::Snake),
        }
    }
}

/// Pascal case with common initialisms upper cased
pub fn to_pascal(name: &str) -> String {
    name.to_case(Case::Snake)
        .split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let upper = word.to_ascii_uppercase();
            if COMMON_INITIALISMS.contains(&upper.as_str()) {
                return upper;
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Snake case Rust field name, escaped when it collides with a keyword
pub fn rust_field_name(name: &str) -> String {
    let snake = name.to_case(Case::Snake);
    let snake = match snake.chars().next() {
        None => return "field".to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{}", snake),
        Some(_) => snake,
    };

    if RESERVED_PATH_KEYWORDS.contains(&snake.as_str()) {
        format!("{}_", snake)
    } else if RUST_KEYWORDS.contains(&snake.as_str()) {
        format!("r#{}", snake)
    } else {
        snake
    }
}

/// Generated identifier of one schema field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldName {
    pub ident: String,
    /// Input object type of the field, used to follow dotted rule paths
    pub input_type: Option<String>,
}

/// Per type mapping from schema field name to generated identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNameMap {
    types: BTreeMap<String, BTreeMap<String, FieldName>>,
}

impl FieldNameMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every input type of the schema from the naming convention
    pub fn seed(schema: &Schema, convention: NamingConvention) -> Self {
        let mut map = Self::new();
        for def in schema.input_objects() {
            for field in &def.fields {
                let target = field.field_type.named_type();
                let input_type = schema.is_input_object(target).then(|| target.to_string());
                map.insert(&def.name, &field.name, convention.apply(&field.name), input_type);
            }
        }
        map
    }

    pub fn insert(
        &mut self,
        type_name: &str,
        field: &str,
        ident: impl Into<String>,
        input_type: Option<String>,
    ) {
        self.types.entry(type_name.to_string()).or_default().insert(
            field.to_string(),
            FieldName {
                ident: ident.into(),
                input_type,
            },
        );
    }

    /// Replace the seeded identifier with the one actually generated
    pub fn refine(&mut self, type_name: &str, field: &str, ident: &str) {
        let fields = self.types.entry(type_name.to_string()).or_default();
        match fields.get_mut(field) {
            Some(entry) => entry.ident = ident.to_string(),
            None => {
                fields.insert(
                    field.to_string(),
                    FieldName {
                        ident: ident.to_string(),
                        input_type: None,
                    },
                );
            }
        }
    }

    pub fn get(&self, type_name: &str, field: &str) -> Option<&FieldName> {
        self.types.get(type_name)?.get(field)
    }

    /// Generated identifier for a schema field, if known
    pub fn resolve(&self, type_name: &str, field: &str) -> Option<&str> {
        self.get(type_name, field).map(|name| name.ident.as_str())
    }

    pub fn contains_type(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn fields(&self, type_name: &str) -> impl Iterator<Item = (&str, &FieldName)> {
        self.types
            .get(type_name)
            .into_iter()
            .flat_map(|fields| fields.iter().map(|(name, entry)| (name.as_str(), entry)))
    }
}
