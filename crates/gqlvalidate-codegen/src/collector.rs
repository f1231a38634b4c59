//! Schema annotation collector
//!
//! Walks every input object type, checks where `@validate` is placed and
//! extracts one [`RuleAnnotation`] per annotated field. Compilation turns
//! an annotation into a [`CompiledRule`] through the grammar engine.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::grammar::rewrite_rule;
use crate::naming::FieldNameMap;
use crate::schema::{ArgValue, Schema, TypeDef};
use crate::{Error, Result};
use gqlvalidate_core::{is_known_rule, RuleSet};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Name of the validation directive
pub const DIRECTIVE_NAME: &str = "validate";

pub const RULE_ARGUMENT: &str = "rule";
pub const MESSAGE_ARGUMENT: &str = "message";

/// A `@validate` use on one input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleAnnotation {
    pub type_name: String,
    pub field_name: String,
    /// Rule text as written, trimmed
    pub raw_rule: String,
    pub message: Option<String>,
}

/// Annotations of a schema, keyed by type then field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    by_type: BTreeMap<String, BTreeMap<String, RuleAnnotation>>,
}

impl Annotations {
    pub fn get(&self, type_name: &str, field: &str) -> Option<&RuleAnnotation> {
        self.by_type.get(type_name)?.get(field)
    }

    /// Annotated type names, sorted
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.by_type.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleAnnotation> {
        self.by_type.values().flat_map(BTreeMap::values)
    }

    pub fn len(&self) -> usize {
        self.by_type.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_type.is_empty()
    }

    fn insert(&mut self, annotation: RuleAnnotation) {
        self.by_type
            .entry(annotation.type_name.clone())
            .or_default()
            .insert(annotation.field_name.clone(), annotation);
    }
}

/// Collect every `@validate` annotation, rejecting misplaced ones
pub fn collect(schema: &Schema) -> Result<Annotations> {
    let mut annotations = Annotations::default();

    for def in schema.input_objects() {
        collect_type(def, &mut annotations)?;
    }

    for root in schema.operation_types() {
        ensure_no_argument_rules(root)?;
    }

    debug!(
        annotations = annotations.len(),
        types = annotations.by_type.len(),
        "Collected @validate annotations"
    );
    Ok(annotations)
}

fn collect_type(def: &TypeDef, annotations: &mut Annotations) -> Result<()> {
    if def.directive(DIRECTIVE_NAME).is_some() {
        return Err(Error::DirectiveOnType {
            type_name: def.name.clone(),
        });
    }

    for field in &def.fields {
        let mut uses = field.directives_named(DIRECTIVE_NAME);
        let Some(directive) = uses.next() else {
            continue;
        };
        if uses.next().is_some() {
            return Err(Error::RepeatedDirective {
                type_name: def.name.clone(),
                field: field.name.clone(),
            });
        }

        let raw_rule = argument_text(directive.argument(RULE_ARGUMENT)).ok_or_else(|| Error::MissingRule {
            type_name: def.name.clone(),
            field: field.name.clone(),
        })?;

        if let Some((argument, _)) = directive
            .arguments
            .iter()
            .find(|(name, _)| name != RULE_ARGUMENT && name != MESSAGE_ARGUMENT)
        {
            return Err(Error::UnexpectedArgument {
                argument: argument.clone(),
                type_name: def.name.clone(),
                field: field.name.clone(),
            });
        }

        annotations.insert(RuleAnnotation {
            type_name: def.name.clone(),
            field_name: field.name.clone(),
            raw_rule,
            message: argument_text(directive.argument(MESSAGE_ARGUMENT)),
        });
    }
    Ok(())
}

/// Trimmed raw text of an argument; absent, null or blank is `None`
fn argument_text(value: Option<&ArgValue>) -> Option<String> {
    let text = value.and_then(ArgValue::raw)?;
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Operation arguments are not validation targets
fn ensure_no_argument_rules(root: &TypeDef) -> Result<()> {
    for field in &root.fields {
        for argument in &field.arguments {
            if argument.directives.iter().any(|d| d.name == DIRECTIVE_NAME) {
                return Err(Error::DirectiveOnArgument {
                    type_name: root.name.clone(),
                    field: field.name.clone(),
                    argument: argument.name.clone(),
                });
            }
        }
    }
    Ok(())
}

/// An annotation after its field references were rewritten
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledRule {
    pub type_name: String,
    pub field_name: String,
    /// Generated identifier of the annotated field
    pub ident: String,
    pub raw_rule: String,
    pub rule: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CompiledRule {
    /// Rewrite an annotation with the names of its enclosing type
    pub fn compile(annotation: &RuleAnnotation, names: &FieldNameMap) -> Self {
        let rule = rewrite_rule(&annotation.raw_rule, &annotation.type_name, names);
        let ident = names
            .resolve(&annotation.type_name, &annotation.field_name)
            .unwrap_or(annotation.field_name.as_str())
            .to_string();

        debug!(
            type_name = %annotation.type_name,
            field = %annotation.field_name,
            raw = %annotation.raw_rule,
            compiled = %rule,
            "Compiled rule"
        );

        Self {
            type_name: annotation.type_name.clone(),
            field_name: annotation.field_name.clone(),
            ident,
            raw_rule: annotation.raw_rule.clone(),
            rule,
            message: annotation.message.clone(),
        }
    }

    /// Rule names the runtime evaluator does not implement
    pub fn unknown_rules(&self) -> Vec<String> {
        RuleSet::parse(&self.rule)
            .rule_names()
            .filter(|name| !is_known_rule(name))
            .map(str::to_string)
            .collect()
    }
}

/// Input types carrying at least one compiled rule, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MarkerSet(BTreeSet<String>);

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, type_name: impl Into<String>) -> bool {
        self.0.insert(type_name.into())
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.0.contains(type_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

/// Every compiled rule of a schema plus its marker set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Compilation {
    pub rules: Vec<CompiledRule>,
    pub markers: MarkerSet,
}

impl Compilation {
    /// Compile every annotation; the name map must be complete
    pub fn compile(annotations: &Annotations, names: &FieldNameMap) -> Self {
        let mut compilation = Compilation::default();
        for annotation in annotations.iter() {
            let compiled = CompiledRule::compile(annotation, names);
            if !compiled.rule.is_empty() {
                compilation.markers.insert(compiled.type_name.clone());
            }
            compilation.rules.push(compiled);
        }
        compilation
    }

    /// `(type.field, rule)` for every rule name the evaluator lacks
    pub fn unknown_rules(&self) -> Vec<(String, String)> {
        self.rules
            .iter()
            .flat_map(|compiled| {
                compiled
                    .unknown_rules()
                    .into_iter()
                    .map(move |rule| (format!("{}.{}", compiled.type_name, compiled.field_name), rule))
            })
            .collect()
    }
}
