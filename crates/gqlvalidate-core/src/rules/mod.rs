//! Rule evaluation for compiled validation tags
//!
//! A compiled rule string such as `omitempty,min=2|eq=0,dive,required` is
//! parsed into an ordered list of [`Step`]s. Commas separate steps, pipes
//! separate alternatives inside one step, and `name=param` splits on the
//! first `=`. The [`Evaluator`] walks an input value against a
//! [`TypeCatalog`](crate::TypeCatalog) and reports one [`FieldError`] per
//! failing field, in field declaration order.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

pub mod builtin;
pub mod evaluator;

pub use builtin::{is_known_rule, KNOWN_RULES};
pub use evaluator::{CancelSignal, Evaluator};

use crate::translation::Translator;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A single named validation with its optional parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub param: Option<String>,
}

impl Rule {
    /// Parse `name` or `name=param`
    pub fn parse(segment: &str) -> Self {
        match segment.split_once('=') {
            Some((name, param)) => Self {
                name: name.trim().to_string(),
                param: Some(param.to_string()),
            },
            None => Self {
                name: segment.trim().to_string(),
                param: None,
            },
        }
    }
}

/// One comma-separated step of a rule string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Stop when the value is empty
    OmitEmpty,
    /// Stop when the value is null
    OmitNil,
    /// `-`: never validate this field
    Skip,
    /// Apply the remaining steps to every list element or map value
    Dive,
    /// Passes when any alternative passes
    Check(Vec<Rule>),
}

impl Step {
    fn parse(segment: &str) -> Self {
        match segment {
            "omitempty" => Step::OmitEmpty,
            "omitnil" => Step::OmitNil,
            "-" => Step::Skip,
            "dive" => Step::Dive,
            _ => Step::Check(
                segment
                    .split('|')
                    .map(str::trim)
                    .filter(|alt| !alt.is_empty())
                    .map(Rule::parse)
                    .collect(),
            ),
        }
    }
}

/// Parsed form of a compiled rule string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    steps: Vec<Step>,
}

impl RuleSet {
    pub fn parse(rules: &str) -> Self {
        let steps = rules
            .split(',')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(Step::parse)
            .filter(|step| !matches!(step, Step::Check(alts) if alts.is_empty()))
            .collect();

        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Every rule name referenced by the set, control steps excluded
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().flat_map(|step| match step {
            Step::Check(alts) => alts.iter().map(|rule| rule.name.as_str()).collect::<Vec<_>>(),
            _ => Vec::new(),
        })
    }
}

/// A failed validation on one field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    /// Namespace in generated identifiers, e.g. `Root.Items[0].Name`
    pub namespace: String,
    /// Same namespace spelled with wire names
    pub wire_namespace: String,
    /// Leaf wire name, with an index suffix for dive elements
    pub field: String,
    /// Leaf generated identifier
    pub struct_field: String,
    /// Failing rule; alternatives are joined with `|`
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    pub value: Value,
}

impl FieldError {
    /// Localized message, if the translator knows the rule
    pub fn translate(&self, translator: &Translator) -> Option<String> {
        translator.translate(&self.tag, &self.field, self.param.as_deref())
    }

    /// Parameter, treating an empty one as absent
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref().filter(|param| !param.is_empty())
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Key: '{}' Error:Field validation for '{}' failed on the '{}' tag",
            self.namespace, self.struct_field, self.tag
        )
    }
}

/// Ordered field errors of one validation call
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self(errors)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
