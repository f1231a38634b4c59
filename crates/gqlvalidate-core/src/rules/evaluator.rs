//! Structural validation of input values against the type catalog
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::builtin::{self, has_value, Check, Outcome, Scope};
use super::{FieldError, Rule, RuleSet, Step, ValidationErrors};
use crate::types::{require_type, FieldDescriptor, FieldType, TypeCatalog, TypeDescriptor};
use crate::{Error, Result};
use serde_json::{Map, Value};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::trace;

static NULL: Value = Value::Null;

/// Cancellation state observed before each object is walked
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    token: Option<CancellationToken>,
    deadline: Option<Instant>,
}

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(mut self, token: CancellationToken) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fail with [`Error::Cancelled`] once the token fires or the deadline passes
    pub fn check(&self) -> Result<()> {
        if self.token.as_ref().is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled {
                reason: "request cancelled".to_string(),
            });
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(Error::Cancelled {
                reason: "deadline exceeded".to_string(),
            });
        }
        Ok(())
    }
}

/// Names of the value currently under validation
#[derive(Debug, Clone)]
struct Location {
    namespace: String,
    wire_namespace: String,
    field: String,
    struct_field: String,
}

impl Location {
    fn root(type_name: &str) -> Self {
        Self {
            namespace: type_name.to_string(),
            wire_namespace: type_name.to_string(),
            field: String::new(),
            struct_field: String::new(),
        }
    }

    fn child(&self, field: &FieldDescriptor) -> Self {
        Self {
            namespace: format!("{}.{}", self.namespace, field.ident),
            wire_namespace: format!("{}.{}", self.wire_namespace, field.wire_key()),
            field: field.wire_key().to_string(),
            struct_field: field.ident.clone(),
        }
    }

    fn element(&self, key: &str) -> Self {
        Self {
            namespace: format!("{}[{}]", self.namespace, key),
            wire_namespace: format!("{}[{}]", self.wire_namespace, key),
            field: format!("{}[{}]", self.field, key),
            struct_field: format!("{}[{}]", self.struct_field, key),
        }
    }

    fn error(&self, alternatives: &[Rule], value: &Value) -> FieldError {
        let tag = alternatives
            .iter()
            .map(|rule| rule.name.as_str())
            .collect::<Vec<_>>()
            .join("|");
        let param = alternatives.last().and_then(|rule| rule.param.clone());

        FieldError {
            namespace: self.namespace.clone(),
            wire_namespace: self.wire_namespace.clone(),
            field: self.field.clone(),
            struct_field: self.struct_field.clone(),
            tag,
            param,
            value: value.clone(),
        }
    }
}

/// Validates wire-format values against compiled rules in a [`TypeCatalog`]
pub struct Evaluator<'a> {
    catalog: &'a TypeCatalog,
    signal: CancelSignal,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a TypeCatalog) -> Self {
        Self {
            catalog,
            signal: CancelSignal::default(),
        }
    }

    pub fn with_signal(mut self, signal: CancelSignal) -> Self {
        self.signal = signal;
        self
    }

    /// Validate `value` as an instance of `type_name`
    ///
    /// Structural failures come back as [`Error::FieldValidation`]; every
    /// other error means the rules themselves could not be evaluated.
    pub fn validate(&self, type_name: &str, value: &Value) -> Result<()> {
        let errors = self.collect(type_name, value)?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(Error::FieldValidation(errors))
        }
    }

    /// Run every rule and return the field errors in walk order
    pub fn collect(&self, type_name: &str, value: &Value) -> Result<ValidationErrors> {
        let descriptor = require_type(self.catalog, type_name)?;
        let object = value.as_object().ok_or_else(|| {
            anyhow::anyhow!("value for input type {} is not an object", type_name)
        })?;

        let mut errors = Vec::new();
        self.walk_object(descriptor, object, &Location::root(type_name), &mut errors)?;
        Ok(ValidationErrors::new(errors))
    }

    fn walk_object(
        &self,
        descriptor: &TypeDescriptor,
        object: &Map<String, Value>,
        location: &Location,
        errors: &mut Vec<FieldError>,
    ) -> Result<()> {
        self.signal.check()?;

        let scope = Scope {
            catalog: self.catalog,
            descriptor,
            object,
        };

        for field in &descriptor.fields {
            let value = object.get(field.wire_key()).unwrap_or(&NULL);
            let rules = field.rules.as_deref().map(RuleSet::parse).unwrap_or_default();
            self.validate_value(
                &scope,
                rules.steps(),
                value,
                &field.field_type,
                &location.child(field),
                errors,
            )?;
        }

        Ok(())
    }

    fn validate_value(
        &self,
        scope: &Scope<'_>,
        steps: &[Step],
        value: &Value,
        field_type: &FieldType,
        location: &Location,
        errors: &mut Vec<FieldError>,
    ) -> Result<()> {
        for (i, step) in steps.iter().enumerate() {
            match step {
                Step::OmitEmpty if !has_value(value, field_type) => return Ok(()),
                Step::OmitNil if value.is_null() => return Ok(()),
                Step::OmitEmpty | Step::OmitNil => {}
                Step::Skip => return Ok(()),
                Step::Dive => {
                    return self.dive(scope, &steps[i + 1..], value, field_type, location, errors);
                }
                Step::Check(alternatives) => {
                    match self.run_check(scope, alternatives, value, field_type, location)? {
                        Outcome::Pass => {}
                        Outcome::SkipRest => return Ok(()),
                        Outcome::Fail => {
                            let error = location.error(alternatives, value);
                            trace!(namespace = %error.namespace, tag = %error.tag, "Field failed validation");
                            errors.push(error);
                            return Ok(());
                        }
                    }
                }
            }
        }

        self.descend(value, field_type, location, errors)
    }

    fn run_check(
        &self,
        scope: &Scope<'_>,
        alternatives: &[Rule],
        value: &Value,
        field_type: &FieldType,
        location: &Location,
    ) -> Result<Outcome> {
        let mut resolved = Vec::with_capacity(alternatives.len());
        for rule in alternatives {
            let builtin = builtin::lookup(&rule.name).ok_or_else(|| Error::UnknownRule {
                rule: rule.name.clone(),
                field: location.namespace.clone(),
            })?;
            resolved.push((rule, builtin));
        }

        for (rule, builtin) in resolved {
            if value.is_null() && !builtin.nil_aware {
                continue;
            }
            let check = Check {
                rule,
                value,
                field_type,
                scope,
            };
            match (builtin.run)(&check)? {
                Outcome::Fail => continue,
                outcome => return Ok(outcome),
            }
        }

        Ok(Outcome::Fail)
    }

    /// Apply the remaining steps to each element of a list or map
    fn dive(
        &self,
        scope: &Scope<'_>,
        steps: &[Step],
        value: &Value,
        field_type: &FieldType,
        location: &Location,
        errors: &mut Vec<FieldError>,
    ) -> Result<()> {
        let Some(element_type) = field_type.element() else {
            return Err(Error::malformed(
                "dive",
                "",
                format!("cannot dive into {} at {}", field_type, location.namespace),
            ));
        };

        match value {
            Value::Null => Ok(()),
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    let location = location.element(&index.to_string());
                    self.validate_value(scope, steps, item, element_type, &location, errors)?;
                }
                Ok(())
            }
            Value::Object(entries) => {
                let mut keys: Vec<&String> = entries.keys().collect();
                keys.sort();
                for key in keys {
                    let location = location.element(key);
                    self.validate_value(scope, steps, &entries[key], element_type, &location, errors)?;
                }
                Ok(())
            }
            _ => Err(Error::malformed(
                "dive",
                "",
                format!("expected a collection at {}", location.namespace),
            )),
        }
    }

    /// Recurse into a nested input object once its own rules passed
    fn descend(
        &self,
        value: &Value,
        field_type: &FieldType,
        location: &Location,
        errors: &mut Vec<FieldError>,
    ) -> Result<()> {
        match (field_type.deref(), value) {
            (FieldType::Object(type_name), Value::Object(object)) => {
                let descriptor = require_type(self.catalog, type_name)?;
                self.walk_object(descriptor, object, location, errors)
            }
            _ => Ok(()),
        }
    }
}
