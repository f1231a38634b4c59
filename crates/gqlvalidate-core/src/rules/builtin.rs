//! Built-in validation rules
//!
//! Each rule is a plain function over a [`Check`]: the value under
//! validation, its declared type, the rule parameter and the enclosing
//! object for cross-field lookups. Rules marked nil-aware also run when the
//! value is null; every other rule fails a null value outright.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use super::Rule;
use crate::types::{FieldType, TypeCatalog, TypeDescriptor};
use crate::{Error, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::OnceLock;

/// Every rule name the evaluator understands, control steps included
pub const KNOWN_RULES: &[&str] = &[
    // control steps
    "omitempty",
    "omitnil",
    "-",
    "dive",
    // presence
    "required",
    "required_if",
    "required_unless",
    "required_with",
    "required_with_all",
    "required_without",
    "required_without_all",
    "excluded_if",
    "excluded_unless",
    "excluded_with",
    "excluded_with_all",
    "excluded_without",
    "excluded_without_all",
    "skip_unless",
    "isdefault",
    // comparisons
    "len",
    "min",
    "max",
    "eq",
    "ne",
    "gt",
    "gte",
    "lt",
    "lte",
    "oneof",
    "unique",
    // cross-field
    "eqfield",
    "nefield",
    "gtfield",
    "gtefield",
    "ltfield",
    "ltefield",
    "eqcsfield",
    "necsfield",
    "gtcsfield",
    "gtecsfield",
    "ltcsfield",
    "ltecsfield",
    "eqsfield",
    "nesfield",
    "gtsfield",
    "gtesfield",
    "ltsfield",
    "ltesfield",
    "containsfield",
    "excludesfield",
    "fieldcontains",
    "fieldexcludes",
    // strings
    "alpha",
    "alphanum",
    "alphaunicode",
    "alphanumunicode",
    "numeric",
    "number",
    "hexadecimal",
    "hexcolor",
    "lowercase",
    "uppercase",
    "ascii",
    "printascii",
    "contains",
    "containsany",
    "excludes",
    "excludesall",
    "startswith",
    "endswith",
    "boolean",
    "email",
    "e164",
    "uuid",
    "uuid4",
    "base64",
    "url",
    "uri",
    "ip",
    "ipv4",
    "ipv6",
    "json",
    "datetime",
];

/// Whether `name` is a rule or control step the evaluator understands
pub fn is_known_rule(name: &str) -> bool {
    KNOWN_RULES.contains(&name)
}

static NULL: Value = Value::Null;

/// Result of running one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Pass,
    Fail,
    /// Stop validating this field without an error
    SkipRest,
}

impl From<bool> for Outcome {
    fn from(passed: bool) -> Self {
        if passed {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}

/// The object enclosing the field under validation
pub(crate) struct Scope<'a> {
    pub catalog: &'a TypeCatalog,
    pub descriptor: &'a TypeDescriptor,
    pub object: &'a Map<String, Value>,
}

impl<'a> Scope<'a> {
    /// Sibling value and declared type by generated identifier
    pub fn sibling(&self, ident: &str) -> Option<(&'a Value, &'a FieldType)> {
        let field = self.descriptor.find(ident)?;
        let value = self.object.get(field.wire_key()).unwrap_or(&NULL);
        Some((value, &field.field_type))
    }

    /// Follow a dotted identifier path through nested input objects
    pub fn resolve(&self, path: &str) -> Option<(&'a Value, &'a FieldType)> {
        let mut descriptor = self.descriptor;
        let mut object = self.object;
        let mut segments = path.split('.').peekable();

        while let Some(segment) = segments.next() {
            let field = descriptor.find(segment)?;
            let value = object.get(field.wire_key()).unwrap_or(&NULL);
            if segments.peek().is_none() {
                return Some((value, &field.field_type));
            }
            descriptor = self.catalog.get(field.field_type.object_name()?)?;
            object = value.as_object()?;
        }

        None
    }
}

/// Inputs of one rule invocation
pub(crate) struct Check<'a> {
    pub rule: &'a Rule,
    pub value: &'a Value,
    pub field_type: &'a FieldType,
    pub scope: &'a Scope<'a>,
}

impl Check<'_> {
    fn param(&self) -> &str {
        self.rule.param.as_deref().unwrap_or("")
    }

    fn malformed(&self, message: impl Into<String>) -> Error {
        Error::malformed(&self.rule.name, self.param(), message)
    }

    fn required_param(&self) -> Result<&str> {
        match self.rule.param.as_deref() {
            Some(param) if !param.trim().is_empty() => Ok(param),
            _ => Err(self.malformed("parameter required")),
        }
    }

    fn number_param(&self) -> Result<f64> {
        let param = self.required_param()?;
        param
            .trim()
            .parse::<f64>()
            .map_err(|_| self.malformed("expected a number"))
    }

    fn string_value(&self) -> Result<&str> {
        match self.value {
            Value::String(s) => Ok(s),
            other => Err(self.malformed(format!("expects a string value, got {}", kind_of(other)))),
        }
    }

    /// Length for strings and collections, the value itself for numbers
    fn measure(&self) -> Result<f64> {
        measure(self.value).ok_or_else(|| {
            self.malformed(format!("cannot measure a {} value", kind_of(self.value)))
        })
    }

    /// Parameter split on whitespace; single quotes group words
    fn param_list(&self) -> Vec<String> {
        split_params(self.param())
    }

    /// Parameter pairs of `field value` form
    fn param_pairs(&self) -> Result<Vec<(String, String)>> {
        let params = self.param_list();
        if params.len() % 2 != 0 {
            return Err(self.malformed("expected field/value pairs"));
        }
        Ok(params
            .chunks(2)
            .map(|pair| (pair[0].clone(), pair[1].clone()))
            .collect())
    }

    fn has_value(&self) -> bool {
        has_value(self.value, self.field_type)
    }

    /// Whether the named sibling carries a value
    fn sibling_present(&self, ident: &str) -> bool {
        self.scope
            .sibling(ident)
            .map(|(value, ty)| has_value(value, ty))
            .unwrap_or(false)
    }

    /// Whether the named sibling equals a literal
    fn sibling_matches(&self, ident: &str, literal: &str) -> bool {
        self.scope
            .sibling(ident)
            .map(|(value, _)| matches_literal(value, literal))
            .unwrap_or(false)
    }
}

type CheckFn = fn(&Check<'_>) -> Result<Outcome>;

/// A resolved built-in rule
#[derive(Clone, Copy)]
pub(crate) struct Builtin {
    /// Runs on null values instead of failing them
    pub nil_aware: bool,
    pub run: CheckFn,
}

/// Resolve a rule name; `None` for unknown rules and control steps
pub(crate) fn lookup(name: &str) -> Option<Builtin> {
    let (nil_aware, run): (bool, CheckFn) = match name {
        "required" => (true, required),
        "required_if" => (true, required_if),
        "required_unless" => (true, required_unless),
        "required_with" => (true, |c| presence_rule(c, Any, true)),
        "required_with_all" => (true, |c| presence_rule(c, All, true)),
        "required_without" => (true, |c| presence_rule(c, AnyMissing, true)),
        "required_without_all" => (true, |c| presence_rule(c, AllMissing, true)),
        "excluded_if" => (true, excluded_if),
        "excluded_unless" => (true, excluded_unless),
        "excluded_with" => (true, |c| presence_rule(c, Any, false)),
        "excluded_with_all" => (true, |c| presence_rule(c, All, false)),
        "excluded_without" => (true, |c| presence_rule(c, AnyMissing, false)),
        "excluded_without_all" => (true, |c| presence_rule(c, AllMissing, false)),
        "skip_unless" => (true, skip_unless),
        "isdefault" => (true, |c| Ok((!c.has_value()).into())),

        "len" => (false, |c| Ok((c.measure()? == c.number_param()?).into())),
        "min" => (false, |c| Ok((c.measure()? >= c.number_param()?).into())),
        "max" => (false, |c| Ok((c.measure()? <= c.number_param()?).into())),
        "gt" => (false, |c| Ok((c.measure()? > c.number_param()?).into())),
        "gte" => (false, |c| Ok((c.measure()? >= c.number_param()?).into())),
        "lt" => (false, |c| Ok((c.measure()? < c.number_param()?).into())),
        "lte" => (false, |c| Ok((c.measure()? <= c.number_param()?).into())),
        "eq" => (false, |c| Ok(equals_param(c)?.into())),
        "ne" => (false, |c| Ok((!equals_param(c)?).into())),
        "oneof" => (false, one_of),
        "unique" => (false, unique),

        "eqfield" => (false, |c| field_rule(c, Lookup::Sibling, Cmp::Eq)),
        "nefield" => (false, |c| field_rule(c, Lookup::Sibling, Cmp::Ne)),
        "gtfield" => (false, |c| field_rule(c, Lookup::Sibling, Cmp::Gt)),
        "gtefield" => (false, |c| field_rule(c, Lookup::Sibling, Cmp::Gte)),
        "ltfield" => (false, |c| field_rule(c, Lookup::Sibling, Cmp::Lt)),
        "ltefield" => (false, |c| field_rule(c, Lookup::Sibling, Cmp::Lte)),
        "eqcsfield" | "eqsfield" => (false, |c| field_rule(c, Lookup::Path, Cmp::Eq)),
        "necsfield" | "nesfield" => (false, |c| field_rule(c, Lookup::Path, Cmp::Ne)),
        "gtcsfield" | "gtsfield" => (false, |c| field_rule(c, Lookup::Path, Cmp::Gt)),
        "gtecsfield" | "gtesfield" => (false, |c| field_rule(c, Lookup::Path, Cmp::Gte)),
        "ltcsfield" | "ltsfield" => (false, |c| field_rule(c, Lookup::Path, Cmp::Lt)),
        "ltecsfield" | "ltesfield" => (false, |c| field_rule(c, Lookup::Path, Cmp::Lte)),
        "containsfield" | "fieldcontains" => (false, |c| contains_field(c, true)),
        "excludesfield" | "fieldexcludes" => (false, |c| contains_field(c, false)),

        "alpha" | "alphanum" | "alphaunicode" | "alphanumunicode" | "numeric" | "number"
        | "hexadecimal" | "hexcolor" | "email" | "e164" | "uuid" | "uuid4" | "base64" => {
            (false, pattern_rule)
        }
        "lowercase" => (false, |c| {
            let s = c.string_value()?;
            Ok((s == s.to_lowercase()).into())
        }),
        "uppercase" => (false, |c| {
            let s = c.string_value()?;
            Ok((s == s.to_uppercase()).into())
        }),
        "ascii" => (false, |c| Ok(c.string_value()?.is_ascii().into())),
        "printascii" => (false, |c| {
            let s = c.string_value()?;
            Ok(s.chars().all(|ch| (' '..='~').contains(&ch)).into())
        }),
        "contains" => (false, |c| Ok(c.string_value()?.contains(c.param()).into())),
        "containsany" => (false, |c| {
            let s = c.string_value()?;
            Ok(c.param().chars().any(|ch| s.contains(ch)).into())
        }),
        "excludes" => (false, |c| Ok((!c.string_value()?.contains(c.param())).into())),
        "excludesall" => (false, |c| {
            let s = c.string_value()?;
            Ok((!c.param().chars().any(|ch| s.contains(ch))).into())
        }),
        "startswith" => (false, |c| Ok(c.string_value()?.starts_with(c.param()).into())),
        "endswith" => (false, |c| Ok(c.string_value()?.ends_with(c.param()).into())),
        "boolean" => (false, |c| match c.value {
            Value::Bool(_) => Ok(Outcome::Pass),
            _ => Ok(parse_bool(c.string_value()?).is_some().into()),
        }),
        "url" => (false, |c| {
            let s = c.string_value()?;
            Ok(url::Url::parse(s).map(|u| !u.scheme().is_empty()).unwrap_or(false).into())
        }),
        "uri" => (false, |c| {
            let s = c.string_value()?;
            Ok((s.starts_with('/') || url::Url::parse(s).is_ok()).into())
        }),
        "ip" => (false, |c| Ok(c.string_value()?.parse::<IpAddr>().is_ok().into())),
        "ipv4" => (false, |c| Ok(c.string_value()?.parse::<Ipv4Addr>().is_ok().into())),
        "ipv6" => (false, |c| Ok(c.string_value()?.parse::<Ipv6Addr>().is_ok().into())),
        "json" => (false, |c| {
            Ok(serde_json::from_str::<Value>(c.string_value()?).is_ok().into())
        }),
        "datetime" => (false, datetime),

        _ => return None,
    };

    Some(Builtin { nil_aware, run })
}

/// Whether a value counts as present for its declared type
///
/// Null is never present. A non-null nullable value is always present,
/// even when it holds a zero value; a non-null required value must also be
/// non-zero. Collections and objects are present whenever non-null.
pub(crate) fn has_value(value: &Value, field_type: &FieldType) -> bool {
    match value {
        Value::Null => false,
        _ if field_type.is_optional() => true,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(true),
        Value::Bool(b) => *b,
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn measure(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => Some(s.chars().count() as f64),
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(entries) => Some(entries.len() as f64),
        Value::Number(n) => n.as_f64(),
        Value::Null => Some(0.0),
        Value::Bool(_) => None,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Compare a sibling value against a literal from a rule parameter
fn matches_literal(value: &Value, literal: &str) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => s == literal,
        Value::Bool(b) => parse_bool(literal) == Some(*b),
        Value::Number(n) => literal.parse::<f64>().ok() == n.as_f64(),
        Value::Array(items) => literal.parse::<usize>().ok() == Some(items.len()),
        Value::Object(entries) => literal.parse::<usize>().ok() == Some(entries.len()),
    }
}

fn split_params(param: &str) -> Vec<String> {
    static PARAMS: OnceLock<Option<Regex>> = OnceLock::new();
    match PARAMS.get_or_init(|| Regex::new(r"'[^']*'|\S+").ok()) {
        Some(re) => re
            .find_iter(param)
            .map(|m| m.as_str().trim_matches('\'').to_string())
            .collect(),
        None => param.split_whitespace().map(str::to_string).collect(),
    }
}

fn required(check: &Check<'_>) -> Result<Outcome> {
    Ok(check.has_value().into())
}

fn required_if(check: &Check<'_>) -> Result<Outcome> {
    let pairs = check.param_pairs()?;
    if pairs.iter().all(|(field, value)| check.sibling_matches(field, value)) {
        return Ok(check.has_value().into());
    }
    Ok(Outcome::Pass)
}

fn required_unless(check: &Check<'_>) -> Result<Outcome> {
    let pairs = check.param_pairs()?;
    if pairs.iter().any(|(field, value)| check.sibling_matches(field, value)) {
        return Ok(Outcome::Pass);
    }
    Ok(check.has_value().into())
}

fn excluded_if(check: &Check<'_>) -> Result<Outcome> {
    let pairs = check.param_pairs()?;
    if pairs.iter().all(|(field, value)| check.sibling_matches(field, value)) {
        return Ok((!check.has_value()).into());
    }
    Ok(Outcome::Pass)
}

fn excluded_unless(check: &Check<'_>) -> Result<Outcome> {
    let pairs = check.param_pairs()?;
    if pairs.iter().all(|(field, value)| check.sibling_matches(field, value)) {
        return Ok(Outcome::Pass);
    }
    Ok((!check.has_value()).into())
}

fn skip_unless(check: &Check<'_>) -> Result<Outcome> {
    let pairs = check.param_pairs()?;
    if pairs.iter().all(|(field, value)| check.sibling_matches(field, value)) {
        Ok(Outcome::Pass)
    } else {
        Ok(Outcome::SkipRest)
    }
}

/// Trigger of a `required_with*` / `excluded_with*` rule
#[derive(Clone, Copy)]
enum Trigger {
    Any,
    All,
    AnyMissing,
    AllMissing,
}

use Trigger::{All, AllMissing, Any, AnyMissing};

fn presence_rule(check: &Check<'_>, trigger: Trigger, require: bool) -> Result<Outcome> {
    let fields = check.param_list();
    if fields.is_empty() {
        return Err(check.malformed("expected at least one field name"));
    }

    let present = |field: &String| check.sibling_present(field);
    let triggered = match trigger {
        Any => fields.iter().any(present),
        All => fields.iter().all(present),
        AnyMissing => !fields.iter().all(present),
        AllMissing => !fields.iter().any(present),
    };

    if !triggered {
        return Ok(Outcome::Pass);
    }
    Ok((check.has_value() == require).into())
}

fn equals_param(check: &Check<'_>) -> Result<bool> {
    let param = check.param();
    Ok(match check.value {
        Value::String(s) => s == param,
        Value::Bool(b) => parse_bool(param) == Some(*b),
        Value::Null => param.is_empty(),
        _ => check.measure()? == check.number_param()?,
    })
}

fn one_of(check: &Check<'_>) -> Result<Outcome> {
    let options = check.param_list();
    let candidate = match check.value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(check.malformed(format!("cannot match a {} value", kind_of(other))));
        }
    };
    Ok(options.iter().any(|option| *option == candidate).into())
}

fn unique(check: &Check<'_>) -> Result<Outcome> {
    let items: Vec<&Value> = match check.value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(entries) => entries.values().collect(),
        other => {
            return Err(check.malformed(format!("expects a collection, got {}", kind_of(other))));
        }
    };

    let distinct = items
        .iter()
        .enumerate()
        .all(|(i, item)| items[..i].iter().all(|earlier| !values_equal(earlier, item)));
    Ok(distinct.into())
}

#[derive(Clone, Copy)]
enum Lookup {
    /// Field of the enclosing object
    Sibling,
    /// Dotted path from the enclosing object
    Path,
}

#[derive(Clone, Copy)]
enum Cmp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        _ => a == b,
    }
}

fn ordering(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Bool(_), _) | (_, Value::Bool(_)) => None,
        _ => measure(a)?.partial_cmp(&measure(b)?),
    }
}

fn field_rule(check: &Check<'_>, lookup: Lookup, cmp: Cmp) -> Result<Outcome> {
    let target = check.required_param()?.trim();
    let other = match lookup {
        Lookup::Sibling => check.scope.sibling(target),
        Lookup::Path => check.scope.resolve(target),
    };

    let Some((other, _)) = other else {
        return Ok(Outcome::Fail);
    };

    let passed = match cmp {
        Cmp::Eq => values_equal(check.value, other),
        Cmp::Ne => !values_equal(check.value, other),
        Cmp::Gt => ordering(check.value, other) == Some(Ordering::Greater),
        Cmp::Gte => matches!(ordering(check.value, other), Some(Ordering::Greater | Ordering::Equal)),
        Cmp::Lt => ordering(check.value, other) == Some(Ordering::Less),
        Cmp::Lte => matches!(ordering(check.value, other), Some(Ordering::Less | Ordering::Equal)),
    };
    Ok(passed.into())
}

fn contains_field(check: &Check<'_>, expect: bool) -> Result<Outcome> {
    let target = check.required_param()?.trim();
    let value = check.string_value()?;
    let Some((Value::String(other), _)) = check.scope.sibling(target) else {
        return Ok(Outcome::Fail);
    };
    Ok((value.contains(other.as_str()) == expect).into())
}

const PATTERNS: &[(&str, &str)] = &[
    ("alpha", r"^[a-zA-Z]+$"),
    ("alphanum", r"^[a-zA-Z0-9]+$"),
    ("alphaunicode", r"^\p{L}+$"),
    ("alphanumunicode", r"^[\p{L}\p{N}]+$"),
    ("numeric", r"^[-+]?[0-9]+(?:\.[0-9]+)?$"),
    ("number", r"^[0-9]+$"),
    ("hexadecimal", r"^(0[xX])?[0-9a-fA-F]+$"),
    ("hexcolor", r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$"),
    (
        "email",
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    ),
    ("e164", r"^\+[1-9]?[0-9]{7,14}$"),
    ("uuid", r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$"),
    ("uuid4", r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$"),
    (
        "base64",
        r"^(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=|[A-Za-z0-9+/]{4})$",
    ),
];

fn compiled_patterns() -> &'static HashMap<&'static str, Regex> {
    static COMPILED: OnceLock<HashMap<&'static str, Regex>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        PATTERNS
            .iter()
            .filter_map(|(name, source)| Regex::new(source).ok().map(|re| (*name, re)))
            .collect()
    })
}

fn pattern_rule(check: &Check<'_>) -> Result<Outcome> {
    let value = check.string_value()?;
    let pattern = compiled_patterns()
        .get(check.rule.name.as_str())
        .ok_or_else(|| anyhow::anyhow!("no pattern registered for rule '{}'", check.rule.name))?;
    Ok(pattern.is_match(value).into())
}

/// `datetime=<strftime layout>`; accepts a full timestamp, a date or a time
fn datetime(check: &Check<'_>) -> Result<Outcome> {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

    let layout = check.required_param()?;
    let value = check.string_value()?;
    let parsed = NaiveDateTime::parse_from_str(value, layout).is_ok()
        || NaiveDate::parse_from_str(value, layout).is_ok()
        || NaiveTime::parse_from_str(value, layout).is_ok();
    Ok(parsed.into())
}
