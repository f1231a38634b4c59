//! Rule grammar engine
//!
//! Rewrites the field references inside a rule expression to generated
//! identifiers. The expression is scanned as top-level segments separated
//! by `,` or `|`; each `name=params` segment is rewritten according to the
//! family its rule name belongs to. Everything else passes through
//! untouched, delimiters included.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::naming::FieldNameMap;

/// Parameter grammar shared by a group of rule names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleFamily {
    /// `eqfield=other`: the whole parameter is one field name
    WholeToken,
    /// `eqcsfield=parent.child`: a dotted path of field names
    DottedPath,
    /// `required_with=email phone`: whitespace separated field names
    SpaceList,
    /// `required_if=field value ...`: field names at even positions
    PairedList,
    /// Parameters that never reference fields
    Identity,
}

/// Family membership, checked in this order; the first match wins
const FAMILIES: &[(RuleFamily, &[&str])] = &[
    (
        RuleFamily::WholeToken,
        &["eqfield", "nefield", "gtfield", "gtefield", "ltfield", "ltefield"],
    ),
    (
        RuleFamily::DottedPath,
        &[
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
            "fieldcontains",
            "fieldexcludes",
            "containsfield",
            "excludesfield",
        ],
    ),
    (
        RuleFamily::SpaceList,
        &[
            "required_with",
            "required_with_all",
            "required_without",
            "required_without_all",
            "excluded_with",
            "excluded_with_all",
            "excluded_without",
            "excluded_without_all",
        ],
    ),
    (
        RuleFamily::PairedList,
        &[
            "required_if",
            "required_unless",
            "excluded_if",
            "excluded_unless",
            "skip_unless",
        ],
    ),
];

impl RuleFamily {
    /// Family of a rule name; unknown names are [`RuleFamily::Identity`]
    pub fn of(rule: &str) -> Self {
        FAMILIES
            .iter()
            .find(|(_, members)| members.contains(&rule))
            .map(|(family, _)| *family)
            .unwrap_or(RuleFamily::Identity)
    }

    /// Rule names belonging to this family
    pub fn members(self) -> &'static [&'static str] {
        FAMILIES
            .iter()
            .find(|(family, _)| *family == self)
            .map(|(_, members)| *members)
            .unwrap_or(&[])
    }

    /// Whether rules of this family reference other fields
    pub fn references_fields(self) -> bool {
        self != RuleFamily::Identity
    }

    /// Rewrite the parameter text of one rule
    pub fn rewrite(self, params: &str, scope: &NameScope<'_>) -> String {
        match self {
            RuleFamily::WholeToken => scope.token(params).to_string(),
            RuleFamily::DottedPath => scope.dotted(params),
            RuleFamily::SpaceList => params
                .split_whitespace()
                .map(|token| scope.token(token))
                .collect::<Vec<_>>()
                .join(" "),
            RuleFamily::PairedList => {
                let tokens: Vec<&str> = params.split_whitespace().collect();
                if tokens.len() % 2 != 0 {
                    return params.to_string();
                }
                tokens
                    .iter()
                    .enumerate()
                    .map(|(i, &token)| if i % 2 == 0 { scope.token(token) } else { token })
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            RuleFamily::Identity => params.to_string(),
        }
    }
}

/// Field names visible to the rules of one input type
#[derive(Debug, Clone, Copy)]
pub struct NameScope<'a> {
    names: &'a FieldNameMap,
    type_name: &'a str,
}

impl<'a> NameScope<'a> {
    pub fn new(names: &'a FieldNameMap, type_name: &'a str) -> Self {
        Self { names, type_name }
    }

    /// Identifier for a field of the enclosing type, or the token itself
    pub fn token<'t>(&self, token: &'t str) -> &'t str
    where
        'a: 't,
    {
        self.names.resolve(self.type_name, token).unwrap_or(token)
    }

    /// Rewrite `a.b.c`, following each segment into its input type
    ///
    /// Once a segment cannot be resolved the rest is left as written.
    pub fn dotted(&self, path: &str) -> String {
        let mut current = Some(self.type_name);
        path.split('.')
            .map(|segment| {
                let Some(type_name) = current else {
                    return segment;
                };
                match self.names.get(type_name, segment) {
                    Some(entry) => {
                        current = entry.input_type.as_deref();
                        entry.ident.as_str()
                    }
                    None => {
                        current = None;
                        segment
                    }
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Rewrite every field reference of `rule` for the fields of `type_name`
///
/// Segments are trimmed, empty segments dropped, and the `,`/`|`
/// delimiters kept in place.
pub fn rewrite_rule(rule: &str, type_name: &str, names: &FieldNameMap) -> String {
    let scope = NameScope::new(names, type_name);
    let mut out = String::with_capacity(rule.len());
    let mut rest = rule;

    loop {
        let end = rest.find([',', '|']).unwrap_or(rest.len());
        let segment = rest[..end].trim();
        if !segment.is_empty() {
            out.push_str(&rewrite_segment(segment, &scope));
        }

        match rest[end..].chars().next() {
            Some(delimiter) => {
                out.push(delimiter);
                rest = &rest[end + delimiter.len_utf8()..];
            }
            None => break,
        }
    }
    out
}

fn rewrite_segment(segment: &str, scope: &NameScope<'_>) -> String {
    match segment.split_once('=') {
        Some((name, params)) => format!("{}={}", name, RuleFamily::of(name).rewrite(params, scope)),
        None => segment.to_string(),
    }
}
