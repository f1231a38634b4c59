//! Response paths and namespace reconstruction
//!
//! Field errors name their location as a namespace of generated identifiers
//! rooted at the validated type, e.g. `RootInput.Items[0].Message`. Clients
//! need the protocol path instead: wire names, with list indices as separate
//! integer elements, e.g. `["items", 0, "message"]`.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::metadata::{FieldMetadata, FieldMetadataRegistry};
use crate::types::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One element of a response path
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    Index(usize),
    Field(String),
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Field(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment::Field(name)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Path of a value in a response, as reported in protocol errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponsePath(Vec<PathSegment>);

impl ResponsePath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field path
    pub fn field(name: impl Into<String>) -> Self {
        Self(vec![PathSegment::Field(name.into())])
    }

    pub fn push_field(&mut self, name: impl Into<String>) {
        self.0.push(PathSegment::Field(name.into()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.0.push(PathSegment::Index(index));
    }

    /// This path followed by `other`
    pub fn join(&self, other: &ResponsePath) -> Self {
        let mut joined = self.0.clone();
        joined.extend(other.0.iter().cloned());
        Self(joined)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for ResponsePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Field(name) if i == 0 => write!(f, "{}", name)?,
                PathSegment::Field(name) => write!(f, ".{}", name)?,
            }
        }
        Ok(())
    }
}

/// A namespace segment split into identifier and bracket suffixes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceSegment<'a> {
    pub ident: &'a str,
    /// Contents of each trailing `[...]`, outermost first
    pub brackets: Vec<&'a str>,
}

/// Split `Items[0][1]` into `Items` and `["0", "1"]`
pub fn parse_segment(segment: &str) -> NamespaceSegment<'_> {
    let Some(open) = segment.find('[') else {
        return NamespaceSegment {
            ident: segment,
            brackets: Vec::new(),
        };
    };

    let mut brackets = Vec::new();
    let mut rest = &segment[open..];
    while let Some(inner) = rest.strip_prefix('[') {
        match inner.find(']') {
            Some(close) => {
                brackets.push(&inner[..close]);
                rest = &inner[close + 1..];
            }
            None => break,
        }
    }

    NamespaceSegment {
        ident: &segment[..open],
        brackets,
    }
}

/// Split a namespace on dots that are not inside brackets
pub fn split_namespace(namespace: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, ch) in namespace.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                segments.push(&namespace[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&namespace[start..]);
    segments
}

/// Result of mapping a namespace onto wire names
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstructed {
    /// Path relative to the validated argument
    pub path: ResponsePath,
    /// Metadata of the deepest resolved field
    pub field: Option<FieldMetadata>,
}

/// Map a namespace rooted at `root_type` to a relative response path
///
/// The leading root segment is dropped. Identifiers missing from the
/// metadata fall back to themselves, and everything below them is resolved
/// without type information. List indices become integer elements; map keys
/// are dropped.
pub fn reconstruct(registry: &FieldMetadataRegistry, root_type: &str, namespace: &str) -> Reconstructed {
    let mut path = ResponsePath::new();
    let mut deepest = None;
    let mut current_type = Some(root_type.to_string());

    for segment in split_namespace(namespace)
        .into_iter()
        .skip(1)
        .filter(|segment| !segment.is_empty())
    {
        let parsed = parse_segment(segment);
        let metadata = current_type
            .as_deref()
            .and_then(|type_name| registry.metadata(type_name).ok())
            .and_then(|metadata| metadata.field(parsed.ident).cloned());

        let wire_name = metadata
            .as_ref()
            .map(|field| field.wire_name.clone())
            .unwrap_or_else(|| parsed.ident.to_string());
        path.push_field(wire_name);

        let mut field_type = metadata.as_ref().map(|field| field.field_type.clone());
        for bracket in &parsed.brackets {
            field_type = match field_type.as_ref().map(FieldType::deref) {
                Some(FieldType::List(element)) => {
                    if let Ok(index) = bracket.parse() {
                        path.push_index(index);
                    }
                    Some((**element).clone())
                }
                Some(FieldType::Map(value)) => Some((**value).clone()),
                _ => {
                    if let Ok(index) = bracket.parse() {
                        path.push_index(index);
                    }
                    None
                }
            };
        }

        current_type = field_type
            .as_ref()
            .and_then(FieldType::object_name)
            .map(str::to_string);
        deepest = metadata;
    }

    Reconstructed {
        path,
        field: deepest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FieldDescriptor, TypeCatalog, TypeDescriptor};
    use std::sync::Arc;

    fn registry() -> FieldMetadataRegistry {
        let catalog = TypeCatalog::new()
            .with_type(
                TypeDescriptor::new("RootInput")
                    .field(FieldDescriptor::new("Name", FieldType::String).with_wire_name("name"))
                    .field(
                        FieldDescriptor::new(
                            "Items",
                            FieldType::optional(FieldType::list(FieldType::object("ItemInput"))),
                        )
                        .with_wire_name("items"),
                    )
                    .field(
                        FieldDescriptor::new("Meta", FieldType::map(FieldType::object("ItemInput")))
                            .with_wire_name("meta"),
                    ),
            )
            .with_type(
                TypeDescriptor::new("ItemInput").field(
                    FieldDescriptor::new("Message", FieldType::String)
                        .with_wire_name("message")
                        .with_message("message too short"),
                ),
            );
        FieldMetadataRegistry::new(Arc::new(catalog))
    }

    #[test]
    fn test_single_scalar_field() {
        let resolved = reconstruct(&registry(), "RootInput", "RootInput.Name");
        assert_eq!(resolved.path, ResponsePath::field("name"));
        assert_eq!(resolved.field.unwrap().internal_name, "Name");
    }

    #[test]
    fn test_list_element_field() {
        let resolved = reconstruct(&registry(), "RootInput", "RootInput.Items[0].Message");
        let expected: ResponsePath = vec![
            PathSegment::from("items"),
            PathSegment::from(0),
            PathSegment::from("message"),
        ]
        .into_iter()
        .collect();
        assert_eq!(resolved.path, expected);
        assert_eq!(
            resolved.field.and_then(|f| f.override_message).as_deref(),
            Some("message too short")
        );
    }

    #[test]
    fn test_map_keys_are_dropped() {
        let resolved = reconstruct(&registry(), "RootInput", "RootInput.Meta[a.b].Message");
        assert_eq!(resolved.path.to_string(), "meta.message");
    }

    #[test]
    fn test_unmapped_identifier_falls_back() {
        let resolved = reconstruct(&registry(), "RootInput", "RootInput.Ghost[2].Deep");
        assert_eq!(resolved.path.to_string(), "Ghost[2].Deep");
        assert!(resolved.field.is_none());
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let resolved = reconstruct(&registry(), "RootInput", "RootInput..Name");
        assert_eq!(resolved.path, ResponsePath::field("name"));

        let resolved = reconstruct(&registry(), "RootInput", "RootInput");
        assert!(resolved.path.is_empty());
        assert!(resolved.field.is_none());
    }

    #[test]
    fn test_parse_segment() {
        assert_eq!(
            parse_segment("Items[0][12]"),
            NamespaceSegment {
                ident: "Items",
                brackets: vec!["0", "12"]
            }
        );
        assert_eq!(parse_segment("Name").brackets.len(), 0);
    }

    #[test]
    fn test_split_namespace_ignores_dots_in_brackets() {
        assert_eq!(
            split_namespace("Root.Meta[a.b].Name"),
            vec!["Root", "Meta[a.b]", "Name"]
        );
    }

    #[test]
    fn test_path_display_and_serialization() {
        let mut path = ResponsePath::field("input");
        path.push_field("items");
        path.push_index(0);
        path.push_field("message");
        assert_eq!(path.to_string(), "input.items[0].message");
        assert_eq!(
            serde_json::to_string(&path).unwrap(),
            r#"["input","items",0,"message"]"#
        );
    }
}
