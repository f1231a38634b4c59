//! Field metadata registry
//!
//! Per-type lookup tables used by path reconstruction and message
//! resolution: the wire name, the override message and the declared type of
//! every field, addressable by generated identifier or by wire name. Tables
//! are built lazily from the [`TypeCatalog`] on first use and never evicted.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::types::{require_type, FieldType, TypeCatalog, TypeDescriptor};
use crate::Result;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Metadata of one generated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMetadata {
    /// Generated identifier
    pub internal_name: String,
    /// External name, falling back to the identifier
    pub wire_name: String,
    /// Author supplied message, if any
    pub override_message: Option<String>,
    pub field_type: FieldType,
}

/// Metadata of every field of one input type
#[derive(Debug, Clone, Default)]
pub struct TypeMetadata {
    type_name: String,
    fields: Vec<FieldMetadata>,
    by_ident: HashMap<String, usize>,
    by_wire: HashMap<String, usize>,
}

impl TypeMetadata {
    /// Compute metadata from a descriptor
    pub fn from_descriptor(descriptor: &TypeDescriptor) -> Self {
        let mut metadata = Self {
            type_name: descriptor.name.clone(),
            ..Self::default()
        };

        for field in &descriptor.fields {
            let index = metadata.fields.len();
            metadata.by_ident.insert(field.ident.clone(), index);
            metadata.by_wire.insert(field.wire_key().to_string(), index);
            metadata.fields.push(FieldMetadata {
                internal_name: field.ident.clone(),
                wire_name: field.wire_key().to_string(),
                override_message: field.message.clone().filter(|m| !m.is_empty()),
                field_type: field.field_type.clone(),
            });
        }

        metadata
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Lookup by generated identifier
    pub fn field(&self, internal_name: &str) -> Option<&FieldMetadata> {
        self.by_ident.get(internal_name).map(|&i| &self.fields[i])
    }

    /// Lookup by wire name
    pub fn field_by_wire_name(&self, wire_name: &str) -> Option<&FieldMetadata> {
        self.by_wire.get(wire_name).map(|&i| &self.fields[i])
    }

    pub fn fields(&self) -> &[FieldMetadata] {
        &self.fields
    }
}

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub cached_types: usize,
    pub catalog_types: usize,
}

/// Shared, append-only metadata cache keyed by type name
///
/// Constructed once and handed to the engine; concurrent misses for the same
/// type compute identical tables and the first stored one is kept.
#[derive(Debug)]
pub struct FieldMetadataRegistry {
    catalog: Arc<TypeCatalog>,
    entries: DashMap<String, Arc<TypeMetadata>>,
}

impl FieldMetadataRegistry {
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            catalog,
            entries: DashMap::new(),
        }
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    /// Metadata for `type_name`, computing and storing it on first use
    pub fn metadata(&self, type_name: &str) -> Result<Arc<TypeMetadata>> {
        if let Some(entry) = self.entries.get(type_name) {
            return Ok(Arc::clone(entry.value()));
        }

        let descriptor = require_type(&self.catalog, type_name)?;
        let computed = Arc::new(TypeMetadata::from_descriptor(descriptor));
        debug!(type_name, fields = computed.fields().len(), "Cached field metadata");

        let entry = self
            .entries
            .entry(type_name.to_string())
            .or_insert(computed);
        Ok(Arc::clone(entry.value()))
    }

    /// Whether metadata for `type_name` has been computed
    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            cached_types: self.entries.len(),
            catalog_types: self.catalog.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldDescriptor;
    use crate::Error;
    use std::thread;

    fn catalog() -> Arc<TypeCatalog> {
        Arc::new(
            TypeCatalog::new().with_type(
                TypeDescriptor::new("OwnershipInput")
                    .field(FieldDescriptor::new("UserOwned", FieldType::Boolean).with_wire_name("userOwned"))
                    .field(
                        FieldDescriptor::new("LegalName", FieldType::optional(FieldType::String))
                            .with_wire_name("legalName")
                            .with_rules("required_if=UserOwned false")
                            .with_message(""),
                    )
                    .field(
                        FieldDescriptor::new("Note", FieldType::String)
                            .with_rules("max=10")
                            .with_message("note too long"),
                    ),
            ),
        )
    }

    #[test]
    fn test_lookup_by_ident_and_wire_name() {
        let registry = FieldMetadataRegistry::new(catalog());
        let metadata = registry.metadata("OwnershipInput").unwrap();

        let legal = metadata.field("LegalName").unwrap();
        assert_eq!(legal.wire_name, "legalName");
        assert_eq!(legal.override_message, None);

        let note = metadata.field_by_wire_name("Note").unwrap();
        assert_eq!(note.internal_name, "Note");
        assert_eq!(note.override_message.as_deref(), Some("note too long"));
        assert!(metadata.field("Missing").is_none());
    }

    #[test]
    fn test_lazy_population() {
        let registry = FieldMetadataRegistry::new(catalog());
        assert!(!registry.contains("OwnershipInput"));

        let first = registry.metadata("OwnershipInput").unwrap();
        let second = registry.metadata("OwnershipInput").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(
            registry.stats(),
            RegistryStats {
                cached_types: 1,
                catalog_types: 1
            }
        );
    }

    #[test]
    fn test_unknown_type() {
        let registry = FieldMetadataRegistry::new(catalog());
        assert!(matches!(
            registry.metadata("Nope"),
            Err(Error::UnknownType { .. })
        ));
        assert!(!registry.contains("Nope"));
    }

    #[test]
    fn test_concurrent_misses_converge() {
        let registry = Arc::new(FieldMetadataRegistry::new(catalog()));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.metadata("OwnershipInput").unwrap())
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for result in &results[1..] {
            assert!(Arc::ptr_eq(&results[0], result));
        }
        assert_eq!(registry.stats().cached_types, 1);
    }
}
