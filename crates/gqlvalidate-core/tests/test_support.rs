//! Shared fixtures for runtime integration tests

#![allow(dead_code)]

use gqlvalidate_core::{
    FieldDescriptor, FieldType, InputObject, TranslationConfig, TranslationRegistration,
    Translator, TypeCatalog, TypeDescriptor, Validatable,
};
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct SimpleInput {
    pub name: String,
    pub age: i32,
}

impl InputObject for SimpleInput {
    const TYPE_NAME: &'static str = "SimpleInput";
}

impl Validatable for SimpleInput {}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipInput {
    pub user_owned: bool,
    pub legal_name: Option<String>,
}

impl InputObject for OwnershipInput {
    const TYPE_NAME: &'static str = "OwnershipInput";
}

impl Validatable for OwnershipInput {}

#[derive(Debug, Default, Serialize)]
pub struct NestedInner {
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct NestedOuter {
    pub inner: NestedInner,
}

impl InputObject for NestedOuter {
    const TYPE_NAME: &'static str = "NestedOuter";
}

impl Validatable for NestedOuter {}

#[derive(Debug, Default, Serialize)]
pub struct ListRoot {
    pub items: Vec<NestedInner>,
}

impl InputObject for ListRoot {
    const TYPE_NAME: &'static str = "ListRoot";
}

impl Validatable for ListRoot {}

#[derive(Debug, Default, Serialize)]
pub struct TranslationInput {
    pub name: String,
}

impl InputObject for TranslationInput {
    const TYPE_NAME: &'static str = "TranslationInput";
}

impl Validatable for TranslationInput {}

/// Catalog describing every fixture type
pub fn catalog() -> TypeCatalog {
    TypeCatalog::new()
        .with_type(
            TypeDescriptor::new("SimpleInput")
                .field(
                    FieldDescriptor::new("Name", FieldType::String)
                        .with_wire_name("name")
                        .with_rules("required")
                        .with_message("name must not be empty"),
                )
                .field(FieldDescriptor::new("Age", FieldType::Int).with_wire_name("age")),
        )
        .with_type(
            TypeDescriptor::new("OwnershipInput")
                .field(FieldDescriptor::new("UserOwned", FieldType::Boolean).with_wire_name("userOwned"))
                .field(
                    FieldDescriptor::new("LegalName", FieldType::optional(FieldType::String))
                        .with_wire_name("legalName")
                        .with_rules("required_if=UserOwned false"),
                ),
        )
        .with_type(
            TypeDescriptor::new("NestedInner").field(
                FieldDescriptor::new("Message", FieldType::String)
                    .with_wire_name("message")
                    .with_rules("min=2")
                    .with_message("message too short"),
            ),
        )
        .with_type(
            TypeDescriptor::new("NestedOuter").field(
                FieldDescriptor::new("Inner", FieldType::object("NestedInner")).with_wire_name("inner"),
            ),
        )
        .with_type(
            TypeDescriptor::new("ListRoot").field(
                FieldDescriptor::new("Items", FieldType::list(FieldType::object("NestedInner")))
                    .with_wire_name("items")
                    .with_rules("dive"),
            ),
        )
        .with_type(
            TypeDescriptor::new("TranslationInput").field(
                FieldDescriptor::new("Name", FieldType::String)
                    .with_wire_name("name")
                    .with_rules("required"),
            ),
        )
}

/// English and Romanian translators with a custom `required` template each
pub fn translation_config() -> TranslationConfig {
    TranslationConfig::new("en")
        .register(
            TranslationRegistration::new("en", Translator::english())
                .with_init(|t| t.add("required", "{0} is required (en)", true)),
        )
        .register(
            TranslationRegistration::new("ro", Translator::new("ro"))
                .with_init(|t| t.add("required", "{0} trebuie completat", true)),
        )
}
