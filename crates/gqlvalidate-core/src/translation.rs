//! Localized validation messages
//!
//! A [`Translator`] maps rule names to message templates for one language.
//! Templates use `{0}` for the failing field's wire name and `{1}` for the
//! rule parameter. [`Translations`] is the validated, immutable set of
//! translators the engine consults per request.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::middleware::RequestContext;
use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Message templates for one language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translator {
    locale: String,
    templates: BTreeMap<String, String>,
}

impl Translator {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            templates: BTreeMap::new(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Register a template for `rule`
    ///
    /// Fails when the rule already has a template and `override_existing`
    /// is false.
    pub fn add(&mut self, rule: &str, template: &str, override_existing: bool) -> Result<()> {
        if !override_existing && self.templates.contains_key(rule) {
            return Err(Error::translation(format!(
                "translation for rule '{}' already registered for locale '{}'",
                rule, self.locale
            )));
        }
        self.templates.insert(rule.to_string(), template.to_string());
        Ok(())
    }

    /// Builder-style add that replaces any existing template
    pub fn with(mut self, rule: &str, template: &str) -> Self {
        self.templates.insert(rule.to_string(), template.to_string());
        self
    }

    /// Render the template for `rule`, if one is registered
    pub fn translate(&self, rule: &str, field: &str, param: Option<&str>) -> Option<String> {
        let template = self.templates.get(rule)?;
        Some(
            template
                .replace("{0}", field)
                .replace("{1}", param.unwrap_or("")),
        )
    }

    pub fn contains(&self, rule: &str) -> bool {
        self.templates.contains_key(rule)
    }

    /// Raw template for `rule`
    pub fn template(&self, rule: &str) -> Option<&str> {
        self.templates.get(rule).map(String::as_str)
    }

    pub fn rules(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Built-in English catalog
    pub fn english() -> Self {
        const TEMPLATES: &[(&str, &str)] = &[
            ("required", "{0} is a required field"),
            ("required_if", "{0} is a required field"),
            ("required_unless", "{0} is a required field"),
            ("required_with", "{0} is a required field"),
            ("required_with_all", "{0} is a required field"),
            ("required_without", "{0} is a required field"),
            ("required_without_all", "{0} is a required field"),
            ("excluded_if", "{0} is an excluded field"),
            ("excluded_unless", "{0} is an excluded field"),
            ("excluded_with", "{0} is an excluded field"),
            ("excluded_with_all", "{0} is an excluded field"),
            ("excluded_without", "{0} is an excluded field"),
            ("excluded_without_all", "{0} is an excluded field"),
            ("isdefault", "{0} must be default value"),
            ("len", "{0} must be {1} in length"),
            ("min", "{0} must be at least {1}"),
            ("max", "{0} must be at most {1}"),
            ("eq", "{0} is not equal to {1}"),
            ("ne", "{0} should not be equal to {1}"),
            ("gt", "{0} must be greater than {1}"),
            ("gte", "{0} must be {1} or greater"),
            ("lt", "{0} must be less than {1}"),
            ("lte", "{0} must be {1} or less"),
            ("oneof", "{0} must be one of [{1}]"),
            ("unique", "{0} must contain unique values"),
            ("eqfield", "{0} must be equal to {1}"),
            ("nefield", "{0} cannot be equal to {1}"),
            ("gtfield", "{0} must be greater than {1}"),
            ("gtefield", "{0} must be greater than or equal to {1}"),
            ("ltfield", "{0} must be less than {1}"),
            ("ltefield", "{0} must be less than or equal to {1}"),
            ("eqcsfield", "{0} must be equal to {1}"),
            ("necsfield", "{0} cannot equal {1}"),
            ("gtcsfield", "{0} must be greater than {1}"),
            ("gtecsfield", "{0} must be greater than or equal to {1}"),
            ("ltcsfield", "{0} must be less than {1}"),
            ("ltecsfield", "{0} must be less than or equal to {1}"),
            ("alpha", "{0} can only contain alphabetic characters"),
            ("alphanum", "{0} can only contain alphanumeric characters"),
            ("numeric", "{0} must be a valid numeric value"),
            ("number", "{0} must be a valid number"),
            ("hexadecimal", "{0} must be a valid hexadecimal"),
            ("hexcolor", "{0} must be a valid HEX color"),
            ("lowercase", "{0} must be a lowercase string"),
            ("uppercase", "{0} must be an uppercase string"),
            ("ascii", "{0} must contain only ascii characters"),
            ("boolean", "{0} must be a valid boolean value"),
            ("contains", "{0} must contain the text '{1}'"),
            ("containsany", "{0} must contain at least one of the following characters '{1}'"),
            ("excludes", "{0} cannot contain the text '{1}'"),
            ("excludesall", "{0} cannot contain any of the following characters '{1}'"),
            ("startswith", "{0} must start with text '{1}'"),
            ("endswith", "{0} must end with text '{1}'"),
            ("email", "{0} must be a valid email address"),
            ("e164", "{0} must be a valid E.164 formatted phone number"),
            ("url", "{0} must be a valid URL"),
            ("uri", "{0} must be a valid URI"),
            ("uuid", "{0} must be a valid UUID"),
            ("ip", "{0} must be a valid IP address"),
            ("ipv4", "{0} must be a valid IPv4 address"),
            ("ipv6", "{0} must be a valid IPv6 address"),
            ("datetime", "{0} does not match the {1} format"),
        ];

        TEMPLATES
            .iter()
            .fold(Self::new("en"), |translator, (rule, template)| {
                translator.with(rule, template)
            })
    }

    /// Parse a YAML catalog of `rule: template` pairs
    pub fn from_yaml(locale: impl Into<String>, content: &str) -> Result<Self> {
        let templates: BTreeMap<String, String> = serde_yaml::from_str(content)?;
        Ok(Self {
            locale: locale.into(),
            templates,
        })
    }

    /// Parse a JSON catalog of `"rule": "template"` pairs
    pub fn from_json(locale: impl Into<String>, content: &str) -> Result<Self> {
        let templates: BTreeMap<String, String> = serde_json::from_str(content)?;
        Ok(Self {
            locale: locale.into(),
            templates,
        })
    }

    /// Load a catalog file, choosing the format by extension
    pub fn from_file(locale: impl Into<String>, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(locale, &content),
            Some("json") => Self::from_json(locale, &content),
            _ => Err(Error::translation(format!(
                "unsupported translation catalog format: {}",
                path.display()
            ))),
        }
    }
}

/// Hook run against a translator while the engine starts
pub type TranslatorInit = Arc<dyn Fn(&mut Translator) -> Result<()> + Send + Sync>;

/// Per-request language selector
pub type LocaleSelector = Arc<dyn Fn(&RequestContext) -> Option<String> + Send + Sync>;

/// One language offered to the engine
#[derive(Clone)]
pub struct TranslationRegistration {
    pub lang: String,
    pub translator: Option<Translator>,
    pub init: Option<TranslatorInit>,
}

impl TranslationRegistration {
    pub fn new(lang: impl Into<String>, translator: Translator) -> Self {
        Self {
            lang: lang.into(),
            translator: Some(translator),
            init: None,
        }
    }

    pub fn with_init<F>(mut self, init: F) -> Self
    where
        F: Fn(&mut Translator) -> Result<()> + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }
}

impl fmt::Debug for TranslationRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationRegistration")
            .field("lang", &self.lang)
            .field("translator", &self.translator)
            .field("init", &self.init.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Translation setup handed to the engine builder
#[derive(Clone, Default)]
pub struct TranslationConfig {
    pub registrations: Vec<TranslationRegistration>,
    pub default_lang: String,
    /// Defaults to the request's `locale`
    pub pick_lang: Option<LocaleSelector>,
}

impl TranslationConfig {
    pub fn new(default_lang: impl Into<String>) -> Self {
        Self {
            default_lang: default_lang.into(),
            ..Self::default()
        }
    }

    pub fn register(mut self, registration: TranslationRegistration) -> Self {
        self.registrations.push(registration);
        self
    }

    pub fn with_selector<F>(mut self, selector: F) -> Self
    where
        F: Fn(&RequestContext) -> Option<String> + Send + Sync + 'static,
    {
        self.pick_lang = Some(Arc::new(selector));
        self
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("registrations", &self.registrations)
            .field("default_lang", &self.default_lang)
            .field("pick_lang", &self.pick_lang.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

fn request_locale(ctx: &RequestContext) -> Option<String> {
    ctx.locale().map(str::to_string)
}

/// Validated translators, ready for concurrent use
#[derive(Clone)]
pub struct Translations {
    translators: HashMap<String, Arc<Translator>>,
    default_lang: String,
    pick_lang: LocaleSelector,
}

impl Translations {
    /// Validate a configuration and run every init hook
    pub fn from_config(config: TranslationConfig) -> Result<Self> {
        if config.registrations.is_empty() {
            return Err(Error::translation(
                "at least one translation registration is required",
            ));
        }

        let mut translators = HashMap::new();
        for registration in config.registrations {
            let lang = registration.lang.trim().to_string();
            if lang.is_empty() {
                return Err(Error::translation("translation registration is missing a language"));
            }
            if translators.contains_key(&lang) {
                return Err(Error::translation(format!(
                    "duplicate translation registration for language '{}'",
                    lang
                )));
            }

            let mut translator = registration.translator.ok_or_else(|| {
                Error::translation(format!("translator for language '{}' is missing", lang))
            })?;
            if let Some(init) = &registration.init {
                init(&mut translator)?;
            }

            debug!(lang = %lang, templates = translator.len(), "Registered translator");
            translators.insert(lang, Arc::new(translator));
        }

        let default_lang = config.default_lang.trim().to_string();
        if !translators.contains_key(&default_lang) {
            return Err(Error::translation(format!(
                "default language '{}' has no registered translator",
                default_lang
            )));
        }

        let pick_lang = match config.pick_lang {
            Some(selector) => selector,
            None => {
                let selector: LocaleSelector = Arc::new(request_locale);
                selector
            }
        };

        Ok(Self {
            translators,
            default_lang,
            pick_lang,
        })
    }

    /// Translator for a request, falling back to the default language
    pub fn translator_for(&self, ctx: &RequestContext) -> Option<&Translator> {
        (self.pick_lang)(ctx)
            .and_then(|lang| self.translators.get(&lang))
            .or_else(|| self.translators.get(&self.default_lang))
            .map(Arc::as_ref)
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    /// Registered languages, sorted
    pub fn languages(&self) -> Vec<&str> {
        let mut languages: Vec<&str> = self.translators.keys().map(String::as_str).collect();
        languages.sort_unstable();
        languages
    }
}

impl fmt::Debug for Translations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translations")
            .field("languages", &self.languages())
            .field("default_lang", &self.default_lang)
            .finish()
    }
}
