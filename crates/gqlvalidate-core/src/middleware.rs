//! Field-level interception
//!
//! [`ValidationMiddleware::around_field`] runs before every resolver: it
//! validates each validatable argument of the field and either lets the
//! resolver run or short-circuits with a protocol error.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::engine::ValidationEngine;
use crate::path::ResponsePath;
use crate::response::{ErrorCollector, GraphQLError};
use crate::rules::CancelSignal;
use crate::types::ResolvedArgument;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument};

/// Per-request state shared by every field of one operation
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    locale: Option<String>,
    cancel: CancellationToken,
    deadline: Option<Instant>,
    errors: Arc<ErrorCollector>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Requested language, if the client sent one
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Non-terminating errors accumulated for the response
    pub fn errors(&self) -> &ErrorCollector {
        &self.errors
    }

    /// Cancellation state handed to the evaluator
    pub fn signal(&self) -> CancelSignal {
        let signal = CancelSignal::new().with_token(self.cancel.clone());
        match self.deadline {
            Some(deadline) => signal.with_deadline(deadline),
            None => signal,
        }
    }
}

/// A resolver field about to execute
#[derive(Debug, Clone)]
pub struct FieldContext {
    pub request: RequestContext,
    /// Path of the field in the response
    pub path: ResponsePath,
    /// Coerced arguments, in declaration order
    pub arguments: Vec<ResolvedArgument>,
}

impl FieldContext {
    pub fn new(request: RequestContext, path: ResponsePath) -> Self {
        Self {
            request,
            path,
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, argument: ResolvedArgument) -> Self {
        self.arguments.push(argument);
        self
    }
}

/// Interceptor wrapping every resolver call
#[derive(Debug, Clone)]
pub struct ValidationMiddleware {
    engine: Arc<ValidationEngine>,
}

impl ValidationMiddleware {
    pub fn new(engine: Arc<ValidationEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Validate the field's arguments, then run `next`
    ///
    /// `next` is never polled when validation fails.
    #[instrument(skip_all, fields(path = %field.path))]
    pub async fn around_field<F, Fut, T>(&self, field: &FieldContext, next: F) -> Result<T, GraphQLError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, GraphQLError>>,
    {
        if let Err(error) = self.engine.validate_arguments(field) {
            debug!(message = %error.message, "Short-circuiting resolver");
            return Err(error);
        }
        next().await
    }
}
