use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::{ExceptionResponder, Resolution, ResolutionResult};
use crate::errors::{AppError, ErrorKind};

/// Precedence tier a handler is registered under
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HandlerScope {
    /// Only applies to one route, like a controller's own handler
    Route(String),
    /// Applies to every route carrying the tag
    Tagged(String),
    /// Applies everywhere
    Global,
}

impl HandlerScope {
    pub fn route(id: impl Into<String>) -> Self {
        Self::Route(id.into())
    }

    pub fn tagged(tag: impl Into<String>) -> Self {
        Self::Tagged(tag.into())
    }

    /// Lower is consulted first
    pub fn precedence(&self) -> u8 {
        match self {
            Self::Route(_) => 0,
            Self::Tagged(_) => 1,
            Self::Global => 2,
        }
    }

    pub fn applies_to(&self, scope: &RequestScope) -> bool {
        match self {
            Self::Route(id) => scope.route == *id,
            Self::Tagged(tag) => scope.has_tag(tag),
            Self::Global => true,
        }
    }
}

impl fmt::Display for HandlerScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Route(id) => write!(f, "route:{}", id),
            Self::Tagged(tag) => write!(f, "tag:{}", tag),
            Self::Global => write!(f, "global"),
        }
    }
}

/// Which error kinds an entry accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindMatcher {
    Exact(ErrorKind),
    Any,
}

impl KindMatcher {
    pub fn matches(&self, kind: ErrorKind) -> bool {
        match self {
            Self::Exact(expected) => *expected == kind,
            Self::Any => true,
        }
    }
}

impl From<ErrorKind> for KindMatcher {
    fn from(kind: ErrorKind) -> Self {
        Self::Exact(kind)
    }
}

/// The handling scope of the request that raised the error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestScope {
    pub route: String,
    pub tags: Vec<String>,
}

impl RequestScope {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Handler '{handler}' is already registered for {matcher:?} in scope {scope}")]
    DuplicateHandler {
        handler: &'static str,
        scope: HandlerScope,
        matcher: KindMatcher,
    },
}

pub struct HandlerEntry {
    pub scope: HandlerScope,
    pub matcher: KindMatcher,
    pub handler: &'static str,
    responder: Arc<dyn ExceptionResponder>,
}

impl HandlerEntry {
    fn accepts(&self, error: &AppError, scope: &RequestScope) -> bool {
        self.scope.applies_to(scope) && self.matcher.matches(error.kind())
    }

    fn respond(&self, error: &AppError) -> Resolution {
        self.responder.respond(error)
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerEntry")
            .field("scope", &self.scope)
            .field("matcher", &self.matcher)
            .field("handler", &self.handler)
            .finish()
    }
}

/// Collects handler registrations at startup
#[derive(Debug, Default)]
pub struct HandlerRegistryBuilder {
    entries: Vec<HandlerEntry>,
}

impl HandlerRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler. Registering the same handler twice for the same
    /// scope and matcher is a configuration error.
    pub fn register<R>(
        &mut self,
        scope: HandlerScope,
        matcher: impl Into<KindMatcher>,
        handler: &'static str,
        responder: R,
    ) -> Result<&mut Self, RegistryError>
    where
        R: ExceptionResponder,
    {
        let matcher = matcher.into();
        let duplicate = self
            .entries
            .iter()
            .any(|e| e.scope == scope && e.matcher == matcher && e.handler == handler);
        if duplicate {
            return Err(RegistryError::DuplicateHandler {
                handler,
                scope,
                matcher,
            });
        }

        debug!(handler, scope = %scope, matcher = ?matcher, "Registered exception handler");

        self.entries.push(HandlerEntry {
            scope,
            matcher,
            handler,
            responder: Arc::new(responder),
        });
        Ok(self)
    }

    /// Freeze the registrations. Entries end up ordered by scope precedence;
    /// the sort is stable so registration order survives within a scope.
    pub fn build(mut self) -> HandlerRegistry {
        self.entries.sort_by_key(|e| e.scope.precedence());
        HandlerRegistry {
            entries: self.entries,
        }
    }
}

/// Immutable set of exception handlers, shared across requests
#[derive(Debug)]
pub struct HandlerRegistry {
    entries: Vec<HandlerEntry>,
}

impl HandlerRegistry {
    pub fn builder() -> HandlerRegistryBuilder {
        HandlerRegistryBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HandlerEntry> {
        self.entries.iter()
    }

    /// Pick exactly one handler for `error` raised under `scope`.
    ///
    /// Route-local entries win over tag-scoped ones, which win over global
    /// ones. Within a tier the first registered match wins. When nothing
    /// matches the built-in default answers.
    pub fn resolve(&self, error: &AppError, scope: &RequestScope) -> ResolutionResult {
        match self.entries.iter().find(|e| e.accepts(error, scope)) {
            Some(entry) => entry.respond(error).finish(error, entry.handler),
            None => super::fallback(error),
        }
    }
}
