//! Startup-time registry of pluggable capabilities.
//!
//! Settings refer to handlers, formatters and user resolvers by key. Keys
//! are registered before the interceptor is built; an unknown key is a
//! configuration error at construction, never during a request.

use std::collections::HashMap;
use std::sync::Arc;

use crate::emitter::{JsonFormatter, LogFormatter, LogHandler, StdoutHandler, TracingHandler};
use crate::error::AuditError;
use crate::request::InboundRequest;
use crate::user::{UserDescriptor, UserResolver};

type HandlerFactory = Arc<dyn Fn() -> Arc<dyn LogHandler> + Send + Sync>;
type FormatterFactory = Arc<dyn Fn() -> Arc<dyn LogFormatter> + Send + Sync>;

#[derive(Default, Clone)]
pub struct Registry {
    handlers: HashMap<String, HandlerFactory>,
    formatters: HashMap<String, FormatterFactory>,
    user_resolvers: HashMap<String, Arc<dyn UserResolver>>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .field("formatters", &self.formatters.keys().collect::<Vec<_>>())
            .field("user_resolvers", &self.user_resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the bundled handlers (`tracing`, `stdout`) and
    /// formatters (`json`, `pretty_json`).
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register_handler("tracing", || TracingHandler)
            .register_handler("stdout", || StdoutHandler)
            .register_formatter("json", JsonFormatter::default)
            .register_formatter("pretty_json", || JsonFormatter { pretty: true });
        registry
    }

    pub fn register_handler<F, H>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> H + Send + Sync + 'static,
        H: LogHandler + 'static,
    {
        let factory: HandlerFactory = Arc::new(move || Arc::new(factory()) as Arc<dyn LogHandler>);
        self.handlers.insert(key.into(), factory);
        self
    }

    pub fn register_formatter<F, L>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn() -> L + Send + Sync + 'static,
        L: LogFormatter + 'static,
    {
        let factory: FormatterFactory =
            Arc::new(move || Arc::new(factory()) as Arc<dyn LogFormatter>);
        self.formatters.insert(key.into(), factory);
        self
    }

    pub fn register_user_resolver<F>(&mut self, key: impl Into<String>, resolver: F) -> &mut Self
    where
        F: Fn(&dyn InboundRequest) -> Result<UserDescriptor, AuditError> + Send + Sync + 'static,
    {
        self.user_resolvers.insert(key.into(), Arc::new(resolver));
        self
    }

    /// Build the handler registered under `key`.
    pub fn handler(&self, key: &str) -> Result<Arc<dyn LogHandler>, AuditError> {
        self.handlers
            .get(key)
            .map(|factory| factory())
            .ok_or_else(|| unregistered("log handler", key))
    }

    /// Build the formatter registered under `key`.
    pub fn formatter(&self, key: &str) -> Result<Arc<dyn LogFormatter>, AuditError> {
        self.formatters
            .get(key)
            .map(|factory| factory())
            .ok_or_else(|| unregistered("log formatter", key))
    }

    pub fn user_resolver(&self, key: &str) -> Result<Arc<dyn UserResolver>, AuditError> {
        self.user_resolvers
            .get(key)
            .cloned()
            .ok_or_else(|| unregistered("user resolver", key))
    }
}

fn unregistered(kind: &str, key: &str) -> AuditError {
    AuditError::Config(format!("no {kind} registered under '{key}'"))
}
