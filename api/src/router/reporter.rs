//! Error channel for failures the dispatcher answers

use log::error;

use tg_core::errors::DomainError;

/// Identity of the request that failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestInfo {
    pub method: String,
    /// Path and query string
    pub url: String,
}

/// Receives every unhandled, non-pass-through failure exactly once
pub trait ErrorReporter: Send + Sync {
    fn report(&self, error: &DomainError, request: &RequestInfo);
}

/// Writes failures to the log as a framed block
pub struct LogErrorReporter {
    name: String,
}

impl LogErrorReporter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ErrorReporter for LogErrorReporter {
    fn report(&self, err: &DomainError, request: &RequestInfo) {
        let name = if self.name.is_empty() { "Unknown" } else { &self.name };
        error!(
            "------------------------------------------------------------\n{} ({})\n{} {}\n{}\n```{:?}```",
            chrono::Local::now().format("%d/%m %H:%M:%S"),
            name,
            request.method,
            request.url,
            err,
            err
        );
    }
}
