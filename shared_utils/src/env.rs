use std::collections::HashMap;

use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Somewhere named configuration values can be looked up.
///
/// The process environment is the production source; tests hand in a plain map so
/// they never have to mutate global state.
pub trait VarSource {
    /// Returns the value for `name`, or `None` when it is unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads from `std::env`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl VarSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Looks up `name`, treating an empty value the same as an unset one.
pub fn lookup_var(source: &impl VarSource, name: &str) -> Option<String> {
    source.var(name).filter(|v| !v.trim().is_empty())
}

/// Looks up a required value, returning a structured error if it's missing.
pub fn require_var(source: &impl VarSource, name: &str) -> Result<String, MissingEnvVarError> {
    lookup_var(source, name).ok_or_else(|| MissingEnvVarError(name.to_string()))
}
