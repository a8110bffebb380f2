use thiserror::Error;

use crate::env::MissingEnvVarError;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable required by the application is not set.
    #[error(transparent)]
    MissingEnvVar(#[from] MissingEnvVarError),

    /// A value is present but unusable.
    #[error("Invalid value for `{key}`: {reason}")]
    Invalid {
        /// Name of the offending setting.
        key: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The settings file could not be read or parsed.
    #[error("Could not load settings from {path}: {reason}")]
    Settings {
        /// Path of the settings file.
        path: String,
        /// Underlying read or parse failure.
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::Invalid`].
    pub fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
