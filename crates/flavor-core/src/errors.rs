//! Structured error types shared across flavor crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`FlavorError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (parameter names, field names, values).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the flavor engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum FlavorError {
    /// An unknown parameter or generation identifier was requested.
    #[error("invalid parameter: {0}")]
    InvalidParameter(ErrorInfo),
    /// An observed uncertainty was zero, negative or not finite.
    #[error("invalid uncertainty: {0}")]
    InvalidUncertainty(ErrorInfo),
    /// A percentage deviation was requested against a zero observation.
    #[error("division by zero: {0}")]
    DivisionByZero(ErrorInfo),
    /// Fewer comparison inputs than declared parameters reached the judge.
    #[error("missing parameter: {0}")]
    MissingParameter(ErrorInfo),
    /// A parameter table or policy lacks required fields or is inconsistent.
    #[error("malformed configuration: {0}")]
    MalformedConfiguration(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// Reading or writing a file failed.
    #[error("io error: {0}")]
    Io(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl FlavorError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            FlavorError::InvalidParameter(info)
            | FlavorError::InvalidUncertainty(info)
            | FlavorError::DivisionByZero(info)
            | FlavorError::MissingParameter(info)
            | FlavorError::MalformedConfiguration(info)
            | FlavorError::Serde(info)
            | FlavorError::Io(info) => info,
        }
    }

    /// Builds an [`FlavorError::InvalidParameter`] naming the offending identifier.
    pub fn invalid_parameter(id: impl Into<String>) -> Self {
        let id = id.into();
        FlavorError::InvalidParameter(
            ErrorInfo::new("invalid-parameter", format!("unknown parameter identifier '{id}'"))
                .with_context("parameter", id),
        )
    }

    /// Builds an [`FlavorError::Io`] naming the file and the failed action.
    pub fn io(code: &str, action: &str, path: impl Into<String>, err: &std::io::Error) -> Self {
        let path = path.into();
        FlavorError::Io(
            ErrorInfo::new(code, format!("cannot {action} '{path}'"))
                .with_context("path", path)
                .with_hint(err.to_string()),
        )
    }

    /// Builds an [`FlavorError::MalformedConfiguration`] with the given code and message.
    pub fn malformed(code: &str, message: impl Into<String>) -> Self {
        FlavorError::MalformedConfiguration(ErrorInfo::new(code, message))
    }
}
