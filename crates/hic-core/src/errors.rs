//! Structured error types shared across HIC crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error code attached to system identifiers that do not match the
/// `<projectile><projectile><energy>` pattern.
pub const SYSTEM_MATCH_CODE: &str = "hic_core.system_match";

/// Structured payload attached to every [`HicError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (identifiers, shapes, paths).
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

/// Canonical error type for the calibration configuration layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HicError {
    /// Collision system identifiers that fail to parse.
    #[error("system error: {0}")]
    System(ErrorInfo),
    /// Observable identifiers that fail to parse.
    #[error("observable error: {0}")]
    Observable(ErrorInfo),
    /// Design space declarations (parameters, ranges, sources).
    #[error("design error: {0}")]
    Design(ErrorInfo),
    /// Array shapes that disagree with each other.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Dangling references and other configuration mistakes.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem failures (working and cache directories, data files).
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
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

impl HicError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HicError::System(info)
            | HicError::Observable(info)
            | HicError::Design(info)
            | HicError::Shape(info)
            | HicError::Config(info)
            | HicError::Io(info)
            | HicError::Serde(info) => info,
        }
    }

    /// Returns `true` when the error reports a system identifier that did
    /// not match the expected token pattern.
    pub fn is_match_failure(&self) -> bool {
        matches!(self, HicError::System(info) if info.code == SYSTEM_MATCH_CODE)
    }
}
