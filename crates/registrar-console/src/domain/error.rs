//! Errors the console reports to whoever renders it.
//!
//! Every failure ends up as a [`ConsoleError`]; the presentation layer only
//! ever sees a [`Notice`] (severity plus message) built from it.

use std::fmt;

use registrar_core::protocol::ResponseError;
use registrar_core::tree::CodecError;
use thiserror::Error;

use crate::domain::form::FormError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    /// A response could not be decoded.  Carries the codec's description,
    /// including any offending text fragments.
    #[error("malformed response: {0}")]
    MalformedMarkup(String),

    /// The login command was answered with an unexpected result code.
    #[error("login failed ({code}): {message}")]
    AuthenticationFailed { code: u16, message: String },

    /// No client id and anti-forgery token, so there is nothing to log in
    /// with.
    #[error("no registrar web session; a client id and anti-forgery token are required")]
    NoWebSession,

    /// An info, create or update command was answered with a failure code.
    #[error("command failed ({code}): {message}")]
    CommandRejected { code: u16, message: String },

    /// The request never produced an EPP response.
    #[error("transport failure: {0}")]
    TransportFailure(String),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error("the page is not in edit mode")]
    NotEditing,

    #[error("no object page is open")]
    NoActivePage,

    /// The page this operation was working on was navigated away from
    /// before the response arrived; the response was dropped.
    #[error("navigated away before the response arrived")]
    Superseded,
}

impl From<CodecError> for ConsoleError {
    fn from(err: CodecError) -> Self {
        ConsoleError::MalformedMarkup(err.to_string())
    }
}

impl From<ResponseError> for ConsoleError {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Codec(codec) => codec.into(),
            other => ConsoleError::MalformedMarkup(other.to_string()),
        }
    }
}

/// How prominently a notice should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

/// A message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

impl ConsoleError {
    pub fn severity(&self) -> Severity {
        match self {
            ConsoleError::MalformedMarkup(_)
            | ConsoleError::AuthenticationFailed { .. }
            | ConsoleError::NoWebSession
            | ConsoleError::CommandRejected { .. }
            | ConsoleError::TransportFailure(_) => Severity::Error,
            ConsoleError::Form(_) | ConsoleError::NotEditing | ConsoleError::NoActivePage => {
                Severity::Warning
            }
            ConsoleError::Superseded => Severity::Info,
        }
    }

    pub fn to_notice(&self) -> Notice {
        Notice::new(self.severity(), self.to_string())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
