//! Error types for panel operations
//!
//! Nothing here is retried. Every variant carries enough context (status,
//! redirect target, missing field) for the caller to tell an expired session
//! apart from a panel whose layout has drifted. Messages never contain
//! credentials or scraped secrets.

use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, PanelError>;

#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The panel does not say why, so neither do we.
    #[error("authentication failed: invalid username or password (login answered {status})")]
    AuthenticationFailed { status: StatusCode },

    #[error(
        "unexpected response fetching {resource}: expected 200, got {status} (location: {})",
        .location.as_deref().unwrap_or("-")
    )]
    StructuralFetch {
        resource: String,
        status: StatusCode,
        location: Option<String>,
    },

    #[error("update rejected: {0}")]
    StructuralUpdate(#[from] UpdateFault),

    #[error("failed to parse response from {resource}: {reason}")]
    Parse { resource: String, reason: String },
}

/// Why an update could not be submitted or was not accepted
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UpdateFault {
    /// A field the postback needs was not on the freshly fetched page.
    #[error("required form field `{0}` missing from page (layout drift or expired session)")]
    MissingField(&'static str),

    #[error(
        "expected 200, got {status} (location: {})",
        .location.as_deref().unwrap_or("-")
    )]
    UnexpectedStatus {
        status: StatusCode,
        location: Option<String>,
    },
}

impl PanelError {
    pub(crate) fn parse(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// Redirect target attached to a status error, if any
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::StructuralFetch { location, .. }
            | Self::StructuralUpdate(UpdateFault::UnexpectedStatus { location, .. }) => {
                location.as_deref()
            }
            _ => None,
        }
    }
}
