//! Render errors.
//!
//! A render session either commits completely or fails before the commit
//! pass starts. Every variant here is raised during the begin phase, so the
//! attached host tree is never touched by a failed session.

/// Errors surfaced synchronously to the caller of [`Root::render`](crate::Root::render).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The element's type maps to no known fiber kind.
    #[error("unsupported element kind: {type_name}")]
    UnsupportedElementKind {
        /// Display name of the offending element type.
        type_name: String,
    },
}

impl RenderError {
    pub(crate) fn unsupported(type_name: impl Into<String>) -> Self {
        RenderError::UnsupportedElementKind {
            type_name: type_name.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
