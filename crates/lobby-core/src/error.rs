use thiserror::Error;

/// Recoverable failures surfaced by the lobby core. None of these are fatal:
/// the frame loop keeps rendering from the last good state regardless.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream returned HTTP {status}")]
    Http { status: u16 },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("motion sensor permission denied: {0}")]
    PermissionDenied(String),
}

impl LobbyError {
    /// Failures that should raise the offline indicator.
    pub fn is_offline(&self) -> bool {
        matches!(self, LobbyError::Network(_) | LobbyError::Http { .. })
    }
}

pub type LobbyResult<T> = Result<T, LobbyError>;
