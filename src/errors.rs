use thiserror::Error;

#[derive(Debug, Error)]
pub enum SendError {
    #[error("{0}")]
    CredentialMissing(String),

    #[error("The communication with HyperSender failed. `{message}`")]
    CommunicationFailure {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// A well-formed HTTP error response from the backend.
    ///
    /// `message` is the fully composed, human-readable text; the other fields
    /// are kept separately so callers can branch on them.
    #[error("{message}")]
    BackendError {
        status: u16,
        reason: String,
        reasons: Vec<String>,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Failed to open file: {0}")]
    FileAccessFailed(String),

    #[error("Invalid file identifier: {0}")]
    InvalidFileIdentifier(String),

    #[error("Failed to decode HyperSender response: {0}")]
    InvalidResponse(String),

    #[error("Failed to render message template: {0}")]
    Template(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SendError {
    pub(crate) fn token_not_provided() -> Self {
        SendError::CredentialMissing(
            "You must provide your HyperSender token to make any API requests.".to_string(),
        )
    }

    /// HTTP status of a backend error response, if this error carries one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            SendError::BackendError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SendError {
    fn from(error: reqwest::Error) -> Self {
        SendError::CommunicationFailure {
            message: error.to_string(),
            source: Some(error),
        }
    }
}

impl From<minijinja::Error> for SendError {
    fn from(error: minijinja::Error) -> Self {
        SendError::Template(error.to_string())
    }
}
