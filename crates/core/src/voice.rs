//! Events reported by the speech input port, and its failure taxonomy.
//!
//! Every error here is non-fatal. Recognition errors are transient and only
//! surface as a toast; an unavailable input disables voice control for the
//! rest of the session while the keyboard keeps working.

/// Reported by a speech input adapter, in order: `Started`, then one
/// `Transcript` or `Error`, then `Ended`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceEvent {
    Started,
    Transcript(String),
    Error(RecognitionError),
    Ended,
    /// The adapter can never capture in this session.
    Unavailable(InputUnavailable),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecognitionError {
    #[error("No speech was detected. Please try again.")]
    NoSpeech,
    #[error("Network error occurred. Please check your connection.")]
    Network,
    #[error("Could not start voice recognition. Please try again.")]
    StartFailed,
    #[error("Voice recognition error. Please try again.")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputUnavailable {
    #[error("Voice control requires HTTPS. Please use a secure connection.")]
    InsecureContext,
    #[error("Voice control is not supported here.")]
    Unsupported,
    #[error("Please allow microphone access to use voice control.")]
    PermissionDenied,
}

impl RecognitionError {
    /// Maps a platform error code ("no-speech", "network", ...) to an error.
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "network" => Self::Network,
            other => Self::Other(other.to_string()),
        }
    }
}
