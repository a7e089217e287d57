use thiserror::Error;

/// Failure of a single hashtag generation call.
///
/// The `Display` text carries the full cause and is meant for the log.
/// Use [`ServiceError::user_message`] for anything shown on screen.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("no Gemini API key configured")]
    MissingApiKey,

    #[error("request to Gemini failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gemini returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Gemini response contained no text")]
    EmptyResponse,

    #[error("invalid response format: {0}")]
    InvalidFormat(String),
}

impl ServiceError {
    /// True for failures of the returned payload rather than of the connection.
    pub fn is_format_error(&self) -> bool {
        matches!(self, ServiceError::InvalidFormat(_))
    }

    pub fn user_message(&self) -> String {
        let detail = match self {
            ServiceError::MissingApiKey => {
                "No API key configured. Set GEMINI_API_KEY or add gemini_api_key to your config."
            }
            ServiceError::InvalidFormat(_) => {
                "The AI service returned an unexpected response. Please try again."
            }
            _ => "Could not connect to the AI service. Please try again later.",
        };
        format!("Failed to generate hashtags: {}", detail)
    }
}
