use thiserror::Error;

use crate::provider::ProviderId;

/// Everything that can go wrong while fetching a forecast.
///
/// The `Display` text is meant to be shown to the user as-is.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Place must not be empty")]
    EmptyPlace,

    #[error(
        "No API key configured for provider '{0}'.\n\
         Hint: run `forecast configure {0}` and enter your API key."
    )]
    MissingApiKey(ProviderId),

    #[error("Failed to reach the weather provider: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Weather provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed forecast response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// `true` when the provider could not resolve the requested place.
    pub fn is_unknown_place(&self) -> bool {
        matches!(self, FetchError::Status { status: 404, .. })
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}
