use thiserror::Error;

/// Errors returned by [`crate::CsvLoader::load`].
///
/// Malformed CSV is deliberately absent: the tokenizer degrades to empty or
/// partial fields instead of rejecting input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("Fetch failed: {status_code}")]
    Fetch { status_code: u16 },
    #[error("Request failed: {message}")]
    Transport { message: String },
    #[error("Reading response body failed: {message}")]
    Body { message: String },
    #[error("Invalid data URL: {message}")]
    InvalidUrl { message: String },
    #[error("Document has no header row")]
    EmptyDocument,
    #[error(transparent)]
    Duplicate(#[from] DuplicateName),
}

impl LoadError {
    /// HTTP status of a `Fetch` error, if that is what this is.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LoadError::Fetch { status_code } => Some(*status_code),
            _ => None,
        }
    }

    /// Client errors (4xx) will not change on a second attempt.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.status_code(), Some(400..=499))
            && !matches!(
                self,
                LoadError::InvalidUrl { .. } | LoadError::Duplicate(_)
            )
    }
}

impl From<reqwest::Error> for LoadError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return LoadError::Fetch {
                status_code: status.as_u16(),
            };
        }
        LoadError::Transport {
            message: err.to_string(),
        }
    }
}

impl From<url::ParseError> for LoadError {
    fn from(err: url::ParseError) -> Self {
        LoadError::InvalidUrl {
            message: err.to_string(),
        }
    }
}

/// Raised by [`crate::RecordStore::try_reset`] when duplicates are rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Duplicate product name: {name}")]
pub struct DuplicateName {
    pub name: String,
}
