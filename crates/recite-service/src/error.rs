use recite_core::fetcher::FetchError;
use recite_core::words::WordError;
use recite_store::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ReciteError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("word lookup failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl ReciteError {
    /// Numeric code carried in the response envelope
    pub fn code(&self) -> i32 {
        match self {
            ReciteError::Validation(_) => 1001,
            ReciteError::NotFound(_) => 1002,
            ReciteError::Fetch(_) => 1003,
            ReciteError::Store(_) => 1,
        }
    }

    /// Message safe to show to callers. Store causes stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ReciteError::Store(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<WordError> for ReciteError {
    fn from(err: WordError) -> Self {
        ReciteError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(ReciteError::Validation("bad".into()).code(), 1001);
        assert_eq!(ReciteError::NotFound("gone".into()).code(), 1002);
        assert_eq!(ReciteError::Fetch(FetchError::MissingData).code(), 1003);
        assert_eq!(ReciteError::Store(StoreError::UnknownUnit(3)).code(), 1);
    }

    #[test]
    fn test_store_cause_is_hidden() {
        let err = ReciteError::Store(StoreError::UnknownUnit(3));
        assert_eq!(err.public_message(), "internal error");

        let err = ReciteError::from(WordError::Empty);
        assert_eq!(err.public_message(), "word is empty");
    }
}
