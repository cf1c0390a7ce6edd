use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Bad caller input: empty or oversized query, missing item fields, out-of-range limits.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Search issued before any catalog was indexed.
    #[error("Search engine not ready: {0}")]
    NotReady(String),

    /// The embedding backend failed or returned malformed output.
    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// `true` when the caller sent bad input, `false` when the service itself is unable to
    /// answer (not indexed yet, embedding backend down, broken config or IO).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::NotFound(_))
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_distinguished_from_backend_errors() {
        assert!(Error::validation("empty query").is_client_error());
        assert!(Error::NotFound("item 7".into()).is_client_error());
        assert!(!Error::NotReady("index first".into()).is_client_error());
        assert!(!Error::EmbeddingProvider("model offline".into()).is_client_error());
    }

    #[test]
    fn messages_carry_the_kind() {
        let e = Error::EmbeddingProvider("dimension mismatch".into());
        assert_eq!(e.to_string(), "Embedding provider error: dimension mismatch");
    }
}
