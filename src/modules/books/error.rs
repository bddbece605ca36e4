use thiserror::Error;

use super::models::BookField;

/// Failures reported by the book store. An absent record is not a failure:
/// lookups return `Option` and deletes return `bool`.
#[derive(Error, Debug)]
pub enum BookStoreError {
    /// Malformed request shape, such as an empty id.
    #[error("{message}")]
    InvalidArgument { message: String },

    /// First field constraint the input violates.
    #[error("{message}")]
    Validation { field: BookField, message: String },

    /// Another stored record already uses this isbn.
    #[error("A book with ISBN {isbn} already exists")]
    Conflict { isbn: String },

    /// Anything unforeseen. The cause is logged, never displayed.
    #[error("internal book store failure")]
    Internal(#[source] anyhow::Error),
}

impl BookStoreError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn validation(field: BookField, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn conflict(isbn: impl Into<String>) -> Self {
        Self::Conflict { isbn: isbn.into() }
    }

    /// Wrap an unexpected fault, logging its cause.
    pub fn internal(cause: impl Into<anyhow::Error>) -> Self {
        let cause = cause.into();
        tracing::error!(error = ?cause, "unexpected book store failure");
        Self::Internal(cause)
    }
}

pub type BookStoreResult<T> = Result<T, BookStoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_message_names_isbn() {
        let error = BookStoreError::conflict("978-0743273565");
        assert_eq!(
            error.to_string(),
            "A book with ISBN 978-0743273565 already exists"
        );
    }

    #[test]
    fn internal_message_does_not_leak_cause() {
        let error = BookStoreError::internal(anyhow::anyhow!("secret path /var/lib/books"));
        assert_eq!(error.to_string(), "internal book store failure");
        assert!(std::error::Error::source(&error).is_some());
    }
}
