/// Storage error types
///
/// Every repository operation returns `StoreResult<T>`. The variants map onto
/// the client-facing outcomes: `NotFound` and `DuplicateEmail` are caller
/// mistakes, the rest are storage failures.

/// Repository result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the entity repository
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No document with the requested id
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A user with this email is already registered
    #[error("User with this email already exists: {0}")]
    DuplicateEmail(String),

    /// Connectivity or driver failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored document could not be converted back into a model
    #[error("Malformed document: {0}")]
    MalformedDocument(String),
}
