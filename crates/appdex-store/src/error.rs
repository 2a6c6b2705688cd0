use std::fmt;

#[derive(Debug)]
pub enum StoreError {
    /// Document has no string `_id`.
    MissingId,
    Storage(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::MissingId => write!(f, "document is missing a string _id"),
            StoreError::Storage(msg) => write!(f, "storage error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
