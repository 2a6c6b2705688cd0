use std::fmt;

use appdex_query::ParamError;
use appdex_store::StoreError;

#[derive(Debug)]
pub enum ListError {
    InvalidParameter(ParamError),
    Store(StoreError),
}

impl fmt::Display for ListError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListError::InvalidParameter(e) => write!(f, "{e}"),
            ListError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ListError {}

impl ListError {
    pub fn status_code(&self) -> http::StatusCode {
        match self {
            ListError::InvalidParameter(_) => http::StatusCode::BAD_REQUEST,
            ListError::Store(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ParamError> for ListError {
    fn from(e: ParamError) -> Self {
        ListError::InvalidParameter(e)
    }
}

impl From<StoreError> for ListError {
    fn from(e: StoreError) -> Self {
        ListError::Store(e)
    }
}
