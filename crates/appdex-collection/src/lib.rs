mod engine;
mod error;
mod http;
mod response;

pub use engine::ListEngine;
pub use error::ListError;
pub use http::AppsHttp;
pub use response::ListResponse;
