use bson::Document;
use serde::Serialize;

/// Success envelope for `GET /apps`.
///
/// `total` counts every record matching the request's filter, independent of
/// limit and skip; `apps` carries the projected page.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub apps: Vec<Document>,
    pub total: u64,
}
