use http::{Method, Request, Response, StatusCode};
use url::form_urlencoded;

use appdex_query::RawListParams;

use crate::engine::ListEngine;

/// HTTP surface for the list endpoint.
pub struct AppsHttp {
    engine: ListEngine,
}

impl AppsHttp {
    pub fn new(engine: ListEngine) -> Self {
        Self { engine }
    }

    pub fn handle(&self, req: Request<Vec<u8>>) -> Response<Vec<u8>> {
        let path = req.uri().path();
        let method = req.method();

        match (method, path.trim_end_matches('/')) {
            (&Method::GET, "/apps") => self.list_apps(&req),
            _ => json_response(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#),
        }
    }

    fn list_apps(&self, req: &Request<Vec<u8>>) -> Response<Vec<u8>> {
        let raw = parse_raw_params(req.uri().query());
        log::debug!("list query: {raw:?}");

        match self.engine.query(&raw) {
            Ok(response) => match serde_json::to_vec(&response) {
                Ok(body) => json_response(StatusCode::OK, body),
                Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
            },
            Err(e) => error_response(e.status_code(), &e.to_string()),
        }
    }
}

/// Pull the five known parameters out of the query string. Unknown
/// parameters are ignored; a repeated parameter keeps its last value.
fn parse_raw_params(query: Option<&str>) -> RawListParams {
    let mut raw = RawListParams::default();
    let Some(query) = query else { return raw };

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match key.as_ref() {
            "limit" => raw.limit = Some(value),
            "skip" => raw.skip = Some(value),
            "sort" => raw.sort = Some(value),
            "order" => raw.order = Some(value),
            "search" => raw.search = Some(value),
            _ => {}
        }
    }
    raw
}

fn json_response(status: StatusCode, body: impl Into<Vec<u8>>) -> Response<Vec<u8>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn error_response(status: StatusCode, message: &str) -> Response<Vec<u8>> {
    let body = serde_json::json!({ "error": message });
    json_response(status, body.to_string().into_bytes())
}
