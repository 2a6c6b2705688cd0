use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use tokio::signal::unix::{SignalKind, signal};

use appdex_collection::{AppsHttp, ListEngine};
use appdex_store::MemoryStore;

async fn handle(
    req: Request<Incoming>,
    handler: Arc<AppsHttp>,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    let (parts, body) = req.into_parts();
    let body_bytes = body.collect().await?.to_bytes().to_vec();
    let http_req = Request::from_parts(parts, body_bytes);
    let http_resp = handler.handle(http_req);
    let (parts, body_bytes) = http_resp.into_parts();
    Ok(Response::from_parts(
        parts,
        Full::new(Bytes::from(body_bytes)),
    ))
}

async fn shutdown_signal() {
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
    sigterm.recv().await;
}

/// Read the seed file: a JSON array of app documents.
fn load_seed(path: &str) -> Result<Vec<bson::Document>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)?;
    let docs: Vec<bson::Document> = serde_json::from_str(&text)?;
    Ok(docs)
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let data_path = std::env::var("APPDEX_DATA").unwrap_or_else(|_| {
        eprintln!("APPDEX_DATA is required");
        std::process::exit(1);
    });
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    let docs = load_seed(&data_path).unwrap_or_else(|e| {
        eprintln!("failed to load {data_path}: {e}");
        std::process::exit(1);
    });

    let store = Arc::new(MemoryStore::new());
    let seeded = store.insert_many(docs).unwrap_or_else(|e| {
        eprintln!("failed to seed store: {e}");
        std::process::exit(1);
    });
    log::info!("seeded {seeded} apps from {data_path}");

    let handler = Arc::new(AppsHttp::new(ListEngine::new(store)));

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| {
            eprintln!("failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        });

    log::info!("listening on {bind_addr}");

    let http = http1::Builder::new();
    let graceful = GracefulShutdown::new();
    let mut signal = pin!(shutdown_signal());

    loop {
        tokio::select! {
            Ok((stream, _)) = listener.accept() => {
                let io = TokioIo::new(stream);
                let handler = Arc::clone(&handler);
                let conn = http.serve_connection(io, service_fn(move |req| {
                    let handler = Arc::clone(&handler);
                    handle(req, handler)
                }));
                let fut = graceful.watch(conn);
                tokio::spawn(async move {
                    if let Err(e) = fut.await {
                        log::error!("connection error: {e}");
                    }
                });
            }
            _ = &mut signal => {
                log::info!("shutdown signal received");
                drop(listener);
                break;
            }
        }
    }

    tokio::select! {
        _ = graceful.shutdown() => {
            log::info!("shutdown complete");
        }
        _ = tokio::time::sleep(Duration::from_secs(10)) => {
            log::warn!("shutdown timed out after 10s");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::load_seed;

    #[test]
    fn seed_file_parses_into_documents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{ "_id": "app-1", "title": "Calculator Pro", "rating": 4.6, "size": 12, "downloads": 250000 }},
                {{ "_id": "app-2", "title": "Photo Studio", "rating": 4.1, "size": 85, "downloads": 1200000 }}
            ]"#
        )
        .unwrap();

        let docs = load_seed(file.path().to_str().unwrap()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].get_str("title").unwrap(), "Calculator Pro");
    }

    #[test]
    fn missing_seed_file_errors() {
        assert!(load_seed("/nonexistent/apps.json").is_err());
    }

    #[test]
    fn non_array_seed_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "_id": "app-1" }}"#).unwrap();
        assert!(load_seed(file.path().to_str().unwrap()).is_err());
    }
}
