//! API module entry
//! Publishing API served on the management listener

mod handlers;
mod response;
mod types;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::error::Error as StdError;
use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

pub use types::AssetInfo;

const ASSETS_PREFIX: &str = "/assets/";

/// API route handler
///
/// Dispatches to handler functions based on request path and method
pub async fn handle_api_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let path = req.uri().path().to_string();
    let method = req.method().clone();

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/stats") => handlers::handle_stats(&state),
        (&Method::PUT, p) if p.starts_with(ASSETS_PREFIX) => {
            handlers::handle_publish(req, Arc::clone(&state), &p[ASSETS_PREFIX.len()..]).await
        }
        (&Method::GET, p) if p.starts_with(ASSETS_PREFIX) => {
            handlers::handle_metadata(&state, &p[ASSETS_PREFIX.len()..])
        }
        _ => response::not_found(),
    };

    logger::log_api_request(method.as_str(), &path, response.status().as_u16());
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::handler;
    use http_body_util::{BodyExt, Empty};
    use hyper::header::{CONTENT_LENGTH, ETAG, LAST_MODIFIED};
    use hyper::StatusCode;

    fn state_with(cfg: Config) -> Arc<AppState> {
        Arc::new(AppState::new(&cfg).unwrap())
    }

    fn state() -> Arc<AppState> {
        let mut cfg = Config::default();
        cfg.logging.access_log = false;
        state_with(cfg)
    }

    async fn json_of(resp: Response<Full<Bytes>>) -> serde_json::Value {
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    async fn put(state: &Arc<AppState>, uri: &str, body: &'static [u8]) -> Response<Full<Bytes>> {
        let req = Request::put(uri).body(Full::new(Bytes::from_static(body))).unwrap();
        handle_api_request(req, Arc::clone(state)).await.unwrap()
    }

    async fn get(state: &Arc<AppState>, uri: &str) -> Response<Full<Bytes>> {
        let req = Request::get(uri).body(Empty::<Bytes>::new()).unwrap();
        handle_api_request(req, Arc::clone(state)).await.unwrap()
    }

    #[tokio::test]
    async fn test_publish_then_serve() {
        let state = state();
        let resp = put(&state, "/assets/css/site.css?ttl=120", b"body{}").await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let published = json_of(resp).await;
        assert_eq!(published["path"], "css/site.css");
        assert_eq!(published["size"], 6);
        assert!(published["expires_at"].is_string());

        let req = Request::get("/css/site.css").body(()).unwrap();
        let peer = "127.0.0.1:40000".parse().unwrap();
        let served = handler::handle_request(req, Arc::clone(&state), peer).await.unwrap();
        assert_eq!(served.status(), StatusCode::OK);
        assert_eq!(served.headers()[ETAG], published["etag"].as_str().unwrap());
        assert_eq!(served.headers()[CONTENT_LENGTH], "6");
    }

    #[tokio::test]
    async fn test_publish_with_last_modified() {
        let state = state();
        let req = Request::put("/assets/a.txt")
            .header(LAST_MODIFIED, "Sun, 06 Nov 1994 08:49:37 GMT")
            .body(Full::new(Bytes::from_static(b"a")))
            .unwrap();
        let resp = handle_api_request(req, Arc::clone(&state)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        assert_eq!(json_of(resp).await["last_modified"], "Sun, 06 Nov 1994 08:49:37 GMT");
    }

    #[tokio::test]
    async fn test_publish_rejects_bad_input() {
        let state = state();
        assert_eq!(put(&state, "/assets/a.txt?ttl=soon", b"a").await.status(), StatusCode::BAD_REQUEST);
        assert_eq!(put(&state, "/assets/", b"a").await.status(), StatusCode::BAD_REQUEST);

        let req = Request::put("/assets/a.txt")
            .header(LAST_MODIFIED, "last tuesday")
            .body(Full::new(Bytes::from_static(b"a")))
            .unwrap();
        let resp = handle_api_request(req, Arc::clone(&state)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.store.stats().entries, 0);
    }

    #[tokio::test]
    async fn test_publish_over_upload_limit() {
        let mut cfg = Config::default();
        cfg.http.max_upload_size = 4;
        let state = state_with(cfg);

        let resp = put(&state, "/assets/big.bin", b"0123456789").await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_of(resp).await["error_detail"]["code"], 413);
    }

    #[tokio::test]
    async fn test_publish_over_entry_limit() {
        let mut cfg = Config::default();
        cfg.cache.max_entry_bytes = 4;
        let state = state_with(cfg);

        let resp = put(&state, "/assets/big.bin", b"0123456789").await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_metadata_and_stats() {
        let state = state();
        assert_eq!(get(&state, "/assets/logo.svg").await.status(), StatusCode::NOT_FOUND);

        put(&state, "/assets/logo.svg", b"<svg/>").await;
        let meta = json_of(get(&state, "/assets/logo.svg").await).await;
        assert_eq!(meta["size"], 6);
        assert!(meta.get("expires_at").is_none());

        let stats = json_of(get(&state, "/stats").await).await;
        assert_eq!(stats["entries"], 1);
        assert_eq!(stats["weighted_size"], 6);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let state = state();
        let resp = get(&state, "/v1/discovery").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_of(resp).await["status"], "error");

        let req = Request::delete("/assets/a.txt").body(Empty::<Bytes>::new()).unwrap();
        let resp = handle_api_request(req, state).await.unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
