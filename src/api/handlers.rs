//! Publishing API handlers module

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::LAST_MODIFIED;
use hyper::{Request, Response, StatusCode};
use std::error::Error as StdError;
use std::sync::Arc;

use super::response::{bad_request, internal_error, json_response, not_found, payload_too_large};
use super::types::AssetInfo;
use crate::cache::{path_key, CacheError, CacheStore};
use crate::config::AppState;
use crate::logger;

/// `PUT /assets/{path}`: publish the request body
pub async fn handle_publish<B>(
    req: Request<B>,
    state: Arc<AppState>,
    asset_path: &str,
) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn StdError + Send + Sync>>,
{
    let ttl_secs = match parse_ttl(req.uri().query(), state.config.cache.default_ttl_secs) {
        Ok(secs) => secs,
        Err(message) => return bad_request(&message),
    };
    let Some(expires_at) = expiry_after(ttl_secs) else {
        return bad_request(&format!("ttl {ttl_secs} is out of range"));
    };

    let last_modified = match req.headers().get(LAST_MODIFIED) {
        None => Utc::now().fixed_offset(),
        Some(value) => match value.to_str().ok().and_then(parse_http_date) {
            Some(ts) => ts,
            None => return bad_request("Last-Modified is not a valid HTTP date"),
        },
    };

    let limit = usize::try_from(state.config.http.max_upload_size).unwrap_or(usize::MAX);
    let payload = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            return payload_too_large(&format!(
                "Body exceeds the upload limit of {limit} bytes"
            ));
        }
        Err(e) => {
            logger::log_api_error(&format!("Failed to read upload for '{asset_path}': {e}"));
            return bad_request("Failed to read request body");
        }
    };

    match state
        .writer
        .add_cache_file(payload, last_modified, asset_path, expires_at)
    {
        Ok(entry) => json_response(
            StatusCode::CREATED,
            &AssetInfo::from_entry(asset_path, &entry).with_expiry(&expires_at),
        ),
        Err(e @ CacheError::InvalidKey(_)) => bad_request(&e.to_string()),
        Err(e @ CacheError::TooLarge { .. }) => payload_too_large(&e.to_string()),
    }
}

/// `GET /assets/{path}`: metadata of the live entry
pub fn handle_metadata(state: &AppState, asset_path: &str) -> Response<Full<Bytes>> {
    match state.store.get(&path_key(asset_path)) {
        Ok(Some(entry)) => json_response(StatusCode::OK, &AssetInfo::from_entry(asset_path, &entry)),
        Ok(None) => not_found(),
        Err(e) => {
            logger::log_api_error(&format!("Lookup failed for '{asset_path}': {e}"));
            internal_error("Cache lookup failed")
        }
    }
}

/// `GET /stats`
pub fn handle_stats(state: &AppState) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &state.store.stats())
}

/// Read `ttl=<secs>` from the query, falling back to `default_secs`
fn parse_ttl(query: Option<&str>, default_secs: u64) -> Result<u64, String> {
    let raw = query
        .into_iter()
        .flat_map(|q| q.split('&'))
        .find_map(|pair| pair.strip_prefix("ttl="));

    match raw {
        None => Ok(default_secs),
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(format!("ttl must be a positive integer, got '{value}'")),
        },
    }
}

fn expiry_after(ttl_secs: u64) -> Option<DateTime<Utc>> {
    let delta = TimeDelta::try_seconds(i64::try_from(ttl_secs).ok()?)?;
    Utc::now().checked_add_signed(delta)
}

/// Accepts IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`) and other RFC 2822 forms
fn parse_http_date(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc2822(value.trim()).ok()
}
