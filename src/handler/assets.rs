//! Cached asset serving module
//!
//! Answers GET and HEAD for payloads held in the cache store, with `ETag` /
//! `Last-Modified` validation and single byte-range support.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    ACCEPT_RANGES, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, LAST_MODIFIED,
};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

use crate::cache::{path_key, CacheEntry, CacheError, CacheStore};
use crate::handler::router::RequestContext;
use crate::http::{self, response::log_build_error, MimeTable, RangeOutcome, ResponseHeaders, Validation};

/// Request handler for cached assets
///
/// Holds no mutable state: entries are immutable and the header and MIME
/// snapshots are resolved once at construction.
pub struct AssetHandler {
    store: Arc<dyn CacheStore>,
    headers: ResponseHeaders,
    mime: MimeTable,
}

impl AssetHandler {
    pub fn new(store: Arc<dyn CacheStore>, headers: ResponseHeaders, mime: MimeTable) -> Self {
        Self {
            store,
            headers,
            mime,
        }
    }

    /// Dispatch on the request's HEAD flag
    pub fn handle(&self, ctx: &RequestContext<'_>) -> Result<Response<Full<Bytes>>, CacheError> {
        if ctx.is_head {
            self.handle_head(ctx)
        } else {
            self.handle_get(ctx)
        }
    }

    /// Serve a GET for a cached asset
    ///
    /// This function:
    /// 1. Looks up the path key, answering 404 when absent or expired
    /// 2. Validates `If-None-Match` / `If-Modified-Since`, answering 304 on a
    ///    match unless a `Range` header is present
    /// 3. Resolves the `Range` header against the payload length
    /// 4. Answers 200 with the whole payload, 206 with a slice of it, or 416
    ///
    /// # Arguments
    ///
    /// * `ctx` - Path and validator headers borrowed from the request
    ///
    /// # Errors
    ///
    /// Only a store fault is an error; every HTTP outcome is an `Ok` response.
    pub fn handle_get(&self, ctx: &RequestContext<'_>) -> Result<Response<Full<Bytes>>, CacheError> {
        self.respond(ctx, false)
    }

    /// Same headers as GET; `Content-Length` is always the full payload size
    pub fn handle_head(&self, ctx: &RequestContext<'_>) -> Result<Response<Full<Bytes>>, CacheError> {
        self.respond(ctx, true)
    }

    fn respond(
        &self,
        ctx: &RequestContext<'_>,
        head_only: bool,
    ) -> Result<Response<Full<Bytes>>, CacheError> {
        let key = path_key(ctx.path);
        let Some(entry) = self.store.get(&key)? else {
            return Ok(http::build_404_response());
        };

        let validation = http::evaluate(
            &entry,
            ctx.if_none_match,
            ctx.if_modified_since,
            http::is_range_request(ctx.range_header),
        );
        if validation.not_modified {
            return Ok(self.not_modified(&validation));
        }

        let total = entry.len();
        let builder = self.representation_headers(&key, &validation);

        if head_only {
            let builder = builder
                .status(StatusCode::OK)
                .header(CONTENT_LENGTH, total);
            return Ok(finish(builder, Bytes::new()));
        }

        let outcome = RangeOutcome::classify(http::resolve_range(ctx.range_header, total), total);
        Ok(transmit(builder, &entry, outcome))
    }

    /// 304: cache-control family, `ETag` only if the client's did not match
    fn not_modified(&self, validation: &Validation) -> Response<Full<Bytes>> {
        let mut builder = self
            .headers
            .apply(Response::builder().status(StatusCode::NOT_MODIFIED));
        if let Some(etag) = &validation.etag {
            builder = builder.header(ETAG, etag);
        }
        finish(builder.header(CONTENT_LENGTH, 0), Bytes::new())
    }

    /// Headers shared by full, partial, HEAD and 416 responses
    fn representation_headers(&self, key: &str, validation: &Validation) -> Builder {
        let mut builder = self.headers.apply(Response::builder());
        if let Some(etag) = &validation.etag {
            builder = builder.header(ETAG, etag);
        }
        builder = builder
            .header(LAST_MODIFIED, &validation.last_modified)
            .header(ACCEPT_RANGES, "bytes");
        if let Some(content_type) = self.mime.lookup(key) {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder
    }
}

/// Attach status, length and the payload window for a GET
fn transmit(builder: Builder, entry: &CacheEntry, outcome: RangeOutcome) -> Response<Full<Bytes>> {
    let total = entry.len();
    let length = outcome.content_length(total);

    let (builder, body) = match outcome {
        RangeOutcome::Full => (builder.status(StatusCode::OK), entry.payload().clone()),
        RangeOutcome::Partial { lower, upper } => (
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(CONTENT_RANGE, format!("bytes {lower}-{upper}/{total}")),
            entry.payload().slice(lower..lower + length),
        ),
        RangeOutcome::NotSatisfiable => (
            builder
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(CONTENT_RANGE, format!("bytes */{total}")),
            Bytes::new(),
        ),
    };

    finish(builder.header(CONTENT_LENGTH, length), body)
}

fn finish(builder: Builder, body: Bytes) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("asset", &e);
        http::build_500_response()
    })
}
