//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method dispatch, the quit trigger,
//! Range handling, the header post-hook and the access log.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderName, RANGE, REFERER, USER_AGENT};
use hyper::{Method, Request, Response};

use crate::config::AppState;
use crate::handler::hooks;
use crate::handler::static_files::StaticFiles;
use crate::http::{self, query, RangeParseResult};
use crate::logger::{self, AccessLogEntry};

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URL path
    pub path: &'a str,
    /// Raw query string without the leading `?`
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub range_header: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    // Only the head is needed; GET/HEAD/OPTIONS bodies are ignored
    let (parts, _body) = req.into_parts();
    let method = &parts.method;
    let uri = &parts.uri;

    if state.config.logging.show_headers {
        logger::log_headers(&parts.headers);
    }

    let ctx = RequestContext {
        path: uri.path(),
        query: uri.query(),
        is_head: *method == Method::HEAD,
        range_header: header_string(&parts.headers, RANGE),
    };

    let mut response = dispatch(method, &ctx, &state).await;
    hooks::finalize_headers(&mut response, &state.config.http.server_name);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            method.to_string(),
            ctx.path.to_string(),
        );
        entry.query = ctx.query.map(ToString::to_string);
        entry.http_version = version_label(parts.version).to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.range = ctx.range_header.clone();
        entry.referer = header_string(&parts.headers, REFERER);
        entry.user_agent = header_string(&parts.headers, USER_AGENT);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Pick the response for a request
async fn dispatch(
    method: &Method,
    ctx: &RequestContext<'_>,
    state: &AppState,
) -> Response<Full<Bytes>> {
    let files = StaticFiles::new(
        &state.root,
        &state.config.serve.index_files,
        state.config.serve.dir_listing,
    );

    match *method {
        Method::OPTIONS => http::build_options_response(),
        Method::GET => handle_get(ctx, state, &files).await,
        Method::HEAD => files.serve(ctx).await,
        _ => {
            logger::log_warning(&format!("Unsupported method: {method}"));
            http::build_501_response(method.as_str())
        }
    }
}

/// GET: quit trigger first, then Range, then the static delegate
async fn handle_get(
    ctx: &RequestContext<'_>,
    state: &AppState,
    files: &StaticFiles<'_>,
) -> Response<Full<Bytes>> {
    let params = query::parse_query(ctx.query.unwrap_or(""));
    if hooks::is_quit_request(&params) {
        if state.shutdown.request() {
            logger::log_shutdown_requested("quit request");
        }
        return http::build_quit_response();
    }

    match http::parse_range_header(ctx.range_header.as_deref()) {
        RangeParseResult::Valid(range) => files.serve_partial(ctx, &range).await,
        RangeParseResult::Malformed => {
            logger::log_warning(&format!(
                "Ignoring malformed Range header '{}' for {}",
                ctx.range_header.as_deref().unwrap_or_default(),
                ctx.path
            ));
            files.serve(ctx).await
        }
        RangeParseResult::None => files.serve(ctx).await,
    }
}

fn header_string(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_string() {
        let mut headers = HeaderMap::new();
        headers.insert(RANGE, "bytes=0-1".parse().expect("header value"));
        assert_eq!(header_string(&headers, RANGE).as_deref(), Some("bytes=0-1"));
        assert_eq!(header_string(&headers, REFERER), None);
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(hyper::Version::HTTP_10), "1.0");
        assert_eq!(version_label(hyper::Version::HTTP_11), "1.1");
    }
}
