//! HTTP response building module
//!
//! Builders for every status the server produces. Headers are fully assembled
//! here; the only header added afterwards is the CORS origin from the handler hook.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::range::ByteRange;
use super::url::escape_html;

/// Build 200 response for a CORS preflight
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Access-Control-Allow-Methods", "GET, OPTIONS, HEAD")
        .header("Access-Control-Allow-Headers", "target")
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the empty 200 response sent back to a quit request
pub fn build_quit_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/html")
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("quit", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 301 redirect response (directory requested without trailing slash)
pub fn build_redirect_response(location: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(301)
        .header("Location", location)
        .header("Content-Length", 0)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("301", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a full-file 200 response
///
/// `content_length` is the file size; for HEAD requests `data` is empty but the
/// header still announces the real size.
pub fn build_file_response(
    data: Bytes,
    content_type: &str,
    content_length: u64,
    last_modified: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let body = if is_head { Bytes::new() } else { data };

    let mut builder = Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);
    if let Some(date) = last_modified {
        builder = builder.header("Last-Modified", date);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build 206 Partial Content response
pub fn build_partial_response(
    data: Bytes,
    content_type: &str,
    range: &ByteRange,
    last_modified: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(206)
        .header("Content-Range", range.content_range())
        .header("Content-Length", data.len())
        .header("Content-Type", content_type);
    if let Some(date) = last_modified {
        builder = builder.header("Last-Modified", date);
    }

    builder.body(Full::new(data)).unwrap_or_else(|e| {
        log_build_error("206", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build generic HTML response (directory listings)
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build an HTML error page for `status`
pub fn build_error_response(status: u16, message: &str) -> Response<Full<Bytes>> {
    let page = format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>Error response</title>\n</head>\n<body>\n\
         <h1>Error response</h1>\n<p>Error code {status}.</p>\n<p>Message: {}.</p>\n\
         </body>\n</html>\n",
        escape_html(message)
    );
    let content_length = page.len();

    Response::builder()
        .status(status)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(Bytes::from(page)))
        .unwrap_or_else(|e| {
            log_build_error(&status.to_string(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 403 response when directory listing is disabled
pub fn build_403_response() -> Response<Full<Bytes>> {
    build_error_response(403, "Directory listing disabled")
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_error_response(404, "File not found")
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response() -> Response<Full<Bytes>> {
    build_error_response(416, "Request range not satisfiable")
}

/// Build 500 response for I/O failures on an existing file
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_error_response(500, "Failed to read file")
}

/// Build 501 response for methods other than GET, HEAD and OPTIONS
pub fn build_501_response(method: &str) -> Response<Full<Bytes>> {
    build_error_response(501, &format!("Unsupported method ('{method}')"))
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
