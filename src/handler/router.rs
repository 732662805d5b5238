//! Request entry point
//!
//! Validates the method, decodes the path, and hands off to static file
//! serving; every handled request produces one access-log line.

use crate::config::ServerContext;
use crate::handler::static_files;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// Generic over the request body; static serving never reads it.
pub async fn handle_request<B>(
    req: Request<B>,
    ctx: &Arc<ServerContext>,
    remote: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let version = req.version();
    let raw_path = req.uri().path().to_string();
    let is_head = method == Method::HEAD;

    let if_modified_since = req
        .headers()
        .get("if-modified-since")
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string);

    let response = if let Some(resp) = check_http_method(&method) {
        resp
    } else if let Some(path) = decode_percent(&raw_path) {
        static_files::serve(ctx, &path, &raw_path, is_head, if_modified_since.as_deref()).await
    } else {
        logger::log_warning(&format!("Undecodable request path: {raw_path}"));
        http::build_404_response()
    };

    logger::log_access(
        &remote,
        &method,
        &raw_path,
        version,
        response.status().as_u16(),
        content_length_of(&response),
    );

    Ok(response)
}

/// Check HTTP method and return an early response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Byte count for the access line, read back from Content-Length.
fn content_length_of(response: &Response<Full<Bytes>>) -> u64 {
    response
        .headers()
        .get(hyper::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Decode %XX escapes in a request path.
///
/// Returns `None` for truncated, non-hex, or non-UTF-8 escapes.
fn decode_percent(path: &str) -> Option<String> {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hi = bytes.get(i + 1).and_then(|b| char::from(*b).to_digit(16))?;
            let lo = bytes.get(i + 2).and_then(|b| char::from(*b).to_digit(16))?;
            out.push(u8::try_from(hi * 16 + lo).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}
