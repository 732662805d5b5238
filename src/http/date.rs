//! HTTP date handling
//!
//! RFC 7231 fixed-format dates for Last-Modified and If-Modified-Since.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Format a filesystem timestamp as an HTTP-date.
pub fn format_http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format(HTTP_DATE_FORMAT)
        .to_string()
}

/// Check an If-Modified-Since header against a file's mtime.
///
/// Comparison is truncated to whole seconds since that is all an HTTP-date
/// carries; an unparseable header counts as absent.
pub fn not_modified_since(mtime: SystemTime, header: &str) -> bool {
    let Ok(since) = DateTime::parse_from_rfc2822(header) else {
        return false;
    };
    DateTime::<Utc>::from(mtime).timestamp() <= since.timestamp()
}
