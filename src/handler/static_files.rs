//! Static file serving
//!
//! Resolves request paths under the serving root and builds file, listing,
//! redirect, and error responses.

use crate::config::ServerContext;
use crate::handler::listing;
use crate::http::{self, date, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

const INDEX_FILES: [&str; 2] = ["index.html", "index.htm"];

/// Outcome of mapping a request path onto the filesystem.
#[derive(Debug, PartialEq, Eq)]
pub enum Resolved {
    File(PathBuf),
    Directory(PathBuf),
    /// Directory hit without a trailing slash.
    Redirect(String),
    NotFound,
}

/// Serve a decoded request path.
///
/// `raw_path` is the path as it appeared on the request line, used for the
/// redirect target and the listing title.
pub async fn serve(
    ctx: &Arc<ServerContext>,
    path: &str,
    raw_path: &str,
    is_head: bool,
    if_modified_since: Option<&str>,
) -> Response<Full<Bytes>> {
    match resolve(&ctx.root, path, raw_path).await {
        Resolved::File(file_path) => serve_file(&file_path, is_head, if_modified_since).await,
        Resolved::Directory(dir_path) => serve_listing(&dir_path, path, is_head).await,
        Resolved::Redirect(target) => http::build_redirect_response(&target),
        Resolved::NotFound => http::build_404_response(),
    }
}

/// Map a decoded request path onto the serving root.
///
/// Empty and `.` segments are dropped; a `..` segment resolves to nothing
/// rather than climbing out of the root. A directory is only served with a
/// trailing slash; without one the client is redirected so relative links
/// in the listing resolve correctly. A directory containing an index file
/// resolves to that file instead of a listing.
pub async fn resolve(root: &Path, path: &str, raw_path: &str) -> Resolved {
    let mut target = root.to_path_buf();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Resolved::NotFound,
            name => target.push(name),
        }
    }

    let Ok(metadata) = fs::metadata(&target).await else {
        return Resolved::NotFound;
    };

    if metadata.is_dir() {
        if !path.ends_with('/') {
            return Resolved::Redirect(format!("{raw_path}/"));
        }
        for index in INDEX_FILES {
            let candidate = target.join(index);
            if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
                return Resolved::File(candidate);
            }
        }
        return Resolved::Directory(target);
    }

    if metadata.is_file() {
        return Resolved::File(target);
    }

    // Sockets, FIFOs and the like are not served.
    Resolved::NotFound
}

/// Serve a regular file: 200 with the on-disk bytes, or 304 when the
/// client's If-Modified-Since is current.
async fn serve_file(
    file_path: &Path,
    is_head: bool,
    if_modified_since: Option<&str>,
) -> Response<Full<Bytes>> {
    let modified = fs::metadata(file_path)
        .await
        .ok()
        .and_then(|m| m.modified().ok());

    if let (Some(mtime), Some(header)) = (modified, if_modified_since) {
        if date::not_modified_since(mtime, header) {
            return http::build_304_response();
        }
    }

    match fs::read(file_path).await {
        Ok(content) => {
            let content_type = mime::guess_content_type(file_path);
            http::build_file_response(&content, content_type, modified, is_head)
        }
        // Deleted between resolution and read
        Err(e) if e.kind() == ErrorKind::NotFound => {
            logger::log_warning(&format!(
                "File vanished before read: {}",
                file_path.display()
            ));
            http::build_404_response()
        }
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read file '{}': {e}",
                file_path.display()
            ));
            http::build_500_response()
        }
    }
}

/// Serve a generated directory listing.
async fn serve_listing(
    dir_path: &Path,
    request_path: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    match listing::render(dir_path, request_path).await {
        Ok(html) => http::build_html_response(html, is_head),
        Err(e) => {
            logger::log_error(&format!(
                "Failed to list directory '{}': {e}",
                dir_path.display()
            ));
            http::build_500_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use std::fs as std_fs;

    fn fixture_root() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        std_fs::write(dir.path().join("index.html"), "<h1>hi</h1>").expect("write");
        std_fs::create_dir(dir.path().join("sub")).expect("mkdir");
        std_fs::write(dir.path().join("sub/notes.txt"), "notes").expect("write");
        dir
    }

    #[tokio::test]
    async fn resolves_existing_file() {
        let root = fixture_root();
        assert_eq!(
            resolve(root.path(), "/index.html", "/index.html").await,
            Resolved::File(root.path().join("index.html"))
        );
    }

    #[tokio::test]
    async fn missing_path_is_not_found() {
        let root = fixture_root();
        assert_eq!(
            resolve(root.path(), "/missing.txt", "/missing.txt").await,
            Resolved::NotFound
        );
    }

    #[tokio::test]
    async fn parent_segments_never_escape_the_root() {
        let root = fixture_root();
        assert_eq!(
            resolve(root.path(), "/../secret", "/../secret").await,
            Resolved::NotFound
        );
        assert_eq!(
            resolve(root.path(), "/sub/../index.html", "/sub/../index.html").await,
            Resolved::NotFound
        );
    }

    #[tokio::test]
    async fn root_serves_its_index_file() {
        let root = fixture_root();
        assert_eq!(
            resolve(root.path(), "/", "/").await,
            Resolved::File(root.path().join("index.html"))
        );
    }

    #[tokio::test]
    async fn directory_without_slash_redirects() {
        let root = fixture_root();
        assert_eq!(
            resolve(root.path(), "/sub", "/sub").await,
            Resolved::Redirect("/sub/".to_string())
        );
    }

    #[tokio::test]
    async fn directory_without_index_lists() {
        let root = fixture_root();
        assert_eq!(
            resolve(root.path(), "/sub/", "/sub/").await,
            Resolved::Directory(root.path().join("sub"))
        );
    }

    #[tokio::test]
    async fn file_body_matches_disk_contents() {
        let root = fixture_root();
        let resp = serve_file(&root.path().join("index.html"), false, None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Type").expect("content type"),
            "text/html; charset=utf-8"
        );
        assert!(resp.headers().contains_key("Last-Modified"));

        let body = resp.into_body().collect().await.expect("body").to_bytes();
        assert_eq!(&body[..], b"<h1>hi</h1>");
    }

    #[tokio::test]
    async fn head_gets_headers_but_no_body() {
        let root = fixture_root();
        let resp = serve_file(&root.path().join("index.html"), true, None).await;
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("Content-Length").expect("content length"),
            "11"
        );

        let body = resp.into_body().collect().await.expect("body").to_bytes();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn current_if_modified_since_gets_304() {
        let root = fixture_root();
        // Any date in the far future is newer than the fixture's mtime.
        let resp = serve_file(
            &root.path().join("index.html"),
            false,
            Some("Fri, 01 Jan 2100 00:00:00 GMT"),
        )
        .await;
        assert_eq!(resp.status(), 304);
    }

    #[tokio::test]
    async fn stale_if_modified_since_gets_full_response() {
        let root = fixture_root();
        let resp = serve_file(
            &root.path().join("index.html"),
            false,
            Some("Thu, 01 Jan 1970 00:00:00 GMT"),
        )
        .await;
        assert_eq!(resp.status(), 200);
    }

    #[tokio::test]
    async fn vanished_file_is_reported_as_missing() {
        let root = fixture_root();
        let resp = serve_file(&root.path().join("gone.txt"), false, None).await;
        assert_eq!(resp.status(), 404);
    }
}
