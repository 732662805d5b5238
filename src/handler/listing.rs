//! Directory listing page
//!
//! Generates the HTML index shown when a directory has no index file.

use std::io;
use std::path::Path;
use tokio::fs;

/// Render the listing for `dir` as served at `request_path`.
///
/// Entries are sorted case-insensitively, names are HTML-escaped, and hrefs
/// are percent-encoded so links survive spaces and punctuation. Directory
/// entries get a trailing `/`.
pub async fn render(dir: &Path, request_path: &str) -> io::Result<String> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir).await?;
    while let Some(entry) = reader.next_entry().await? {
        let mut name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().await?.is_dir() {
            name.push('/');
        }
        entries.push(name);
    }
    entries.sort_by_key(|name| name.to_lowercase());

    Ok(render_page(request_path, &entries))
}

fn render_page(request_path: &str, entries: &[String]) -> String {
    let title = format!("Directory listing for {request_path}");

    let mut html = String::new();
    html.push_str("<!DOCTYPE HTML>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape_html(&title)));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n<hr>\n<ul>\n", escape_html(&title)));
    for name in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            encode_href(name),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n<hr>\n</body>\n</html>\n");
    html
}

/// Escape text for inclusion in HTML.
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Percent-encode a listing entry for use as a relative href.
fn encode_href(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for byte in name.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(char::from(byte));
            }
            other => out.push_str(&format!("%{other:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape_html("<b>&\"quoted\"</b>"),
            "&lt;b&gt;&amp;&quot;quoted&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn encodes_hrefs_but_keeps_unreserved_characters() {
        assert_eq!(encode_href("notes.txt"), "notes.txt");
        assert_eq!(encode_href("a b&c.txt"), "a%20b%26c.txt");
        assert_eq!(encode_href("sub/"), "sub/");
    }

    #[test]
    fn page_contains_title_and_entries() {
        let entries = vec!["alpha.txt".to_string(), "sub/".to_string()];
        let html = render_page("/files/", &entries);
        assert!(html.contains("<title>Directory listing for /files/</title>"));
        assert!(html.contains("<a href=\"alpha.txt\">alpha.txt</a>"));
        assert!(html.contains("<a href=\"sub/\">sub/</a>"));
    }

    #[tokio::test]
    async fn listing_is_sorted_and_marks_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        std_fs::write(dir.path().join("Zed.txt"), "z").expect("write");
        std_fs::write(dir.path().join("apple.txt"), "a").expect("write");
        std_fs::create_dir(dir.path().join("Mid")).expect("mkdir");

        let html = render(dir.path(), "/").await.expect("render");

        let apple = html.find("apple.txt").expect("apple present");
        let mid = html.find("Mid/").expect("dir present with slash");
        let zed = html.find("Zed.txt").expect("zed present");
        assert!(apple < mid && mid < zed, "entries sorted case-insensitively");
    }

    #[tokio::test]
    async fn listing_escapes_entry_names() {
        let dir = tempfile::tempdir().expect("tempdir");
        std_fs::write(dir.path().join("a<b>.txt"), "x").expect("write");

        let html = render(dir.path(), "/").await.expect("render");
        assert!(html.contains("a&lt;b&gt;.txt"));
        assert!(!html.contains("<b>.txt"));
    }
}
