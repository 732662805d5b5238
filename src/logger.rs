use hyper::{Method, Version};
use std::net::SocketAddr;
use std::path::Path;

/// Startup banner: listening address, serving root, cache notice.
pub fn log_server_start(addr: &SocketAddr, root: &Path) {
    println!("Server running at http://{addr}");
    println!("Serving files from {}", root.display());
    println!("Cache-Control: no-cache headers enabled on every response");
}

/// One line per handled request, written to stdout.
pub fn log_access(
    remote: &SocketAddr,
    method: &Method,
    path: &str,
    version: Version,
    status: u16,
    bytes: u64,
) {
    println!(
        "{}",
        format_access_line(remote, method, path, version, status, bytes)
    );
}

/// `<client> - "<method> <path> <version>" <status> <bytes>`
fn format_access_line(
    remote: &SocketAddr,
    method: &Method,
    path: &str,
    version: Version,
    status: u16,
    bytes: u64,
) -> String {
    format!("{remote} - \"{method} {path} {version:?}\" {status} {bytes}")
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

/// Farewell line on clean shutdown.
pub fn log_server_stopped() {
    println!("\nServer stopped");
}
