use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Load configuration: compiled-in defaults, optionally overridden by a
    /// `nocache-httpd.toml` next to the working directory. With no file
    /// present the server runs on `0.0.0.0:5000`.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("nocache-httpd").required(false))
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid listen address: {e}"))
    }
}

/// Immutable per-process state shared with the request handler.
pub struct ServerContext {
    pub config: Config,
    /// Serving root: the working directory at startup.
    pub root: PathBuf,
}

impl ServerContext {
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self { config, root }
    }
}
