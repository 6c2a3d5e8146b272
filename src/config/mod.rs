// Configuration module entry point
// Layered configuration (defaults < file < environment < command line) and runtime state

mod cli;
mod state;
mod types;

use std::net::{IpAddr, SocketAddr};

pub use cli::{CliArgs, DEFAULT_CONFIG_PATH};
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServeConfig, ServerConfig, DEFAULT_HOST,
    DEFAULT_PORT,
};

/// Environment variable prefix, e.g. `HTTPD_SERVER__PORT=8080`
pub const ENV_PREFIX: &str = "HTTPD";

impl Config {
    /// Load configuration from the given file path (extension optional, missing file allowed)
    ///
    /// `port_override` is the positional command line argument; it must be an
    /// integer port and wins over every other source.
    pub fn load_from(
        config_path: &str,
        port_override: Option<&str>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("serve.root", ".")?
            .set_default("serve.dir_listing", true)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.header_read_timeout", 30)?
            .set_default("http.server_name", HttpConfig::default().server_name)?;

        if let Some(port) = port_override {
            let port = parse_port(port)?;
            builder = builder.set_override("server.port", i64::from(port))?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .map_err(|e| format!("Invalid host '{}': {e}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }
}

fn parse_port(arg: &str) -> Result<u16, config::ConfigError> {
    arg.trim()
        .parse::<u16>()
        .map_err(|e| config::ConfigError::Message(format!("Invalid port argument '{arg}': {e}")))
}
