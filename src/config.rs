use std::{net::IpAddr, path::PathBuf};

use clap::Parser;

/// Serve the lines of a single file over HTTP
#[derive(Debug, Clone, Parser)]
#[command(name = "line_server", version)]
pub struct Config {
    /// File to serve. Relative paths are resolved against the working directory
    #[arg(long, env = "SOURCE_FILE")]
    pub source_file: PathBuf,

    /// Address to listen on
    #[arg(long, env = "LINE_SERVER_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "LINE_SERVER_PORT", default_value_t = 3000)]
    pub port: u16,
}

impl Config {
    /// `host:port` in the form expected by the listener
    pub fn listen_addr(&self) -> String {
        std::net::SocketAddr::new(self.host, self.port).to_string()
    }
}
