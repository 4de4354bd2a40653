//! Server configuration

use std::net::SocketAddr;

/// Default bind address
pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";

/// Default request body limit (2 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub addr: SocketAddr,
    /// Maximum accepted request body in bytes
    pub max_body_bytes: usize,
    /// Attach a permissive CORS layer
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: ([127, 0, 0, 1], 8000).into(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            permissive_cors: false,
        }
    }
}

impl ServerConfig {
    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    pub fn with_cors(mut self, enabled: bool) -> Self {
        self.permissive_cors = enabled;
        self
    }
}
