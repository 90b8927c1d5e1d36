//! Server configuration module

use serde::{Deserialize, Serialize};
use validator::Validate;

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ServerConfig {
    /// Process name, shown in error reports
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    #[validate(range(min = 1, message = "http_port must be greater than 0"))]
    pub http_port: u16,

    /// Request logging toggle
    #[serde(default = "default_logging")]
    pub logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: String::from("tollgate"),
            host: default_host(),
            http_port: default_port(),
            logging: default_logging(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(name: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            http_port,
            ..Default::default()
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

fn default_port() -> u16 {
    8080
}

fn default_logging() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_address() {
        let config = ServerConfig::new("svc", 3000);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_rejects_zero_port_and_empty_name() {
        let config = ServerConfig {
            name: String::new(),
            http_port: 0,
            ..Default::default()
        };

        let errors = config.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("http_port"));
    }
}
