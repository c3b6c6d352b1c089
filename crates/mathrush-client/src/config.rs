//! Connection configuration.

/// Where the game server lives.
///
/// The defaults match the stock server (`0.0.0.0:8080`, WebSocket endpoint
/// at `/ws`).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server hostname or IP.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

impl ClientConfig {
    /// Creates a config for the given host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Builds the connect URL for the given display name.
    ///
    /// The name travels as a urlencoded query parameter; this is how the
    /// server learns it (there is no registration frame on the live path).
    pub fn url(&self, name: &str) -> String {
        format!(
            "ws://{}:{}/ws?name={}",
            self.host,
            self.port,
            urlencoding::encode(name)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_points_at_stock_server() {
        let config = ClientConfig::default();
        assert_eq!(config.url("Ada"), "ws://127.0.0.1:8080/ws?name=Ada");
    }

    #[test]
    fn test_url_encodes_the_name() {
        let config = ClientConfig::new("quiz.example", 9000);
        assert_eq!(
            config.url("Ada Lovelace & co"),
            "ws://quiz.example:9000/ws?name=Ada%20Lovelace%20%26%20co"
        );
    }
}
