//! Network selection and endpoint resolution.

use std::time::Duration;

/// Default REST endpoints per network.
const MAINNET_API_URL: &str = "https://api.meridian.exchange";
const TESTNET_API_URL: &str = "https://api.testnet.meridian.exchange";

/// Default bound on any single HTTP request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Target network for the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// The fixed default API base URL for this network.
    pub fn default_api_url(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_API_URL,
            Network::Testnet => TESTNET_API_URL,
        }
    }
}

/// Configuration for the Meridian client.
///
/// Resolved once at client construction; immutable afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Which network to trade against.
    pub network: Network,
    /// Overrides the network's default API base URL when set.
    pub api_url: Option<String>,
    /// Optional custom node endpoint for callers running their own node.
    pub node_endpoint: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            api_url: None,
            node_endpoint: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn mainnet() -> Self {
        Self::new(Network::Mainnet)
    }

    pub fn testnet() -> Self {
        Self::new(Network::Testnet)
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    pub fn with_node_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.node_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Effective base URL: the override when present, else the network
    /// default. Trailing slashes are trimmed so path joins stay clean.
    pub fn resolved_api_url(&self) -> String {
        self.api_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_api_url())
            .trim_end_matches('/')
            .to_string()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Network::Mainnet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_defaults() {
        assert_eq!(
            ClientConfig::mainnet().resolved_api_url(),
            MAINNET_API_URL
        );
        assert_eq!(
            ClientConfig::testnet().resolved_api_url(),
            TESTNET_API_URL
        );
    }

    #[test]
    fn test_url_override_trims_trailing_slash() {
        let config = ClientConfig::testnet().with_api_url("http://localhost:8080/");
        assert_eq!(config.resolved_api_url(), "http://localhost:8080");
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(ClientConfig::default().timeout, Duration::from_secs(30));
    }
}
