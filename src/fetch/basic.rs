use super::client::HttpClient;
use async_trait::async_trait;
use std::time::Duration;
use tracing::warn;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Plain reqwest client with connect and overall timeouts.
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    /// Builds the client, falling back to reqwest defaults (no timeouts) with
    /// a warning if the TLS backend cannot be initialized.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "HTTP client build failed, using defaults without timeouts");
                Self(reqwest::Client::new())
            }
        }
    }

    /// Builds the client with timeouts, or fails.
    pub fn try_new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self(client))
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_new_builds_with_timeouts() {
        assert!(BasicClient::try_new().is_ok());
    }

    #[test]
    fn test_new_does_not_panic() {
        let _ = BasicClient::new();
        let _ = BasicClient::default();
    }
}
