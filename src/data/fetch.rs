use std::time::Duration;

use serde::Deserialize;

use crate::error::LoadError;

/// Retrieves the raw text of a remote dataset.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, LoadError>;
}

impl<F: Fn(&str) -> Result<String, LoadError>> Fetch for F {
    fn fetch(&self, url: &str) -> Result<String, LoadError> {
        self(url)
    }
}

// ---------------------------------------------------------------------------
// HTTP configuration
// ---------------------------------------------------------------------------

/// Settings for [`HttpFetcher`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout in seconds; `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: concat!("syft-filter/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// HttpFetcher
// ---------------------------------------------------------------------------

/// One-shot blocking GET; no retries.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn client(&self) -> Result<reqwest::blocking::Client, LoadError> {
        let mut builder =
            reqwest::blocking::Client::builder().user_agent(self.config.user_agent.clone());
        // the blocking client applies a 30s timeout unless told otherwise
        builder = builder.timeout(self.config.timeout_secs.map(Duration::from_secs));
        Ok(builder.build()?)
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, LoadError> {
        log::debug!("fetching dataset from {url}");
        let resp = self.client()?.get(url).send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(resp.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg: FetchConfig = serde_json::from_str(r#"{"timeout_secs": 5}"#).unwrap();
        assert_eq!(cfg.timeout_secs, Some(5));
        assert!(cfg.user_agent.starts_with("syft-filter/"));
    }

    #[test]
    fn closures_act_as_fetchers() {
        let fetcher = |url: &str| -> Result<String, LoadError> {
            Ok(format!("[{{\"url\": \"{url}\"}}]"))
        };
        assert_eq!(fetcher.fetch("mem://a").unwrap(), r#"[{"url": "mem://a"}]"#);
    }
}
