
use serde::{Deserialize, Serialize};
use simple_error::bail;

/// Default HGVS normalization endpoint (Mutalyzer)
const DEFAULT_HGVS_API_URL: &str = "https://mutalyzer.nl/api/normalize";
/// Default gnomAD GraphQL endpoint
const DEFAULT_GNOMAD_API_URL: &str = "https://gnomad.broadinstitute.org/api";
/// Default gnomAD dataset identifier for the GraphQL query
const DEFAULT_GNOMAD_DATASET: &str = "gnomad_r4";

/// Explicit configuration passed into the API clients at construction.
/// Loadable from JSON via `--config`; validated once at startup.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Endpoint for HGVS normalization (POST, JSON body)
    pub hgvs_api_url: String,
    /// Endpoint for the gnomAD GraphQL API
    pub gnomad_api_url: String,
    /// gnomAD dataset identifier, e.g. `gnomad_r4`
    pub gnomad_dataset: String,
    /// Fixed per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Fixed inter-call delay in milliseconds, to respect external rate limits
    pub request_delay_ms: u64
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            hgvs_api_url: DEFAULT_HGVS_API_URL.to_string(),
            gnomad_api_url: DEFAULT_GNOMAD_API_URL.to_string(),
            gnomad_dataset: DEFAULT_GNOMAD_DATASET.to_string(),
            request_timeout_secs: 20,
            request_delay_ms: 200
        }
    }
}

impl PipelineConfig {
    /// One-time startup validation
    /// # Errors
    /// * if an endpoint is empty or not http(s)
    /// * if the timeout is zero
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        for (label, url) in [("hgvs_api_url", &self.hgvs_api_url), ("gnomad_api_url", &self.gnomad_api_url)] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                bail!("{label} must be an http(s) URL, got {url:?}");
            }
        }
        if self.gnomad_dataset.is_empty() {
            bail!("gnomad_dataset cannot be empty");
        }
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be non-zero");
        }
        Ok(())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }

    pub fn delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), std::time::Duration::from_secs(20));
    }

    #[test]
    fn test_invalid_config() {
        let mut config = PipelineConfig::default();
        config.hgvs_api_url = "ftp://mutalyzer.nl".to_string();
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.gnomad_dataset = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json() {
        // missing fields fall back to defaults
        let config: PipelineConfig = serde_json::from_str(r#"{"request_delay_ms": 500}"#).unwrap();
        assert_eq!(config.request_delay_ms, 500);
        assert_eq!(config.gnomad_dataset, "gnomad_r4");
    }
}
