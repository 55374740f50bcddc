//! Client Configuration
//!
//! Service location, script credentials and the default page size.

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, QueryResult};

/// Largest page the service will return
pub const MAX_PER_PAGE: u32 = 500;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Service base URL, e.g. `https://example.shotgunstudio.com`
    pub base_url: String,

    /// RPC path below the base URL (default: "/api3/json")
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Script name sent with authenticated calls
    #[serde(default)]
    pub script_name: String,

    /// Script key sent with authenticated calls
    #[serde(default)]
    pub api_key: String,

    /// Page size used when a query does not set one (default: 500)
    #[serde(default = "default_records_per_page")]
    pub records_per_page: u32,
}

fn default_api_path() -> String {
    "/api3/json".to_string()
}

fn default_records_per_page() -> u32 {
    MAX_PER_PAGE
}

impl ClientConfig {
    pub fn new(
        base_url: impl Into<String>,
        script_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            api_path: default_api_path(),
            script_name: script_name.into(),
            api_key: api_key.into(),
            records_per_page: default_records_per_page(),
        }
    }

    /// Override the default page size
    pub fn with_records_per_page(mut self, records_per_page: u32) -> Self {
        self.records_per_page = records_per_page;
        self
    }

    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> QueryResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| QueryError::InvalidConfig(format!("Invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> QueryResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(QueryError::InvalidConfig("base_url must not be empty".into()));
        }
        if self.records_per_page == 0 || self.records_per_page > MAX_PER_PAGE {
            return Err(QueryError::InvalidConfig(format!(
                "records_per_page must be between 1 and {}; got {}",
                MAX_PER_PAGE, self.records_per_page
            )));
        }
        Ok(())
    }

    /// Full RPC endpoint URL
    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.api_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let config = ClientConfig::from_json(r#"{"base_url": "https://sg.example.com"}"#).unwrap();
        assert_eq!(config.api_path, "/api3/json");
        assert_eq!(config.records_per_page, 500);
        assert_eq!(config.script_name, "");
    }

    #[test]
    fn test_endpoint_joins_slashes() {
        let config = ClientConfig::new("https://sg.example.com/", "script", "key");
        assert_eq!(config.endpoint(), "https://sg.example.com/api3/json");

        let mut config = ClientConfig::new("https://sg.example.com", "script", "key");
        config.api_path = "api3/json".into();
        assert_eq!(config.endpoint(), "https://sg.example.com/api3/json");
    }

    #[test]
    fn test_validate_page_size() {
        let config = ClientConfig::new("https://sg.example.com", "s", "k");
        assert!(config.validate().is_ok());
        assert!(config.clone().with_records_per_page(0).validate().is_err());
        assert!(config.clone().with_records_per_page(501).validate().is_err());
        assert!(config.with_records_per_page(50).validate().is_ok());
    }

    #[test]
    fn test_validate_base_url() {
        let err = ClientConfig::from_json(r#"{"base_url": " "}"#).unwrap_err();
        assert!(matches!(err, QueryError::InvalidConfig(_)));
    }
}
