//! Optional URL enrichment for finding aids.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use catalogist_core::LookupConfig;

use crate::error::Result;
use crate::http::HttpClient;

/// Find a supplemental URL for a collection name.
#[async_trait]
pub trait UrlLookup: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<Option<String>>;
}

/// Lookup that never finds anything; used when enrichment is switched off.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLookup;

#[async_trait]
impl UrlLookup for DisabledLookup {
    async fn lookup(&self, _name: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

/// SearchWorks catalog search: `url_suppl[0]` of the first result.
pub struct SearchworksLookup {
    client: HttpClient,
    base_url: String,
}

impl SearchworksLookup {
    pub fn new(config: &LookupConfig) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(Duration::from_secs(config.timeout_secs), &config.user_agent)?,
            base_url: config.base_url.clone(),
        })
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClient::new(timeout, "catalogist/0.1")?,
            base_url: base_url.to_string(),
        })
    }

    pub fn query_url(&self, name: &str) -> String {
        format!("{}?q={}&format=json", self.base_url, name.replace(' ', "%20"))
    }
}

#[async_trait]
impl UrlLookup for SearchworksLookup {
    async fn lookup(&self, name: &str) -> Result<Option<String>> {
        let json: Value = self.client.get_json(&self.query_url(name)).await?;
        Ok(first_supplemental_url(&json))
    }
}

fn first_supplemental_url(json: &Value) -> Option<String> {
    json.get("response")?
        .get("docs")?
        .as_array()?
        .first()?
        .get("url_suppl")?
        .as_array()?
        .first()?
        .as_str()
        .map(ToOwned::to_owned)
}

/// Run a lookup, turning every failure into an empty value.
pub async fn lookup_or_empty(lookup: &dyn UrlLookup, name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    match lookup.lookup(name).await {
        Ok(url) => url.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(name, error = %e, "URL lookup failed");
            String::new()
        }
    }
}
