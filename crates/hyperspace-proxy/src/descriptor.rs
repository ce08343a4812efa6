//! Proxy descriptors and the default fallback chain

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::ProxyError;
use crate::Result;

/// Raw target, substituted as-is
const URL_PLACEHOLDER: &str = "{url}";
/// Percent-encoded target (`encodeURIComponent` form)
const ENCODED_PLACEHOLDER: &str = "{url_encoded}";

const IP_PROXY_REGIONS: &[(&str, &str)] = &[
    ("EU", "195.114.209.50"),
    ("US", "198.44.255.3"),
    ("DE", "85.39.112.144"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMode {
    /// Point the content frame at the proxy URL
    Iframe,
    /// Fetch a `{ "contents": "<html>" }` envelope and render it inline
    JsonFetch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityTier {
    Direct,
    IpProxy,
    WebProxy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyDescriptor {
    pub name: String,
    pub url_template: String,
    pub mode: DeliveryMode,
    pub timeout_ms: u64,
    pub tier: PriorityTier,
}

impl ProxyDescriptor {
    pub fn new(
        name: impl Into<String>,
        url_template: impl Into<String>,
        mode: DeliveryMode,
        timeout_ms: u64,
        tier: PriorityTier,
    ) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
            mode,
            timeout_ms,
            tier,
        }
    }

    /// Proxy URL for a given target
    pub fn request_url(&self, target: &str) -> String {
        self.url_template
            .replace(ENCODED_PLACEHOLDER, &urlencoding::encode(target))
            .replace(URL_PLACEHOLDER, target)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| ProxyError::InvalidDescriptor {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if !self.url_template.contains(URL_PLACEHOLDER)
            && !self.url_template.contains(ENCODED_PLACEHOLDER)
        {
            return Err(invalid("template has no {url} or {url_encoded} placeholder"));
        }
        if self.timeout_ms == 0 {
            return Err(invalid("timeout must be positive"));
        }

        Ok(())
    }
}

/// Direct frame first, then IP proxies by region, then web relays.
pub fn default_chain() -> Vec<ProxyDescriptor> {
    let mut chain = vec![ProxyDescriptor::new(
        "Direct",
        URL_PLACEHOLDER,
        DeliveryMode::Iframe,
        5000,
        PriorityTier::Direct,
    )];

    for (region, ip) in IP_PROXY_REGIONS {
        chain.push(ProxyDescriptor::new(
            format!("DirectProxy-{}", region),
            format!("http://{}:8080/{}", ip, URL_PLACEHOLDER),
            DeliveryMode::Iframe,
            6000,
            PriorityTier::IpProxy,
        ));
    }

    for (region, ip) in IP_PROXY_REGIONS {
        chain.push(ProxyDescriptor::new(
            format!("SOCKS-{}-1080", region),
            format!("http://{}:1080/{}", ip, URL_PLACEHOLDER),
            DeliveryMode::Iframe,
            8000,
            PriorityTier::IpProxy,
        ));
    }

    let web = [
        (
            "AllOrigins-Raw",
            "https://api.allorigins.win/raw?url={url_encoded}",
            DeliveryMode::Iframe,
            8000,
        ),
        (
            "AllOrigins-JSON",
            "https://api.allorigins.win/get?url={url_encoded}",
            DeliveryMode::JsonFetch,
            8000,
        ),
        (
            "CorsProxy-IO",
            "https://corsproxy.io/?{url_encoded}",
            DeliveryMode::Iframe,
            10000,
        ),
        (
            "Proxy-Cors",
            "https://proxy.cors.sh/{url}",
            DeliveryMode::Iframe,
            10000,
        ),
        (
            "CorsAnywhere-Heroku",
            "https://cors-anywhere.herokuapp.com/{url}",
            DeliveryMode::Iframe,
            12000,
        ),
    ];

    for (name, template, mode, timeout_ms) in web {
        chain.push(ProxyDescriptor::new(
            name,
            template,
            mode,
            timeout_ms,
            PriorityTier::WebProxy,
        ));
    }

    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_url() {
        let raw = ProxyDescriptor::new(
            "Raw",
            "http://10.0.0.1:8080/{url}",
            DeliveryMode::Iframe,
            100,
            PriorityTier::IpProxy,
        );
        assert_eq!(
            raw.request_url("https://example.com/a?b=c"),
            "http://10.0.0.1:8080/https://example.com/a?b=c"
        );

        let encoded = ProxyDescriptor::new(
            "Encoded",
            "https://relay.test/get?url={url_encoded}",
            DeliveryMode::JsonFetch,
            100,
            PriorityTier::WebProxy,
        );
        assert_eq!(
            encoded.request_url("https://example.com/a?b=c"),
            "https://relay.test/get?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3Dc"
        );
    }

    #[test]
    fn test_default_chain_order() {
        let chain = default_chain();

        assert_eq!(chain.len(), 12);
        assert_eq!(chain[0].name, "Direct");
        assert_eq!(chain[0].request_url("https://example.com"), "https://example.com");
        assert_eq!(chain[1].name, "DirectProxy-EU");
        assert_eq!(chain[4].name, "SOCKS-EU-1080");
        assert_eq!(chain[11].name, "CorsAnywhere-Heroku");

        // Tiers never go backwards along the chain
        assert!(chain.windows(2).all(|w| w[0].tier <= w[1].tier));
        assert!(chain.iter().all(|d| d.validate().is_ok()));
        assert_eq!(
            chain
                .iter()
                .filter(|d| d.mode == DeliveryMode::JsonFetch)
                .count(),
            1
        );
    }

    #[test]
    fn test_validate() {
        let no_placeholder = ProxyDescriptor::new(
            "Broken",
            "https://relay.test/",
            DeliveryMode::Iframe,
            100,
            PriorityTier::WebProxy,
        );
        assert!(matches!(
            no_placeholder.validate(),
            Err(ProxyError::InvalidDescriptor { .. })
        ));

        let zero_timeout = ProxyDescriptor::new(
            "Zero",
            "{url}",
            DeliveryMode::Iframe,
            0,
            PriorityTier::Direct,
        );
        assert!(zero_timeout.validate().is_err());
    }
}
