//! Best-effort geolocation enrichment.
//!
//! # Design Decisions
//! - Modeled as a capability returning an optional result with a defined
//!   fail-open default, not as exception suppression: a lookup failure
//!   yields `None` and the check proceeds with null geo fields
//! - The HTTP resolver is bounded by a hard client timeout so an
//!   unresponsive provider can never stall a check
//! - Loopback/private/unparseable addresses skip the lookup entirely

use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::schema::GeoConfig;
use crate::context::UNKNOWN_IP;

/// Geolocation facts for one IP, each field nullable.
#[derive(Debug, Clone, Default)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
}

/// Geolocation capability consumed by the check pipeline.
#[async_trait]
pub trait GeoResolver: Send + Sync {
    /// Look up geolocation for an IP. `None` on any failure.
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;
}

/// Resolver used when geolocation is disabled and in tests.
pub struct NoopGeoResolver;

#[async_trait]
impl GeoResolver for NoopGeoResolver {
    async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
        None
    }
}

/// HTTP resolver against an ip-api.com style JSON endpoint.
pub struct HttpGeoResolver {
    client: reqwest::Client,
    endpoint: String,
}

/// Provider wire format: `{"status":"success","country":...,"regionName":...,"city":...}`.
#[derive(Debug, Deserialize)]
struct ProviderResponse {
    status: Option<String>,
    country: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
    city: Option<String>,
}

impl HttpGeoResolver {
    pub fn new(config: &GeoConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl GeoResolver for HttpGeoResolver {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        if !is_lookupable(ip) {
            return None;
        }
        let url = format!("{}/{}", self.endpoint, ip);
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(ip, error = %e, "geolocation lookup failed");
                return None;
            }
        };
        let body: ProviderResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(ip, error = %e, "geolocation response unreadable");
                return None;
            }
        };
        if body.status.as_deref() == Some("fail") {
            return None;
        }
        Some(GeoInfo {
            country: body.country,
            region: body.region_name,
            city: body.city,
        })
    }
}

/// Whether an IP string is worth sending to the provider.
fn is_lookupable(ip: &str) -> bool {
    if ip == UNKNOWN_IP {
        return false;
    }
    match ip.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            !(v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified())
        }
        Ok(IpAddr::V6(v6)) => !(v6.is_loopback() || v6.is_unspecified()),
        Err(_) => false,
    }
}
