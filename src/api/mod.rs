//! Typed bare-metal operations on top of a [`Transport`].

mod catalog;
mod servers;
mod wait;

pub use wait::{INSTALL_POLL_INTERVAL, SERVER_POLL_INTERVAL};

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::BaremetalConfig;
use crate::error::BaremetalError;
use crate::transport::{self, ApiRequest, HttpTransport, Transport};

const API_PREFIX: &str = "/baremetal/v1alpha1/zones";

/// Client for the Elastic Metal API.
///
/// The client holds no per-request state; zone, organization and page size
/// defaults are read from the transport on every call.
#[derive(Clone, Debug)]
pub struct BaremetalApi<T: Transport = HttpTransport> {
    transport: T,
}

impl BaremetalApi<HttpTransport> {
    /// Builds a client backed by [`HttpTransport`].
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::Config`] when the configuration is invalid.
    pub fn from_config(config: BaremetalConfig) -> Result<Self, BaremetalError> {
        Ok(Self::new(HttpTransport::new(config)?))
    }
}

impl<T: Transport> BaremetalApi<T> {
    /// Wraps an existing transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Transport used to execute requests.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Resolves `zone` against the default zone and rejects an empty result.
    fn resolve_zone(&self, zone: &str) -> Result<String, BaremetalError> {
        let resolved = if zone.is_empty() {
            self.transport.default_zone().unwrap_or_default()
        } else {
            zone.to_owned()
        };
        if resolved.is_empty() {
            return Err(BaremetalError::missing("zone"));
        }
        Ok(resolved)
    }

    fn resolve_organization_id(&self, organization_id: &str) -> Result<String, BaremetalError> {
        let resolved = if organization_id.is_empty() {
            self.transport.default_organization_id().unwrap_or_default()
        } else {
            organization_id.to_owned()
        };
        if resolved.is_empty() {
            return Err(BaremetalError::missing("organization_id"));
        }
        Ok(resolved)
    }

    fn resolve_page_size(&self, page_size: Option<u32>) -> Option<u32> {
        page_size
            .filter(|size| *size > 0)
            .or_else(|| self.transport.default_page_size())
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<String, BaremetalError> {
        Ok(self.transport.execute(request).await?)
    }

    async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, BaremetalError> {
        let body = self.dispatch(&request).await?;
        Ok(transport::decode(&body)?)
    }
}

fn require(field: &'static str, value: &str) -> Result<(), BaremetalError> {
    if value.is_empty() {
        return Err(BaremetalError::missing(field));
    }
    Ok(())
}

/// `/baremetal/v1alpha1/zones/{zone}/{segments...}`.
fn zone_path(zone: &str, segments: &[&str]) -> String {
    let mut path = format!("{API_PREFIX}/{zone}");
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    path
}

fn with_body<B: Serialize>(mut request: ApiRequest, body: &B) -> Result<ApiRequest, BaremetalError> {
    request.body = Some(transport::encode(body)?);
    Ok(request)
}

fn get(path: String) -> ApiRequest {
    ApiRequest::new(Method::GET, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScriptedTransport;

    #[test]
    fn zone_path_joins_segments() {
        assert_eq!(
            zone_path("fr-par-2", &["servers", "srv-1", "ips", "ip-1"]),
            "/baremetal/v1alpha1/zones/fr-par-2/servers/srv-1/ips/ip-1"
        );
    }

    #[test]
    fn explicit_zone_wins_over_default() {
        let api = BaremetalApi::new(ScriptedTransport::new().with_default_zone("fr-par-1"));
        assert_eq!(api.resolve_zone("nl-ams-1"), Ok(String::from("nl-ams-1")));
        assert_eq!(api.resolve_zone(""), Ok(String::from("fr-par-1")));
    }

    #[test]
    fn missing_zone_without_default_is_rejected() {
        let api = BaremetalApi::new(ScriptedTransport::new());
        assert_eq!(
            api.resolve_zone(""),
            Err(BaremetalError::MissingField { field: "zone" })
        );
    }

    #[test]
    fn zero_page_size_uses_default() {
        let api = BaremetalApi::new(ScriptedTransport::new().with_default_page_size(50));
        assert_eq!(api.resolve_page_size(Some(0)), Some(50));
        assert_eq!(api.resolve_page_size(None), Some(50));
        assert_eq!(api.resolve_page_size(Some(10)), Some(10));

        let bare = BaremetalApi::new(ScriptedTransport::new());
        assert_eq!(bare.resolve_page_size(None), None);
    }

    #[test]
    fn organization_falls_back_to_default() {
        let api = BaremetalApi::new(ScriptedTransport::new().with_default_organization_id("org-X"));
        assert_eq!(api.resolve_organization_id(""), Ok(String::from("org-X")));

        let bare = BaremetalApi::new(ScriptedTransport::new());
        assert_eq!(
            bare.resolve_organization_id(""),
            Err(BaremetalError::MissingField {
                field: "organization_id"
            })
        );
    }
}
