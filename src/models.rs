//! Records decoded from bare-metal API responses.

use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{
    IpReverseStatus, IpVersion, OfferStock, ServerBootType, ServerInstallStatus, ServerStatus,
};

/// Elastic Metal server.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Server {
    /// Server identifier.
    pub id: String,
    /// Owning organization.
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Operational status.
    pub status: ServerStatus,
    /// Offer the server was ordered from.
    pub offer_id: String,
    /// Installation record; absent until an installation is requested.
    pub install: Option<ServerInstall>,
    /// Tags attached to the server.
    pub tags: Vec<String>,
    /// Addresses assigned to the server.
    pub ips: Vec<Ip>,
    /// Domain the server is reachable under.
    pub domain: String,
    /// Boot mode the server last started in.
    pub boot_type: ServerBootType,
    /// Zone the server lives in.
    pub zone: String,
}

/// Operating system installation attached to a server.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ServerInstall {
    /// Installed operating system.
    pub os_id: String,
    /// Hostname configured during installation.
    pub hostname: String,
    /// SSH keys authorised on the installed system.
    pub ssh_key_ids: Vec<String>,
    /// Progress of the installation.
    pub status: ServerInstallStatus,
}

/// Address assigned to a server.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Ip {
    /// Address identifier.
    pub id: String,
    /// IPv4 or IPv6 literal, as reported by the API.
    pub address: String,
    /// Reverse DNS record.
    pub reverse: String,
    /// Address family.
    pub version: IpVersion,
    /// Validation status of [`Ip::reverse`].
    pub reverse_status: IpReverseStatus,
    /// Explanation attached to a failed reverse validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_status_message: Option<String>,
}

impl Ip {
    /// Parsed form of [`Ip::address`]; `None` when the literal is blank or
    /// malformed.
    #[must_use]
    pub fn parsed_address(&self) -> Option<IpAddr> {
        self.address.parse().ok()
    }
}

/// Lifecycle event recorded against a server.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ServerEvent {
    /// Event identifier.
    pub id: String,
    /// Action that produced the event.
    pub action: String,
    /// Last modification time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

/// Short-lived credentials for the out-of-band console.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct RemoteServerAccess {
    /// Console URL.
    pub url: String,
    /// Console login.
    pub login: String,
    /// Console password.
    pub password: String,
    /// Instant from which the credentials stop working.
    pub expires_at: Option<DateTime<Utc>>,
}

impl RemoteServerAccess {
    /// Whether the credentials can still be used at `now`.
    ///
    /// Credentials without an expiry are treated as expired.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now < expires_at)
    }
}

/// Catalog entry describing a class of machine.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Offer {
    /// Offer identifier.
    pub id: String,
    /// Commercial name.
    pub name: String,
    /// Current availability.
    pub stock: OfferStock,
    /// Public bandwidth in bits per second.
    pub bandwidth: u64,
    /// Commercial range the offer belongs to.
    pub commercial_range: String,
    /// Hourly price, when the offer is billed hourly.
    pub price_per_hour: Option<Money>,
    /// Monthly price, when the offer is billed monthly.
    pub price_per_month: Option<Money>,
}

/// Price expressed as whole units plus nanos.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Money {
    /// ISO 4217 currency code.
    pub currency_code: String,
    /// Whole units.
    pub units: i64,
    /// Billionths of a unit.
    pub nanos: i32,
}

/// Operating system available for installation.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct Os {
    /// Operating system identifier.
    pub id: String,
    /// Distribution name.
    pub name: String,
    /// Distribution version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn server_without_install_decodes() {
        let server: Server = serde_json::from_str(
            r#"{"id":"srv-1","status":"quarantined","tags":["a"],"ips":[]}"#,
        )
        .unwrap_or_else(|err| panic!("decode: {err}"));
        assert_eq!(server.status, ServerStatus::Unknown);
        assert!(server.install.is_none());
        assert_eq!(server.boot_type, ServerBootType::Normal);
    }

    #[test]
    fn ip_decodes_error_message_only_when_present() {
        let ip: Ip = serde_json::from_str(
            r#"{"id":"ip-1","address":"2001:db8::1","reverse":"","version":"Ipv6","reverse_status":"error","reverse_status_message":"no A record"}"#,
        )
        .unwrap_or_else(|err| panic!("decode: {err}"));
        assert_eq!(ip.version, IpVersion::Ipv6);
        assert_eq!(ip.reverse_status_message.as_deref(), Some("no A record"));

        let json = serde_json::to_string(&Ip {
            reverse_status_message: None,
            ..ip
        })
        .unwrap_or_else(|err| panic!("encode: {err}"));
        assert!(!json.contains("reverse_status_message"));
    }

    #[test]
    fn server_with_blank_ip_address_decodes() {
        let server: Server = serde_json::from_str(
            r#"{"id":"S","status":"ready","ips":[{"id":"ip-1","address":"","version":"Ipv4"},{"id":"ip-2","address":"51.15.0.1"}]}"#,
        )
        .unwrap_or_else(|err| panic!("decode: {err}"));
        let addresses: Vec<Option<IpAddr>> = server.ips.iter().map(Ip::parsed_address).collect();
        assert_eq!(
            addresses,
            vec![None, Some(IpAddr::from([51, 15, 0, 1]))]
        );
        assert_eq!(server.status, ServerStatus::Ready);
    }

    #[test]
    fn remote_access_is_valid_strictly_before_expiry() {
        let expires_at = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single();
        let access = RemoteServerAccess {
            expires_at,
            ..RemoteServerAccess::default()
        };
        let Some(deadline) = expires_at else {
            panic!("valid timestamp");
        };
        assert!(access.is_valid_at(deadline - chrono::Duration::seconds(1)));
        assert!(!access.is_valid_at(deadline));
    }
}
