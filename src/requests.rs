//! Typed request records accepted by [`crate::BaremetalApi`].
//!
//! Empty `zone` fields fall back to the transport's default zone, empty
//! organization identifiers on create-style requests fall back to the
//! default organization, and unset or zero page sizes fall back to the
//! default page size.

use std::time::Duration;

use crate::types::{ListOrderBy, RebootBootType, ServerStatus};
use crate::wait::IntervalStrategy;

macro_rules! server_request {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, Eq, PartialEq)]
        pub struct $name {
            /// Zone of the server; empty selects the default zone.
            pub zone: String,
            /// Target server.
            pub server_id: String,
        }

        impl $name {
            /// Targets `server_id` in the default zone.
            #[must_use]
            pub fn new(server_id: impl Into<String>) -> Self {
                Self {
                    zone: String::new(),
                    server_id: server_id.into(),
                }
            }
        }
    };
}

server_request! {
    /// Fetches one server.
    GetServerRequest
}

server_request! {
    /// Deletes a server.
    DeleteServerRequest
}

server_request! {
    /// Powers a server on.
    StartServerRequest
}

server_request! {
    /// Powers a server off.
    StopServerRequest
}

server_request! {
    /// Fetches the current remote console credentials.
    GetRemoteServerAccessRequest
}

server_request! {
    /// Revokes the remote console credentials.
    DeleteRemoteServerAccessRequest
}

/// Lists servers in a zone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListServersRequest {
    /// Zone to list; empty selects the default zone.
    pub zone: String,
    /// One-based page number.
    pub page: Option<u32>,
    /// Items per page; unset or zero selects the default page size.
    pub page_size: Option<u32>,
    /// Sort order.
    pub order_by: ListOrderBy,
    /// Only servers carrying all of these tags.
    pub tags: Vec<String>,
    /// Only servers in one of these statuses.
    pub status: Vec<ServerStatus>,
    /// Only servers whose name contains this value.
    pub name: Option<String>,
    /// Only servers owned by this organization.
    pub organization_id: Option<String>,
}

/// Orders a new server.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateServerRequest {
    /// Zone to create in; empty selects the default zone.
    pub zone: String,
    /// Offer to order.
    pub offer_id: String,
    /// Owning organization; empty selects the default organization.
    pub organization_id: String,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Tags to attach.
    pub tags: Vec<String>,
}

/// Partially updates a server. Unset fields are left untouched.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateServerRequest {
    /// Zone of the server; empty selects the default zone.
    pub zone: String,
    /// Target server.
    pub server_id: String,
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}

/// Installs an operating system on a server.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct InstallServerRequest {
    /// Zone of the server; empty selects the default zone.
    pub zone: String,
    /// Target server.
    pub server_id: String,
    /// Operating system to install.
    pub os_id: String,
    /// Hostname to configure.
    pub hostname: String,
    /// SSH keys to authorise.
    pub ssh_key_ids: Vec<String>,
}

/// Reboots a server.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RebootServerRequest {
    /// Zone of the server; empty selects the default zone.
    pub zone: String,
    /// Target server.
    pub server_id: String,
    /// Boot mode to reboot into.
    pub boot_type: RebootBootType,
}

/// Lists lifecycle events of a server.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListServerEventsRequest {
    /// Zone of the server; empty selects the default zone.
    pub zone: String,
    /// Target server.
    pub server_id: String,
    /// One-based page number.
    pub page: Option<u32>,
    /// Items per page; unset or zero selects the default page size.
    pub page_size: Option<u32>,
    /// Sort order.
    pub order_by: ListOrderBy,
}

/// Opens remote console access to a server.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CreateRemoteServerAccessRequest {
    /// Zone of the server; empty selects the default zone.
    pub zone: String,
    /// Target server.
    pub server_id: String,
    /// Address allowed to reach the console.
    pub ip: String,
}

/// Updates the reverse DNS record of a server address.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UpdateIpRequest {
    /// Zone of the server; empty selects the default zone.
    pub zone: String,
    /// Server owning the address.
    pub server_id: String,
    /// Address to update.
    pub ip_id: String,
    /// New reverse DNS record; unset leaves it untouched.
    pub reverse: Option<String>,
}

/// Lists offers in a zone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListOffersRequest {
    /// Zone to list; empty selects the default zone.
    pub zone: String,
    /// One-based page number.
    pub page: Option<u32>,
    /// Items per page; unset or zero selects the default page size.
    pub page_size: Option<u32>,
}

/// Fetches one offer.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GetOfferRequest {
    /// Zone of the offer; empty selects the default zone.
    pub zone: String,
    /// Target offer.
    pub offer_id: String,
}

/// Lists installable operating systems in a zone.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ListOsRequest {
    /// Zone to list; empty selects the default zone.
    pub zone: String,
    /// One-based page number.
    pub page: Option<u32>,
    /// Items per page; unset or zero selects the default page size.
    pub page_size: Option<u32>,
}

/// Fetches one operating system.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct GetOsRequest {
    /// Zone of the operating system; empty selects the default zone.
    pub zone: String,
    /// Target operating system.
    pub os_id: String,
}

/// Blocks until a server reaches a terminal status.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WaitForServerRequest {
    /// Zone of the server; empty selects the default zone.
    pub zone: String,
    /// Target server.
    pub server_id: String,
    /// Deadline; zero selects the driver default.
    pub timeout: Duration,
    /// Delay schedule; unset polls every five seconds.
    pub interval: Option<IntervalStrategy>,
}

/// Blocks until a server installation reaches a terminal status.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WaitForServerInstallRequest {
    /// Zone of the server; empty selects the default zone.
    pub zone: String,
    /// Target server.
    pub server_id: String,
    /// Deadline; zero selects the driver default.
    pub timeout: Duration,
    /// Delay schedule; unset polls every fifteen seconds.
    pub interval: Option<IntervalStrategy>,
}
