//! Client library for the Scaleway Elastic Metal (bare-metal) API.
//!
//! The crate exposes typed operations over a pluggable [`Transport`]:
//! server lifecycle, operating system installation, lifecycle events,
//! remote console access and reverse DNS. List responses fold together
//! through the [`Paginated`] accumulator contract, and
//! [`BaremetalApi::wait_for_server`] / [`BaremetalApi::wait_for_server_install`]
//! poll until a server settles.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod requests;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod wait;

pub use api::BaremetalApi;
pub use api::{INSTALL_POLL_INTERVAL, SERVER_POLL_INTERVAL};
pub use config::{BaremetalConfig, ConfigError};
pub use error::BaremetalError;
pub use models::{Ip, Money, Offer, Os, RemoteServerAccess, Server, ServerEvent, ServerInstall};
pub use pagination::{
    ListOffersResponse, ListOsResponse, ListServerEventsResponse, ListServersResponse, Paginated,
    PaginationError, paginate,
};
pub use requests::{
    CreateRemoteServerAccessRequest, CreateServerRequest, DeleteRemoteServerAccessRequest,
    DeleteServerRequest, GetOfferRequest, GetOsRequest, GetRemoteServerAccessRequest,
    GetServerRequest, InstallServerRequest, ListOffersRequest, ListOsRequest,
    ListServerEventsRequest, ListServersRequest, RebootServerRequest, StartServerRequest,
    StopServerRequest, UpdateIpRequest, UpdateServerRequest, WaitForServerInstallRequest,
    WaitForServerRequest,
};
pub use transport::{ApiRequest, HttpTransport, Transport, TransportError, TransportFuture};
pub use types::{
    IpReverseStatus, IpVersion, ListOrderBy, OfferStock, RebootBootType, ServerBootType,
    ServerInstallStatus, ServerStatus,
};
pub use wait::{DEFAULT_WAIT_TIMEOUT, IntervalStrategy, WaitError};
