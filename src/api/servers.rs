//! Server lifecycle, console access and reverse DNS operations.

use reqwest::Method;
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::{BaremetalApi, get, require, with_body, zone_path};
use crate::error::BaremetalError;
use crate::models::{Ip, RemoteServerAccess, Server};
use crate::pagination::{ListServerEventsResponse, ListServersResponse, paginate};
use crate::requests::{
    CreateRemoteServerAccessRequest, CreateServerRequest, DeleteRemoteServerAccessRequest,
    DeleteServerRequest, GetRemoteServerAccessRequest, GetServerRequest, InstallServerRequest,
    ListServerEventsRequest, ListServersRequest, RebootServerRequest, StartServerRequest,
    StopServerRequest, UpdateIpRequest, UpdateServerRequest,
};
use crate::transport::{ApiRequest, Transport};
use crate::types::RebootBootType;

#[derive(Serialize)]
struct CreateServerBody<'a> {
    offer_id: &'a str,
    organization_id: &'a str,
    name: &'a str,
    description: &'a str,
    tags: &'a [String],
}

#[derive(Serialize)]
struct UpdateServerBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags: Option<&'a [String]>,
}

#[derive(Serialize)]
struct InstallServerBody<'a> {
    os_id: &'a str,
    hostname: &'a str,
    ssh_key_ids: &'a [String],
}

#[derive(Serialize)]
struct RebootServerBody {
    boot_type: RebootBootType,
}

#[derive(Serialize)]
struct CreateRemoteAccessBody<'a> {
    ip: &'a str,
}

#[derive(Serialize)]
struct UpdateIpBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    reverse: Option<&'a str>,
}

impl<T: Transport> BaremetalApi<T> {
    /// Resolves the zone and checks the server identifier of a
    /// server-scoped request, returning the server path.
    fn server_path(
        &self,
        zone: &str,
        server_id: &str,
        subresource: &[&str],
    ) -> Result<String, BaremetalError> {
        let resolved = self.resolve_zone(zone)?;
        require("server_id", server_id)?;
        let mut segments = vec!["servers", server_id];
        segments.extend_from_slice(subresource);
        Ok(zone_path(&resolved, &segments))
    }

    fn post_empty(path: String) -> ApiRequest {
        let mut request = ApiRequest::new(Method::POST, path);
        request.body = Some(json!({}));
        request
    }

    /// Lists one page of servers.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when no zone can be resolved
    /// and [`BaremetalError::Transport`] when the call fails.
    pub async fn list_servers(
        &self,
        request: &ListServersRequest,
    ) -> Result<ListServersResponse, BaremetalError> {
        let zone = self.resolve_zone(&request.zone)?;
        let mut api_request = get(zone_path(&zone, &["servers"]));
        api_request.add_optional_query("page", request.page);
        api_request.add_optional_query("page_size", self.resolve_page_size(request.page_size));
        api_request.add_query("order_by", request.order_by);
        api_request.add_repeated_query("tags", &request.tags);
        api_request.add_repeated_query("status", &request.status);
        api_request.add_optional_query("name", request.name.as_deref());
        api_request.add_optional_query("organization_id", request.organization_id.as_deref());
        self.fetch(api_request).await
    }

    /// Lists every matching server, starting from the first page.
    ///
    /// # Errors
    ///
    /// Same as [`BaremetalApi::list_servers`].
    pub async fn list_all_servers(
        &self,
        request: &ListServersRequest,
    ) -> Result<ListServersResponse, BaremetalError> {
        let api = self;
        paginate(1, move |page| {
            let paged = ListServersRequest {
                page: Some(page),
                ..request.clone()
            };
            async move { api.list_servers(&paged).await }
        })
        .await
    }

    /// Fetches one server.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn get_server(&self, request: &GetServerRequest) -> Result<Server, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &[])?;
        self.fetch(get(path)).await
    }

    /// Orders a new server.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or organization
    /// cannot be resolved and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn create_server(
        &self,
        request: &CreateServerRequest,
    ) -> Result<Server, BaremetalError> {
        let zone = self.resolve_zone(&request.zone)?;
        let organization_id = self.resolve_organization_id(&request.organization_id)?;
        let body = CreateServerBody {
            offer_id: &request.offer_id,
            organization_id: &organization_id,
            name: &request.name,
            description: &request.description,
            tags: &request.tags,
        };
        let api_request = with_body(
            ApiRequest::new(Method::POST, zone_path(&zone, &["servers"])),
            &body,
        )?;
        let server: Server = self.fetch(api_request).await?;
        info!(server_id = %server.id, zone = %zone, "server ordered");
        Ok(server)
    }

    /// Updates the fields set on `request`, leaving the others untouched.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn update_server(
        &self,
        request: &UpdateServerRequest,
    ) -> Result<Server, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &[])?;
        let body = UpdateServerBody {
            name: request.name.as_deref(),
            description: request.description.as_deref(),
            tags: request.tags.as_deref(),
        };
        self.fetch(with_body(ApiRequest::new(Method::PATCH, path), &body)?)
            .await
    }

    /// Installs an operating system on a server.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn install_server(
        &self,
        request: &InstallServerRequest,
    ) -> Result<Server, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &["install"])?;
        let body = InstallServerBody {
            os_id: &request.os_id,
            hostname: &request.hostname,
            ssh_key_ids: &request.ssh_key_ids,
        };
        let server: Server = self
            .fetch(with_body(ApiRequest::new(Method::POST, path), &body)?)
            .await?;
        info!(server_id = %server.id, os_id = %request.os_id, "installation requested");
        Ok(server)
    }

    /// Deletes a server.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn delete_server(
        &self,
        request: &DeleteServerRequest,
    ) -> Result<Server, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &[])?;
        self.fetch(ApiRequest::new(Method::DELETE, path)).await
    }

    /// Reboots a server into the requested boot mode.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn reboot_server(
        &self,
        request: &RebootServerRequest,
    ) -> Result<Server, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &["reboot"])?;
        let body = RebootServerBody {
            boot_type: request.boot_type,
        };
        self.fetch(with_body(ApiRequest::new(Method::POST, path), &body)?)
            .await
    }

    /// Powers a server on.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn start_server(
        &self,
        request: &StartServerRequest,
    ) -> Result<Server, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &["start"])?;
        self.fetch(Self::post_empty(path)).await
    }

    /// Powers a server off.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn stop_server(&self, request: &StopServerRequest) -> Result<Server, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &["stop"])?;
        self.fetch(Self::post_empty(path)).await
    }

    /// Lists one page of lifecycle events for a server.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn list_server_events(
        &self,
        request: &ListServerEventsRequest,
    ) -> Result<ListServerEventsResponse, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &["events"])?;
        let mut api_request = get(path);
        api_request.add_optional_query("page", request.page);
        api_request.add_optional_query("page_size", self.resolve_page_size(request.page_size));
        api_request.add_query("order_by", request.order_by);
        self.fetch(api_request).await
    }

    /// Lists every lifecycle event of a server, starting from the first page.
    ///
    /// # Errors
    ///
    /// Same as [`BaremetalApi::list_server_events`].
    pub async fn list_all_server_events(
        &self,
        request: &ListServerEventsRequest,
    ) -> Result<ListServerEventsResponse, BaremetalError> {
        let api = self;
        paginate(1, move |page| {
            let paged = ListServerEventsRequest {
                page: Some(page),
                ..request.clone()
            };
            async move { api.list_server_events(&paged).await }
        })
        .await
    }

    /// Opens remote console access for the given address.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn create_remote_server_access(
        &self,
        request: &CreateRemoteServerAccessRequest,
    ) -> Result<RemoteServerAccess, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &["remote-access"])?;
        let body = CreateRemoteAccessBody { ip: &request.ip };
        self.fetch(with_body(ApiRequest::new(Method::POST, path), &body)?)
            .await
    }

    /// Fetches the current remote console credentials.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn get_remote_server_access(
        &self,
        request: &GetRemoteServerAccessRequest,
    ) -> Result<RemoteServerAccess, BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &["remote-access"])?;
        self.fetch(get(path)).await
    }

    /// Revokes the remote console credentials.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or server
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn delete_remote_server_access(
        &self,
        request: &DeleteRemoteServerAccessRequest,
    ) -> Result<(), BaremetalError> {
        let path = self.server_path(&request.zone, &request.server_id, &["remote-access"])?;
        self.dispatch(&ApiRequest::new(Method::DELETE, path))
            .await
            .map(drop)
    }

    /// Updates the reverse DNS record of a server address.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone, server or IP
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn update_ip(&self, request: &UpdateIpRequest) -> Result<Ip, BaremetalError> {
        let path = self.server_path(
            &request.zone,
            &request.server_id,
            &["ips", request.ip_id.as_str()],
        )?;
        require("ip_id", &request.ip_id)?;
        let body = UpdateIpBody {
            reverse: request.reverse.as_deref(),
        };
        self.fetch(with_body(ApiRequest::new(Method::PATCH, path), &body)?)
            .await
    }
}
