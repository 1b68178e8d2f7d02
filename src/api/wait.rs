//! Blocking helpers that poll a server until it settles.

use std::time::Duration;

use tracing::info;

use super::{BaremetalApi, require};
use crate::error::BaremetalError;
use crate::models::Server;
use crate::requests::{GetServerRequest, WaitForServerInstallRequest, WaitForServerRequest};
use crate::transport::Transport;
use crate::wait::{Attempt, IntervalStrategy, WaitError, wait_for};

/// Delay between two polls of a server's status.
pub const SERVER_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Delay between two polls of a server's installation.
pub const INSTALL_POLL_INTERVAL: Duration = Duration::from_secs(15);

const SERVER_WAIT_CONTEXT: &str = "waiting for server failed";
const INSTALL_WAIT_CONTEXT: &str = "waiting for server installation failed";

fn into_wait_failure(
    context: &'static str,
    error: WaitError<Server, BaremetalError>,
    last_status: impl FnOnce(&Server) -> String,
) -> BaremetalError {
    let cause = match error {
        WaitError::Get(inner) => inner,
        WaitError::Timeout { timeout, last } => BaremetalError::WaitTimeout {
            timeout,
            last_status: last.as_ref().map(last_status),
        },
    };
    BaremetalError::wait_failed(context, cause)
}

impl<T: Transport> BaremetalApi<T> {
    fn wait_target(&self, zone: &str, server_id: &str) -> Result<GetServerRequest, BaremetalError> {
        let resolved = self.resolve_zone(zone)?;
        require("server_id", server_id)?;
        Ok(GetServerRequest {
            zone: resolved,
            server_id: server_id.to_owned(),
        })
    }

    async fn poll_status(&self, target: &GetServerRequest) -> Result<Attempt<Server>, BaremetalError> {
        let server = self.get_server(target).await?;
        Ok(Attempt::classify(server, |srv| srv.status.is_terminal()))
    }

    async fn poll_install(&self, target: &GetServerRequest) -> Result<Attempt<Server>, BaremetalError> {
        let server = self.get_server(target).await?;
        let terminal = match &server.install {
            Some(install) => install.status.is_terminal(),
            None => {
                return Err(BaremetalError::InstallNotStarted {
                    server_id: server.id,
                });
            }
        };
        Ok(Attempt {
            value: server,
            terminal,
        })
    }

    /// Polls a server until its status is terminal (`ready`, `stopped`,
    /// `error`, `locked` or `unknown`) and returns the last fetched server.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::WaitFailed`] wrapping the validation,
    /// transport or [`BaremetalError::WaitTimeout`] failure that ended the
    /// wait.
    pub async fn wait_for_server(
        &self,
        request: &WaitForServerRequest,
    ) -> Result<Server, BaremetalError> {
        let target = self
            .wait_target(&request.zone, &request.server_id)
            .map_err(|err| BaremetalError::wait_failed(SERVER_WAIT_CONTEXT, err))?;
        let interval = request
            .interval
            .unwrap_or(IntervalStrategy::Linear(SERVER_POLL_INTERVAL));

        let api = self;
        let target_ref = &target;
        let server = wait_for(
            move || api.poll_status(target_ref),
            request.timeout,
            interval,
        )
        .await
        .map_err(|err| {
            into_wait_failure(SERVER_WAIT_CONTEXT, err, |srv| srv.status.to_string())
        })?;

        info!(server_id = %server.id, status = %server.status, "server settled");
        Ok(server)
    }

    /// Polls a server until its installation status is terminal
    /// (`completed`, `error` or `unknown`) and returns the last fetched
    /// server.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::WaitFailed`] wrapping
    /// [`BaremetalError::InstallNotStarted`] when the server has no install
    /// record, or the validation, transport or timeout failure that ended
    /// the wait.
    pub async fn wait_for_server_install(
        &self,
        request: &WaitForServerInstallRequest,
    ) -> Result<Server, BaremetalError> {
        let target = self
            .wait_target(&request.zone, &request.server_id)
            .map_err(|err| BaremetalError::wait_failed(INSTALL_WAIT_CONTEXT, err))?;
        let interval = request
            .interval
            .unwrap_or(IntervalStrategy::Linear(INSTALL_POLL_INTERVAL));

        let api = self;
        let target_ref = &target;
        let server = wait_for(
            move || api.poll_install(target_ref),
            request.timeout,
            interval,
        )
        .await
        .map_err(|err| {
            into_wait_failure(INSTALL_WAIT_CONTEXT, err, |srv| {
                srv.install
                    .as_ref()
                    .map(|install| install.status.to_string())
                    .unwrap_or_default()
            })
        })?;

        info!(server_id = %server.id, "server installation settled");
        Ok(server)
    }
}
