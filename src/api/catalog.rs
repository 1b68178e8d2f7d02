//! Offer and operating system catalog lookups.

use super::{BaremetalApi, get, require, zone_path};
use crate::error::BaremetalError;
use crate::models::{Offer, Os};
use crate::pagination::{ListOffersResponse, ListOsResponse, paginate};
use crate::requests::{GetOfferRequest, GetOsRequest, ListOffersRequest, ListOsRequest};
use crate::transport::Transport;

impl<T: Transport> BaremetalApi<T> {
    /// Lists one page of offers.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when no zone can be resolved
    /// and [`BaremetalError::Transport`] when the call fails.
    pub async fn list_offers(
        &self,
        request: &ListOffersRequest,
    ) -> Result<ListOffersResponse, BaremetalError> {
        let zone = self.resolve_zone(&request.zone)?;
        let mut api_request = get(zone_path(&zone, &["offers"]));
        api_request.add_optional_query("page", request.page);
        api_request.add_optional_query("page_size", self.resolve_page_size(request.page_size));
        self.fetch(api_request).await
    }

    /// Lists every offer, starting from the first page.
    ///
    /// # Errors
    ///
    /// Same as [`BaremetalApi::list_offers`].
    pub async fn list_all_offers(
        &self,
        request: &ListOffersRequest,
    ) -> Result<ListOffersResponse, BaremetalError> {
        let api = self;
        paginate(1, move |page| {
            let paged = ListOffersRequest {
                page: Some(page),
                ..request.clone()
            };
            async move { api.list_offers(&paged).await }
        })
        .await
    }

    /// Fetches one offer.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or offer
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn get_offer(&self, request: &GetOfferRequest) -> Result<Offer, BaremetalError> {
        let zone = self.resolve_zone(&request.zone)?;
        require("offer_id", &request.offer_id)?;
        self.fetch(get(zone_path(&zone, &["offers", request.offer_id.as_str()])))
            .await
    }

    /// Lists one page of installable operating systems.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when no zone can be resolved
    /// and [`BaremetalError::Transport`] when the call fails.
    pub async fn list_os(&self, request: &ListOsRequest) -> Result<ListOsResponse, BaremetalError> {
        let zone = self.resolve_zone(&request.zone)?;
        let mut api_request = get(zone_path(&zone, &["os"]));
        api_request.add_optional_query("page", request.page);
        api_request.add_optional_query("page_size", self.resolve_page_size(request.page_size));
        self.fetch(api_request).await
    }

    /// Lists every installable operating system, starting from the first page.
    ///
    /// # Errors
    ///
    /// Same as [`BaremetalApi::list_os`].
    pub async fn list_all_os(
        &self,
        request: &ListOsRequest,
    ) -> Result<ListOsResponse, BaremetalError> {
        let api = self;
        paginate(1, move |page| {
            let paged = ListOsRequest {
                page: Some(page),
                ..request.clone()
            };
            async move { api.list_os(&paged).await }
        })
        .await
    }

    /// Fetches one operating system.
    ///
    /// # Errors
    ///
    /// Returns [`BaremetalError::MissingField`] when the zone or OS
    /// identifier is empty and [`BaremetalError::Transport`] when the call
    /// fails.
    pub async fn get_os(&self, request: &GetOsRequest) -> Result<Os, BaremetalError> {
        let zone = self.resolve_zone(&request.zone)?;
        require("os_id", &request.os_id)?;
        self.fetch(get(zone_path(&zone, &["os", request.os_id.as_str()])))
            .await
    }
}
