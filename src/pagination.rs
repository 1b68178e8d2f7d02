//! List responses and the accumulator contract used to fold pages together.
//!
//! Every list response reports the server-wide match count and one page of
//! items. [`Paginated::append`] folds a later page into an earlier one so a
//! generic driver such as [`paginate`] can gather every page into a single
//! response.

use std::any::Any;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{Offer, Os, Server, ServerEvent};

/// Errors raised while folding pages.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum PaginationError {
    /// Raised when pages of different list kinds are appended together.
    #[error("cannot append {found} to {expected}")]
    TypeMismatch {
        /// Kind of the accumulator.
        expected: &'static str,
        /// Kind of the page passed in.
        found: &'static str,
    },
}

/// Accumulator capability shared by every list response.
pub trait Paginated: Any + Send {
    /// Name of the list kind, used in mismatch errors.
    fn kind(&self) -> &'static str;

    /// Server-wide number of matching items; after folding, the number of
    /// items accumulated.
    fn total_count(&self) -> u64;

    /// Number of items carried by this response.
    fn page_len(&self) -> usize;

    /// Appends `other`'s items after this response's items and returns how
    /// many were added. For internal use by pagination drivers.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::TypeMismatch`] when `other` is a different
    /// list kind; `self` is left untouched.
    fn append(&mut self, other: &dyn Paginated) -> Result<u64, PaginationError>;

    /// Upcast used to recover the concrete type of a page.
    fn as_any(&self) -> &dyn Any;
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

macro_rules! list_response {
    (
        $(#[$meta:meta])*
        $name:ident { $items:ident: $item:ty }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
        #[serde(default)]
        pub struct $name {
            /// Server-wide number of matching items.
            pub total_count: u64,
            /// Items on this page, in server order.
            pub $items: Vec<$item>,
        }

        impl Paginated for $name {
            fn kind(&self) -> &'static str {
                stringify!($name)
            }

            fn total_count(&self) -> u64 {
                self.total_count
            }

            fn page_len(&self) -> usize {
                self.$items.len()
            }

            fn append(&mut self, other: &dyn Paginated) -> Result<u64, PaginationError> {
                let Some(page) = other.as_any().downcast_ref::<Self>() else {
                    return Err(PaginationError::TypeMismatch {
                        expected: self.kind(),
                        found: other.kind(),
                    });
                };
                let added = count(page.$items.len());
                self.$items.extend(page.$items.iter().cloned());
                self.total_count = self.total_count.saturating_add(added);
                Ok(added)
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

list_response! {
    /// Page of servers.
    ListServersResponse { servers: Server }
}

list_response! {
    /// Page of server lifecycle events.
    ListServerEventsResponse { events: ServerEvent }
}

list_response! {
    /// Page of offers.
    ListOffersResponse { offers: Offer }
}

list_response! {
    /// Page of installable operating systems.
    ListOsResponse { os: Os }
}

/// Walks pages from `first_page` onwards, folding each into an empty
/// accumulator.
///
/// Stops once the accumulated item count reaches the server-reported total
/// of the latest page, or when a page comes back empty. The returned
/// `total_count` is the number of items gathered.
///
/// # Errors
///
/// Returns the first error raised by `fetch`; pagination errors are
/// converted through `From`.
pub async fn paginate<R, E, F, Fut>(first_page: u32, mut fetch: F) -> Result<R, E>
where
    R: Paginated + Default,
    E: From<PaginationError>,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<R, E>>,
{
    let mut accumulator = R::default();
    let mut fetched: u64 = 0;
    let mut page = first_page;

    loop {
        let next = fetch(page).await?;
        if next.page_len() == 0 {
            break;
        }
        let reported = next.total_count();
        fetched = fetched.saturating_add(accumulator.append(&next)?);
        debug!(page, fetched, reported, kind = next.kind(), "appended page");
        if fetched >= reported {
            break;
        }
        page = page.saturating_add(1);
    }

    Ok(accumulator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(id: &str) -> Server {
        Server {
            id: id.to_owned(),
            ..Server::default()
        }
    }

    fn servers(total_count: u64, ids: &[&str]) -> ListServersResponse {
        ListServersResponse {
            total_count,
            servers: ids.iter().map(|id| server(id)).collect(),
        }
    }

    fn ids(response: &ListServersResponse) -> Vec<&str> {
        response.servers.iter().map(|srv| srv.id.as_str()).collect()
    }

    #[test]
    fn append_preserves_order_and_adds_lengths() {
        let mut accumulator = servers(5, &["a", "b"]);
        let second = servers(5, &["c", "d"]);
        let third = servers(5, &["e"]);

        assert_eq!(accumulator.append(&second), Ok(2));
        assert_eq!(accumulator.append(&third), Ok(1));

        assert_eq!(ids(&accumulator), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(accumulator.total_count, 5 + 2 + 1);
    }

    #[test]
    fn append_rejects_other_kind_without_mutating() {
        let mut accumulator = servers(2, &["a", "b"]);
        let before = accumulator.clone();
        let events = ListServerEventsResponse {
            total_count: 1,
            events: vec![ServerEvent::default()],
        };

        let result = accumulator.append(&events);

        assert_eq!(
            result,
            Err(PaginationError::TypeMismatch {
                expected: "ListServersResponse",
                found: "ListServerEventsResponse",
            })
        );
        assert_eq!(accumulator, before);
    }

    #[test]
    fn list_decodes_with_named_item_key() {
        let page: ListOsResponse =
            serde_json::from_str(r#"{"total_count":1,"os":[{"id":"os-1","name":"Ubuntu"}]}"#)
                .unwrap_or_else(|err| panic!("decode: {err}"));
        assert_eq!(page.page_len(), 1);
        assert_eq!(page.total_count(), 1);
    }

    #[tokio::test]
    async fn paginate_walks_until_total_reached() {
        let pages = [
            servers(5, &["a", "b"]),
            servers(5, &["c", "d"]),
            servers(5, &["e"]),
        ];
        let mut requested = Vec::new();

        let result: Result<ListServersResponse, PaginationError> = paginate(1, |page| {
            requested.push(page);
            let response = usize::try_from(page)
                .ok()
                .and_then(|index| index.checked_sub(1))
                .and_then(|index| pages.get(index))
                .cloned()
                .unwrap_or_default();
            async move { Ok(response) }
        })
        .await;

        let all = result.unwrap_or_else(|err| panic!("paginate: {err}"));
        assert_eq!(ids(&all), vec!["a", "b", "c", "d", "e"]);
        assert_eq!(all.total_count, 5);
        assert_eq!(requested, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn paginate_stops_on_empty_page() {
        let mut calls = 0_u32;
        let result: Result<ListServersResponse, PaginationError> = paginate(1, |page| {
            calls += 1;
            let response = if page == 1 {
                servers(10, &["a"])
            } else {
                servers(10, &[])
            };
            async move { Ok(response) }
        })
        .await;

        let all = result.unwrap_or_else(|err| panic!("paginate: {err}"));
        assert_eq!(ids(&all), vec!["a"]);
        assert_eq!(calls, 2);
    }
}
