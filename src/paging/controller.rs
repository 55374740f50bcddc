//! Page fetch controller
//!
//! Single-query state machine. Each call to [`build_request`] claims the
//! next page; each call to [`consume_response`] applies the limit and
//! decides whether the result set is exhausted.
//!
//! The result set is considered exhausted when any of these hold after a
//! page is consumed:
//! 1. the caller's limit has been reached
//! 2. the page was short (fewer entities than the page size)
//! 3. the service-reported total count has been reached
//!
//! [`build_request`]: PageFetchController::build_request
//! [`consume_response`]: PageFetchController::consume_response

use tracing::debug;

use crate::client::{Client, RpcReply};
use crate::error::{QueryError, QueryResult};
use crate::query::QuerySpec;

use super::page::{Entity, PageResult};
use super::request::{Paging, ReadRequest};
use super::state::{FetchState, PagingParams};

/// Drives pagination for one query
#[derive(Debug)]
pub struct PageFetchController {
    query: QuerySpec,
    state: FetchState,
}

impl PageFetchController {
    /// Create a controller; `default_per_page` applies when the caller did
    /// not set a page size.
    pub fn new(query: QuerySpec, params: PagingParams, default_per_page: u32) -> QueryResult<Self> {
        let state = FetchState::new(params, default_per_page)?;
        Ok(Self { query, state })
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    pub fn is_done(&self) -> bool {
        self.state.done
    }

    /// Build the request for the next page and advance the page cursor.
    ///
    /// Paging info (a total count) is only requested when the remaining
    /// limit might not fit in this page.
    pub fn build_request(&mut self) -> QueryResult<ReadRequest> {
        let next_page = self.state.current_page.checked_add(1).ok_or_else(|| {
            QueryError::invalid_paging("page", "no page after the last addressable page")
        })?;
        let per_page = self.state.per_page;
        let return_paging_info =
            !matches!(self.state.limit_remaining, Some(remaining) if remaining <= per_page as usize);

        let request = ReadRequest {
            query: self.query.clone(),
            paging: Paging {
                current_page: self.state.current_page,
                entities_per_page: per_page,
            },
            return_paging_info,
        };
        self.state.current_page = next_page;

        Ok(request)
    }

    /// Apply one page of results to the state and return the entities the
    /// caller should see.
    pub fn consume_response(&mut self, reply: RpcReply) -> QueryResult<Vec<Entity>> {
        let page = PageResult::from_reply(reply)?;
        self.state.entities_returned += page.entities.len();

        let mut entities = page.entities;
        if let Some(remaining) = self.state.limit_remaining.as_mut() {
            entities.truncate(*remaining);
            *remaining -= entities.len();
        }

        if !self.state.done {
            if let Some(reason) = self.exhausted(entities.len(), page.total_count) {
                debug!(
                    entity_type = %self.query.entity_type,
                    next_page = self.state.current_page,
                    returned = self.state.entities_returned,
                    reason,
                    "Result set exhausted"
                );
                self.state.done = true;
            }
        }

        Ok(entities)
    }

    fn exhausted(&self, page_len: usize, total_count: Option<u64>) -> Option<&'static str> {
        if self.state.limit_remaining == Some(0) {
            return Some("limit reached");
        }
        if page_len < self.state.per_page as usize {
            return Some("short page");
        }
        if matches!(total_count, Some(total) if total <= self.state.entities_returned as u64) {
            return Some("total count reached");
        }
        None
    }

    /// Fetch, decode and consume the next page synchronously
    pub fn fetch_next(&mut self, client: &Client) -> QueryResult<Vec<Entity>> {
        let request = self.build_request()?;
        debug!(
            entity_type = %self.query.entity_type,
            page = request.page(),
            per_page = request.paging.entities_per_page,
            "Fetching page"
        );
        let reply = read_page(client, &request)?;
        self.consume_response(reply)
    }
}

/// Send one `read` request
pub(crate) fn read_page(client: &Client, request: &ReadRequest) -> QueryResult<RpcReply> {
    client.call("read", Some(request.to_value()?), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::LogicalGroup;
    use serde_json::{json, Value};

    fn controller(limit: i64, per_page: i64) -> PageFetchController {
        PageFetchController::new(
            QuerySpec::new("Shot", LogicalGroup::and()),
            PagingParams::new(0, limit, per_page),
            500,
        )
        .unwrap()
    }

    fn page(ids: std::ops::Range<u64>, total: Option<u64>) -> RpcReply {
        let entities: Vec<Value> = ids.map(|id| json!({"type": "Shot", "id": id})).collect();
        match total {
            Some(count) => RpcReply::Json(json!({
                "entities": entities,
                "paging_info": {"entity_count": count}
            })),
            None => RpcReply::Json(json!({"entities": entities})),
        }
    }

    #[test]
    fn test_build_request_advances_page() {
        let mut c = controller(0, 2);
        assert_eq!(c.build_request().unwrap().page(), 1);
        assert_eq!(c.build_request().unwrap().page(), 2);
        assert_eq!(c.state().current_page, 3);
    }

    #[test]
    fn test_paging_info_requested_without_limit() {
        let mut c = controller(0, 2);
        assert!(c.build_request().unwrap().return_paging_info);
    }

    #[test]
    fn test_paging_info_skipped_when_limit_fits() {
        let mut c = controller(2, 2);
        assert!(!c.build_request().unwrap().return_paging_info);

        let mut c = controller(3, 2);
        assert!(c.build_request().unwrap().return_paging_info);
    }

    #[test]
    fn test_short_page_ends() {
        let mut c = controller(0, 2);
        c.build_request().unwrap();
        assert_eq!(c.consume_response(page(0..2, None)).unwrap().len(), 2);
        assert!(!c.is_done());

        c.build_request().unwrap();
        assert_eq!(c.consume_response(page(2..3, None)).unwrap().len(), 1);
        assert!(c.is_done());
    }

    #[test]
    fn test_limit_truncates_and_ends() {
        let mut c = controller(3, 2);
        c.build_request().unwrap();
        assert_eq!(c.consume_response(page(0..2, Some(10))).unwrap().len(), 2);
        assert_eq!(c.state().limit_remaining, Some(1));
        assert!(!c.is_done());

        let request = c.build_request().unwrap();
        assert!(!request.return_paging_info);
        let entities = c.consume_response(page(2..4, None)).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0]["id"], json!(2));
        assert_eq!(c.state().limit_remaining, Some(0));
        assert_eq!(c.state().entities_returned, 4);
        assert!(c.is_done());
    }

    #[test]
    fn test_total_count_ends() {
        let mut c = controller(0, 2);
        c.build_request().unwrap();
        c.consume_response(page(0..2, Some(4))).unwrap();
        assert!(!c.is_done());

        c.build_request().unwrap();
        c.consume_response(page(2..4, Some(4))).unwrap();
        assert!(c.is_done());
    }

    #[test]
    fn test_done_never_reverts() {
        let mut c = controller(0, 2);
        c.build_request().unwrap();
        c.consume_response(page(0..1, None)).unwrap();
        assert!(c.is_done());

        c.build_request().unwrap();
        c.consume_response(page(1..3, Some(100))).unwrap();
        assert!(c.is_done());
    }

    #[test]
    fn test_page_cursor_cannot_wrap() {
        let mut c = PageFetchController::new(
            QuerySpec::new("Shot", LogicalGroup::and()),
            PagingParams::new(i64::from(u32::MAX) - 1, 0, 1),
            500,
        )
        .unwrap();

        assert_eq!(c.build_request().unwrap().page(), u32::MAX - 1);
        let err = c.build_request().unwrap_err();
        assert!(matches!(
            err,
            crate::error::QueryError::InvalidPagingParameter { name: "page", .. }
        ));
        assert_eq!(c.state().current_page, u32::MAX);
    }

    #[test]
    fn test_malformed_response() {
        let mut c = controller(0, 2);
        c.build_request().unwrap();
        let err = c
            .consume_response(RpcReply::Json(json!({"rows": []})))
            .unwrap_err();
        assert!(matches!(err, crate::error::QueryError::MalformedResponse(_)));
        assert_eq!(c.state().entities_returned, 0);
    }
}
