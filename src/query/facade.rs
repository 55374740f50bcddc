//! Find entry points
//!
//! `find_iter` is the primitive; `find` and `find_one` are built on it.
//! All input validation happens before the first request is sent.

use serde_json::Value;
use tracing::info;

use crate::client::Client;
use crate::error::QueryResult;
use crate::paging::{validate_concurrency, ConcurrentPager, Entity, PageFetchController, SyncPager};

use super::request::FindRequest;
use super::stream::{Entities, EntityStream};

impl Client {
    /// Lazily stream the entities matching `request`.
    ///
    /// With a concurrency value, that many page requests are kept in flight;
    /// otherwise pages are fetched one at a time as the stream is consumed.
    pub fn find_iter(&self, request: FindRequest) -> QueryResult<EntityStream> {
        let (spec, paging) = request.resolve()?;
        if let Some(concurrency) = request.concurrency {
            validate_concurrency(concurrency)?;
        }

        let controller =
            PageFetchController::new(spec, paging, self.config().records_per_page)?;

        info!(
            entity_type = %request.entity_type,
            per_page = controller.state().per_page,
            limit = request.limit,
            concurrency = request.concurrency.unwrap_or(0),
            "Starting find"
        );

        match request.concurrency {
            Some(concurrency) => Ok(EntityStream::concurrent(ConcurrentPager::new(
                controller,
                self.clone(),
                concurrency,
            )?)),
            None => Ok(EntityStream::sync(SyncPager::new(controller, self.clone()))),
        }
    }

    /// Find the entities matching `request`.
    ///
    /// Sequential finds are fetched in full before returning. Concurrent
    /// finds return the still-running stream.
    pub fn find(&self, request: FindRequest) -> QueryResult<Entities> {
        let concurrent = request.concurrency.is_some();
        let stream = self.find_iter(request)?;
        if concurrent {
            Ok(Entities::Streaming(stream))
        } else {
            Ok(Entities::Complete(stream.try_collect()?))
        }
    }

    /// First entity matching `request`, fetched with a one-entity limit
    pub fn find_one(&self, mut request: FindRequest) -> QueryResult<Option<Entity>> {
        request.limit = 1;
        request.page = 1;
        request.concurrency = None;
        self.find_iter(request)?.next().transpose()
    }

    /// Server information; the one call made without credentials
    pub fn info(&self) -> QueryResult<Value> {
        Ok(self.call("info", None, false)?.into_value())
    }
}
