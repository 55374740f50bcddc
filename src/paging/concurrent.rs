//! Concurrent pager
//!
//! Keeps a window of `concurrency` page requests outstanding. Requests are
//! built in page order and their results consumed strictly in that order,
//! so entities come out exactly as the sequential pager would produce them.
//!
//! The window only moves forward once the oldest page has been consumed.
//! Iteration stops at the first page that yields no entities; the
//! controller's `done` flag is not consulted on this path, so it may issue
//! more requests than the sequential pager for the same query.

use std::collections::VecDeque;

use tracing::debug;

use crate::client::{Client, RpcReply};
use crate::error::{QueryError, QueryResult};

use super::controller::{read_page, PageFetchController};
use super::page::Entity;
use super::pool::{TaskHandle, TaskPool};

/// Windowed page fetcher
pub struct ConcurrentPager {
    controller: PageFetchController,
    client: Client,
    pool: TaskPool,
    window: usize,
    in_flight: VecDeque<(u32, TaskHandle<QueryResult<RpcReply>>)>,
    buffer: VecDeque<Entity>,
    finished: bool,
    requests_issued: usize,
}

impl ConcurrentPager {
    /// Create a pager with `concurrency` outstanding requests.
    ///
    /// No request is sent until the first call to `next`.
    pub fn new(
        controller: PageFetchController,
        client: Client,
        concurrency: i64,
    ) -> QueryResult<Self> {
        let window = validate_concurrency(concurrency)?;
        let pool = TaskPool::new(window, "page-fetch")?;

        Ok(Self {
            controller,
            client,
            pool,
            window,
            in_flight: VecDeque::with_capacity(window),
            buffer: VecDeque::new(),
            finished: false,
            requests_issued: 0,
        })
    }

    pub fn controller(&self) -> &PageFetchController {
        &self.controller
    }

    /// Number of page requests dispatched so far
    pub fn requests_issued(&self) -> usize {
        self.requests_issued
    }

    fn fill_window(&mut self) -> QueryResult<()> {
        while self.in_flight.len() < self.window {
            let request = match self.controller.build_request() {
                Ok(request) => request,
                // Drain what is already in flight before reporting it
                Err(_) if !self.in_flight.is_empty() => return Ok(()),
                Err(e) => return Err(e),
            };
            let page = request.page();
            let client = self.client.clone();

            debug!(
                entity_type = %request.query.entity_type,
                page,
                in_flight = self.in_flight.len() + 1,
                "Dispatching page"
            );
            let handle = self.pool.submit(move || read_page(&client, &request));
            self.in_flight.push_back((page, handle));
            self.requests_issued += 1;
        }
        Ok(())
    }

    /// Consume the oldest outstanding page. `None` once a page comes back
    /// empty.
    fn next_page(&mut self) -> QueryResult<Option<Vec<Entity>>> {
        self.fill_window()?;

        let (page, handle) = self.in_flight.pop_front().ok_or(QueryError::TaskLost)?;
        let reply = handle.wait()??;
        let entities = self.controller.consume_response(reply)?;

        if entities.is_empty() {
            debug!(page, "Empty page, stopping");
            return Ok(None);
        }

        // Queue the next request before handing these entities out
        self.fill_window()?;
        Ok(Some(entities))
    }
}

impl Iterator for ConcurrentPager {
    type Item = QueryResult<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entity) = self.buffer.pop_front() {
                return Some(Ok(entity));
            }
            if self.finished {
                return None;
            }
            match self.next_page() {
                Ok(Some(entities)) => self.buffer.extend(entities),
                Ok(None) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }
}

/// Largest request window; each slot is a worker thread
pub const MAX_CONCURRENCY: usize = 64;

/// Concurrency must be a window size in `1..=MAX_CONCURRENCY`
pub fn validate_concurrency(concurrency: i64) -> QueryResult<usize> {
    match usize::try_from(concurrency) {
        Ok(window) if (1..=MAX_CONCURRENCY).contains(&window) => Ok(window),
        _ => Err(QueryError::InvalidConcurrency(concurrency)),
    }
}
