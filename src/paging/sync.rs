//! Sequential pager: one request in flight at a time

use std::collections::VecDeque;

use crate::client::Client;
use crate::error::QueryResult;

use super::controller::PageFetchController;
use super::page::Entity;

/// Lazily drives a controller page by page until it reports done
#[derive(Debug)]
pub struct SyncPager {
    controller: PageFetchController,
    client: Client,
    buffer: VecDeque<Entity>,
    failed: bool,
}

impl SyncPager {
    pub fn new(controller: PageFetchController, client: Client) -> Self {
        Self {
            controller,
            client,
            buffer: VecDeque::new(),
            failed: false,
        }
    }

    pub fn controller(&self) -> &PageFetchController {
        &self.controller
    }
}

impl Iterator for SyncPager {
    type Item = QueryResult<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(entity) = self.buffer.pop_front() {
                return Some(Ok(entity));
            }
            if self.failed || self.controller.is_done() {
                return None;
            }
            match self.controller.fetch_next(&self.client) {
                Ok(entities) => self.buffer.extend(entities),
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
