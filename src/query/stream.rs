//! Result streams returned by the find entry points

use std::fmt;
use std::vec;

use crate::error::QueryResult;
use crate::paging::{ConcurrentPager, Entity, SyncPager};

enum Driver {
    Sync(SyncPager),
    Concurrent(ConcurrentPager),
}

/// Lazily fetched entities.
///
/// Pages are requested as the stream is consumed. After an error the stream
/// ends.
pub struct EntityStream {
    driver: Driver,
}

impl EntityStream {
    pub(crate) fn sync(pager: SyncPager) -> Self {
        Self {
            driver: Driver::Sync(pager),
        }
    }

    pub(crate) fn concurrent(pager: ConcurrentPager) -> Self {
        Self {
            driver: Driver::Concurrent(pager),
        }
    }

    pub fn is_concurrent(&self) -> bool {
        matches!(self.driver, Driver::Concurrent(_))
    }

    /// Drain the stream, stopping at the first error
    pub fn try_collect(self) -> QueryResult<Vec<Entity>> {
        self.collect()
    }
}

impl Iterator for EntityStream {
    type Item = QueryResult<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.driver {
            Driver::Sync(pager) => pager.next(),
            Driver::Concurrent(pager) => pager.next(),
        }
    }
}

impl fmt::Debug for EntityStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityStream")
            .field("concurrent", &self.is_concurrent())
            .finish()
    }
}

/// Result of [`Client::find`](crate::client::Client::find): fully fetched
/// for sequential finds, still streaming for concurrent ones.
#[derive(Debug)]
pub enum Entities {
    Complete(Vec<Entity>),
    Streaming(EntityStream),
}

impl Entities {
    pub fn is_streaming(&self) -> bool {
        matches!(self, Entities::Streaming(_))
    }

    /// All entities, draining the stream if necessary
    pub fn into_vec(self) -> QueryResult<Vec<Entity>> {
        match self {
            Entities::Complete(entities) => Ok(entities),
            Entities::Streaming(stream) => stream.try_collect(),
        }
    }
}

impl IntoIterator for Entities {
    type Item = QueryResult<Entity>;
    type IntoIter = EntitiesIter;

    fn into_iter(self) -> Self::IntoIter {
        match self {
            Entities::Complete(entities) => EntitiesIter::Complete(entities.into_iter()),
            Entities::Streaming(stream) => EntitiesIter::Streaming(stream),
        }
    }
}

/// Iterator over [`Entities`]
#[derive(Debug)]
pub enum EntitiesIter {
    Complete(vec::IntoIter<Entity>),
    Streaming(EntityStream),
}

impl Iterator for EntitiesIter {
    type Item = QueryResult<Entity>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            EntitiesIter::Complete(entities) => entities.next().map(Ok),
            EntitiesIter::Streaming(stream) => stream.next(),
        }
    }
}
