//! Paging parameters and per-query fetch state

use crate::client::MAX_PER_PAGE;
use crate::error::{QueryError, QueryResult};

/// Caller-supplied paging parameters.
///
/// Zero means "use the default" for every field: page 1, the configured
/// page size, and no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PagingParams {
    pub page: i64,
    pub limit: i64,
    pub per_page: i64,
}

impl PagingParams {
    pub fn new(page: i64, limit: i64, per_page: i64) -> Self {
        Self {
            page,
            limit,
            per_page,
        }
    }

    /// Reject negative values and pages larger than the service allows
    pub fn validate(&self) -> QueryResult<()> {
        for (name, value) in [
            ("page", self.page),
            ("limit", self.limit),
            ("per_page", self.per_page),
        ] {
            if value < 0 {
                return Err(QueryError::invalid_paging(
                    name,
                    format!("must be non-negative: {}", value),
                ));
            }
        }

        if self.per_page > i64::from(MAX_PER_PAGE) {
            return Err(QueryError::invalid_paging(
                "per_page",
                format!("cannot be higher than {}; {}", MAX_PER_PAGE, self.per_page),
            ));
        }

        // The cursor must be able to advance past the start page
        if self.page >= i64::from(u32::MAX) {
            return Err(QueryError::invalid_paging(
                "page",
                format!("out of range: {}", self.page),
            ));
        }

        Ok(())
    }
}

/// Mutable pagination state of one query.
///
/// Owned by exactly one controller. `done` never reverts once set, and
/// `current_page` advances by one for every request built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchState {
    /// Page the next request will ask for (1-based)
    pub current_page: u32,
    /// Entities per page, 1..=500
    pub per_page: u32,
    /// Caller limit, if any
    pub limit: Option<usize>,
    /// Entities still allowed under the limit
    pub limit_remaining: Option<usize>,
    /// Entities received from the service, before limit truncation
    pub entities_returned: usize,
    pub done: bool,
}

impl FetchState {
    /// Resolve validated parameters against the default page size
    pub fn new(params: PagingParams, default_per_page: u32) -> QueryResult<Self> {
        params.validate()?;

        let limit = match params.limit {
            0 => None,
            n => Some(usize::try_from(n).map_err(|_| {
                QueryError::invalid_paging("limit", format!("out of range: {}", n))
            })?),
        };

        // validate() bounds both values to u32
        let current_page = if params.page == 0 { 1 } else { params.page as u32 };
        let per_page = if params.per_page == 0 {
            default_per_page
        } else {
            params.per_page as u32
        };

        Ok(Self {
            current_page,
            per_page,
            limit,
            limit_remaining: limit,
            entities_returned: 0,
            done: false,
        })
    }

    pub fn has_limit(&self) -> bool {
        self.limit.is_some()
    }
}
