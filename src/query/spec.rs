//! Canonical query description
//!
//! Everything about a `read` request except paging.

use serde::{Deserialize, Serialize};

use crate::filters::LogicalGroup;
use crate::order::SortSpec;

/// Which lifecycle state of entity to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnOnly {
    Active,
    Retired,
}

/// Normalized query, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    /// Entity type, e.g. `Shot`
    #[serde(rename = "type")]
    pub entity_type: String,
    /// Canonical filter tree
    pub filters: LogicalGroup,
    /// Fields to return (default: `["id"]`)
    pub return_fields: Vec<String>,
    /// Sort order
    pub sorts: Vec<SortSpec>,
    /// Active or retired entities
    pub return_only: ReturnOnly,
    /// Include entities of archived projects (default: true)
    pub include_archived_projects: bool,
}

impl QuerySpec {
    pub fn new(entity_type: impl Into<String>, filters: LogicalGroup) -> Self {
        Self {
            entity_type: entity_type.into(),
            filters,
            return_fields: vec!["id".to_string()],
            sorts: Vec::new(),
            return_only: ReturnOnly::Active,
            include_archived_projects: true,
        }
    }

    /// Sets the returned fields; an empty list keeps the `["id"]` default
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if !fields.is_empty() {
            self.return_fields = fields;
        }
        self
    }

    pub fn with_sorts(mut self, sorts: Vec<SortSpec>) -> Self {
        self.sorts = sorts;
        self
    }

    pub fn retired_only(mut self, retired_only: bool) -> Self {
        self.return_only = if retired_only {
            ReturnOnly::Retired
        } else {
            ReturnOnly::Active
        };
        self
    }

    pub fn include_archived_projects(mut self, include: bool) -> Self {
        self.include_archived_projects = include;
        self
    }
}
