//! Find request builder
//!
//! Collects everything a caller can say about a find and resolves it into a
//! [`QuerySpec`] plus [`PagingParams`]. Nothing is validated until the
//! request is handed to the client.

use serde_json::Value;

use crate::error::{QueryError, QueryResult};
use crate::filters::{FilterNormalizer, LogicalGroup};
use crate::order::normalize_order;
use crate::paging::PagingParams;

use super::spec::QuerySpec;

/// A find over one entity type
#[derive(Debug, Clone, PartialEq)]
pub struct FindRequest {
    pub entity_type: String,
    /// Filters in any accepted dialect
    pub filters: Value,
    /// Operator joining a top-level filter list (`and`/`all`/`or`/`any`)
    pub filter_operator: Option<String>,
    pub fields: Vec<String>,
    /// Sort descriptors, e.g. `[{"field_name": "id", "direction": "desc"}]`
    pub order: Option<Value>,
    /// Maximum entities to return; 0 for no limit
    pub limit: i64,
    /// First page to fetch; 0 for the first page
    pub page: i64,
    /// Page size; 0 for the client default
    pub per_page: i64,
    pub retired_only: bool,
    pub include_archived_projects: bool,
    /// Number of page requests to keep in flight; `None` fetches sequentially
    pub concurrency: Option<i64>,
}

impl FindRequest {
    pub fn new(entity_type: impl Into<String>, filters: impl Into<Value>) -> Self {
        Self {
            entity_type: entity_type.into(),
            filters: filters.into(),
            filter_operator: None,
            fields: Vec::new(),
            order: None,
            limit: 0,
            page: 0,
            per_page: 0,
            retired_only: false,
            include_archived_projects: true,
            concurrency: None,
        }
    }

    pub fn with_filter_operator(mut self, operator: impl Into<String>) -> Self {
        self.filter_operator = Some(operator.into());
        self
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_order(mut self, order: Value) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }

    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = per_page;
        self
    }

    pub fn retired_only(mut self, retired_only: bool) -> Self {
        self.retired_only = retired_only;
        self
    }

    pub fn include_archived_projects(mut self, include: bool) -> Self {
        self.include_archived_projects = include;
        self
    }

    pub fn with_concurrency(mut self, concurrency: i64) -> Self {
        self.concurrency = Some(concurrency);
        self
    }

    pub fn paging(&self) -> PagingParams {
        PagingParams::new(self.page, self.limit, self.per_page)
    }

    /// Validate paging and normalize filters and order
    pub fn resolve(&self) -> QueryResult<(QuerySpec, PagingParams)> {
        let paging = self.paging();
        paging.validate()?;

        let filters =
            FilterNormalizer::normalize(&self.filters, self.filter_operator.as_deref())?;
        let sorts = normalize_order(self.order.as_ref())?;

        if self.entity_type.is_empty() {
            return Err(QueryError::InvalidRequest("entity type must not be empty".into()));
        }

        let spec = QuerySpec::new(self.entity_type.as_str(), filters)
            .with_fields(self.fields.iter().cloned())
            .with_sorts(sorts)
            .retired_only(self.retired_only)
            .include_archived_projects(self.include_archived_projects);

        Ok((spec, paging))
    }
}

impl From<LogicalGroup> for Value {
    fn from(group: LogicalGroup) -> Self {
        group.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{Condition, LogicalOperator};
    use crate::order::SortSpec;
    use crate::query::ReturnOnly;
    use serde_json::json;

    #[test]
    fn test_resolve() {
        let request = FindRequest::new("Shot", json!([["sg_status_list", "is", "ip"]]))
            .with_fields(["code"])
            .with_order(json!([{"column": "code"}]))
            .retired_only(true);

        let (spec, paging) = request.resolve().unwrap();
        assert_eq!(spec.entity_type, "Shot");
        assert_eq!(spec.filters.operator, LogicalOperator::And);
        assert_eq!(spec.return_fields, vec!["code"]);
        assert_eq!(spec.sorts, vec![SortSpec::asc("code")]);
        assert_eq!(spec.return_only, ReturnOnly::Retired);
        assert_eq!(paging, PagingParams::default());
    }

    #[test]
    fn test_typed_filters() {
        let group = LogicalGroup::or().push(Condition::new("id", "is", vec![json!(1)]));
        let (spec, _) = FindRequest::new("Asset", group.clone()).resolve().unwrap();
        assert_eq!(spec.filters, group);
    }

    #[test]
    fn test_typed_match_everything() {
        let (spec, _) = FindRequest::new("Shot", LogicalGroup::and()).resolve().unwrap();
        assert_eq!(spec.filters, LogicalGroup::and());
    }

    #[test]
    fn test_paging_checked_first() {
        let err = FindRequest::new("Shot", json!("not a filter"))
            .with_page(-1)
            .resolve()
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidPagingParameter { name: "page", .. }));
    }

    #[test]
    fn test_empty_entity_type() {
        let err = FindRequest::new("", json!([])).resolve().unwrap_err();
        assert!(matches!(err, QueryError::InvalidRequest(_)));
    }
}
