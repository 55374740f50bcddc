//! Filter dialect normalization
//!
//! Three filter dialects are in use and all of them are accepted here:
//!
//! 1. Lists of positional tuples, `[path, relation, value...]`, joined by an
//!    optional top-level operator:
//!
//!    ```json
//!    [["id", "is", 1234], ["sg_status_list", "in", ["ip", "fin"]]]
//!    ```
//!
//! 2. Grouping mappings with `filter_operator` (`all`/`any`) and `filters`:
//!
//!    ```json
//!    {"filter_operator": "any", "filters": [["id", "is", 1], ["id", "is", 2]]}
//!    ```
//!
//! 3. The canonical wire form, `logical_operator` (`and`/`or`) with
//!    `conditions` holding `{path, relation, values}` mappings.
//!
//! Dialects may be mixed at any nesting depth. The canonical form is a fixed
//! point: normalizing an already normalized tree returns it unchanged.
//! An empty `conditions` list is the canonical match-everything group; an
//! empty `filters` list is rejected.

use serde_json::{Map, Value};

use crate::wire::is_truthy;

use super::ast::{Condition, FilterNode, LogicalGroup, LogicalOperator};
use super::errors::{FilterError, FilterResult};

const OPERATOR_KEYS: [&str; 2] = ["filter_operator", "logical_operator"];
const NESTED_KEYS: [&str; 2] = ["filters", "conditions"];
const CONDITION_KEYS: [&str; 3] = ["path", "relation", "values"];

/// Translates filter dialects into the canonical condition tree
pub struct FilterNormalizer;

impl FilterNormalizer {
    /// Normalize `filters` into a [`LogicalGroup`].
    ///
    /// `operator` joins a top-level list and is ignored when `filters` is a
    /// grouping mapping, which carries its own operator.
    pub fn normalize(filters: &Value, operator: Option<&str>) -> FilterResult<LogicalGroup> {
        match filters {
            Value::Object(map) => Self::normalize_group(map),
            Value::Array(items) => Ok(LogicalGroup::new(
                LogicalOperator::parse(operator)?,
                Self::normalize_list(items)?,
            )),
            other => Err(FilterError::InvalidFilter(format!(
                "filters must be a list or a mapping: {}",
                other
            ))),
        }
    }

    /// Normalize a grouping mapping (dialect 2 or 3)
    fn normalize_group(map: &Map<String, Value>) -> FilterResult<LogicalGroup> {
        let operator =
            first_truthy(map, &OPERATOR_KEYS).ok_or(FilterError::MissingFilterField("operator"))?;
        let conditions = match first_truthy(map, &NESTED_KEYS) {
            Some(value) => value,
            // An empty canonical group matches everything
            None => match map.get("conditions") {
                Some(empty @ Value::Array(_)) => empty,
                _ => return Err(FilterError::MissingFilterField("conditions")),
            },
        };

        let operator = match operator {
            Value::String(s) => LogicalOperator::parse(Some(s))?,
            other => return Err(FilterError::UnknownOperator(other.to_string())),
        };

        let items = conditions.as_array().ok_or_else(|| {
            FilterError::InvalidFilter(format!("nested filters must be a list: {}", conditions))
        })?;

        Ok(LogicalGroup::new(operator, Self::normalize_list(items)?))
    }

    fn normalize_list(items: &[Value]) -> FilterResult<Vec<FilterNode>> {
        items.iter().map(Self::normalize_item).collect()
    }

    fn normalize_item(item: &Value) -> FilterResult<FilterNode> {
        match item {
            Value::Array(parts) => Self::normalize_tuple(parts).map(FilterNode::Condition),
            Value::Object(map) => Self::normalize_mapping(map),
            other => Err(FilterError::InvalidFilter(format!(
                "filter must be a tuple or a mapping: {}",
                other
            ))),
        }
    }

    /// `[path, relation, value...]`
    ///
    /// A single list operand is taken as the whole value list, so
    /// `["id", "in", [1, 2]]` and `["id", "in", 1, 2]` are equivalent.
    fn normalize_tuple(parts: &[Value]) -> FilterResult<Condition> {
        if parts.len() < 2 {
            return Err(FilterError::InvalidFilter(format!(
                "filter tuple needs a path and a relation: {}",
                Value::Array(parts.to_vec())
            )));
        }

        let path = expect_str(&parts[0], "path")?;
        let relation = expect_str(&parts[1], "relation")?;

        let values = match &parts[2..] {
            [Value::Array(list)] => list.clone(),
            rest => rest.to_vec(),
        };

        Ok(Condition::new(path, relation, values))
    }

    fn normalize_mapping(map: &Map<String, Value>) -> FilterResult<FilterNode> {
        if NESTED_KEYS.iter().any(|key| map.contains_key(*key)) {
            return Self::normalize_group(map).map(FilterNode::Group);
        }

        let canonical =
            map.len() == CONDITION_KEYS.len() && CONDITION_KEYS.iter().all(|k| map.contains_key(*k));
        if !canonical {
            return Err(FilterError::MalformedCondition(Value::Object(map.clone()).to_string()));
        }

        let (path, relation, values) = match (&map["path"], &map["relation"], &map["values"]) {
            (Value::String(path), Value::String(relation), Value::Array(values)) => {
                (path, relation, values)
            }
            _ => {
                return Err(FilterError::MalformedCondition(
                    Value::Object(map.clone()).to_string(),
                ))
            }
        };

        Ok(FilterNode::Condition(Condition::new(
            path.as_str(),
            relation.as_str(),
            values.clone(),
        )))
    }
}

/// Convenience wrapper around [`FilterNormalizer::normalize`]
pub fn normalize_filters(filters: &Value, operator: Option<&str>) -> FilterResult<LogicalGroup> {
    FilterNormalizer::normalize(filters, operator)
}

fn first_truthy<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_truthy(value))
}

fn expect_str<'a>(value: &'a Value, what: &str) -> FilterResult<&'a str> {
    value.as_str().ok_or_else(|| {
        FilterError::InvalidFilter(format!("filter {} must be a string: {}", what, value))
    })
}
