//! Canonical condition tree
//!
//! This is the only filter shape the remote service understands:
//!
//! ```json
//! {
//!     "logical_operator": "and",
//!     "conditions": [
//!         {"path": "id", "relation": "is", "values": [1234]},
//!         {"logical_operator": "or", "conditions": [ ... ]}
//!     ]
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::wire::encode_datetime;

use super::errors::{FilterError, FilterResult};

/// Logical operator joining the conditions of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "and")]
    And,
    #[serde(rename = "or")]
    Or,
}

impl LogicalOperator {
    /// Parse any accepted operator spelling.
    ///
    /// `None` means the default, which is `and`.
    pub fn parse(operator: Option<&str>) -> FilterResult<Self> {
        match operator {
            None | Some("and") | Some("all") => Ok(LogicalOperator::And),
            Some("or") | Some("any") => Ok(LogicalOperator::Or),
            Some(other) => Err(FilterError::UnknownOperator(other.to_string())),
        }
    }

    /// Wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            LogicalOperator::And => "and",
            LogicalOperator::Or => "or",
        }
    }
}

/// A single leaf condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Field path, e.g. `project.Project.name`
    pub path: String,
    /// Relation name, e.g. `is`, `in`, `greater_than`
    pub relation: String,
    /// Relation operands in order
    pub values: Vec<Value>,
}

impl Condition {
    pub fn new(path: impl Into<String>, relation: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            path: path.into(),
            relation: relation.into(),
            values,
        }
    }

    /// Condition over timestamps, encoded the way the service compares them
    pub fn datetime<I>(path: impl Into<String>, relation: impl Into<String>, timestamps: I) -> Self
    where
        I: IntoIterator<Item = DateTime<Utc>>,
    {
        Self::new(path, relation, timestamps.into_iter().map(encode_datetime).collect())
    }

    /// Wire representation
    pub fn to_value(&self) -> Value {
        json!({
            "path": self.path,
            "relation": self.relation,
            "values": self.values,
        })
    }
}

/// Either a leaf condition or a nested group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterNode {
    Condition(Condition),
    Group(LogicalGroup),
}

impl FilterNode {
    pub fn to_value(&self) -> Value {
        match self {
            FilterNode::Condition(condition) => condition.to_value(),
            FilterNode::Group(group) => group.to_value(),
        }
    }
}

impl From<Condition> for FilterNode {
    fn from(condition: Condition) -> Self {
        FilterNode::Condition(condition)
    }
}

impl From<LogicalGroup> for FilterNode {
    fn from(group: LogicalGroup) -> Self {
        FilterNode::Group(group)
    }
}

/// Root of every normalized filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalGroup {
    #[serde(rename = "logical_operator")]
    pub operator: LogicalOperator,
    pub conditions: Vec<FilterNode>,
}

impl LogicalGroup {
    pub fn new(operator: LogicalOperator, conditions: Vec<FilterNode>) -> Self {
        Self {
            operator,
            conditions,
        }
    }

    /// An empty `and` group (matches everything)
    pub fn and() -> Self {
        Self::new(LogicalOperator::And, Vec::new())
    }

    /// An empty `or` group
    pub fn or() -> Self {
        Self::new(LogicalOperator::Or, Vec::new())
    }

    /// Append a condition or subgroup
    pub fn push(mut self, node: impl Into<FilterNode>) -> Self {
        self.conditions.push(node.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Wire representation
    pub fn to_value(&self) -> Value {
        json!({
            "logical_operator": self.operator.as_str(),
            "conditions": self.conditions.iter().map(FilterNode::to_value).collect::<Vec<_>>(),
        })
    }
}
