//! Sort descriptor normalization
//!
//! Sort descriptors arrive as mappings naming the field either `field_name`
//! or `column`, with an optional `direction` (ascending by default).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{QueryError, QueryResult};
use crate::wire::is_truthy;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub field_name: String,
    /// Sort direction
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field_name: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field_name: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Normalize a list of sort descriptors.
///
/// `None`, `null` and an empty list all mean "no sorting".
pub fn normalize_order(order: Option<&Value>) -> QueryResult<Vec<SortSpec>> {
    let entries = match order {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(QueryError::InvalidSort(format!(
                "order must be a list: {}",
                other
            )))
        }
    };

    entries.iter().map(parse_sort).collect()
}

fn parse_sort(entry: &Value) -> QueryResult<SortSpec> {
    let map = entry.as_object().ok_or_else(|| {
        QueryError::InvalidSort(format!("sort entry must be a mapping: {}", entry))
    })?;

    let field_name = ["field_name", "column"]
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_truthy(value))
        .and_then(Value::as_str)
        .ok_or_else(|| QueryError::InvalidSort(format!("sort entry has no field name: {}", entry)))?;

    let direction = match map.get("direction") {
        None | Some(Value::Null) => SortDirection::Asc,
        Some(Value::String(s)) => match s.to_lowercase().as_str() {
            "asc" => SortDirection::Asc,
            "desc" => SortDirection::Desc,
            _ => {
                return Err(QueryError::InvalidSort(format!(
                    "invalid sort direction: {}",
                    s
                )))
            }
        },
        Some(other) => {
            return Err(QueryError::InvalidSort(format!(
                "invalid sort direction: {}",
                other
            )))
        }
    };

    Ok(SortSpec {
        field_name: field_name.to_string(),
        direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_order() {
        assert!(normalize_order(None).unwrap().is_empty());
        assert!(normalize_order(Some(&json!(null))).unwrap().is_empty());
        assert!(normalize_order(Some(&json!([]))).unwrap().is_empty());
    }

    #[test]
    fn test_field_name_or_column() {
        let sorts = normalize_order(Some(&json!([
            {"field_name": "created_at", "direction": "desc"},
            {"column": "code"}
        ])))
        .unwrap();

        assert_eq!(sorts, vec![SortSpec::desc("created_at"), SortSpec::asc("code")]);
    }

    #[test]
    fn test_direction_case_insensitive() {
        let sorts = normalize_order(Some(&json!([{"column": "id", "direction": "DESC"}]))).unwrap();
        assert_eq!(sorts[0].direction, SortDirection::Desc);
    }

    #[test]
    fn test_invalid_sorts() {
        assert!(normalize_order(Some(&json!([{"direction": "asc"}]))).is_err());
        assert!(normalize_order(Some(&json!([{"column": "id", "direction": "up"}]))).is_err());
        assert!(normalize_order(Some(&json!(["id"]))).is_err());
        assert!(normalize_order(Some(&json!("id"))).is_err());
    }

    #[test]
    fn test_wire_shape() {
        let value = serde_json::to_value(SortSpec::desc("id")).unwrap();
        assert_eq!(value, json!({"field_name": "id", "direction": "desc"}));
    }
}
