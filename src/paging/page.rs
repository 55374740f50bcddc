//! Decoded page of a `read` response

use serde_json::{Map, Value};
use tracing::error;

use crate::client::RpcReply;
use crate::error::{QueryError, QueryResult};

/// One entity: a mapping of field name to value
pub type Entity = Map<String, Value>;

/// One page of results
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub entities: Vec<Entity>,
    /// Total matching entities, when the service reported paging info
    pub total_count: Option<u64>,
}

impl PageResult {
    /// Extract a page from a `read` reply.
    ///
    /// The service occasionally answers with a bare string or an object
    /// without `entities`; both are logged and rejected.
    pub fn from_reply(reply: RpcReply) -> QueryResult<Self> {
        let mut results = match reply {
            RpcReply::Json(Value::Object(map)) => map,
            RpcReply::Json(other) => return Err(malformed(&other)),
            RpcReply::Text(text) => return Err(malformed(&Value::String(text))),
        };

        let entities = match results.remove("entities") {
            Some(Value::Array(items)) => items,
            other => {
                if let Some(value) = other {
                    results.insert("entities".to_string(), value);
                }
                return Err(malformed(&Value::Object(results)));
            }
        };

        let entities = entities
            .into_iter()
            .map(|item| match item {
                Value::Object(entity) => Ok(entity),
                other => Err(malformed(&other)),
            })
            .collect::<QueryResult<Vec<_>>>()?;

        let total_count = match results.get("paging_info") {
            None | Some(Value::Null) => None,
            Some(info) => Some(
                info.get("entity_count")
                    .and_then(Value::as_u64)
                    .ok_or_else(|| malformed(info))?,
            ),
        };

        Ok(Self {
            entities,
            total_count,
        })
    }
}

fn malformed(payload: &Value) -> QueryError {
    error!(payload = %payload, "Malformed read response");
    QueryError::MalformedResponse(payload.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_with_paging_info() {
        let page = PageResult::from_reply(RpcReply::Json(json!({
            "entities": [{"type": "Shot", "id": 1}],
            "paging_info": {"entity_count": 12}
        })))
        .unwrap();

        assert_eq!(page.entities.len(), 1);
        assert_eq!(page.entities[0]["id"], json!(1));
        assert_eq!(page.total_count, Some(12));
    }

    #[test]
    fn test_page_without_paging_info() {
        let page = PageResult::from_reply(RpcReply::Json(json!({"entities": []}))).unwrap();
        assert!(page.entities.is_empty());
        assert_eq!(page.total_count, None);
    }

    #[test]
    fn test_missing_entities() {
        let err = PageResult::from_reply(RpcReply::Json(json!({"paging_info": {"entity_count": 1}})))
            .unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }

    #[test]
    fn test_text_reply() {
        let err = PageResult::from_reply(RpcReply::Text("Internal Server Error".into())).unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }

    #[test]
    fn test_non_object_entity() {
        let err = PageResult::from_reply(RpcReply::Json(json!({"entities": [1, 2]}))).unwrap_err();
        assert!(matches!(err, QueryError::MalformedResponse(_)));
    }
}
