//! Wire value helpers
//!
//! The service compares timestamps at second precision and expects them as
//! UTC strings with a `Z` suffix.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde_json::Value;

/// Encode a timestamp the way the service expects it, e.g.
/// `2024-03-01T12:30:00Z`. Sub-second precision is dropped.
///
/// Use this for timestamps placed in JSON filter values; typed conditions
/// go through [`Condition::datetime`](crate::filters::Condition::datetime).
pub fn encode_datetime(timestamp: DateTime<Utc>) -> Value {
    Value::String(
        timestamp
            .trunc_subsecs(0)
            .to_rfc3339_opts(SecondsFormat::Secs, true),
    )
}

/// Loose truthiness used by the service's response conventions: null,
/// false, zero, and empty strings, lists and mappings are all "absent".
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_encode_datetime_drops_subseconds() {
        let ts = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 30, 5)
            .unwrap()
            .checked_add_signed(chrono::Duration::milliseconds(750))
            .unwrap();

        assert_eq!(encode_datetime(ts), json!("2024-03-01T12:30:05Z"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("and")));
        assert!(is_truthy(&json!([1])));
        assert!(is_truthy(&json!({"entities": []})));
    }
}
