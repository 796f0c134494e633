//! The customer record.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A customer as stored and as rendered on the wire.
///
/// Serializes to `{"id":"1","name":null,"created":null}`; `created` is an
/// RFC 3339 UTC timestamp once set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: String,
    pub name: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

impl Customer {
    /// A fresh record: only the id is known.
    pub(crate) fn new(id: String) -> Self {
        Self { id, name: None, created: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_customer_serializes_nulls() {
        let json = serde_json::to_string(&Customer::new("1".into())).unwrap();
        assert_eq!(json, r#"{"id":"1","name":null,"created":null}"#);
    }

    #[test]
    fn created_serializes_as_rfc3339() {
        let customer = Customer {
            id: "2".into(),
            name: Some("Max".into()),
            created: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()),
        };
        let json = serde_json::to_string(&customer).unwrap();
        assert_eq!(json, r#"{"id":"2","name":"Max","created":"2024-05-01T12:30:00Z"}"#);
    }
}
