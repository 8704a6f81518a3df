use serde::Serialize;

/// Appwrite list query, serialized in the JSON form accepted by `queries[]`.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub(crate) struct Query {
    method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    attribute: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<serde_json::Value>,
}

impl Query {
    pub fn order_desc(attribute: &str) -> Self {
        Self {
            method: "orderDesc",
            attribute: Some(attribute.to_string()),
            values: vec![],
        }
    }

    pub fn limit(n: u32) -> Self {
        Self {
            method: "limit",
            attribute: None,
            values: vec![n.into()],
        }
    }

    pub fn search(attribute: &str, term: &str) -> Self {
        Self {
            method: "search",
            attribute: Some(attribute.to_string()),
            values: vec![term.into()],
        }
    }

    pub fn equal(attribute: &str, value: &str) -> Self {
        Self {
            method: "equal",
            attribute: Some(attribute.to_string()),
            values: vec![value.into()],
        }
    }
}

/// Render queries as a URL query string (`queries%5B%5D=...&...`), without the leading `?`.
pub(crate) fn encode_queries(queries: &[Query]) -> String {
    queries
        .iter()
        .filter_map(|q| serde_json::to_string(q).ok())
        .map(|json| format!("queries%5B%5D={}", urlencoding::encode(&json)))
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_json_shapes() {
        let v = serde_json::to_value(Query::order_desc("$createdAt")).expect("should serialize");
        assert_eq!(v, serde_json::json!({"method": "orderDesc", "attribute": "$createdAt"}));

        let v = serde_json::to_value(Query::limit(100)).expect("should serialize");
        assert_eq!(v, serde_json::json!({"method": "limit", "values": [100]}));

        let v = serde_json::to_value(Query::equal("status", "on-hold")).expect("should serialize");
        assert_eq!(
            v,
            serde_json::json!({"method": "equal", "attribute": "status", "values": ["on-hold"]})
        );
    }

    #[test]
    fn test_encode_queries_escapes_json() {
        let qs = encode_queries(&[Query::search("title", "solar panel"), Query::limit(5)]);
        let parts: Vec<&str> = qs.split('&').collect();
        assert_eq!(parts.len(), 2);
        assert!(parts[0].starts_with("queries%5B%5D=%7B"));
        assert!(parts[0].contains("solar%20panel"));
        assert!(!qs.contains('"'));
    }

    #[test]
    fn test_encode_queries_empty() {
        assert_eq!(encode_queries(&[]), "");
    }
}
