use serde::{Deserialize, Serialize};

/// Body of every GraphQL call: `{query, variables}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    pub variables: serde_json::Value,
}

impl GraphQlRequest {
    /// Creates a request from a document and any serializable variable set.
    pub fn new<T: Serialize>(
        query: impl Into<String>,
        variables: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            query: query.into(),
            variables: serde_json::to_value(variables)?,
        })
    }
}

/// Decoded GraphQL response body.
///
/// A response carrying a non-empty `errors` array is a failure even when the
/// HTTP status was 200.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
}

impl GraphQlResponse {
    /// Returns the error list when it is present and non-empty.
    pub fn errors(&self) -> Option<&[serde_json::Value]> {
        match &self.errors {
            Some(errors) if !errors.is_empty() => Some(errors),
            _ => None,
        }
    }

    /// Returns `data` unless it is absent or `null`.
    pub fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref().filter(|d| !d.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_serializes_query_and_variables() {
        let req = GraphQlRequest::new("query { x }", &json!({"a": 1})).unwrap();
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, json!({"query": "query { x }", "variables": {"a": 1}}));
    }

    #[test]
    fn errors_absent_or_empty_is_not_failure() {
        let ok: GraphQlResponse = serde_json::from_str(r#"{"data":{"x":1}}"#).unwrap();
        assert!(ok.errors().is_none());

        let empty: GraphQlResponse =
            serde_json::from_str(r#"{"data":{"x":1},"errors":[]}"#).unwrap();
        assert!(empty.errors().is_none());

        let null: GraphQlResponse =
            serde_json::from_str(r#"{"data":{"x":1},"errors":null}"#).unwrap();
        assert!(null.errors().is_none());
    }

    #[test]
    fn errors_present() {
        let resp: GraphQlResponse = serde_json::from_str(r#"{"errors":["bad field"]}"#).unwrap();
        assert_eq!(resp.errors().unwrap(), &[json!("bad field")]);
        assert!(resp.data().is_none());
    }

    #[test]
    fn null_data_is_absent() {
        let resp: GraphQlResponse = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(resp.data().is_none());
    }
}
