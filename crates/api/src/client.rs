//! GraphQL client for the Finite State platform.
//!
//! Async HTTP client using `reqwest` with Bearer token authentication and the
//! `Organization-Context` tenant header on every call.

use std::future::Future;
use std::pin::Pin;

use fsupload_protocol::{GraphQlRequest, GraphQlResponse, Operation};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;

/// Header carrying the tenant-scoping identifier.
pub const ORGANIZATION_CONTEXT_HEADER: &str = "Organization-Context";

/// Sends GraphQL requests.
///
/// A successful result never carries GraphQL errors: implementations turn a
/// non-200 status into [`ApiError::Http`] and a non-empty `errors` array into
/// [`ApiError::GraphQl`].
pub trait GraphQlTransport: Send + Sync {
    fn send(
        &self,
        request: GraphQlRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GraphQlResponse, ApiError>> + Send + '_>>;
}

/// HTTP GraphQL client bound to one token and organization context.
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQlClient {
    /// Creates a client that authenticates every request with `token`.
    pub fn new(
        endpoint: impl Into<String>,
        token: &str,
        organization_context: &str,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| ApiError::InvalidHeader("Authorization"))?,
        );
        headers.insert(
            ORGANIZATION_CONTEXT_HEADER,
            HeaderValue::from_str(organization_context)
                .map_err(|_| ApiError::InvalidHeader(ORGANIZATION_CONTEXT_HEADER))?,
        );

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    /// Posts one request and checks both the HTTP status and the GraphQL errors.
    async fn post(&self, request: GraphQlRequest) -> Result<GraphQlResponse, ApiError> {
        let resp = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = resp.status();

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let response: GraphQlResponse = serde_json::from_slice(&bytes)?;
        if let Some(errors) = response.errors() {
            return Err(ApiError::GraphQl {
                errors: errors.to_vec(),
            });
        }
        Ok(response)
    }
}

impl GraphQlTransport for GraphQlClient {
    fn send(
        &self,
        request: GraphQlRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GraphQlResponse, ApiError>> + Send + '_>> {
        Box::pin(self.post(request))
    }
}

/// Runs a single operation and decodes its result field.
///
/// Validation happens before anything is sent; a missing result field is a
/// [`ApiError::Protocol`] error.
pub async fn execute<T: DeserializeOwned>(
    transport: &dyn GraphQlTransport,
    operation: &Operation,
) -> Result<T, ApiError> {
    let mut data = execute_data(transport, operation).await?;
    let value = data[operation.result_field()].take();
    Ok(serde_json::from_value(value)?)
}

/// Runs a single operation and returns the whole `data` object, after
/// checking that it carries the operation's result field.
pub async fn execute_data(
    transport: &dyn GraphQlTransport,
    operation: &Operation,
) -> Result<Value, ApiError> {
    let request = operation.to_request()?;
    debug!(operation = operation.name(), "sending GraphQL operation");

    let response = transport.send(request).await?;
    let field = operation.result_field();
    match response.data {
        Some(data) if data.get(field).is_some_and(|v| !v.is_null()) => Ok(data),
        _ => Err(ApiError::Protocol(format!("{field} not in response"))),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use fsupload_protocol::messages::{StartUploadVariables, StartedUpload};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Transport returning canned responses and recording every request.
    pub(crate) struct MockTransport {
        pub responses: Mutex<VecDeque<Result<GraphQlResponse, ApiError>>>,
        pub requests: Mutex<Vec<GraphQlRequest>>,
    }

    impl MockTransport {
        pub(crate) fn new(responses: Vec<Result<GraphQlResponse, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_data(pages: Vec<serde_json::Value>) -> Self {
            Self::new(
                pages
                    .into_iter()
                    .map(|data| {
                        Ok(GraphQlResponse {
                            data: Some(data),
                            errors: None,
                        })
                    })
                    .collect(),
            )
        }

        pub(crate) fn sent(&self) -> Vec<GraphQlRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl GraphQlTransport for MockTransport {
        fn send(
            &self,
            request: GraphQlRequest,
        ) -> Pin<Box<dyn Future<Output = Result<GraphQlResponse, ApiError>> + Send + '_>>
        {
            Box::pin(async move {
                self.requests.lock().unwrap().push(request);
                self.responses
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Err(ApiError::Protocol("no response queued".into())))
            })
        }
    }

    /// Starts a mock HTTP server that answers one request and hands back
    /// the raw request text.
    async fn mock_server(
        status: u16,
        body: &str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/api/v1/graphql");
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let request = read_request(&mut stream).await;

            let resp = format!(
                "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
            request
        });

        (url, handle)
    }

    /// Reads headers plus a `Content-Length` body.
    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut raw = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&raw);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .find_map(|l| {
                        let (k, v) = l.split_once(':')?;
                        k.eq_ignore_ascii_case("content-length")
                            .then(|| v.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or(0);
                if raw.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    fn start_request() -> GraphQlRequest {
        Operation::StartMultipartUpload(StartUploadVariables {
            test_id: "t1".into(),
        })
        .to_request()
        .unwrap()
    }

    #[tokio::test]
    async fn send_sets_auth_and_context_headers() {
        let (url, handle) = mock_server(200, r#"{"data":{"ok":true}}"#).await;

        let client = GraphQlClient::new(url, "tok-123", "org-9").unwrap();
        let resp = client.send(start_request()).await.unwrap();
        assert_eq!(resp.data().unwrap()["ok"], true);

        let raw = handle.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("post /api/v1/graphql"));
        assert!(raw.contains("authorization: bearer tok-123"));
        assert!(raw.contains("organization-context: org-9"));
        assert!(raw.contains("content-type: application/json"));
        assert!(raw.contains(r#""testid":"t1""#));
    }

    #[tokio::test]
    async fn errors_under_200_are_failures() {
        let (url, handle) = mock_server(200, r#"{"errors":["bad field"]}"#).await;

        let client = GraphQlClient::new(url, "t", "o").unwrap();
        let err = client.send(start_request()).await.unwrap_err();
        match err {
            ApiError::GraphQl { errors } => assert_eq!(errors, vec![serde_json::json!("bad field")]),
            other => panic!("expected GraphQl error, got {other:?}"),
        }

        handle.abort();
    }

    #[tokio::test]
    async fn non_200_is_http_error() {
        let (url, handle) = mock_server(401, r#"{"message":"expired"}"#).await;

        let client = GraphQlClient::new(url, "t", "o").unwrap();
        let err = client.send(start_request()).await.unwrap_err();
        match err {
            ApiError::Http {
                status,
                status_text,
                body,
            } => {
                assert_eq!(status, 401);
                assert_eq!(status_text, "Unauthorized");
                assert!(body.contains("expired"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }

        handle.abort();
    }

    #[tokio::test]
    async fn other_2xx_statuses_are_rejected() {
        let (url, handle) = mock_server(204, "").await;

        let client = GraphQlClient::new(url, "t", "o").unwrap();
        let err = client.send(start_request()).await.unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 204, .. }));

        handle.abort();
    }

    #[test]
    fn client_rejects_unprintable_token() {
        let result = GraphQlClient::new("http://localhost", "bad\ntoken", "org");
        assert!(matches!(
            result,
            Err(ApiError::InvalidHeader("Authorization"))
        ));
    }

    #[tokio::test]
    async fn execute_decodes_result_field() {
        let transport = MockTransport::with_data(vec![serde_json::json!({
            "startMultipartUploadV2": {"uploadId": "u1", "key": "k1"}
        })]);
        let op = Operation::StartMultipartUpload(StartUploadVariables {
            test_id: "t1".into(),
        });

        let started: StartedUpload = execute(&transport, &op).await.unwrap();
        assert_eq!(started.upload_id, "u1");
        assert_eq!(started.key, "k1");
    }

    #[tokio::test]
    async fn execute_data_keeps_whole_payload() {
        let transport = MockTransport::with_data(vec![serde_json::json!({
            "launchBinaryUploadProcessing": {"key": "k?asset_version=7"}
        })]);
        let op = Operation::LaunchBinaryUploadProcessing(
            fsupload_protocol::messages::LaunchVariables::new("k", "t1", false),
        );

        let data = execute_data(&transport, &op).await.unwrap();
        assert_eq!(
            data,
            serde_json::json!({"launchBinaryUploadProcessing": {"key": "k?asset_version=7"}})
        );
    }

    #[tokio::test]
    async fn execute_missing_field_is_protocol_error() {
        let transport = MockTransport::with_data(vec![serde_json::json!({})]);
        let op = Operation::StartMultipartUpload(StartUploadVariables {
            test_id: "t1".into(),
        });

        let err = execute::<StartedUpload>(&transport, &op).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "protocol error: startMultipartUploadV2 not in response"
        );
    }

    #[tokio::test]
    async fn execute_validates_before_sending() {
        let transport = MockTransport::new(vec![]);
        let op = Operation::StartMultipartUpload(StartUploadVariables {
            test_id: String::new(),
        });

        let err = execute::<StartedUpload>(&transport, &op).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(transport.sent().is_empty());
    }
}
