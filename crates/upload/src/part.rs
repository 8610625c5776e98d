//! Raw PUT of a chunk to a pre-signed URL.

use std::future::Future;
use std::pin::Pin;

use reqwest::StatusCode;
use reqwest::header::ETAG;
use tracing::debug;

use crate::error::UploadError;

/// Uploads one part and returns the ETag the storage service assigned it.
///
/// The URL carries its own authorization; no API headers are added.
pub trait PartUploader: Send + Sync {
    fn put_part(
        &self,
        url: &str,
        part_number: u32,
        data: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + '_>>;
}

/// [`PartUploader`] over plain HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpPartUploader {
    http: reqwest::Client,
}

impl HttpPartUploader {
    pub fn new() -> Self {
        Self::default()
    }

    async fn put(&self, url: String, part_number: u32, data: Vec<u8>) -> Result<String, UploadError> {
        let size = data.len();
        let resp = self.http.put(&url).body(data).send().await?;
        let status = resp.status();

        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(UploadError::PartRejected {
                part_number,
                status: status.as_u16(),
                body,
            });
        }

        let etag = resp
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(UploadError::MissingEtag(part_number))?;

        debug!(part = part_number, bytes = size, etag = %etag, "part uploaded");
        Ok(etag)
    }
}

impl PartUploader for HttpPartUploader {
    fn put_part(
        &self,
        url: &str,
        part_number: u32,
        data: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<String, UploadError>> + Send + '_>> {
        Box::pin(self.put(url.to_string(), part_number, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers one request with the given status line and extra headers,
    /// returning the raw request bytes.
    async fn mock_server(
        status: u16,
        extra_headers: &str,
        body: &str,
    ) -> (String, tokio::task::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let url = format!("http://127.0.0.1:{port}/bucket/object?partNumber=1&X-Amz-Signature=abc");
        let extra_headers = extra_headers.to_string();
        let body = body.to_string();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut buf = [0u8; 8192];
            loop {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&raw).to_ascii_lowercase();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if raw.len() >= end + 4 + length {
                        break;
                    }
                }
            }

            let resp = format!(
                "HTTP/1.1 {status} Status\r\n{extra_headers}Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes()).await;
            let _ = stream.shutdown().await;
            raw
        });

        (url, handle)
    }

    #[tokio::test]
    async fn put_returns_etag() {
        let (url, handle) = mock_server(200, "ETag: \"d41d8cd9\"\r\n", "").await;

        let uploader = HttpPartUploader::new();
        let etag = uploader.put_part(&url, 1, b"chunk-bytes".to_vec()).await.unwrap();
        assert_eq!(etag, "\"d41d8cd9\"");

        let raw = handle.await.unwrap();
        let text = String::from_utf8_lossy(&raw);
        assert!(text.starts_with("PUT /bucket/object?partNumber=1"));
        assert!(text.ends_with("chunk-bytes"));
        assert!(!text.to_ascii_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn non_200_is_rejected_with_body() {
        let (url, handle) = mock_server(403, "", "SignatureDoesNotMatch").await;

        let uploader = HttpPartUploader::new();
        let err = uploader.put_part(&url, 4, vec![1, 2, 3]).await.unwrap_err();
        match err {
            UploadError::PartRejected {
                part_number,
                status,
                body,
            } => {
                assert_eq!(part_number, 4);
                assert_eq!(status, 403);
                assert_eq!(body, "SignatureDoesNotMatch");
            }
            other => panic!("expected PartRejected, got {other:?}"),
        }

        handle.abort();
    }

    #[tokio::test]
    async fn missing_etag_is_an_error() {
        let (url, handle) = mock_server(200, "", "").await;

        let uploader = HttpPartUploader::new();
        let err = uploader.put_part(&url, 2, vec![0]).await.unwrap_err();
        assert!(matches!(err, UploadError::MissingEtag(2)));

        handle.abort();
    }
}
