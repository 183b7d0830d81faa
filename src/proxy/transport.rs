use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;

use crate::error::FetchError;

/// Fetches a proxied URL and yields the raw document the proxy wrapped.
pub trait Transport: Send + Sync + 'static {
    fn fetch(&self, proxy_url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// allorigins-style `/get` response body.
#[derive(Debug, Deserialize)]
struct ProxyResponse {
    contents: Option<String>,
    #[serde(default)]
    status: Option<ProxyStatus>,
}

#[derive(Debug, Deserialize)]
struct ProxyStatus {
    http_code: Option<u16>,
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(t) = timeout { builder = builder.timeout(t); }
        let client = builder.build().map_err(|e| FetchError::Network(format!("failed to create HTTP client: {}", e)))?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    async fn fetch(&self, proxy_url: &str) -> Result<String, FetchError> {
        // a non-2xx from the proxy itself surfaces as FetchError::Status
        let resp = self.client.get(proxy_url).send().await?.error_for_status()?;
        let body = resp.text().await?;
        decode_proxy_body(&body)
    }
}

pub(crate) fn decode_proxy_body(body: &str) -> Result<String, FetchError> {
    let parsed: ProxyResponse = serde_json::from_str(body).map_err(|e| FetchError::Body(e.to_string()))?;
    if let Some(code) = parsed.status.and_then(|s| s.http_code) {
        if !(200..300).contains(&code) { return Err(FetchError::UpstreamStatus(code)); }
    }
    parsed.contents.ok_or(FetchError::MissingContents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve exactly one canned HTTP response on a loopback port.
    async fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = sock.read(&mut buf).await;
            let _ = sock.write_all(response.as_bytes()).await;
            let _ = sock.shutdown().await;
        });
        format!("http://{}/get", addr)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!("HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}", status, body.len(), body)
    }

    #[tokio::test]
    async fn proxied_document_is_unwrapped() {
        let url = serve_once(http_response("200 OK", r#"{"contents":"<rss></rss>","status":{"http_code":200}}"#)).await;
        let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
        assert_eq!(transport.fetch(&url).await.unwrap(), "<rss></rss>");
    }

    #[tokio::test]
    async fn proxy_error_status_is_a_download_failure() {
        let url = serve_once(http_response("500 Internal Server Error", "")).await;
        let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
        let err = transport.fetch(&url).await.unwrap_err();
        assert_eq!(err, FetchError::Status(500));
        assert!(!err.is_network());
    }

    #[tokio::test]
    async fn refused_connection_is_a_network_failure() {
        // bind then drop so the port is known to be closed
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::new(Some(Duration::from_secs(5))).unwrap();
        let err = transport.fetch(&format!("http://{}/get", addr)).await.unwrap_err();
        assert!(err.is_network(), "got {:?}", err);
    }

    #[tokio::test]
    async fn silent_proxy_times_out_as_network_failure() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (sock, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(sock);
        });

        let transport = HttpTransport::new(Some(Duration::from_millis(300))).unwrap();
        let err = transport.fetch(&format!("http://{}/get", addr)).await.unwrap_err();
        assert!(err.is_network(), "got {:?}", err);
    }

    #[test]
    fn decodes_contents() {
        let body = r#"{"contents":"<rss></rss>","status":{"url":"https://a.example/rss","content_type":"application/rss+xml","http_code":200,"response_time":12}}"#;
        assert_eq!(decode_proxy_body(body).unwrap(), "<rss></rss>");
    }

    #[test]
    fn contents_without_status_is_accepted() {
        assert_eq!(decode_proxy_body(r#"{"contents":"x"}"#).unwrap(), "x");
    }

    #[test]
    fn upstream_error_status_is_reported() {
        let body = r#"{"contents":"Not Found","status":{"http_code":404}}"#;
        assert_eq!(decode_proxy_body(body).unwrap_err(), FetchError::UpstreamStatus(404));
    }

    #[test]
    fn null_contents_is_missing() {
        let body = r#"{"contents":null,"status":{"http_code":200}}"#;
        assert_eq!(decode_proxy_body(body).unwrap_err(), FetchError::MissingContents);
    }

    #[test]
    fn non_json_body_is_unreadable() {
        assert!(matches!(decode_proxy_body("<html>bad gateway</html>"), Err(FetchError::Body(_))));
    }
}
