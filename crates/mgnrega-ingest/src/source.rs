//! Where feed documents come from.
//!
//! [`RecordSource`] is the seam between the pipeline and the network;
//! [`DataGovClient`] is the production implementation against the
//! data.gov.in open-data API.

use std::{future::Future, time::Duration};

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{Error, Result};

/// Largest page the upstream API serves in one request.
pub const MAX_LIMIT: u32 = 1000;

/// Produces raw feed documents, optionally filtered to one district name.
pub trait RecordSource: Send + Sync {
  fn fetch(
    &self,
    district_name: Option<String>,
  ) -> impl Future<Output = Result<Vec<u8>>> + Send + '_;
}

// ─── Configuration ────────────────────────────────────────────────────────────

/// Connection settings for the upstream open-data API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
  pub api_url:      String,
  pub api_key:      String,
  /// Records per request; clamped to `1..=MAX_LIMIT`.
  pub limit:        u32,
  pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
  fn default() -> Self {
    Self {
      api_url:      "https://api.data.gov.in/resource/ee03643a-ee4c-48c2-ac30-9f2ff26ab722"
        .to_owned(),
      api_key:      String::new(),
      limit:        MAX_LIMIT,
      timeout_secs: 30,
    }
  }
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// HTTP client for the data.gov.in MGNREGA resource.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct DataGovClient {
  client: Client,
  config: UpstreamConfig,
}

impl DataGovClient {
  pub fn new(config: UpstreamConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    if config.api_key.is_empty() {
      tracing::warn!("no upstream api_key configured; remote requests will likely be rejected");
    }
    Ok(Self { client, config })
  }

  /// Query parameters for one request.
  fn query(&self, district_name: Option<String>) -> Vec<(&'static str, String)> {
    let mut query = vec![
      ("api-key", self.config.api_key.clone()),
      ("format", "xml".to_owned()),
      ("limit", self.config.limit.clamp(1, MAX_LIMIT).to_string()),
    ];
    if let Some(name) = district_name {
      query.push(("filters[district_name]", name));
    }
    query
  }
}

impl RecordSource for DataGovClient {
  async fn fetch(&self, district_name: Option<String>) -> Result<Vec<u8>> {
    tracing::debug!(?district_name, url = %self.config.api_url, "fetching upstream records");

    let resp = self
      .client
      .get(&self.config.api_url)
      .query(&self.query(district_name))
      .send()
      .await?;

    let status = resp.status();
    if status != StatusCode::OK {
      return Err(Error::Status(status.as_u16()));
    }
    Ok(resp.bytes().await?.to_vec())
  }
}

#[cfg(test)]
mod tests {
  use tokio::{
    io::{AsyncReadExt as _, AsyncWriteExt as _},
    net::TcpListener,
    task::JoinHandle,
  };

  use super::*;

  /// Accept one connection on a local port, wait `stall`, then write
  /// `response`. The handle yields the raw request head.
  async fn serve_once(
    response: &'static str,
    stall: Duration,
  ) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
      let (mut sock, _) = listener.accept().await.unwrap();
      let mut buf = vec![0u8; 8192];
      let n = sock.read(&mut buf).await.unwrap_or(0);
      tokio::time::sleep(stall).await;
      let _ = sock.write_all(response.as_bytes()).await;
      let _ = sock.shutdown().await;
      String::from_utf8_lossy(&buf[..n]).into_owned()
    });
    (format!("http://{addr}/resource"), handle)
  }

  fn local_client(api_url: String, timeout_secs: u64) -> DataGovClient {
    DataGovClient::new(UpstreamConfig {
      api_url,
      api_key: "test-key".into(),
      timeout_secs,
      ..Default::default()
    })
    .unwrap()
  }

  fn client(limit: u32) -> DataGovClient {
    DataGovClient::new(UpstreamConfig {
      api_key: "test-key".into(),
      limit,
      ..Default::default()
    })
    .unwrap()
  }

  #[test]
  fn unfiltered_query() {
    let q = client(1000).query(None);
    assert_eq!(q, vec![
      ("api-key", "test-key".to_owned()),
      ("format", "xml".to_owned()),
      ("limit", "1000".to_owned()),
    ]);
  }

  #[test]
  fn district_filter_is_added() {
    let q = client(50).query(Some("Pune".into()));
    assert!(q.contains(&("filters[district_name]", "Pune".to_owned())));
    assert!(q.contains(&("limit", "50".to_owned())));
  }

  #[test]
  fn limit_is_capped() {
    let q = client(5000).query(None);
    assert!(q.contains(&("limit", "1000".to_owned())));
    let q = client(0).query(None);
    assert!(q.contains(&("limit", "1".to_owned())));
  }

  #[tokio::test]
  async fn unreachable_upstream_is_a_transport_error() {
    // Port 9 on localhost is not expected to be listening.
    let source = DataGovClient::new(UpstreamConfig {
      api_url: "http://127.0.0.1:9/resource".into(),
      timeout_secs: 2,
      ..Default::default()
    })
    .unwrap();
    let err = source.fetch(None).await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
  }

  #[tokio::test]
  async fn ok_response_returns_body_and_sends_query() {
    let (url, server) = serve_once(
      "HTTP/1.1 200 OK\r\nContent-Length: 19\r\nConnection: close\r\n\r\n<records></records>",
      Duration::ZERO,
    )
    .await;

    let body = local_client(url, 5).fetch(Some("Pune".into())).await.unwrap();
    assert_eq!(body, b"<records></records>");

    let request = server.await.unwrap();
    let request_line = request.lines().next().unwrap();
    assert!(request_line.starts_with("GET /resource?"), "{request_line}");
    assert!(request_line.contains("api-key=test-key"), "{request_line}");
    assert!(request_line.contains("format=xml"), "{request_line}");
    assert!(request_line.contains("limit=1000"), "{request_line}");
    assert!(request_line.contains("filters%5Bdistrict_name%5D=Pune"), "{request_line}");
  }

  #[tokio::test]
  async fn non_ok_status_is_a_status_error() {
    let (url, _server) = serve_once(
      "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
      Duration::ZERO,
    )
    .await;

    let err = local_client(url, 5).fetch(None).await.unwrap_err();
    assert!(matches!(err, Error::Status(503)), "{err}");
  }

  #[tokio::test]
  async fn other_success_codes_are_rejected() {
    let (url, _server) = serve_once(
      "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n",
      Duration::ZERO,
    )
    .await;

    let err = local_client(url, 5).fetch(None).await.unwrap_err();
    assert!(matches!(err, Error::Status(204)), "{err}");
  }

  #[tokio::test]
  async fn stalled_upstream_times_out() {
    let (url, _server) = serve_once(
      "HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n",
      Duration::from_secs(5),
    )
    .await;

    let err = local_client(url, 1).fetch(None).await.unwrap_err();
    assert!(matches!(err, Error::Http(ref e) if e.is_timeout()), "{err}");
  }
}
