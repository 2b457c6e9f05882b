// src/services/practicum.rs

//! Homework API client.
//!
//! Issues the authenticated status request and hands back the decoded JSON
//! body. Shape checks live in [`crate::pipeline::validate`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, Result};

/// Status line and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Minimal HTTP GET transport.
///
/// Implementations report connection-level failures as
/// [`AppError::RequestApi`]; any received response, whatever its status, is
/// returned as `Ok`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, String)],
        query: &[(&str, String)],
    ) -> Result<RawResponse>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(
        &self,
        url: &str,
        headers: &[(&str, String)],
        query: &[(&str, String)],
    ) -> Result<RawResponse> {
        let mut request = self.client.get(url).query(query);
        for (name, value) in headers {
            request = request.header(*name, value);
        }

        let response = request.send().await.map_err(AppError::request_api)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(AppError::request_api)?;
        Ok(RawResponse { status, body })
    }
}

/// Client for the homework statuses endpoint.
pub struct PracticumClient<T: Transport> {
    transport: T,
    endpoint: String,
    token: String,
}

impl<T: Transport> PracticumClient<T> {
    pub fn new(transport: T, endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Request every status change since `timestamp` (Unix seconds).
    ///
    /// Fails with [`AppError::RequestApi`] when the request cannot be made and
    /// with [`AppError::ApiStatusCode`] on anything but `200 OK`.
    pub async fn get_api_answer(&self, timestamp: i64) -> Result<Value> {
        log::info!(
            "Requesting homework statuses from {} (from_date={})",
            self.endpoint,
            timestamp
        );

        let headers = [("Authorization", format!("OAuth {}", self.token))];
        let query = [("from_date", timestamp.to_string())];
        let response = self.transport.get(&self.endpoint, &headers, &query).await?;

        if response.status != 200 {
            return Err(AppError::ApiStatusCode {
                status: response.status,
            });
        }
        Ok(serde_json::from_str(&response.body)?)
    }
}


#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::testing::ScriptedTransport;
    use super::*;

    fn client(answer: Result<RawResponse>) -> PracticumClient<ScriptedTransport> {
        PracticumClient::new(
            ScriptedTransport::new([answer]),
            "https://example.test/homework_statuses/",
            "secret",
        )
    }

    #[tokio::test]
    async fn test_sends_oauth_header_and_from_date() {
        let api = client(ScriptedTransport::ok(
            r#"{"homeworks": [], "current_date": 1700000000}"#,
        ));

        let body = api.get_api_answer(1_690_000_000).await.unwrap();
        assert_eq!(body, json!({"homeworks": [], "current_date": 1700000000}));

        let seen = api.transport.seen.lock().unwrap();
        assert_eq!(seen[0].url, "https://example.test/homework_statuses/");
        assert_eq!(
            seen[0].headers,
            vec![("Authorization".to_string(), "OAuth secret".to_string())]
        );
        assert_eq!(
            seen[0].query,
            vec![("from_date".to_string(), "1690000000".to_string())]
        );
    }

    #[tokio::test]
    async fn test_non_ok_status_is_reported_with_code() {
        let api = client(ScriptedTransport::status(
            403,
            r#"{"code": "not_authenticated"}"#,
        ));

        let err = api.get_api_answer(0).await.unwrap_err();
        assert!(matches!(err, AppError::ApiStatusCode { status: 403 }));
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_detail() {
        let api = client(Err(AppError::request_api("connection refused")));

        let err = api.get_api_answer(0).await.unwrap_err();
        assert!(matches!(err, AppError::RequestApi(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_http_transport_reports_connection_failure() {
        let transport = HttpTransport::new(Client::new());
        let err = transport
            .get("http://127.0.0.1:1/", &[], &[("from_date", "0".to_string())])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::RequestApi(_)));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_a_json_error() {
        let api = client(ScriptedTransport::ok("<html>oops</html>"));

        assert!(matches!(
            api.get_api_answer(0).await,
            Err(AppError::Json(_))
        ));
    }
}
