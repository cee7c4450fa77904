//! REST client for the New Relic Infrastructure alerting API

use super::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const API_KEY_HEADER: &str = "X-Api-Key";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the infra alerting API
///
/// Cheap to clone; every resource handler gets its own copy.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Client {
    pub fn new(api_url: &str, api_key: &str) -> Result<Self, ApiError> {
        Url::parse(api_url).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", api_url, e)))?;

        let http = reqwest::ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("PUT {}", url);

        let response = self
            .http
            .put(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// DELETE expecting no response body
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("DELETE {}", url);

        let response = self
            .http
            .delete(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::check_status(response).await?;

        let text = response.text().await?;
        tracing::debug!("API response body: {}", text);

        serde_json::from_str(&text).map_err(|e| ApiError::Parse(format!("{}: {}", e, text)))
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::AuthenticationFailed);
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Echo {
        ok: bool,
    }

    #[test]
    fn client_rejects_invalid_url() {
        let result = Client::new("not a url", "key");
        assert!(matches!(result, Err(ApiError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn client_sends_api_key_header() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("x-api-key", "secret-key")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "secret-key").unwrap();
        let echo: Echo = client.get("/ping").await.unwrap();

        assert!(echo.ok);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_strips_trailing_slash_from_base_url() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let client = Client::new(&format!("{}/", server.url()), "key").unwrap();
        let _: Echo = client.get("/ping").await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn client_maps_401_to_authentication_failed() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/ping")
            .with_status(401)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "bad-key").unwrap();
        let result: Result<Echo, ApiError> = client.get("/ping").await;

        assert!(matches!(result, Err(ApiError::AuthenticationFailed)));
    }

    #[tokio::test]
    async fn client_maps_404_to_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/ping")
            .with_status(404)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key").unwrap();
        let result: Result<Echo, ApiError> = client.get("/ping").await;

        assert!(matches!(result, Err(ApiError::NotFound)));
    }

    #[tokio::test]
    async fn client_surfaces_server_errors_with_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/ping")
            .with_status(500)
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key").unwrap();
        let result: Result<Echo, ApiError> = client.get("/ping").await;

        match result {
            Err(ApiError::Api { status, .. }) => assert_eq!(status, 500),
            other => panic!("expected Api error, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn client_reports_unparseable_bodies() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/ping")
            .with_body("not json")
            .create_async()
            .await;

        let client = Client::new(&server.url(), "key").unwrap();
        let result: Result<Echo, ApiError> = client.get("/ping").await;

        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
