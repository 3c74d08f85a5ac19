//! reqwest wrapper shared by every adapter.
//!
//! Handles URL joining, bearer authentication, status classification and
//! retry with exponential backoff for idempotent `GET` requests.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ApiClientConfig;
use crate::error::{ClientError, ClientResult};

/// HTTP client bound to one API base URL.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
    timeout: Duration,
    max_retries: u8,
    retry_base_delay: Duration,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.token.is_some())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from `config`.
    pub fn new(config: &ApiClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: parse_base_url(&config.base_url)?,
            token: config.token.clone(),
            timeout: config.timeout,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
        })
    }

    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Build a request with optional authentication.
    fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let mut request = self.http.request(method, self.url(path)?);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    /// Send a request and turn non-success statuses into errors.
    async fn send(&self, path: &str, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(ClientError::Unauthorized {
                path: path.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            path: path.to_string(),
            message: error_message(status, &body),
        })
    }

    /// `GET` with automatic retry for transient errors.
    async fn get_with_retry(&self, path: &str, query: &[(&str, String)]) -> ClientResult<Response> {
        let mut attempt: u8 = 0;

        loop {
            if attempt > 0 {
                let delay = self.retry_base_delay * 2u32.pow(u32::from(attempt) - 1);
                tokio::time::sleep(delay).await;
            }

            let request = self
                .request(Method::GET, path)?
                .query(query)
                .timeout(self.timeout);

            match self.send(path, request).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries && is_transient(&e) => {
                    tracing::debug!(path, attempt, error = %e, "Retrying request");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// `GET` a JSON document.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ClientResult<T> {
        let response = self.get_with_retry(path, query).await?;
        decode_json(response).await
    }

    /// `POST` a JSON body, ignoring any response body.
    pub async fn post_unit<B>(&self, path: &str, body: &B) -> ClientResult<()>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self.request(Method::POST, path)?.json(body).timeout(self.timeout);
        self.send(path, request).await?;
        Ok(())
    }

    /// `POST` a JSON body and return the raw response bytes.
    pub async fn post_for_bytes<B>(&self, path: &str, body: &B) -> ClientResult<Vec<u8>>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self.request(Method::POST, path)?.json(body).timeout(self.timeout);
        let response = self.send(path, request).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// `POST` a JSON body and hand back the open response for streaming.
    ///
    /// No total timeout applies; dropping the response aborts the request.
    pub async fn post_streaming<B>(&self, path: &str, body: &B) -> ClientResult<Response>
    where
        B: Serialize + ?Sized + Sync,
    {
        let request = self
            .request(Method::POST, path)?
            .header(reqwest::header::ACCEPT, "text/event-stream, application/x-ndjson")
            .json(body);
        self.send(path, request).await
    }

    /// `POST` a multipart form and decode a JSON response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ClientResult<T> {
        let request = self.request(Method::POST, path)?.multipart(form);
        decode_json(self.send(path, request).await?).await
    }
}

fn parse_base_url(raw: &str) -> ClientResult<Url> {
    let mut url = Url::parse(raw)?;
    // Without a trailing slash, `join` would replace the last path segment.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

const fn is_transient(err: &ClientError) -> bool {
    match err {
        ClientError::Status { status, .. } => *status >= 500,
        ClientError::Network(_) => true,
        _ => false,
    }
}

/// Best human-readable message from an error response body.
///
/// The backend reports errors as `{"detail": ...}`, `{"error": ...}` or
/// `{"message": ...}`; anything else falls back to the body text or the
/// status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(message) = json.get(key).and_then(serde_json::Value::as_str) {
                return message.to_string();
            }
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        body.chars().take(200).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = parse_base_url("https://example.com/mrwhite").unwrap();
        assert_eq!(
            url.join("api/v1/dogs").unwrap().as_str(),
            "https://example.com/mrwhite/api/v1/dogs"
        );

        let root = parse_base_url("https://example.com").unwrap();
        assert_eq!(
            root.join("api/v1/dogs").unwrap().as_str(),
            "https://example.com/api/v1/dogs"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn error_message_prefers_json_detail() {
        assert_eq!(
            error_message(StatusCode::PAYMENT_REQUIRED, r#"{"detail":"Out of credits"}"#),
            "Out of credits"
        );
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, r#"{"error":"bad mode"}"#),
            "bad mode"
        );
    }

    #[test]
    fn error_message_falls_back() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, ""),
            "Bad Gateway"
        );
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, "upstream down"), "upstream down");
    }

    #[test]
    fn only_server_and_network_errors_retry() {
        let server = ClientError::Status {
            status: 503,
            path: String::new(),
            message: String::new(),
        };
        let client = ClientError::Status {
            status: 404,
            path: String::new(),
            message: String::new(),
        };
        assert!(is_transient(&server));
        assert!(!is_transient(&client));
        assert!(!is_transient(&ClientError::Unauthorized { path: String::new() }));
    }

    #[test]
    fn client_builds_from_default_config() {
        let client = ApiClient::new(&ApiClientConfig::default()).unwrap();
        assert_eq!(client.base_url().as_str(), "https://api.mrwhite.ai/");
    }
}
