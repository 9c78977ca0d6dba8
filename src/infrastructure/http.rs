use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, Result};

/// Thin JSON client over a single shared `reqwest::Client`.
///
/// Every helper takes an optional per-request timeout; `None` falls back to
/// the configured external timeout. Any response with a status >= 300 is an
/// error carrying the response body.
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
}

impl HttpClient {
    pub fn new(default_timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("vsfetch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            default_timeout,
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let response = self.execute(self.client.get(url), url, timeout).await?;
        Ok(response.json().await?)
    }

    pub async fn get_text(&self, url: &str, timeout: Option<Duration>) -> Result<String> {
        let response = self.execute(self.client.get(url), url, timeout).await?;
        Ok(response.text().await?)
    }

    pub async fn post_json<B, T>(&self, url: &str, body: &B, timeout: Option<Duration>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(url).json(body);
        let response = self.execute(request, url, timeout).await?;
        Ok(response.json().await?)
    }

    pub async fn delete_json<B, T>(
        &self,
        url: &str,
        body: Option<&B>,
        timeout: Option<Duration>,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.delete(url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.execute(request, url, timeout).await?;
        Ok(response.json().await?)
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        url: &str,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        let timeout = timeout.unwrap_or(self.default_timeout);
        let response = request.timeout(timeout).send().await.map_err(|err| {
            if err.is_timeout() {
                AppError::Timeout {
                    url: url.to_string(),
                    timeout,
                }
            } else {
                AppError::HttpError(err.to_string())
            }
        })?;

        if response.status().as_u16() >= 300 {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(AppError::UnexpectedStatus {
                status,
                url: url.to_string(),
                body,
            });
        }

        Ok(response)
    }
}
