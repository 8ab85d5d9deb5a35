mod builder;
pub mod retry;

use crate::error::{ClientError, Result};
pub use crate::{log_debug, log_warn};
pub use builder::ClientBuilder;
use http::header::RETRY_AFTER;
use retry::RetryPolicy;
use rquest::Client as RquestClient;
use std::time::Duration;
use url::Url;

#[derive(Debug)]
pub struct ClientResponse {
    pub status: u16,
    pub content: String,
}

impl ClientResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Anything that can hand back the HTML behind a site-relative path.
pub trait PageSource {
    async fn fetch(&self, path: &str) -> Result<ClientResponse>;
}

pub struct Client {
    inner: RquestClient,
    base: Url,
    retry: RetryPolicy,
}

impl Client {
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub async fn get(&self, path: &str) -> Result<ClientResponse> {
        let url = self.build_url(path)?;
        self.request(&url).await
    }

    fn build_url(&self, path: &str) -> Result<String> {
        let full_url = self
            .base
            .join(path)
            .map_err(|e| ClientError::InvalidUrl(format!("Invalid path {}: {}", path, e)))?;

        Ok(full_url.to_string())
    }

    /// Statuses the policy does not retry (404 included) are handed back with their body.
    async fn request(&self, url: &str) -> Result<ClientResponse> {
        let mut retries = 0;

        loop {
            let (reason, retry_after) = match self.inner.get(url).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    let retry_after = response
                        .headers()
                        .get(RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .filter(|_| RetryPolicy::honours_retry_after(status))
                        .map(str::to_string);

                    if !self.retry.should_retry(status, retry_after.is_some()) {
                        let content = response.text().await.map_err(|e| {
                            ClientError::RequestFailed(format!(
                                "Failed to get response text: {}",
                                e
                            ))
                        })?;
                        log_debug!("[client] GET {} -> {}", url, status);
                        return Ok(ClientResponse { status, content });
                    }

                    (format!("status {}", status), retry_after)
                }
                Err(e) => (e.to_string(), None),
            };

            if retries >= self.retry.total {
                return Err(ClientError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: retries + 1,
                    reason,
                }
                .into());
            }

            retries += 1;
            let wait = self.retry.wait_before(retries, retry_after.as_deref());
            log_warn!(
                "[client] GET {} failed ({}), retry {}/{} in {:?}",
                url,
                reason,
                retries,
                self.retry.total,
                wait
            );
            if wait > Duration::ZERO {
                tokio::time::sleep(wait).await;
            }
        }
    }
}

impl PageSource for Client {
    async fn fetch(&self, path: &str) -> Result<ClientResponse> {
        self.get(path).await
    }
}
