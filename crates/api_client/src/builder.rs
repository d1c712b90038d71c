use crate::client::{ApiClient, DEFAULT_HTTP_TIMEOUT};
use crate::error::{ApiError, ApiResult};
use crate::hooks::ApiClientHooks;
use reqwest::{Client, Url};
use std::time::Duration;

/// Configurable constructor for [`ApiClient`].
#[derive(Debug)]
pub struct ApiClientBuilder {
    base_url: Url,
    timeout: Duration,
    hooks: ApiClientHooks,
    http_client: Option<Client>,
}

impl ApiClientBuilder {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: DEFAULT_HTTP_TIMEOUT,
            hooks: ApiClientHooks::default(),
            http_client: None,
        }
    }

    /// Per-request timeout. Ignored when an HTTP client is supplied.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn hooks(mut self, hooks: ApiClientHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Uses an existing reqwest client instead of building one.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }

    pub fn build(self) -> ApiResult<ApiClient> {
        if self.base_url.cannot_be_a_base() {
            return Err(ApiError::invalid_url(
                self.base_url.as_str(),
                "URL cannot be used as a base",
            ));
        }

        let http_client = match self.http_client {
            Some(client) => client,
            // No cookie store: requests never carry credentials.
            None => Client::builder().timeout(self.timeout).build()?,
        };

        Ok(ApiClient::from_parts(
            self.base_url,
            http_client,
            self.timeout,
            self.hooks,
        ))
    }
}
