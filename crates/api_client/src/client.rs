use crate::builder::ApiClientBuilder;
use crate::error::{ApiError, ApiResult};
use crate::hooks::{ApiClientHooks, RequestOutcome};
use crate::models::{
    AddPeerRequest, BalanceResponse, BlockData, ChainData, ChainValidation, CreateTokenRequest,
    HistoryResponse, LedgerResponse, MiningReward, PeersResponse, RewardsResponse, StatsUpdate,
    TokenCreated, TokenData, TokenomicsData, Transaction, TransferRequest, WalletCreated,
    WalletData,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::trace;

/// Default per-request timeout.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the Sierpinski Triangle Blockchain HTTP API.
///
/// Stateless apart from the connection pool; cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http_client: Client,
    request_timeout: Duration,
    hooks: ApiClientHooks,
}

/// Status and raw body of a response.
struct RawResponse {
    endpoint: String,
    status: StatusCode,
    body: String,
}

impl RawResponse {
    fn json(&self) -> ApiResult<Value> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::decode(&self.endpoint, e))
    }

    /// 2xx responses only; the body's `error` field becomes the message otherwise.
    fn require_ok(self) -> ApiResult<Value> {
        if !self.status.is_success() {
            let message = serde_json::from_str::<Value>(&self.body)
                .ok()
                .and_then(|body| error_message(&body));
            return Err(ApiError::Status {
                status: self.status.as_u16(),
                message,
            });
        }
        self.json()
    }

    /// Bodies whose `status` field is `"success"` only, whatever the HTTP status.
    fn require_success(self) -> ApiResult<Value> {
        ensure_success(self.json()?)
    }
}

fn ensure_success(body: Value) -> ApiResult<Value> {
    if body.get("status").and_then(Value::as_str) == Some("success") {
        Ok(body)
    } else {
        Err(ApiError::Rejected {
            message: error_message(&body),
        })
    }
}

fn error_message(body: &Value) -> Option<String> {
    match body.get("error")? {
        Value::Null => None,
        Value::String(message) => Some(message.clone()),
        other => Some(other.to_string()),
    }
}

fn decode<T: DeserializeOwned>(endpoint: &str, value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| ApiError::decode(endpoint, e))
}

impl ApiClient {
    /// Creates a configurable builder for the client.
    pub fn builder(base_url: Url) -> ApiClientBuilder {
        ApiClientBuilder::new(base_url)
    }

    /// Creates a client with default settings.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let url = Url::parse(base_url).map_err(|e| ApiError::invalid_url(base_url, e.to_string()))?;
        Self::builder(url).build()
    }

    pub(crate) fn from_parts(
        base_url: Url,
        http_client: Client,
        request_timeout: Duration,
        hooks: ApiClientHooks,
    ) -> Self {
        Self {
            base_url,
            http_client,
            request_timeout,
            hooks,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Builds the absolute URL for a path below the base URL.
    ///
    /// Segments are percent-encoded, so addresses can be passed as-is.
    pub fn endpoint_url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::invalid_url(self.base_url.as_str(), "URL cannot be a base"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> ApiResult<RawResponse> {
        let url = self.endpoint_url(segments)?;
        let endpoint = url.path().to_string();
        let start = Instant::now();

        let result = async {
            let mut request = self
                .http_client
                .request(method.clone(), url)
                .header(CONTENT_TYPE, "application/json")
                .header(ACCEPT, "application/json");
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, ApiError>(RawResponse {
                endpoint: endpoint.clone(),
                status,
                body,
            })
        }
        .await;

        let elapsed = start.elapsed();
        let status = match &result {
            Ok(raw) => Some(raw.status.as_u16()),
            Err(err) => err.status(),
        };
        trace!(
            method = %method,
            endpoint = %endpoint,
            status = ?status,
            elapsed_ms = elapsed.as_millis() as u64,
            "api request finished"
        );
        self.hooks.notify(RequestOutcome {
            method: method.to_string(),
            endpoint,
            status,
            elapsed,
            success: matches!(&result, Ok(raw) if raw.status.is_success()),
        });

        result
    }

    async fn get(&self, segments: &[&str]) -> ApiResult<RawResponse> {
        self.execute::<Value>(Method::GET, segments, None).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: Option<&B>,
    ) -> ApiResult<RawResponse> {
        self.execute(Method::POST, segments, body).await
    }

    /// `GET` whose JSON body is decoded whatever the HTTP status.
    ///
    /// Only a body that is not JSON, or does not fit `T`, is an error, so a
    /// proxy error page fails while `{"error": ...}` reads as defaults.
    pub async fn get_lenient<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let raw = self.get(segments).await?;
        let body = raw.json()?;
        decode(&raw.endpoint, body)
    }

    // Token

    /// `GET /api/token`
    pub async fn get_token(&self) -> ApiResult<TokenData> {
        let body = self.get(&["api", "token"]).await?.require_ok()?;
        decode("/api/token", body)
    }

    /// `POST /api/token/create`, returning the created token.
    pub async fn create_token(&self, request: &CreateTokenRequest) -> ApiResult<TokenData> {
        let body = self
            .post(&["api", "token", "create"], Some(request))
            .await?
            .require_ok()?;
        decode::<TokenCreated>("/api/token/create", body).map(|created| created.token)
    }

    // Mining and network

    /// `GET /api/stats`
    pub async fn get_stats(&self) -> ApiResult<StatsUpdate> {
        let body = self.get(&["api", "stats"]).await?.require_ok()?;
        decode("/api/stats", body)
    }

    /// `GET /api/peers`, returning the peer URLs.
    pub async fn get_peers(&self) -> ApiResult<Vec<String>> {
        let body = self.get(&["api", "peers"]).await?.require_ok()?;
        decode::<PeersResponse>("/api/peers", body).map(|response| response.peers)
    }

    /// `POST /api/peers`
    pub async fn add_peer(&self, peer_url: &str) -> ApiResult<Value> {
        let request = AddPeerRequest {
            peer_url: peer_url.to_string(),
        };
        self.post(&["api", "peers"], Some(&request))
            .await?
            .require_ok()
    }

    /// `POST /api/chain/validate`
    pub async fn validate_chain(&self) -> ApiResult<ChainData> {
        let body = self
            .post::<Value>(&["api", "chain", "validate"], None)
            .await?
            .require_ok()?;
        decode::<ChainValidation>("/api/chain/validate", body).map(ChainData::from)
    }

    /// `GET /api/ledger`, returning block groups oldest first.
    pub async fn get_ledger(&self) -> ApiResult<Vec<Vec<BlockData>>> {
        let body = self.get(&["api", "ledger"]).await?.require_ok()?;
        decode::<LedgerResponse>("/api/ledger", body).map(|response| response.ledger)
    }

    /// `GET /api/tokenomics`
    pub async fn get_tokenomics(&self) -> ApiResult<TokenomicsData> {
        let body = self.get(&["api", "tokenomics"]).await?.require_success()?;
        decode("/api/tokenomics", body)
    }

    /// `GET /api/rewards`
    pub async fn get_rewards(&self) -> ApiResult<Vec<MiningReward>> {
        let body = ensure_success(self.get(&["api", "rewards"]).await?.require_ok()?)?;
        decode::<RewardsResponse>("/api/rewards", body).map(|response| response.rewards)
    }

    // Wallet

    /// `POST /api/wallet/create`
    pub async fn create_wallet(&self) -> ApiResult<WalletData> {
        let body = self
            .post::<Value>(&["api", "wallet", "create"], None)
            .await?
            .require_success()?;
        decode::<WalletCreated>("/api/wallet/create", body).map(WalletData::from)
    }

    /// `GET /api/wallet/balance/{address}`
    pub async fn get_wallet_balance(&self, address: &str) -> ApiResult<f64> {
        let body = self
            .get(&["api", "wallet", "balance", address])
            .await?
            .require_success()?;
        decode::<BalanceResponse>("/api/wallet/balance", body).map(|response| response.balance)
    }

    /// `GET /api/wallet/history/{address}`
    pub async fn get_wallet_history(&self, address: &str) -> ApiResult<Vec<Transaction>> {
        let body = self
            .get(&["api", "wallet", "history", address])
            .await?
            .require_success()?;
        decode::<HistoryResponse>("/api/wallet/history", body).map(|response| response.transactions)
    }

    /// `POST /api/wallet/transfer`, returning the backend's receipt body.
    pub async fn transfer(&self, request: &TransferRequest) -> ApiResult<Value> {
        self.post(&["api", "wallet", "transfer"], Some(request))
            .await?
            .require_success()
    }
}
