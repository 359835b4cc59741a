use {
    crate::{
        error::ProviderError,
        provider::WalletProvider,
        request::{parse_response, RpcRequest},
    },
    async_trait::async_trait,
    log::{debug, trace},
    reqwest::header::{self, HeaderMap, HeaderValue, CONTENT_TYPE},
    serde_json::Value,
    std::{
        sync::atomic::{AtomicU64, Ordering},
        time::Duration,
    },
};

/// A [`WalletProvider`] reached over JSON-RPC/HTTP.
///
/// Point it at a signing wallet endpoint (or a node with unlocked accounts)
/// so that `eth_requestAccounts` and `eth_sendTransaction` are honoured.
pub struct HttpProvider {
    client: reqwest::Client,
    url: String,
    request_id: AtomicU64,
}

impl HttpProvider {
    pub fn new<U: ToString>(url: U) -> Self {
        Self::new_with_timeout(url, Duration::from_secs(30))
    }

    /// The timeout bounds each HTTP round trip. Waiting for a receipt is a
    /// sequence of round trips and is not bounded by it.
    pub fn new_with_timeout<U: ToString>(url: U, timeout: Duration) -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.append(
            header::HeaderName::from_static("stcex-client"),
            HeaderValue::from_str(
                format!("rust/{}", env!("CARGO_PKG_VERSION")).as_str(),
            )
            .unwrap_or_else(|_| HeaderValue::from_static("rust")),
        );
        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            url: url.to_string(),
            request_id: AtomicU64::new(0),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl WalletProvider for HttpProvider {
    async fn request(&self, method: RpcRequest, params: Value) -> Result<Value, ProviderError> {
        let request_id = self.request_id.fetch_add(1, Ordering::Relaxed);
        let request_json = method.build_request_json(request_id, params).to_string();
        trace!("{} -> {}", self.url, request_json);

        let response: Value = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request_json)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!("{method} #{request_id} answered");
        parse_response(response)
    }
}
