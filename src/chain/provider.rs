//! Proxied HTTP provider built on ethers' `Provider<Http>`

use super::{Connector, RpcClient};
use crate::config::{redact_proxy, AccountConfig, ChainConfig};
use crate::error::{SenderError, SenderResult};

use async_trait::async_trait;
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use std::time::Duration;
use tracing::{debug, warn};

/// `Provider<Http>` whose reqwest client carries a proxy and user-agent
pub struct ProxiedProvider {
    provider: Provider<Http>,
}

impl ProxiedProvider {
    /// Create a provider for `rpc_url`, optionally through `proxy`
    pub fn new(
        rpc_url: &str,
        proxy: Option<&str>,
        user_agent: &str,
        request_timeout: Duration,
    ) -> SenderResult<Self> {
        let url = reqwest::Url::parse(rpc_url)
            .map_err(|e| SenderError::connection(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;

        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(request_timeout);

        if let Some(proxy_url) = proxy {
            let proxy = reqwest::Proxy::all(proxy_url).map_err(|e| {
                SenderError::connection(format!(
                    "Invalid proxy {}: {}",
                    redact_proxy(proxy_url),
                    e
                ))
            })?;
            builder = builder.proxy(proxy);
        } else {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| SenderError::connection(format!("Failed to build HTTP client: {}", e)))?;

        let provider = Provider::new(Http::new_with_client(url, client));

        Ok(Self { provider })
    }
}

#[async_trait]
impl RpcClient for ProxiedProvider {
    async fn chain_id(&self) -> SenderResult<u64> {
        let id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| SenderError::connection(format!("RPC connection failed: {}", e)))?;

        if id > U256::from(u64::MAX) {
            return Err(SenderError::connection(format!(
                "RPC reported out-of-range chain id {}",
                id
            )));
        }

        Ok(id.as_u64())
    }

    async fn get_transaction_count(&self, address: Address) -> SenderResult<U256> {
        self.provider
            .get_transaction_count(address, None)
            .await
            .map_err(|e| SenderError::rpc("eth_getTransactionCount", e))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> SenderResult<H256> {
        self.provider
            .send_raw_transaction(raw)
            .await
            .map(|pending| pending.tx_hash())
            .map_err(|e| SenderError::Rejected(e.to_string()))
    }

    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> SenderResult<Option<TransactionReceipt>> {
        self.provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| SenderError::rpc("eth_getTransactionReceipt", e))
    }
}

/// Connector that opens a fresh `ProxiedProvider` per account
pub struct HttpConnector {
    rpc_url: String,
    chain_id: u64,
    request_timeout: Duration,
}

impl HttpConnector {
    pub fn new(config: &ChainConfig) -> Self {
        Self {
            rpc_url: config.rpc_url.clone(),
            chain_id: config.chain_id,
            request_timeout: config.request_timeout(),
        }
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn connect(&self, account: &AccountConfig) -> SenderResult<Box<dyn RpcClient>> {
        let proxy = account
            .proxy
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty());

        match proxy {
            Some(p) => debug!("Routing through proxy {}", redact_proxy(p)),
            None => warn!("No proxy configured, connecting directly"),
        }

        let provider = ProxiedProvider::new(
            &self.rpc_url,
            proxy,
            &account.user_agent,
            self.request_timeout,
        )?;

        // Fail fast if the endpoint is unreachable through this proxy
        let remote_chain_id = provider.chain_id().await?;
        if remote_chain_id != self.chain_id {
            warn!(
                "RPC reports chain {} but {} is configured",
                remote_chain_id, self.chain_id
            );
        }

        Ok(Box::new(provider))
    }
}
