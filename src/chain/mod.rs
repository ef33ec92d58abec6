//! Chain module - RPC access for a single account
//!
//! This module provides:
//! - The `RpcClient` seam over the four JSON-RPC calls the sender needs
//! - The `Connector` that opens a proxied, user-agent tagged session per account

pub mod provider;

pub use provider::HttpConnector;

use crate::config::AccountConfig;
use crate::error::SenderResult;

use async_trait::async_trait;
use ethers::types::{Address, Bytes, TransactionReceipt, H256, U256};
#[cfg(test)]
use mockall::automock;

/// JSON-RPC calls used while sending one transaction
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// `eth_chainId`
    async fn chain_id(&self) -> SenderResult<u64>;

    /// `eth_getTransactionCount` at the latest block
    async fn get_transaction_count(&self, address: Address) -> SenderResult<U256>;

    /// `eth_sendRawTransaction`
    async fn send_raw_transaction(&self, raw: Bytes) -> SenderResult<H256>;

    /// `eth_getTransactionReceipt`, `None` while the transaction is pending
    async fn get_transaction_receipt(
        &self,
        tx_hash: H256,
    ) -> SenderResult<Option<TransactionReceipt>>;
}

/// Opens an RPC session for one account
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Connector: Send + Sync {
    /// Build a client routed through the account's proxy and probe the endpoint
    async fn connect(&self, account: &AccountConfig) -> SenderResult<Box<dyn RpcClient>>;
}
