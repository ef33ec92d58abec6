//! Local signing and raw submission for one account

use super::builder::TransactionTemplate;
use crate::account::Account;
use crate::chain::RpcClient;
use crate::error::{SenderError, SenderResult};

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Bytes, H256};
use tracing::debug;

/// Sends transactions for a single account over that account's session
pub struct TransactionSender<'a> {
    client: &'a dyn RpcClient,
    account: &'a Account,
}

impl<'a> TransactionSender<'a> {
    pub fn new(client: &'a dyn RpcClient, account: &'a Account) -> Self {
        Self { client, account }
    }

    /// Fetch the current nonce and fill in the template
    pub async fn prepare(&self, template: &TransactionTemplate) -> SenderResult<TypedTransaction> {
        let nonce = self
            .client
            .get_transaction_count(self.account.address())
            .await?;
        debug!("[{}] Using nonce {}", self.account.short_id(), nonce);

        Ok(template.build(self.account.address(), nonce))
    }

    /// Sign locally and return the RLP-encoded signed transaction
    pub fn sign(&self, tx: &TypedTransaction) -> SenderResult<Bytes> {
        let signature = self
            .account
            .wallet()
            .sign_transaction_sync(tx)
            .map_err(|e| SenderError::Signing(e.to_string()))?;

        Ok(tx.rlp_signed(&signature))
    }

    /// Sign and broadcast, returning the transaction hash
    pub async fn submit(&self, tx: &TypedTransaction) -> SenderResult<H256> {
        let raw = self.sign(tx)?;
        self.client.send_raw_transaction(raw).await
    }
}
