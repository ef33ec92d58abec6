//! Receipt polling with a hard timeout

use crate::chain::RpcClient;
use crate::config::ChainConfig;
use crate::error::{SenderError, SenderResult};

use ethers::types::{TransactionReceipt, H256, U256};
use std::time::Duration;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::debug;

/// What the receipt says about a mined transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptOutcome {
    pub tx_hash: H256,
    pub success: bool,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
}

impl ReceiptOutcome {
    pub fn from_receipt(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            success: receipt.status == Some(1u64.into()),
            block_number: receipt.block_number.map(|b| b.as_u64()),
            gas_used: receipt.gas_used,
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.success {
            "SUCCESS"
        } else {
            "FAILED"
        }
    }
}

/// Polls `eth_getTransactionReceipt` until it returns or the timeout hits
pub struct ReceiptWaiter {
    timeout: Duration,
    poll_interval: Duration,
}

impl ReceiptWaiter {
    pub fn new(timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            timeout,
            poll_interval,
        }
    }

    pub fn from_config(config: &ChainConfig) -> Self {
        Self::new(config.confirmation_timeout(), config.receipt_poll_interval())
    }

    /// Wait for the receipt of `tx_hash`. Poll errors end the wait early.
    pub async fn wait(&self, client: &dyn RpcClient, tx_hash: H256) -> SenderResult<ReceiptOutcome> {
        let poll = async {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut attempts: u64 = 0;

            loop {
                ticker.tick().await;
                attempts += 1;

                if let Some(receipt) = client.get_transaction_receipt(tx_hash).await? {
                    debug!("Receipt for {:?} after {} polls", tx_hash, attempts);
                    return Ok(ReceiptOutcome::from_receipt(&receipt));
                }
            }
        };

        match timeout(self.timeout, poll).await {
            Ok(result) => result,
            Err(_) => Err(SenderError::ConfirmationTimeout {
                tx_hash: format!("{:?}", tx_hash),
                timeout_secs: self.timeout.as_secs(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockRpcClient;
    use ethers::types::U64;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn receipt(tx_hash: H256, status: u64) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: tx_hash,
            status: Some(U64::from(status)),
            block_number: Some(U64::from(42u64)),
            gas_used: Some(U256::from(21000u64)),
            ..Default::default()
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_returns_once_receipt_appears() {
        let hash = H256::repeat_byte(0x01);
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let mut client = MockRpcClient::new();
        client.expect_get_transaction_receipt().returning(move |h| {
            if seen.fetch_add(1, Ordering::SeqCst) < 3 {
                Ok(None)
            } else {
                Ok(Some(receipt(h, 1)))
            }
        });

        let waiter = ReceiptWaiter::new(Duration::from_secs(120), Duration::from_millis(100));
        let outcome = waiter.wait(&client, hash).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(outcome.tx_hash, hash);
        assert!(outcome.success);
        assert_eq!(outcome.status_label(), "SUCCESS");
        assert_eq!(outcome.block_number, Some(42));
        assert_eq!(outcome.gas_used, Some(U256::from(21000u64)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_zero_is_failure() {
        let hash = H256::repeat_byte(0x02);
        let mut client = MockRpcClient::new();
        client
            .expect_get_transaction_receipt()
            .returning(move |h| Ok(Some(receipt(h, 0))));

        let waiter = ReceiptWaiter::new(Duration::from_secs(5), Duration::from_millis(100));
        let outcome = waiter.wait(&client, hash).await.unwrap();

        assert!(!outcome.success);
        assert_eq!(outcome.status_label(), "FAILED");
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_without_receipt() {
        let mut client = MockRpcClient::new();
        client
            .expect_get_transaction_receipt()
            .returning(|_| Ok(None));

        let waiter = ReceiptWaiter::new(Duration::from_secs(120), Duration::from_millis(100));
        let result = waiter.wait(&client, H256::repeat_byte(0x03)).await;

        match result {
            Err(SenderError::ConfirmationTimeout { timeout_secs, .. }) => {
                assert_eq!(timeout_secs, 120)
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_ends_wait() {
        let mut client = MockRpcClient::new();
        client
            .expect_get_transaction_receipt()
            .times(1)
            .returning(|_| Err(SenderError::rpc("eth_getTransactionReceipt", "bad gateway")));

        let waiter = ReceiptWaiter::new(Duration::from_secs(120), Duration::from_millis(100));
        let result = waiter.wait(&client, H256::zero()).await;
        assert!(matches!(result, Err(SenderError::Rpc { .. })));
    }
}
