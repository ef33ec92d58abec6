//! Sequential driver: one account at a time, random pause in between

use crate::account::Account;
use crate::chain::Connector;
use crate::config::{AccountConfig, PacingConfig, Settings};
use crate::error::SenderResult;
use crate::tx::{ReceiptOutcome, ReceiptWaiter, TransactionSender, TransactionTemplate};

use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Success and error counts for a whole run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub success: usize,
    pub errors: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.success + self.errors
    }
}

/// Inclusive range of whole seconds to pause between accounts
#[derive(Debug, Clone, Copy)]
pub struct DelayRange {
    min_secs: u64,
    max_secs: u64,
}

impl DelayRange {
    pub fn from_config(config: &PacingConfig) -> Self {
        Self {
            min_secs: config.min_delay_secs,
            max_secs: config.max_delay_secs.max(config.min_delay_secs),
        }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        Duration::from_secs(rng.gen_range(self.min_secs..=self.max_secs))
    }
}

/// Walks the configured accounts in order
pub struct Driver<C: Connector> {
    settings: Arc<Settings>,
    connector: C,
    template: TransactionTemplate,
    waiter: ReceiptWaiter,
    delay: DelayRange,
}

impl<C: Connector> Driver<C> {
    pub fn new(settings: Arc<Settings>, connector: C) -> Self {
        let template = TransactionTemplate::from_config(&settings.chain);
        let waiter = ReceiptWaiter::from_config(&settings.chain);
        let delay = DelayRange::from_config(&settings.pacing);

        Self {
            settings,
            connector,
            template,
            waiter,
            delay,
        }
    }

    /// Process every account; failures are counted, never propagated
    pub async fn run(&self) -> RunSummary {
        info!("=== START MULTI-ACCOUNT PROCESSING ===");

        let accounts = &self.settings.accounts;
        let total = accounts.len();
        let mut summary = RunSummary::default();

        for (idx, account) in accounts.iter().enumerate() {
            let position = idx + 1;
            let started = Instant::now();
            info!("Processing account {}/{}", position, total);

            match self.process_account(position, account).await {
                Ok(_) => summary.success += 1,
                Err(_) => summary.errors += 1,
            }
            debug!(
                "Account {}/{} done in {:.1?}",
                position,
                total,
                started.elapsed()
            );

            if position < total {
                let pause = self.delay.sample(&mut rand::thread_rng());
                info!("Waiting {} seconds before next account", pause.as_secs());
                tokio::time::sleep(pause).await;
            }
        }

        info!("=== COMPLETED ===");
        info!("Success: {} | Errors: {}", summary.success, summary.errors);

        summary
    }

    /// Send the transaction for one account and log any failure under its id.
    ///
    /// A mined receipt is `Ok` whatever its status; a reverted transaction is
    /// logged as `FAILED` but the account still counts as processed.
    pub async fn process_account(
        &self,
        position: usize,
        config: &AccountConfig,
    ) -> SenderResult<ReceiptOutcome> {
        let account = match Account::from_config(config, self.settings.chain.chain_id) {
            Ok(account) => account,
            Err(e) => {
                // No address to show, fall back to the position
                error!("[account #{}] Error ({}): {}", position, e.kind(), e);
                return Err(e);
            }
        };

        let result = self.send_from(&account, config).await;
        if let Err(e) = &result {
            error!("[{}] Error ({}): {}", account.short_id(), e.kind(), e);
        }
        result
    }

    async fn send_from(
        &self,
        account: &Account,
        config: &AccountConfig,
    ) -> SenderResult<ReceiptOutcome> {
        let id = account.short_id();

        let client = self.connector.connect(config).await?;
        info!("[{}] Processing account", id);

        let sender = TransactionSender::new(client.as_ref(), account);
        let tx = sender.prepare(&self.template).await?;
        let tx_hash = sender.submit(&tx).await?;
        info!("[{}] Transaction sent: {:?}", id, tx_hash);

        let outcome = self.waiter.wait(client.as_ref(), tx_hash).await?;
        info!("[{}] Transaction {}", id, outcome.status_label());
        debug!(
            "[{}] Mined in block {:?}, gas used {:?}",
            id, outcome.block_number, outcome.gas_used
        );

        Ok(outcome)
    }
}
