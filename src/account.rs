//! Sending accounts: key parsing, address derivation and log identifiers

use crate::config::AccountConfig;
use crate::error::{SenderError, SenderResult};

use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;
use ethers::utils::to_checksum;

/// An account whose key parsed and whose address is known
pub struct Account {
    wallet: LocalWallet,
    short_id: String,
}

impl Account {
    /// Parse the private key and bind the wallet to `chain_id`
    pub fn from_config(config: &AccountConfig, chain_id: u64) -> SenderResult<Self> {
        let key = config.private_key.trim();
        if key.is_empty() {
            return Err(SenderError::InvalidKey("private key is empty".to_string()));
        }

        let wallet = key
            .parse::<LocalWallet>()
            .map_err(|e| SenderError::InvalidKey(format!("Invalid private key: {}", e)))?
            .with_chain_id(chain_id);
        let short_id = short_address(&wallet.address());

        Ok(Self { wallet, short_id })
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }

    /// `0xAbCd...1234` form used as the log prefix
    pub fn short_id(&self) -> &str {
        &self.short_id
    }
}

/// First 6 and last 4 characters of the checksummed address
pub fn short_address(address: &Address) -> String {
    let checksummed = to_checksum(address, None);
    format!(
        "{}...{}",
        &checksummed[..6],
        &checksummed[checksummed.len() - 4..]
    )
}
