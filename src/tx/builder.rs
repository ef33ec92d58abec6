//! Fixed-shape transaction construction

use crate::config::ChainConfig;

use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, U256};

/// Everything about the transaction except sender and nonce
#[derive(Debug, Clone)]
pub struct TransactionTemplate {
    chain_id: u64,
    contract_address: Address,
    call_data: Bytes,
    gas_limit: U256,
    gas_price: U256,
}

impl TransactionTemplate {
    pub fn from_config(config: &ChainConfig) -> Self {
        Self {
            chain_id: config.chain_id,
            contract_address: config.contract_address,
            call_data: config.call_data.clone(),
            gas_limit: config.gas_limit,
            gas_price: config.gas_price,
        }
    }

    /// Legacy (EIP-155) call to the contract from `from` at `nonce`
    pub fn build(&self, from: Address, nonce: U256) -> TypedTransaction {
        let tx = TransactionRequest::new()
            .chain_id(self.chain_id)
            .from(from)
            .to(self.contract_address)
            .data(self.call_data.clone())
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .nonce(nonce);

        TypedTransaction::Legacy(tx)
    }
}
