//! Chain connector: the seam between deployment orchestration and an EVM RPC endpoint.
//!
//! [`ChainClient`] is bound to one endpoint and one signing account for the lifetime of
//! the process. Binding happens once at startup through [`select_endpoint`]; a session
//! whose endpoint later goes away is not rebound.

use alloy::primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{info, warn};

use crate::error::{CreatorError, CreatorResult};

pub mod evm;
pub mod registry;

pub use evm::EvmSession;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub name: String,
    pub chain_id: u64,
}

/// Per-transaction fee and value settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOptions {
    pub value: U256,
    pub gas_limit: u64,
    pub gas_price: u128,
}

/// An ABI-encoded call against a contract.
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub to: Address,
    pub method: &'static str,
    pub calldata: Bytes,
    pub options: TxOptions,
}

/// A submitted transaction that has not been confirmed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingTx {
    pub tx_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLog {
    pub address: Address,
    pub topics: Vec<B256>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub tx_hash: B256,
    pub success: bool,
    pub logs: Vec<ReceiptLog>,
}

/// Network and account queries plus contract invocation. Implementations never retry;
/// callers decide what a failure means.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Address of the signing account.
    fn signer(&self) -> Address;

    /// RPC endpoint the session is bound to.
    fn endpoint(&self) -> &str;

    async fn network_info(&self) -> CreatorResult<NetworkInfo>;

    async fn balance(&self, account: Address) -> CreatorResult<U256>;

    /// Submit a call. The returned handle must be passed to
    /// [`ChainClient::await_confirmation`] to learn the outcome.
    async fn invoke(&self, call: ContractCall) -> CreatorResult<PendingTx>;

    /// Wait for inclusion. There is no timeout beyond what the transport imposes.
    async fn await_confirmation(&self, pending: &PendingTx) -> CreatorResult<TxReceipt>;
}

/// Try `candidates` in order; the first one whose `probe` succeeds is bound and the rest
/// are discarded.
pub async fn select_endpoint<T, F, Fut>(candidates: &[String], mut probe: F) -> CreatorResult<(String, T)>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = CreatorResult<T>>,
{
    let mut failures = Vec::new();

    for endpoint in candidates {
        match probe(endpoint.clone()).await {
            Ok(bound) => {
                info!("Connected to RPC endpoint: {}", endpoint);
                return Ok((endpoint.clone(), bound));
            }
            Err(e) => {
                warn!("RPC endpoint {} failed liveness check: {}", endpoint, e);
                failures.push(format!("{} ({})", endpoint, e));
            }
        }
    }

    if failures.is_empty() {
        return Err(CreatorError::connection("no RPC endpoints configured"));
    }

    Err(CreatorError::connection(format!(
        "could not connect to any RPC endpoint: {}",
        failures.join(", ")
    )))
}

/// `0x`-prefixed lowercase hex of a 32-byte value.
pub fn hex_b256(value: &B256) -> String {
    format!("0x{}", alloy::hex::encode(value.as_slice()))
}

/// Human-readable name for well-known chain ids.
pub fn chain_name(chain_id: u64) -> String {
    match chain_id {
        1 => "mainnet".to_string(),
        8453 => "base".to_string(),
        84532 => "base-sepolia".to_string(),
        11155111 => "sepolia".to_string(),
        31337 => "anvil".to_string(),
        other => format!("chain-{}", other),
    }
}
