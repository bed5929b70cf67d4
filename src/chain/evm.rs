use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{CreatorError, CreatorResult};
use super::{chain_name, select_endpoint, ChainClient, ContractCall, NetworkInfo, PendingTx, ReceiptLog, TxReceipt};

/// alloy-backed session: one HTTP endpoint, one local signer.
pub struct EvmSession {
    provider: DynProvider,
    signer: Address,
    endpoint: String,
    receipt_poll: Duration,
}

impl EvmSession {
    /// Bind to the first candidate that reports a block height.
    pub async fn connect(candidates: &[String], private_key: &str, receipt_poll: Duration) -> CreatorResult<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| CreatorError::config(format!("Invalid signer private key: {}", e)))?;
        let signer_address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let (endpoint, provider) = select_endpoint(candidates, |endpoint| {
            let wallet = wallet.clone();
            async move {
                let rpc_url: url::Url = endpoint
                    .parse()
                    .map_err(|e| CreatorError::connection(format!("invalid RPC url {}: {}", endpoint, e)))?;
                let provider = ProviderBuilder::new().wallet(wallet).on_http(rpc_url).erased();
                let height = provider
                    .get_block_number()
                    .await
                    .map_err(|e| CreatorError::connection(e.to_string()))?;
                debug!("Endpoint {} is at block {}", endpoint, height);
                Ok(provider)
            }
        })
        .await?;

        info!("Signer initialized with address: {}", signer_address);

        Ok(Self {
            provider,
            signer: signer_address,
            endpoint,
            receipt_poll,
        })
    }
}

#[async_trait]
impl ChainClient for EvmSession {
    fn signer(&self) -> Address {
        self.signer
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn network_info(&self) -> CreatorResult<NetworkInfo> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .map_err(|e| CreatorError::network(e.to_string()))?;

        Ok(NetworkInfo {
            name: chain_name(chain_id),
            chain_id,
        })
    }

    async fn balance(&self, account: Address) -> CreatorResult<U256> {
        self.provider
            .get_balance(account)
            .await
            .map_err(|e| CreatorError::network(e.to_string()))
    }

    async fn invoke(&self, call: ContractCall) -> CreatorResult<PendingTx> {
        let tx = TransactionRequest::default()
            .with_from(self.signer)
            .with_to(call.to)
            .with_input(call.calldata)
            .with_value(call.options.value)
            .with_gas_limit(call.options.gas_limit)
            .with_gas_price(call.options.gas_price);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| CreatorError::transaction(format!("{} submission failed: {}", call.method, e)))?;

        Ok(PendingTx {
            tx_hash: *pending.tx_hash(),
        })
    }

    async fn await_confirmation(&self, pending: &PendingTx) -> CreatorResult<TxReceipt> {
        loop {
            let receipt = self
                .provider
                .get_transaction_receipt(pending.tx_hash)
                .await
                .map_err(|e| CreatorError::transaction(format!("receipt lookup for {} failed: {}", pending.tx_hash, e)))?;

            if let Some(receipt) = receipt {
                let logs = receipt
                    .inner
                    .logs()
                    .iter()
                    .map(|log| ReceiptLog {
                        address: log.address(),
                        topics: log.topics().to_vec(),
                    })
                    .collect();

                return Ok(TxReceipt {
                    tx_hash: pending.tx_hash,
                    success: receipt.status(),
                    logs,
                });
            }

            tokio::time::sleep(self.receipt_poll).await;
        }
    }
}
