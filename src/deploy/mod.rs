//! Deployment orchestration: design, preflight, two dependent registry transactions,
//! persistence.
//!
//! Every `deploy` creates a fresh component; nothing from an earlier, partially failed
//! attempt is reused or rolled back. Concurrent deployments share the signer without any
//! coordination, so two jobs started together may race on the account nonce.

use alloy::primitives::utils::{format_ether, parse_ether, parse_units};
use alloy::primitives::{Address, B256, U256};
use chrono::Utc;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::chain::registry::{encode_create, unit_id_from_receipt};
use crate::chain::{hex_b256, ChainClient, ContractCall, TxOptions};
use crate::config::{ChainConfig, DeploymentConfig};
use crate::conversation::ConversationState;
use crate::design::{AgentDesign, ContentHash, Synthesizer};
use crate::error::{CreatorError, CreatorResult};
use crate::store::DeploymentStore;

pub mod record;

pub use record::{AgentUnit, ComponentUnit, DeploymentRecord, InteractionHints, NetworkRef};

/// Used when a component receipt carries no unit id in its logs. The resulting record
/// may name the wrong unit.
pub const COMPONENT_PLACEHOLDER_ID: u64 = 1;
/// Same as [`COMPONENT_PLACEHOLDER_ID`], for the agent transaction.
pub const AGENT_PLACEHOLDER_ID: u64 = 2;

#[derive(Debug, Clone)]
pub struct DeploymentSettings {
    pub registry_address: Address,
    pub network_name: String,
    pub min_reserve: U256,
    pub deployment_fee: U256,
    pub component_gas_limit: u64,
    pub agent_gas_limit: u64,
    pub gas_price: u128,
    /// Pause between the component and agent transactions. A fixed wait, not a
    /// confirmation-depth rule.
    pub settle_delay: Duration,
}

impl DeploymentSettings {
    pub fn from_config(chain: &ChainConfig, deployment: &DeploymentConfig) -> CreatorResult<Self> {
        let registry_address = Address::from_str(chain.registry_address.trim())
            .map_err(|e| CreatorError::config(format!("Invalid registry address: {}", e)))?;
        let min_reserve = parse_ether(&deployment.min_reserve_eth)
            .map_err(|e| CreatorError::config(format!("Invalid min_reserve_eth: {}", e)))?;
        let deployment_fee = parse_ether(&deployment.deployment_fee_eth)
            .map_err(|e| CreatorError::config(format!("Invalid deployment_fee_eth: {}", e)))?;
        let gas_price: U256 = parse_units(&deployment.gas_price_gwei, "gwei")
            .map_err(|e| CreatorError::config(format!("Invalid gas_price_gwei: {}", e)))?
            .into();
        let gas_price = u128::try_from(gas_price)
            .map_err(|_| CreatorError::config("gas_price_gwei is out of range"))?;

        Ok(Self {
            registry_address,
            network_name: chain.network_name.clone(),
            min_reserve,
            deployment_fee,
            component_gas_limit: deployment.component_gas_limit,
            agent_gas_limit: deployment.agent_gas_limit,
            gas_price,
            settle_delay: Duration::from_millis(deployment.settle_delay_ms),
        })
    }
}

/// A deployment running detached from the request that started it.
#[derive(Debug)]
pub struct DeploymentHandle {
    pub job_id: String,
    join: JoinHandle<CreatorResult<DeploymentRecord>>,
}

impl DeploymentHandle {
    pub async fn wait(self) -> CreatorResult<DeploymentRecord> {
        self.join
            .await
            .map_err(|e| CreatorError::task(format!("deployment job {} aborted: {}", self.job_id, e)))?
    }
}

struct ConfirmedUnit {
    id: U256,
    tx_hash: B256,
}

pub struct Orchestrator {
    synthesizer: Synthesizer,
    chain: Arc<dyn ChainClient>,
    store: Arc<DeploymentStore>,
    conversation: ConversationState,
    settings: DeploymentSettings,
}

impl Orchestrator {
    pub fn new(
        synthesizer: Synthesizer,
        chain: Arc<dyn ChainClient>,
        store: Arc<DeploymentStore>,
        conversation: ConversationState,
        settings: DeploymentSettings,
    ) -> Self {
        Self {
            synthesizer,
            chain,
            store,
            conversation,
            settings,
        }
    }

    pub fn settings(&self) -> &DeploymentSettings {
        &self.settings
    }

    /// Run `deploy` on its own task. Dropping the handle detaches it; the outcome is
    /// logged either way.
    pub fn spawn(self: &Arc<Self>, request: String) -> DeploymentHandle {
        let job_id = uuid::Uuid::new_v4().to_string();
        let orchestrator = Arc::clone(self);
        let job = job_id.clone();

        let join = tokio::spawn(async move {
            let result = orchestrator.deploy(&request).await;
            match &result {
                Ok(record) => info!("Deployment {} complete: agent {}", job, record.agent.id),
                Err(e) => error!("Deployment {} failed: {}", job, e),
            }
            result
        });

        info!("Started deployment job {}", job_id);
        DeploymentHandle { job_id, join }
    }

    /// Design, register and persist an agent. The outcome, success or failure, is also
    /// appended to the conversation.
    pub async fn deploy(&self, request: &str) -> CreatorResult<DeploymentRecord> {
        match self.run(request).await {
            Ok(record) => {
                self.conversation.push_assistant(record.summary()).await;
                Ok(record)
            }
            Err(e) => {
                error!("Deployment error: {}", e);
                self.conversation
                    .push_assistant(format!(
                        "I encountered an error while trying to deploy the agent: {}",
                        e
                    ))
                    .await;
                Err(e)
            }
        }
    }

    async fn run(&self, request: &str) -> CreatorResult<DeploymentRecord> {
        let design = self.synthesizer.synthesize(request).await;
        info!(
            "Agent design: component {}, agent {}, \"{}\"",
            design.component_hash, design.agent_hash, design.description
        );

        self.preflight().await?;

        let component = self
            .create_unit(
                "component",
                design.component_hash,
                Vec::new(),
                TxOptions {
                    value: U256::ZERO,
                    gas_limit: self.settings.component_gas_limit,
                    gas_price: self.settings.gas_price,
                },
                COMPONENT_PLACEHOLDER_ID,
            )
            .await?;

        if !self.settings.settle_delay.is_zero() {
            tokio::time::sleep(self.settings.settle_delay).await;
        }

        let agent = self
            .create_unit(
                "agent",
                design.agent_hash,
                vec![component.id],
                TxOptions {
                    value: self.settings.deployment_fee,
                    gas_limit: self.settings.agent_gas_limit,
                    gas_price: self.settings.gas_price,
                },
                AGENT_PLACEHOLDER_ID,
            )
            .await?;

        let record = self.build_record(request, &design, &component, &agent);
        self.store.append(&record).await?;
        Ok(record)
    }

    /// Network reachable and signer balance at or above the reserve. The reserve is a
    /// conservative gate, not a cost estimate for the two transactions.
    async fn preflight(&self) -> CreatorResult<()> {
        let network = self.chain.network_info().await.map_err(as_network_error)?;
        info!("Current network: {} (chain id {})", network.name, network.chain_id);

        let balance = self
            .chain
            .balance(self.chain.signer())
            .await
            .map_err(as_network_error)?;
        info!("Signer balance: {} ETH", format_ether(balance));

        if balance < self.settings.min_reserve {
            return Err(CreatorError::InsufficientFunds {
                balance: format_ether(balance),
                required: format_ether(self.settings.min_reserve),
            });
        }
        Ok(())
    }

    async fn create_unit(
        &self,
        label: &'static str,
        hash: ContentHash,
        dependencies: Vec<U256>,
        options: TxOptions,
        placeholder_id: u64,
    ) -> CreatorResult<ConfirmedUnit> {
        info!("Creating {}...", label);
        let call = ContractCall {
            to: self.settings.registry_address,
            method: "create",
            calldata: encode_create(self.chain.signer(), hash.as_b256(), dependencies),
            options,
        };

        let pending = self.chain.invoke(call).await.map_err(as_transaction_error)?;
        info!("{} transaction sent: {}", label, hex_b256(&pending.tx_hash));

        let receipt = self
            .chain
            .await_confirmation(&pending)
            .await
            .map_err(as_transaction_error)?;
        if !receipt.success {
            return Err(CreatorError::transaction(format!(
                "{} transaction {} reverted",
                label,
                hex_b256(&pending.tx_hash)
            )));
        }

        let id = unit_id_from_receipt(&receipt).unwrap_or_else(|| {
            warn!(
                "No unit id in {} receipt logs, using placeholder id {}",
                label, placeholder_id
            );
            U256::from(placeholder_id)
        });
        info!("{} created, ID: {}", label, id);

        Ok(ConfirmedUnit {
            id,
            tx_hash: pending.tx_hash,
        })
    }

    fn build_record(
        &self,
        request: &str,
        design: &AgentDesign,
        component: &ConfirmedUnit,
        agent: &ConfirmedUnit,
    ) -> DeploymentRecord {
        let registry_address = self.settings.registry_address.to_string();
        let agent_id = agent.id.to_string();

        DeploymentRecord {
            request: request.to_string(),
            timestamp: Utc::now(),
            interaction_hints: InteractionHints::for_agent(&agent_id, &registry_address),
            agent: AgentUnit {
                id: agent_id,
                hash: design.agent_hash,
                transaction_hash: hex_b256(&agent.tx_hash),
                description: design.description.clone(),
            },
            component: ComponentUnit {
                id: component.id.to_string(),
                hash: design.component_hash,
                transaction_hash: hex_b256(&component.tx_hash),
            },
            network: NetworkRef {
                name: self.settings.network_name.clone(),
                registry_address,
            },
        }
    }
}

fn as_network_error(e: CreatorError) -> CreatorError {
    match e {
        CreatorError::Network(_) => e,
        other => CreatorError::network(format!("cannot reach blockchain network: {}", other)),
    }
}

fn as_transaction_error(e: CreatorError) -> CreatorError {
    match e {
        CreatorError::Transaction(_) => e,
        other => CreatorError::transaction(other.to_string()),
    }
}
