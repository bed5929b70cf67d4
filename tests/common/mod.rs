#![allow(dead_code)]

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, B256, U256};
use alloy::sol_types::SolEvent;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use creator_agent::chain::registry::Registry;
use creator_agent::chain::{ChainClient, ContractCall, NetworkInfo, PendingTx, ReceiptLog, TxReceipt};
use creator_agent::config::CreatorConfig;
use creator_agent::providers::{ChatRequest, ChatResponse, Provider, ProviderClient};
use creator_agent::{AppContext, CreatorError, CreatorResult};

pub const SIGNER: Address = Address::repeat_byte(0x11);

/// Provider that replays scripted replies and records every request.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, String>>>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Result<String, String>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn replying(text: &str) -> Arc<Self> {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::new(vec![Err(message.to_string())])
    }

    pub fn recorded(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn chat_completion(&self, request: &ChatRequest) -> CreatorResult<ChatResponse> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Happy to help with blockchain deployment.".to_string()));

        match reply {
            Ok(content) => Ok(ChatResponse {
                content,
                model: "scripted".to_string(),
                provider: Provider::OpenAI,
                usage: None,
            }),
            Err(message) => Err(CreatorError::provider(message)),
        }
    }

    async fn health_check(&self) -> CreatorResult<bool> {
        Ok(true)
    }

    fn get_provider(&self) -> Provider {
        Provider::OpenAI
    }

    fn get_default_model(&self) -> &str {
        "scripted"
    }
}

/// What the mock chain does with the n-th submitted transaction.
#[derive(Debug, Clone)]
pub enum TxOutcome {
    /// Confirmed with a `CreateUnit` log carrying this unit id.
    Unit(u64),
    /// Confirmed with no logs at all.
    NoLogs,
    /// Mined but reverted.
    Reverted,
    /// Rejected at submission.
    RejectSubmit(String),
    /// Submitted, then confirmation fails.
    FailConfirm(String),
}

pub struct MockChain {
    pub balance: U256,
    pub network_down: bool,
    outcomes: Mutex<VecDeque<TxOutcome>>,
    pending: Mutex<Vec<(B256, TxOutcome)>>,
    pub calls: Mutex<Vec<ContractCall>>,
    next_hash: AtomicU64,
}

impl MockChain {
    pub fn new(balance_eth: &str, outcomes: Vec<TxOutcome>) -> Arc<Self> {
        Arc::new(Self {
            balance: parse_ether(balance_eth).unwrap(),
            network_down: false,
            outcomes: Mutex::new(outcomes.into()),
            pending: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_hash: AtomicU64::new(1),
        })
    }

    pub fn unreachable() -> Arc<Self> {
        Arc::new(Self {
            balance: U256::ZERO,
            network_down: true,
            outcomes: Mutex::new(VecDeque::new()),
            pending: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            next_hash: AtomicU64::new(1),
        })
    }

    pub fn submitted(&self) -> Vec<ContractCall> {
        self.calls.lock().unwrap().clone()
    }
}

pub fn tx_hash(n: u64) -> B256 {
    B256::from(U256::from(n).to_be_bytes::<32>())
}

pub fn create_unit_log(unit_id: u64) -> ReceiptLog {
    ReceiptLog {
        address: Address::repeat_byte(0x9c),
        topics: vec![
            Registry::CreateUnit::SIGNATURE_HASH,
            B256::from(U256::from(unit_id).to_be_bytes::<32>()),
            SIGNER.into_word(),
            B256::repeat_byte(0xab),
        ],
    }
}

#[async_trait]
impl ChainClient for MockChain {
    fn signer(&self) -> Address {
        SIGNER
    }

    fn endpoint(&self) -> &str {
        "mock://chain"
    }

    async fn network_info(&self) -> CreatorResult<NetworkInfo> {
        if self.network_down {
            return Err(CreatorError::network("connection refused"));
        }
        Ok(NetworkInfo {
            name: "base-sepolia".to_string(),
            chain_id: 84532,
        })
    }

    async fn balance(&self, _account: Address) -> CreatorResult<U256> {
        Ok(self.balance)
    }

    async fn invoke(&self, call: ContractCall) -> CreatorResult<PendingTx> {
        self.calls.lock().unwrap().push(call);
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected transaction submitted");

        if let TxOutcome::RejectSubmit(message) = &outcome {
            return Err(CreatorError::transaction(message.clone()));
        }

        let hash = tx_hash(self.next_hash.fetch_add(1, Ordering::SeqCst));
        self.pending.lock().unwrap().push((hash, outcome));
        Ok(PendingTx { tx_hash: hash })
    }

    async fn await_confirmation(&self, pending: &PendingTx) -> CreatorResult<TxReceipt> {
        let outcome = self
            .pending
            .lock()
            .unwrap()
            .iter()
            .find(|(hash, _)| *hash == pending.tx_hash)
            .map(|(_, outcome)| outcome.clone())
            .expect("unknown pending transaction");

        let (success, logs) = match outcome {
            TxOutcome::Unit(id) => (true, vec![create_unit_log(id)]),
            TxOutcome::NoLogs => (true, Vec::new()),
            TxOutcome::Reverted => (false, Vec::new()),
            TxOutcome::FailConfirm(message) => return Err(CreatorError::network(message)),
            TxOutcome::RejectSubmit(_) => unreachable!(),
        };

        Ok(TxReceipt {
            tx_hash: pending.tx_hash,
            success,
            logs,
        })
    }
}

pub fn test_config(store_dir: &Path) -> CreatorConfig {
    let mut config = CreatorConfig::default();
    config.store.dir = store_dir.to_path_buf();
    config.deployment.settle_delay_ms = 0;
    config
}

pub async fn build_app(
    store_dir: &Path,
    provider: Arc<ScriptedProvider>,
    chain: Arc<MockChain>,
) -> AppContext {
    AppContext::assemble(test_config(store_dir), provider, chain)
        .await
        .expect("app assembles")
}

pub const DESIGN_REPLY: &str = "Here is the design:\n```json\n{\n  \"componentHash\": \"0x1111111111111111111111111111111111111111111111111111111111111111\",\n  \"agentHash\": \"0x2222222222222222222222222222222222222222222222222222222222222222\",\n  \"description\": \"Tells a joke on request\"\n}\n```";

pub fn sample_record(created_millis: i64, agent_id: &str) -> creator_agent::DeploymentRecord {
    use creator_agent::deploy::{AgentUnit, ComponentUnit, InteractionHints, NetworkRef};
    use creator_agent::design::AgentDesign;

    let design = AgentDesign::fallback();
    creator_agent::DeploymentRecord {
        request: "create and deploy an agent that replies with a joke".to_string(),
        timestamp: chrono::DateTime::from_timestamp_millis(created_millis).expect("valid millis"),
        agent: AgentUnit {
            id: agent_id.to_string(),
            hash: design.agent_hash,
            transaction_hash: format!("0x{}", "aa".repeat(32)),
            description: design.description.clone(),
        },
        component: ComponentUnit {
            id: "1".to_string(),
            hash: design.component_hash,
            transaction_hash: format!("0x{}", "bb".repeat(32)),
        },
        network: NetworkRef {
            name: "Base Sepolia".to_string(),
            registry_address: creator_agent::config::DEFAULT_REGISTRY_ADDRESS.to_string(),
        },
        interaction_hints: InteractionHints::for_agent(agent_id, creator_agent::config::DEFAULT_REGISTRY_ADDRESS),
    }
}
