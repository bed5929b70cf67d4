// Startup wiring for process-scoped state
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::chain::{ChainClient, EvmSession};
use crate::config::CreatorConfig;
use crate::conversation::ConversationState;
use crate::deploy::{DeploymentSettings, Orchestrator};
use crate::design::Synthesizer;
use crate::error::{CreatorError, CreatorResult};
use crate::gateway::Gateway;
use crate::providers::{self, ProviderClient};
use crate::store::DeploymentStore;

/// Everything that lives for the whole process: created once at startup, shared by
/// reference, dropped at shutdown.
pub struct AppContext {
    pub config: CreatorConfig,
    pub conversation: ConversationState,
    pub chain: Arc<dyn ChainClient>,
    pub store: Arc<DeploymentStore>,
    pub orchestrator: Arc<Orchestrator>,
    pub gateway: Arc<Gateway>,
}

impl AppContext {
    /// Connect to the chain and build every component from configuration.
    pub async fn initialize(config: CreatorConfig) -> CreatorResult<Self> {
        let private_key = config
            .chain
            .private_key
            .clone()
            .ok_or_else(|| CreatorError::config("PRIVATE_KEY is not set"))?;

        let provider = providers::build_provider(&config.llm)?;
        match provider.health_check().await {
            Ok(true) => info!(
                "Language model backend {} is reachable (default model {})",
                provider.get_provider(),
                provider.get_default_model()
            ),
            _ => warn!("Language model backend {} did not answer its health check", provider.get_provider()),
        }

        let chain: Arc<dyn ChainClient> = Arc::new(
            EvmSession::connect(
                &config.chain.candidate_endpoints(),
                &private_key,
                Duration::from_millis(config.deployment.receipt_poll_ms),
            )
            .await?,
        );

        Self::assemble(config, provider, chain).await
    }

    /// Build from already-constructed backends.
    pub async fn assemble(
        config: CreatorConfig,
        provider: Arc<dyn ProviderClient>,
        chain: Arc<dyn ChainClient>,
    ) -> CreatorResult<Self> {
        let settings = DeploymentSettings::from_config(&config.chain, &config.deployment)?;
        let store = Arc::new(DeploymentStore::open(config.store.dir.clone()).await?);
        let conversation = ConversationState::new();

        let orchestrator = Arc::new(Orchestrator::new(
            Synthesizer::new(Arc::clone(&provider), config.llm.model.clone()),
            Arc::clone(&chain),
            Arc::clone(&store),
            conversation.clone(),
            settings,
        ));

        let gateway = Arc::new(Gateway::new(
            provider,
            config.llm.model.clone(),
            conversation.clone(),
            Arc::clone(&orchestrator),
            Arc::clone(&store),
        ));

        info!(
            "Creator agent ready: rpc={}, signer={}, store={}",
            chain.endpoint(),
            chain.signer(),
            store.dir().display()
        );

        Ok(Self {
            config,
            conversation,
            chain,
            store,
            orchestrator,
            gateway,
        })
    }
}
