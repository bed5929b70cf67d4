//! # Creator Agent
//!
//! A chat service that can design an agent from a natural-language request and register
//! it on an on-chain unit registry, then report the result to a polling client.
//!
//! ## Flow
//!
//! - [`gateway::Gateway`] receives a chat message. Requests containing "create", "agent"
//!   and "deploy" are acknowledged immediately and handed to the orchestrator on a
//!   detached task; anything else gets a model reply.
//! - [`deploy::Orchestrator`] asks [`design::Synthesizer`] for an [`design::AgentDesign`],
//!   checks the signer's balance, registers a component and then an agent that depends
//!   on it through a [`chain::ChainClient`], and appends a record to
//!   [`store::DeploymentStore`].
//! - Clients poll [`gateway::Gateway::poll_status`] for the newest record.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use creator_agent::{AppContext, ApiServer, config::ConfigManager};
//!
//! #[tokio::main]
//! async fn main() -> creator_agent::CreatorResult<()> {
//!     let config = ConfigManager::new().load_config().await?;
//!     let (host, port) = (config.server.host.clone(), config.server.port);
//!     let app = AppContext::initialize(config).await?;
//!     ApiServer::new(app.gateway).start(&host, port).await
//! }
//! ```

pub mod api;
pub mod app;
pub mod chain;
pub mod config;
pub mod conversation;
pub mod deploy;
pub mod design;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod store;

// Re-export commonly used types
pub use api::ApiServer;
pub use app::AppContext;
pub use chain::{ChainClient, EvmSession};
pub use config::CreatorConfig;
pub use conversation::ConversationState;
pub use deploy::{DeploymentRecord, Orchestrator};
pub use design::{AgentDesign, Synthesizer};
pub use error::{CreatorError, CreatorResult};
pub use gateway::{DeploymentStatus, Gateway};
pub use providers::{ChatMessage, ChatRequest, ChatResponse, ProviderClient};
pub use store::DeploymentStore;

/// The current version of the creator agent
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
