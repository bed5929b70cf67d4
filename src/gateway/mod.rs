// Conversation gateway: routes chat vs. deployment requests and answers status polls
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::conversation::ConversationState;
use crate::deploy::{DeploymentHandle, DeploymentRecord, Orchestrator};
use crate::error::CreatorResult;
use crate::providers::{ChatMessage, ChatRequest, ProviderClient};
use crate::store::DeploymentStore;

pub const DEPLOYING_ACK: &str = "I'll create and deploy an agent for you. First, let me design it...";

const CREATOR_PROMPT: &str = "You are the Creator Agent, an AI that can deploy other AIs to the blockchain. \
You can create agents when asked with phrases like \"create and deploy an agent that...\". \
Be helpful and informative about blockchain deployment.";

const INTENT_KEYWORDS: [&str; 3] = ["create", "agent", "deploy"];

/// Deployment intent: the lower-cased text contains every keyword as a substring.
pub fn is_deployment_request(text: &str) -> bool {
    let lowered = text.to_lowercase();
    INTENT_KEYWORDS.iter().all(|keyword| lowered.contains(keyword))
}

#[derive(Debug)]
pub struct GatewayReply {
    pub reply: String,
    pub deploying: bool,
    /// Present when a deployment was started. The HTTP layer drops it.
    pub job: Option<DeploymentHandle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum DeploymentStatus {
    None,
    Complete { agent: DeploymentRecord },
}

pub struct Gateway {
    provider: Arc<dyn ProviderClient>,
    model: Option<String>,
    conversation: ConversationState,
    orchestrator: Arc<Orchestrator>,
    store: Arc<DeploymentStore>,
}

impl Gateway {
    pub fn new(
        provider: Arc<dyn ProviderClient>,
        model: Option<String>,
        conversation: ConversationState,
        orchestrator: Arc<Orchestrator>,
        store: Arc<DeploymentStore>,
    ) -> Self {
        Self {
            provider,
            model,
            conversation,
            orchestrator,
            store,
        }
    }

    pub fn conversation(&self) -> &ConversationState {
        &self.conversation
    }

    pub async fn handle_message(&self, text: &str) -> CreatorResult<GatewayReply> {
        self.conversation.push_user(text).await;
        info!("User: {}", text);

        if is_deployment_request(text) {
            self.conversation.push_assistant(DEPLOYING_ACK).await;
            let job = self.orchestrator.spawn(text.to_string());

            return Ok(GatewayReply {
                reply: DEPLOYING_ACK.to_string(),
                deploying: true,
                job: Some(job),
            });
        }

        let mut messages = vec![ChatMessage::system(CREATOR_PROMPT)];
        messages.extend(self.conversation.snapshot().await);

        let request = ChatRequest {
            messages,
            model: self.model.clone(),
            temperature: None,
            max_tokens: None,
        };

        let response = self.provider.chat_completion(&request).await?;
        self.conversation.push_assistant(response.content.clone()).await;
        info!("Creator: {}", response.content);

        Ok(GatewayReply {
            reply: response.content,
            deploying: false,
            job: None,
        })
    }

    pub async fn poll_status(&self) -> CreatorResult<DeploymentStatus> {
        Ok(match self.store.latest().await? {
            Some(record) => DeploymentStatus::Complete { agent: record },
            None => DeploymentStatus::None,
        })
    }
}
