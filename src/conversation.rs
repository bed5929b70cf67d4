// Process-scoped chat log shared by the gateway and the orchestrator
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::providers::ChatMessage;

/// Append-only sequence of chat turns. Created once at startup, cloned into the gateway
/// and the orchestrator, dropped at shutdown. Nothing is persisted.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    turns: Arc<RwLock<Vec<ChatMessage>>>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push(&self, message: ChatMessage) {
        self.turns.write().await.push(message);
    }

    pub async fn push_user<T: Into<String>>(&self, content: T) {
        self.push(ChatMessage::user(content)).await;
    }

    pub async fn push_assistant<T: Into<String>>(&self, content: T) {
        self.push(ChatMessage::assistant(content)).await;
    }

    pub async fn snapshot(&self) -> Vec<ChatMessage> {
        self.turns.read().await.clone()
    }

    pub async fn last(&self) -> Option<ChatMessage> {
        self.turns.read().await.last().cloned()
    }

    pub async fn len(&self) -> usize {
        self.turns.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.turns.read().await.is_empty()
    }
}
