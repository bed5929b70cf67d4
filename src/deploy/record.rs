use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::design::ContentHash;

/// One completed deployment. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub request: String,
    pub timestamp: DateTime<Utc>,
    pub agent: AgentUnit,
    pub component: ComponentUnit,
    pub network: NetworkRef,
    pub interaction_hints: InteractionHints,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentUnit {
    pub id: String,
    pub hash: ContentHash,
    pub transaction_hash: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentUnit {
    pub id: String,
    pub hash: ContentHash,
    pub transaction_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkRef {
    pub name: String,
    pub registry_address: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionHints {
    pub registry_lookup: String,
    pub curl: String,
}

impl InteractionHints {
    pub fn for_agent(agent_id: &str, registry_address: &str) -> Self {
        Self {
            registry_lookup: format!("call getUnitById({}) on registry {}", agent_id, registry_address),
            curl: format!(
                r#"curl -X POST -H "Content-Type: application/json" -d '{{"agentId": "{}"}}'"#,
                agent_id
            ),
        }
    }
}

impl DeploymentRecord {
    /// Store ordering key.
    pub fn created_millis(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Chat-ready summary appended to the conversation after a successful deployment.
    pub fn summary(&self) -> String {
        format!(
            "✅ Agent successfully deployed!\n\n\
             **Agent Details:**\n\
             - ID: {}\n\
             - Transaction: {}\n\
             - Description: {}\n\n\
             **How to Interact:**\n\
             You can interact with this agent by sending messages to it through the registry contract. \
             Use the agent ID {} to address your messages.",
            self.agent.id, self.agent.transaction_hash, self.agent.description, self.agent.id
        )
    }
}
