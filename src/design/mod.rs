//! Design synthesis: turning a free-text request into an [`AgentDesign`].
//!
//! The model is asked for a JSON object carrying two content hashes and a description.
//! Whatever comes back, the resulting design always holds two well-formed hashes: any
//! hash the model omits or garbles is rebuilt deterministically with [`ContentSpec`].

use alloy::primitives::{keccak256, B256};
use alloy::sol_types::SolValue;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::chain::hex_b256;
use crate::error::{CreatorError, CreatorResult};
use crate::providers::{ChatMessage, ChatRequest, ProviderClient};

pub mod extract;

pub use extract::{extract_json_object, Extraction};

pub const DEFAULT_RESPONSE_MESSAGE: &str = "Hello from the blockchain!";
pub const DEFAULT_AGENT_NAME: &str = "Blockchain Agent";
pub const DEFAULT_AGENT_URI: &str = "static://blockchain-agent";
pub const DEFAULT_DESCRIPTION: &str = "A simple agent that responds with a greeting";

const DESIGNER_PROMPT: &str = "You are an expert blockchain agent designer. You create the content hashes \
for an agent that will be registered on-chain, based on the user's request.\n\n\
Return a JSON object with exactly this shape:\n\
{\n  \"componentHash\": \"0x...\",\n  \"agentHash\": \"0x...\",\n  \"description\": \"Brief description of what the agent does\"\n}\n\n\
Each hash is the keccak256 digest of ABI-encoded string values.\n\
For a component that responds with a fixed message, encode: [\"STATIC_RESPONSE\", \"The response message\"]\n\
For an agent, encode: [\"STATIC_AGENT\", \"Agent Name\", \"static://description\"]";

/// A 32-byte content digest, rendered as `0x` followed by 64 hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(B256);

impl ContentHash {
    /// Accepts only the canonical `0x` + 64 hex digit form.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s.strip_prefix("0x")?;
        if digits.len() != 64 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        B256::from_str(digits).ok().map(ContentHash)
    }

    pub fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<B256> for ContentHash {
    fn from(value: B256) -> Self {
        ContentHash(value)
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex_b256(&self.0))
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ContentHash::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("malformed content hash: {}", raw)))
    }
}

/// Tagged tuple describing static behavior; its hash is keccak256 over the ABI
/// parameter encoding of the tuple's strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSpec<'a> {
    StaticResponse { message: &'a str },
    StaticAgent { name: &'a str, uri: &'a str },
}

impl ContentSpec<'_> {
    pub fn tag(&self) -> &'static str {
        match self {
            ContentSpec::StaticResponse { .. } => "STATIC_RESPONSE",
            ContentSpec::StaticAgent { .. } => "STATIC_AGENT",
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        match self {
            ContentSpec::StaticResponse { message } => {
                (self.tag().to_string(), message.to_string()).abi_encode_params()
            }
            ContentSpec::StaticAgent { name, uri } => {
                (self.tag().to_string(), name.to_string(), uri.to_string()).abi_encode_params()
            }
        }
    }

    pub fn hash(&self) -> ContentHash {
        ContentHash(keccak256(self.encode()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentDesign {
    pub component_hash: ContentHash,
    pub agent_hash: ContentHash,
    pub description: String,
}

impl AgentDesign {
    /// Generic greeting agent used when the model cannot be reached or its output is unusable.
    pub fn fallback() -> Self {
        Self {
            component_hash: ContentSpec::StaticResponse { message: DEFAULT_RESPONSE_MESSAGE }.hash(),
            agent_hash: default_agent_hash(),
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

fn default_agent_hash() -> ContentHash {
    ContentSpec::StaticAgent {
        name: DEFAULT_AGENT_NAME,
        uri: DEFAULT_AGENT_URI,
    }
    .hash()
}

/// Build a design from raw model output. Never fails.
pub fn design_from_model_text(text: &str) -> AgentDesign {
    let Some((strategy, value)) = extract_json_object(text) else {
        warn!("No JSON object found in model output, using default design");
        return AgentDesign::fallback();
    };
    debug!("Model output parsed with {:?}", strategy);

    let raw_description = value
        .get("description")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let component_hash = hash_field(&value, "componentHash").unwrap_or_else(|| {
        warn!("Model componentHash missing or malformed, regenerating");
        ContentSpec::StaticResponse {
            message: raw_description.unwrap_or(DEFAULT_RESPONSE_MESSAGE),
        }
        .hash()
    });

    let agent_hash = hash_field(&value, "agentHash").unwrap_or_else(|| {
        warn!("Model agentHash missing or malformed, regenerating");
        default_agent_hash()
    });

    AgentDesign {
        component_hash,
        agent_hash,
        description: raw_description.unwrap_or(DEFAULT_DESCRIPTION).to_string(),
    }
}

fn hash_field(value: &Value, field: &str) -> Option<ContentHash> {
    value.get(field).and_then(Value::as_str).and_then(ContentHash::parse)
}

pub struct Synthesizer {
    provider: Arc<dyn ProviderClient>,
    model: Option<String>,
}

impl Synthesizer {
    pub fn new(provider: Arc<dyn ProviderClient>, model: Option<String>) -> Self {
        Self { provider, model }
    }

    /// Ask the model for a design. Only a failed model call is an error; unusable
    /// output is repaired.
    pub async fn try_synthesize(&self, request: &str) -> CreatorResult<AgentDesign> {
        info!("Designing agent based on request: {}", request);

        let chat_request = ChatRequest {
            messages: vec![ChatMessage::system(DESIGNER_PROMPT), ChatMessage::user(request)],
            model: self.model.clone(),
            temperature: None,
            max_tokens: None,
        };

        let response = self
            .provider
            .chat_completion(&chat_request)
            .await
            .map_err(|e| CreatorError::synthesis(e.to_string()))?;

        debug!("Designer response: {}", response.content);
        Ok(design_from_model_text(&response.content))
    }

    pub async fn synthesize(&self, request: &str) -> AgentDesign {
        match self.try_synthesize(request).await {
            Ok(design) => design,
            Err(e) => {
                warn!("{}; falling back to default design", e);
                AgentDesign::fallback()
            }
        }
    }
}
