// Configuration management: defaults, optional TOML file, then environment
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{CreatorError, CreatorResult};

pub const DEFAULT_REGISTRY_ADDRESS: &str = "0x9c7a943f0c1686d68136831bd502bc7925bd4f43";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatorConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub chain: ChainConfig,
    pub deployment: DeploymentConfig,
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    /// Unset means the backend's default model.
    pub model: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            api_key: None,
            base_url: None,
            model: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub fallback_rpc_urls: Vec<String>,
    pub private_key: Option<String>,
    pub registry_address: String,
    pub network_name: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://sepolia.base.org".to_string(),
            fallback_rpc_urls: vec![
                "https://base-sepolia-rpc.publicnode.com".to_string(),
                "https://sepolia.base.org".to_string(),
                "https://1rpc.io/base-sepolia".to_string(),
            ],
            private_key: None,
            registry_address: DEFAULT_REGISTRY_ADDRESS.to_string(),
            network_name: "Base Sepolia".to_string(),
        }
    }
}

impl ChainConfig {
    /// Primary endpoint first, then fallbacks, without duplicates.
    pub fn candidate_endpoints(&self) -> Vec<String> {
        let mut endpoints: Vec<String> = Vec::new();
        for url in std::iter::once(&self.rpc_url).chain(self.fallback_rpc_urls.iter()) {
            let url = url.trim();
            if !url.is_empty() && !endpoints.iter().any(|e| e == url) {
                endpoints.push(url.to_string());
            }
        }
        endpoints
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub min_reserve_eth: String,
    pub deployment_fee_eth: String,
    pub component_gas_limit: u64,
    pub agent_gas_limit: u64,
    pub gas_price_gwei: String,
    pub settle_delay_ms: u64,
    pub receipt_poll_ms: u64,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            min_reserve_eth: "0.02".to_string(),
            deployment_fee_eth: "0.01".to_string(),
            component_gas_limit: 500_000,
            agent_gas_limit: 1_000_000,
            gas_price_gwei: "1.5".to_string(),
            settle_delay_ms: 2_000,
            receipt_poll_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("deployed-agents"),
        }
    }
}

pub struct ConfigManager {
    explicit_path: Option<PathBuf>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self { explicit_path: None }
    }

    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            explicit_path: Some(path.into()),
        }
    }

    /// Default location: `<config_dir>/creator-agent/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("creator-agent").join("config.toml"))
    }

    pub async fn load_config(&self) -> CreatorResult<CreatorConfig> {
        let mut config = match &self.explicit_path {
            Some(path) => Self::read_file(path).await?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read_file(&path).await?,
                _ => CreatorConfig::default(),
            },
        };

        apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
        Ok(config)
    }

    async fn read_file(path: &Path) -> CreatorResult<CreatorConfig> {
        info!("Loading configuration from {}", path.display());
        let content = tokio::fs::read_to_string(path).await?;
        parse_config(&content)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn parse_config(content: &str) -> CreatorResult<CreatorConfig> {
    toml::from_str(content).map_err(|e| CreatorError::config(format!("Invalid config file: {}", e)))
}

/// Environment wins over file values. `lookup` is injected so tests need not touch process env.
pub fn apply_env_overrides<F>(config: &mut CreatorConfig, lookup: F) -> CreatorResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("OPENAI_API_KEY") {
        config.llm.api_key = Some(key);
    }
    if let Some(provider) = lookup("LLM_PROVIDER") {
        config.llm.provider = provider;
    }
    if let Some(model) = lookup("LLM_MODEL") {
        config.llm.model = Some(model);
    }
    if let Some(base_url) = lookup("LLM_BASE_URL") {
        config.llm.base_url = Some(base_url);
    }
    if let Some(rpc_url) = lookup("RPC_URL") {
        config.chain.rpc_url = rpc_url;
    }
    if let Some(private_key) = lookup("PRIVATE_KEY") {
        config.chain.private_key = Some(private_key);
    }
    if let Some(registry) = lookup("REGISTRY_ADDRESS") {
        config.chain.registry_address = registry;
    }
    if let Some(host) = lookup("HOST") {
        config.server.host = host;
    }
    if let Some(port) = lookup("PORT") {
        config.server.port = port
            .parse()
            .map_err(|_| CreatorError::config(format!("PORT is not a valid port number: {}", port)))?;
    }
    if let Some(dir) = lookup("AGENTS_DIR") {
        config.store.dir = PathBuf::from(dir);
    }

    debug!("Effective configuration: provider={}, rpc={}", config.llm.provider, config.chain.rpc_url);
    Ok(())
}
