// Interactive line client for a running creator-agent server
use crossterm::style::Stylize;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use creator_agent::api::{ChatApiRequest, ChatApiResponse};
use creator_agent::{CreatorError, CreatorResult, DeploymentRecord, DeploymentStatus};

pub struct CreatorClient {
    http: reqwest::Client,
    base_url: String,
}

impl CreatorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub async fn status(&self) -> CreatorResult<DeploymentStatus> {
        let url = format!("{}/deployment/status", self.base_url);
        let response = self.http.get(&url).send().await?;
        Self::decode(response).await
    }

    pub async fn send(&self, message: &str) -> CreatorResult<ChatApiResponse> {
        let url = format!("{}/chat", self.base_url);
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .json(&ChatApiRequest { message: message.to_string() })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> CreatorResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body: serde_json::Value = response.json().await.unwrap_or_default();
            let message = body["error"].as_str().unwrap_or("unknown error");
            return Err(CreatorError::provider(format!("server returned {}: {}", status, message)));
        }
        Ok(response.json().await?)
    }
}

pub async fn run_chat(server: &str, poll_interval: Duration, max_polls: u32) -> CreatorResult<()> {
    println!("{}", "=== Creator Agent Client ===".green().bold());

    let client = CreatorClient::new(server);
    println!("{}", "Connecting to Creator Agent server...".blue());
    if let Err(e) = client.status().await {
        eprintln!("{}", "❌ Cannot connect to Creator Agent server!".red());
        eprintln!("{}", format!("Make sure the server is running at {}", server).red());
        return Err(e);
    }
    println!("{}", "✅ Connected to server successfully!".green());
    println!("{}", "I can deploy AI agents to the blockchain for you.".green());
    println!("{}", "Try: \"Create and deploy an agent that responds with a joke\"".green());
    println!("{}", "Type \"exit\" to quit.".green());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("\n{} ", "You:".blue().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message.eq_ignore_ascii_case("exit") || message.eq_ignore_ascii_case("quit") {
            println!("{}", "Goodbye!".green());
            break;
        }

        let baseline = latest_millis(&client).await;

        println!("{}", "Sending message to Creator Agent...".blue());
        match client.send(message).await {
            Ok(reply) => {
                println!("\n{}", "Creator Agent:".green().bold());
                println!("{}", reply.response.as_str().green());

                if reply.deploying == Some(true) {
                    wait_for_deployment(&client, baseline, poll_interval, max_polls).await;
                }
            }
            Err(e) => eprintln!("{} {}", "Error:".red(), e),
        }
    }

    Ok(())
}

pub async fn run_status(server: &str) -> CreatorResult<()> {
    let client = CreatorClient::new(server);
    match client.status().await? {
        DeploymentStatus::Complete { agent } => print_record(&agent),
        DeploymentStatus::None => println!("{}", "No deployments recorded yet.".yellow()),
    }
    Ok(())
}

async fn latest_millis(client: &CreatorClient) -> Option<i64> {
    match client.status().await {
        Ok(DeploymentStatus::Complete { agent }) => Some(agent.created_millis()),
        _ => None,
    }
}

/// Poll until a record newer than `baseline` shows up.
async fn wait_for_deployment(client: &CreatorClient, baseline: Option<i64>, interval: Duration, max_polls: u32) {
    println!("{}", "\nDeploying agent to the blockchain...".yellow());
    println!("{}", "This may take a minute or two.".yellow());

    for _ in 0..max_polls {
        tokio::time::sleep(interval).await;

        match client.status().await {
            Ok(DeploymentStatus::Complete { agent })
                if baseline.map_or(true, |seen| agent.created_millis() > seen) =>
            {
                println!("{}", "\n✅ Agent deployed successfully!".green().bold());
                print_record(&agent);
                return;
            }
            Ok(_) => println!("{}", "Still waiting for deployment to complete...".yellow()),
            Err(e) => {
                eprintln!("{} {}", "Error checking deployment status:".red(), e);
                return;
            }
        }
    }

    println!(
        "{}",
        "Stopped waiting. The deployment may have failed; ask the agent or run `creator-agent status` later."
            .yellow()
    );
}

fn print_record(record: &DeploymentRecord) {
    println!("{} {}", "Agent ID:".cyan(), record.agent.id);
    println!("{} {}", "Description:".cyan(), record.agent.description);
    println!("{} {}", "Transaction:".cyan(), record.agent.transaction_hash);
    println!("{} {}", "Component ID:".cyan(), record.component.id);
    println!("{} {}", "Network:".cyan(), record.network.name);
    println!("{}", "\nTo interact with this agent:".yellow());
    println!("{} {}", "- Use agent ID:".yellow(), record.agent.id);
    println!("{} {}", "- Registry:".yellow(), record.interaction_hints.registry_lookup);
}
