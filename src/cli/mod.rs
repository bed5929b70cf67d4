use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod client;

#[derive(Parser)]
#[command(name = "creator-agent")]
#[command(about = "Creator Agent - design and deploy agents to an on-chain registry")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat and deployment server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Interactive chat client for a running server
    Chat {
        /// Server base URL
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
        /// Seconds between deployment status polls
        #[arg(long, default_value = "5")]
        poll_interval: u64,
        /// Give up waiting for a deployment after this many polls
        #[arg(long, default_value = "60")]
        max_polls: u32,
    },

    /// Show the latest deployment recorded by a running server
    Status {
        /// Server base URL
        #[arg(long, default_value = "http://localhost:3000")]
        server: String,
    },
}
