use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use telephone::config::load_config;
use telephone::relay::Message;
use telephone::rotation::HostRegistry;

#[derive(Parser)]
#[command(name = "ring-cli")]
#[command(about = "Operator CLI for the telephone ring", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new message at a node
    Send {
        /// Message URL of the entry node
        #[arg(short, long, default_value = "http://localhost:8080/api/v1/message")]
        url: String,

        /// Text to send around the ring
        #[arg(short, long)]
        text: String,
    },
    /// Probe every ring member's health endpoint
    Health {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Probe timeout in seconds
        #[arg(long, default_value_t = 5)]
        timeout: u64,
    },
    /// Print the configured ring order
    Ring {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Send { url, text } => {
            let res = reqwest::Client::new()
                .post(&url)
                .json(&Message::first_hop(text))
                .send()
                .await?;
            let status = res.status();
            let body = res.text().await?;
            if status.is_success() {
                println!("{}", body);
            } else {
                eprintln!("Error: node returned status {}", status);
                eprintln!("Response: {}", body);
            }
        }
        Commands::Health { config, timeout } => {
            let registry = load_registry(config)?;
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(timeout))
                .build()?;

            for member in registry.members() {
                let verdict = match client.get(member.health_url.as_str()).send().await {
                    Ok(res) if res.status().is_success() => "healthy".to_string(),
                    Ok(res) => format!("unhealthy ({})", res.status()),
                    Err(e) => format!("unreachable ({})", e),
                };
                println!("{:<12} {:<40} {}", member.identity, member.health_url, verdict);
            }
        }
        Commands::Ring { config } => {
            let registry = load_registry(config)?;
            for (index, member) in registry.members().iter().enumerate() {
                let marker = if index == 0 { " (head)" } else { "" };
                println!("{}. {}{}", index, member.identity, marker);
                println!("   message: {}", member.message_url);
                println!("   health:  {}", member.health_url);
            }
        }
    }

    Ok(())
}

fn load_registry(config: Option<PathBuf>) -> Result<HostRegistry, Box<dyn std::error::Error>> {
    let config = load_config(config.as_deref())?;
    Ok(HostRegistry::from_config(&config.ring.members)?)
}
