use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "dds-cli")]
#[command(about = "Command-line client for a dds-api node", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check node status
    Status,
    /// List scheduled tasks
    Tasks,
    /// Schedule a task
    AddTask {
        name: String,
        /// Node to run the task on
        #[arg(long)]
        target: Option<String>,
    },
    /// Register a friend node
    AddFriend { name: String, address: String },
    /// Forget a friend node
    RemoveFriend { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = format!("{}/api/v1", cli.url.trim_end_matches('/'));

    let res = match cli.command {
        Commands::Status => client.get(format!("{base}/")).send().await?,
        Commands::Tasks => client.get(format!("{base}/task")).send().await?,
        Commands::AddTask { name, target } => {
            client
                .post(format!("{base}/task"))
                .json(&json!({ "name": name, "target": target }))
                .send()
                .await?
        }
        Commands::AddFriend { name, address } => {
            client
                .post(format!("{base}/friend"))
                .json(&json!({ "name": name, "address": address }))
                .send()
                .await?
        }
        Commands::RemoveFriend { name } => {
            client
                .delete(format!("{base}/friend"))
                .json(&json!({ "name": name }))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;
    let body = match serde_json::from_str::<Value>(&text) {
        Ok(json) => serde_json::to_string_pretty(&json)?,
        Err(_) => text,
    };

    if status.is_success() {
        println!("{body}");
    } else {
        eprintln!("Error: node returned status {status}");
        eprintln!("Response: {body}");
    }
    Ok(())
}
