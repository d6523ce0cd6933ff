use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "dashboard-cli")]
#[command(about = "Command-line client for the Olympic dashboard service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the dashboard summary (medal totals, games, countries)
    Summary,
    /// Show the detail view for one country
    Country {
        name: String,
        /// Chart colour as six hex digits
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Ask the service to reload its data source
    Reload,
    /// Check service health and loading state
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Summary => client.get(format!("{}/api/dashboard", base)).send().await?,
        Commands::Country { name, color } => {
            let mut url = reqwest::Url::parse(&format!("{}/api/countries/", base))?;
            url.path_segments_mut()
                .map_err(|_| "service URL cannot be a base")?
                .pop_if_empty()
                .push(&name);
            if let Some(color) = color {
                url.query_pairs_mut().append_pair("color", &color);
            }
            client.get(url).send().await?
        }
        Commands::Reload => client.post(format!("{}/api/reload", base)).send().await?,
        Commands::Health => client.get(format!("{}/health", base)).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
