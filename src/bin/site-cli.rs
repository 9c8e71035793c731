use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;

use umpmusic_site::config::{load_config, SiteConfig};
use umpmusic_site::routing::{KeywordClassifier, LocaleRouter, RoleClassifier, RouteDecision};

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Management CLI for the label site", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    /// Admin API key; required by the remote commands.
    #[arg(short, long)]
    key: Option<String>,

    /// Config file used by the local `route` and `classify` commands.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check site status and record counts
    Status,
    /// List all artists
    Artists,
    /// List all releases
    Releases,
    /// List all news articles
    News,
    /// Show how the locale router treats a path
    Route { path: String },
    /// Show the profile variant chosen for a role
    Classify { role: Option<String> },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let endpoint = match &cli.command {
        Commands::Status => "status",
        Commands::Artists => "artists",
        Commands::Releases => "releases",
        Commands::News => "news",
        Commands::Route { path } => {
            let router = LocaleRouter::from_config(&local_config(&cli)?)?;
            match router.route(path) {
                RouteDecision::Bypass => println!("bypass"),
                RouteDecision::Localized(locale) => println!("localized ({locale})"),
                RouteDecision::Redirect(location) => println!("redirect -> {location}"),
            }
            return Ok(());
        }
        Commands::Classify { role } => {
            let classifier = KeywordClassifier::from_config(&local_config(&cli)?.profiles);
            println!("{}", classifier.classify(role.as_deref()));
            return Ok(());
        }
    };

    let Some(key) = &cli.key else {
        return Err("--key is required for admin commands".into());
    };
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {key}"))?,
    );

    let res = reqwest::Client::new()
        .get(format!("{}/admin/{}", cli.url.trim_end_matches('/'), endpoint))
        .headers(headers)
        .send()
        .await?;
    print_response(res).await
}

fn local_config(cli: &Cli) -> Result<SiteConfig, Box<dyn std::error::Error>> {
    Ok(match &cli.config {
        Some(path) => load_config(path)?,
        None => SiteConfig::default(),
    })
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
