use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use goal_gateway::client::{ServiceClient, UserClient};
use goal_gateway::lifecycle::startup;
use goal_gateway::registry::{ServiceResolver, StaticRegistry};
use goal_gateway::routing::RouteTable;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Inspect the gateway route table and call services", long_about = None)]
struct Cli {
    /// TOML configuration file. Built-in routes are used when omitted.
    #[arg(short, long, env = "GATEWAY_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List routes in match order with their upstream URLs
    Routes,
    /// Show which route and upstream would handle a path
    Match {
        /// Request path, e.g. /api/users/42
        path: String,
    },
    /// Fetch a user from the user service by id
    User {
        id: i64,
        /// Registry name of the user service
        #[arg(long, default_value = goal_gateway::client::USER_SERVICE)]
        service: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = startup::load_config(cli.config.as_deref())?;
    let registry = StaticRegistry::from_config(&config.services)?;

    match cli.command {
        Commands::Routes => {
            let table = RouteTable::from_config(&config.routes)?;
            for (i, route) in table.routes().iter().enumerate() {
                let upstream = registry.resolve(route.service())?;
                println!(
                    "{:>2}. {:<24} {:<48} -> {}",
                    i + 1,
                    route.id(),
                    route.patterns().join(", "),
                    upstream.base_url()
                );
            }
        }
        Commands::Match { path } => {
            let table = RouteTable::from_config(&config.routes)?;
            match table.match_path(&path) {
                Some(route) => {
                    let upstream = registry.resolve(route.service())?;
                    println!("route:    {}", route.id());
                    println!("service:  {}", route.service());
                    println!("upstream: {}", upstream.upstream_uri(&path)?);
                }
                None => {
                    eprintln!("no route matches {path}");
                    std::process::exit(1);
                }
            }
        }
        Commands::User { id, service } => {
            let client = ServiceClient::new(Arc::new(registry), &config.timeouts)?;
            let users = UserClient::for_service(client, service);
            let user = users.get_user_by_id(id).await?;
            println!("{}", serde_json::to_string_pretty(&user)?);
        }
    }

    Ok(())
}
