mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "weather-cache")]
#[command(about = "Cache-first weather lookups with per-user search history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Resolve current weather once and print it
    Fetch {
        city: String,
        #[arg(short, long)]
        state: Option<String>,
        #[arg(short, long)]
        country: Option<String>,
        /// Record the search in this user's history
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Print one page of a user's search history
    History {
        user: String,
        #[arg(long)]
        cursor: Option<String>,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Apply PostgreSQL schema migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(host, port).await,
        Commands::Fetch { city, state, country, user } => {
            commands::fetch::run(city, state, country, user).await
        },
        Commands::History { user, cursor, limit } => {
            commands::history::run(user, cursor, limit).await
        },
        Commands::Migrate => commands::migrate::run().await,
    }
}
