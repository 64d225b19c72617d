use anyhow::Result;
use clap::{Parser, Subcommand};
use postgrid_store::api;
use postgrid_store::config::StoreConfig;
use postgrid_store::document::DocumentStore;
use postgrid_store::seed;
use postgrid_store::telemetry;

#[derive(Parser)]
#[command(author, version, about = "Local keyed-map JSON document store for postgrid")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (Axum) for REST access
    Serve,
    /// Insert sample posts and users into the configured snapshot
    Seed {
        #[arg(long, default_value_t = 3)]
        posts: usize,
        #[arg(long, default_value_t = 2)]
        users: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let args = Args::parse();
    let config = StoreConfig::from_env();
    let store = DocumentStore::open(config.data_path.as_deref())?;
    tracing::info!(
        api_port = config.api_port,
        data_path = ?config.data_path,
        "document store opened"
    );

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => api::serve_http(config, store).await,
        Command::Seed { posts, users } => {
            if config.data_path.is_none() {
                tracing::warn!("POSTGRID_STORE_DATA is not set; seeded records will not persist");
            }
            let summary = seed::seed(&store, posts, users)?;
            for key in summary.posts.iter().chain(summary.users.iter()) {
                println!("{key}");
            }
            Ok(())
        }
    }
}
