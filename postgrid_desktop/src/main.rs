use std::net::Ipv4Addr;

use anyhow::{anyhow, Result};
use postgrid_frontend::config::STORE_URL_ENV;
use postgrid_store::api;
use postgrid_store::config::StoreConfig;
use postgrid_store::document::DocumentStore;
use postgrid_store::{seed, telemetry};
use tokio::runtime::Runtime;
use tracing::{error, info};

fn main() -> Result<()> {
    telemetry::init_tracing();

    let runtime = Runtime::new()?;
    let config = StoreConfig::from_env();
    let store = DocumentStore::open(config.data_path.as_deref())?;
    if store.count(seed::POSTS)? == 0 && store.count(seed::USERS)? == 0 {
        let summary = seed::seed(&store, 3, 4)?;
        info!(
            posts = summary.posts.len(),
            users = summary.users.len(),
            "empty store seeded with sample records"
        );
    }

    let (listener, port) = runtime.block_on(api::find_available_port_on(
        Ipv4Addr::LOCALHOST.into(),
        config.api_port,
    ))?;
    let server = runtime.spawn(async move {
        if let Err(err) = api::serve_listener(listener, store).await {
            error!(error = ?err, "embedded store server exited");
        }
    });

    let base_url = format!("http://127.0.0.1:{port}");
    info!(%base_url, "embedded store listening");
    std::env::set_var(STORE_URL_ENV, &base_url);

    let ui_result = postgrid_frontend::run_frontend();

    server.abort();
    ui_result.map_err(|err| anyhow!(err.to_string()))
}
