use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use postgrid_store::api;
use postgrid_store::document::DocumentStore;

/// A store server on an ephemeral port, running on its own runtime so the
/// blocking client under test never executes inside tokio.
pub struct TestStore {
    pub base_url: String,
    pub store: DocumentStore,
}

impl TestStore {
    pub fn start() -> Self {
        let store = DocumentStore::in_memory();
        let served = store.clone();
        let (port_tx, port_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(1)
                .enable_all()
                .build()
                .expect("runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind");
                let port = listener.local_addr().expect("local addr").port();
                port_tx.send(port).expect("report port");
                let _ = api::serve_listener(listener, served).await;
            });
        });
        let port = port_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("store did not start");
        let base_url = format!("http://127.0.0.1:{port}");
        wait_for_health(&base_url);
        Self { base_url, store }
    }
}

fn wait_for_health(base_url: &str) {
    for _ in 0..50 {
        if let Ok(resp) = reqwest::blocking::get(format!("{base_url}/health")) {
            if resp.status().is_success() {
                return;
            }
        }
        thread::sleep(Duration::from_millis(100));
    }
    panic!("store did not become healthy in time");
}
