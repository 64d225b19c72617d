use postgrid_store::api;
use postgrid_store::document::DocumentStore;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::time::{sleep, Duration};

struct TestStore {
    server: tokio::task::JoinHandle<()>,
    base_url: String,
}

impl TestStore {
    async fn start() -> Self {
        Self::start_with(DocumentStore::in_memory()).await
    }

    async fn start_with(document: DocumentStore) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let server = tokio::spawn(async move {
            let _ = api::serve_listener(listener, document).await;
        });
        let base_url = format!("http://127.0.0.1:{port}");
        wait_for_health(&base_url).await;
        Self { server, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn shutdown(self) {
        self.server.abort();
        let _ = self.server.await;
    }
}

async fn wait_for_health(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..50 {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        sleep(Duration::from_millis(100)).await;
    }
    panic!("server did not become healthy in time");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rest_roundtrip_over_keyed_collection() {
    let store = TestStore::start().await;
    let client = reqwest::Client::new();

    let empty: Value = client
        .get(store.url("posts.json"))
        .send()
        .await
        .expect("list response")
        .json()
        .await
        .expect("list json");
    assert_eq!(empty, Value::Null);

    let created: Value = client
        .post(store.url("posts.json"))
        .json(&json!({"title": "Hello", "body": "first", "image": "x.png"}))
        .send()
        .await
        .expect("create response")
        .json()
        .await
        .expect("create json");
    let key = created["name"].as_str().expect("assigned key").to_string();

    let listed: Value = client
        .get(store.url("posts.json"))
        .send()
        .await
        .expect("list response")
        .json()
        .await
        .expect("list json");
    assert_eq!(listed[&key]["title"], "Hello");
    assert!(listed[&key].get("id").is_none());

    let replaced = client
        .put(store.url(&format!("posts/{key}.json")))
        .json(&json!({"title": "Changed"}))
        .send()
        .await
        .expect("put response");
    assert!(replaced.status().is_success());

    let record: Value = client
        .get(store.url(&format!("posts/{key}.json")))
        .send()
        .await
        .expect("get response")
        .json()
        .await
        .expect("get json");
    assert_eq!(record, json!({"title": "Changed"}));

    let deleted = client
        .delete(store.url(&format!("posts/{key}.json")))
        .send()
        .await
        .expect("delete response");
    assert!(deleted.status().is_success());

    let after: Value = client
        .get(store.url("posts.json"))
        .send()
        .await
        .expect("list response")
        .json()
        .await
        .expect("list json");
    assert_eq!(after, Value::Null);

    store.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn plain_text_bodies_are_accepted_and_bad_json_rejected() {
    let store = TestStore::start().await;
    let client = reqwest::Client::new();

    let accepted = client
        .post(store.url("users.json"))
        .header("content-type", "text/plain;charset=UTF-8")
        .body(r#"{"name":"Ada","title":"Analyst","image":""}"#)
        .send()
        .await
        .expect("create response");
    assert!(accepted.status().is_success());

    let rejected = client
        .post(store.url("users.json"))
        .body("name=Ada")
        .send()
        .await
        .expect("create response");
    assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);
    let error: Value = rejected.json().await.expect("error json");
    assert!(error["error"].as_str().is_some_and(|msg| msg.contains("Invalid data")));

    let missing_suffix = client
        .get(store.url("users"))
        .send()
        .await
        .expect("list response");
    assert_eq!(missing_suffix.status(), reqwest::StatusCode::NOT_FOUND);

    store.shutdown().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn failed_snapshot_write_is_not_served_afterwards() {
    let dir = tempfile::tempdir().expect("tempdir");
    let unwritable = dir.path().join("missing").join("store.json");
    let document = DocumentStore::open(Some(&unwritable)).expect("open");
    let store = TestStore::start_with(document).await;
    let client = reqwest::Client::new();

    let failed = client
        .post(store.url("posts.json"))
        .json(&json!({"title": "x"}))
        .send()
        .await
        .expect("create response");
    assert_eq!(failed.status(), reqwest::StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = failed.json().await.expect("error json");
    assert!(error["error"].is_string());

    let listed: Value = client
        .get(store.url("posts.json"))
        .send()
        .await
        .expect("list response")
        .json()
        .await
        .expect("list json");
    assert_eq!(listed, Value::Null);

    store.shutdown().await;
}
