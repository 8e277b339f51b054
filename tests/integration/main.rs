//! Integration tests for flowcheck
//!
//! These tests drive a live server over TCP and the compiled binary.

use std::io::Write;
use std::net::SocketAddr;
use std::process::Command;

use flowcheck_core::Limits;
use flowcheck_server::{FlowcheckServer, ServerConfig};
use serde_json::{Value, json};
use tokio::sync::oneshot;

/// Start a server on an ephemeral port. Dropping the sender stops it.
async fn spawn_server(limits: Limits) -> (SocketAddr, oneshot::Sender<()>) {
    let config = ServerConfig {
        port: 0,
        limits,
        ..ServerConfig::default()
    };
    let server = FlowcheckServer::new(config).unwrap();
    let listener = server.bind().await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async {
            let _ = rx.await;
        };
        server.serve(listener, shutdown).await.unwrap();
    });

    (addr, tx)
}

/// Test that the server answers liveness and validation requests
#[tokio::test]
async fn test_server_round_trip() {
    let (addr, _shutdown) = spawn_server(Limits::default()).await;
    let client = reqwest::Client::new();

    let ping: Value = client
        .get(format!("http://{addr}/"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ping, json!({"Ping": "Pong"}));

    let response = client
        .post(format!("http://{addr}/pipelines/parse"))
        .json(&json!({
            "nodes": [
                {"id": "customInput-1", "type": "customInput", "position": {"x": 0, "y": 0}},
                {"id": "llm-1", "type": "llm"},
                {"id": "customOutput-1", "type": "customOutput"}
            ],
            "edges": [
                {"id": "e1", "source": "customInput-1", "target": "llm-1"},
                {"id": "e2", "source": "llm-1", "target": "customOutput-1"}
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"num_nodes": 3, "num_edges": 2, "is_dag": true}));
}

/// Test concurrent requests are independent
#[tokio::test]
async fn test_concurrent_requests() {
    let (addr, _shutdown) = spawn_server(Limits::default()).await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for i in 0..16usize {
        let client = client.clone();
        let url = format!("http://{addr}/pipelines/parse");
        tasks.push(tokio::spawn(async move {
            let cyclic = i % 2 == 0;
            let mut edges = vec![json!({"source": "a", "target": "b"})];
            if cyclic {
                edges.push(json!({"source": "b", "target": "a"}));
            }
            let body: Value = client
                .post(url)
                .json(&json!({"nodes": [{"id": "a"}, {"id": "b"}], "edges": edges}))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap();
            (cyclic, body)
        }));
    }

    for task in tasks {
        let (cyclic, body) = task.await.unwrap();
        assert_eq!(body["is_dag"], json!(!cyclic));
    }
}

/// Test that oversized pipelines are rejected with 413
#[tokio::test]
async fn test_limits_over_http() {
    let (addr, _shutdown) = spawn_server(Limits::new(10, 1)).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/pipelines/parse"))
        .json(&json!({
            "nodes": [{"id": "a"}, {"id": "b"}],
            "edges": [{"source": "a", "target": "b"}, {"source": "b", "target": "a"}]
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::PAYLOAD_TOO_LARGE);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("edges"));
}

/// Test the `check` subcommand on a pipeline file
#[test]
fn test_cli_check() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"nodes": [{{"id": "A"}}], "edges": [{{"source": "A", "target": "A"}}]}}"#
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_flowcheck"))
        .arg("check")
        .arg(file.path())
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result, json!({"num_nodes": 1, "num_edges": 1, "is_dag": false}));
}

/// Test the `check` subcommand on a malformed file
#[test]
fn test_cli_check_malformed() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"nodes": [{{"name": "no id"}}]}}"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_flowcheck"))
        .arg("check")
        .arg(file.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to parse"));
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_flowcheck"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pipeline DAG validation service"));
    assert!(stdout.contains("serve"));
    assert!(stdout.contains("check"));
}
