// SPDX-FileCopyrightText: 2026 Know Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests running the `know` binary against mock HTTP services.
//!
//! Each test gets its own temp working directory and config home, so no
//! user or local `know.toml` leaks in. Tests are independent and order-insensitive.

use std::process::Output;

use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Env {
    dir: TempDir,
    opencode_port: u16,
    prefrontal_url: String,
}

impl Env {
    fn new(opencode: &MockServer, prefrontal: &MockServer) -> Self {
        Self {
            dir: TempDir::new().unwrap(),
            opencode_port: opencode.address().port(),
            prefrontal_url: prefrontal.uri(),
        }
    }

    async fn know(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_know"))
            .args(args)
            .current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_CACHE_HOME", self.dir.path().join("cache"))
            .env("KNOW_OPENCODE_HOST", "127.0.0.1")
            .env("KNOW_OPENCODE_PORT", self.opencode_port.to_string())
            .env("KNOW_PREFRONTAL_URL", &self.prefrontal_url)
            .env("KNOW_CACHE_ENABLED", "false")
            .env_remove("RUST_LOG")
            .output()
            .await
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

async fn mount_session(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ses_e2e"})))
        .mount(server)
        .await;
}

/// Answers every prompt. Mount after any more specific message mocks.
async fn mount_answer(server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/session/ses_e2e/message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": {"id": "msg_1", "cost": 0.001},
            "parts": [{"type": "text", "text": answer}]
        })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn models_json_lists_route_table() {
    let (opencode, prefrontal) = (MockServer::start().await, MockServer::start().await);
    let env = Env::new(&opencode, &prefrontal);

    let output = env.know(&["models", "--json"]).await;

    assert!(output.status.success());
    let rows: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(rows.as_array().unwrap().len(), 7);
}

#[tokio::test(flavor = "multi_thread")]
async fn query_runs_full_pipeline() {
    let (opencode, prefrontal) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("GET"))
        .and(path("/filter"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "entries": [{"title": "Laravel Queues", "content": "Use dispatch()", "tags": ["laravel"]}],
            "total": 1
        })))
        .expect(1)
        .mount(&prefrontal)
        .await;
    mount_session(&opencode).await;
    Mock::given(method("POST"))
        .and(path("/session/ses_e2e/message"))
        .and(body_partial_json(json!({"model": {"providerID": "xai", "modelID": "grok-3"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "info": {"id": "msg_2"},
            "parts": [{"type": "text", "text": "Queues are processed by workers."}]
        })))
        .expect(1)
        .mount(&opencode)
        .await;
    let env = Env::new(&opencode, &prefrontal);

    let output = env.know(&["query", "how do queues work", "--json"]).await;

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let result: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["query"], "how do queues work");
    assert_eq!(result["context_entries"], 1);
    assert_eq!(result["model"]["intent"], "how");
    assert_eq!(result["response"]["text"], "Queues are processed by workers.");
}

#[tokio::test(flavor = "multi_thread")]
async fn query_without_opencode_suggests_starting_it() {
    let (opencode, prefrontal) = (MockServer::start().await, MockServer::start().await);
    let mut env = Env::new(&opencode, &prefrontal);
    // Nothing listens on the discard port.
    env.opencode_port = 9;

    let output = env.know(&["--plain", "query", "what is rust", "--no-context"]).await;

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("Connection refused"), "{out}");
    assert!(out.contains("opencode serve"));
}

#[tokio::test(flavor = "multi_thread")]
async fn consensus_reports_each_model() {
    let (opencode, prefrontal) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("GET"))
        .and(path("/filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"entries": []})))
        .mount(&prefrontal)
        .await;
    Mock::given(method("POST"))
        .and(path("/session/ses_e2e/message"))
        .and(body_partial_json(json!({"model": {"modelID": "grok-3"}})))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&opencode)
        .await;
    mount_session(&opencode).await;
    mount_answer(&opencode, "An answer.").await;
    let env = Env::new(&opencode, &prefrontal);

    let output = env
        .know(&["consensus", "q", "--models", "claude,grok", "--json"])
        .await;

    assert!(output.status.success());
    let result: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["models_consulted"], 2);
    assert_eq!(result["responses"]["claude"]["response"]["text"], "An answer.");
    assert_eq!(
        result["responses"]["grok"]["error"],
        "OpenCode prompt failed: 500 upstream exploded"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_each_service() {
    let (opencode, prefrontal) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("GET"))
        .and(path("/doc"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&opencode)
        .await;
    let env = Env::new(&opencode, &prefrontal);

    let output = env.know(&["health", "--json"]).await;

    // Prefrontal has no /dashboard mock and answers 404.
    assert_eq!(output.status.code(), Some(1));
    let checks: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(checks, json!({"opencode": true, "prefrontal": false}));

    Mock::given(method("GET"))
        .and(path("/dashboard"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&prefrontal)
        .await;
    assert!(env.know(&["health"]).await.status.success());
}

#[tokio::test(flavor = "multi_thread")]
async fn remember_posts_entry() {
    let (opencode, prefrontal) = (MockServer::start().await, MockServer::start().await);
    Mock::given(method("POST"))
        .and(path("/sync"))
        .and(body_partial_json(json!({
            "title": "Deploys need migrations",
            "tags": ["ops", "deploy"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "id": 42})))
        .expect(1)
        .mount(&prefrontal)
        .await;
    let env = Env::new(&opencode, &prefrontal);

    let output = env
        .know(&[
            "remember",
            "Deploys need migrations\nRun them before switching traffic.",
            "--tags",
            "ops,deploy",
            "--json",
        ])
        .await;

    assert!(output.status.success());
    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value["id"], 42);
}

#[tokio::test(flavor = "multi_thread")]
async fn invalid_config_exits_with_diagnostic() {
    let (opencode, prefrontal) = (MockServer::start().await, MockServer::start().await);
    let env = Env::new(&opencode, &prefrontal);
    std::fs::write(
        env.dir.path().join("know.toml"),
        "[opencode]\ntiemout_secs = 5\n",
    )
    .unwrap();

    let output = env.know(&["models"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("tiemout_secs"));
}
