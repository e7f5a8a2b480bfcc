//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use brad_hook::config::HookConfig;
use brad_hook::deploy::{ExecError, ExecOutput, Executor};
use brad_hook::lifecycle::{self, Shutdown};

/// Write a brad.conf declaring `names`.
pub fn write_projects(dir: &Path, names: &[&str]) -> PathBuf {
    let path = dir.join("brad.conf");
    let mut content = String::from("# brad configuration\nuser = \"deploy\"\n");
    for name in names {
        content.push_str(&format!("projects[\"{}\"] = {{ repo = \"git@example.com:{}.git\" }}\n", name, name));
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// Write a shell script run as `sh <script> -y <project> <env>`.
/// Every invocation appends its arguments to `calls.log` next to it.
pub fn write_deploy_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("brad.sh");
    let log = dir.join("calls.log");
    let script = format!("echo \"$@\" >> \"{}\"\n{}\n", log.display(), body);
    std::fs::write(&path, script).unwrap();
    path
}

/// Lines written by the deploy script so far.
pub fn recorded_calls(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("calls.log"))
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Config that serves on an ephemeral port and runs the script through `sh`.
pub fn test_config(projects: &Path, script: &Path) -> HookConfig {
    let mut config = HookConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.projects.config_path = projects.to_string_lossy().to_string();
    config.deploy.program = "sh".into();
    config.deploy.flags = vec![script.to_string_lossy().to_string(), "-y".into()];
    config
}

/// Start the real server; returns its address and the shutdown handle.
pub async fn start_hook_server(config: HookConfig) -> (SocketAddr, Shutdown) {
    let started = lifecycle::start(config).await.unwrap();
    let addr = started.listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = started.server.run(started.listener, signal).await;
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Executor that records calls instead of spawning processes.
#[derive(Default)]
pub struct RecordingExecutor {
    pub fail: bool,
    pub calls: AtomicUsize,
    pub last_args: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn succeeding() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Executor for RecordingExecutor {
    async fn execute(&self, _program: &str, args: &[String]) -> Result<ExecOutput, ExecError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_args.lock().unwrap() = args.to_vec();
        Ok(ExecOutput {
            success: !self.fail,
            exit_code: Some(if self.fail { 1 } else { 0 }),
            stdout: if self.fail { String::new() } else { format!("\ndeployed {}", args.join(" ")) },
            stderr: if self.fail { "remote rejected".into() } else { String::new() },
        })
    }
}

/// Build a request as if it arrived over a socket from `peer`.
pub fn request_from(peer: &str, method: &str, uri: &str) -> Request<Body> {
    let addr = SocketAddr::new(peer.parse().unwrap(), 40000);
    let mut req = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    req.extensions_mut().insert(ConnectInfo(addr));
    req
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
