//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;
use tokio::process::{Child, Command};
use tokio::time::Instant;

/// Log line printed once signal handlers are installed and the child runs.
const READY_MARKER: &str = "forwarding signals";

/// Mock ECS task metadata endpoint serving a mutable task document.
pub struct MetadataServer {
    addr: SocketAddr,
    task: Arc<Mutex<Value>>,
}

impl MetadataServer {
    /// Start serving `GET /task` with the given containers as `(name, known_status)`.
    pub async fn start(containers: &[(&str, &str)]) -> Self {
        let task = Arc::new(Mutex::new(task_document(containers)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shared = task.clone();
        tokio::spawn(async move {
            loop {
                match listener.accept().await {
                    Ok((mut socket, _)) => {
                        let shared = shared.clone();
                        tokio::spawn(async move {
                            let mut buf = vec![0u8; 4096];
                            let mut read = 0;
                            // Read the request head before answering.
                            while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                                match socket.read(&mut buf[read..]).await {
                                    Ok(0) | Err(_) => return,
                                    Ok(n) => read += n,
                                }
                                if read == buf.len() {
                                    break;
                                }
                            }

                            let body = shared.lock().unwrap().to_string();
                            let response = format!(
                                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                                body.len(),
                                body
                            );
                            let _ = socket.write_all(response.as_bytes()).await;
                            let _ = socket.shutdown().await;
                        });
                    }
                    Err(_) => break,
                }
            }
        });

        Self { addr, task }
    }

    pub fn base_uri(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Replace the containers the endpoint reports.
    #[allow(dead_code)]
    pub fn set_containers(&self, containers: &[(&str, &str)]) {
        *self.task.lock().unwrap() = task_document(containers);
    }
}

fn task_document(containers: &[(&str, &str)]) -> Value {
    let containers: Vec<Value> = containers
        .iter()
        .map(|(name, known)| {
            json!({
                "Name": name,
                "DesiredStatus": "STOPPED",
                "KnownStatus": known,
                "DockerName": format!("ecs-task-{}", name),
            })
        })
        .collect();

    json!({
        "Cluster": "default",
        "TaskARN": "arn:aws:ecs:ap-northeast-1:012345678910:task/test",
        "Containers": containers,
    })
}

/// A running `ecswrap` under test.
pub struct Wrapper {
    child: Child,
    pid: Pid,
}

impl Wrapper {
    /// Spawn the binary and wait until it reports that it forwards signals.
    pub async fn spawn(args: &[&str], metadata_uri: Option<&str>) -> Self {
        Self::spawn_with_env(args, metadata_uri, &[]).await
    }

    /// Like [`Wrapper::spawn`], with extra environment variables.
    pub async fn spawn_with_env(
        args: &[&str],
        metadata_uri: Option<&str>,
        envs: &[(&str, &str)],
    ) -> Self {
        let mut child = wrapper_command(args, metadata_uri)
            .envs(envs.iter().copied())
            .stdout(Stdio::piped())
            .spawn()
            .expect("failed to start ecswrap");

        let pid = Pid::from_raw(child.id().expect("ecswrap exited early") as i32);
        let stdout = child.stdout.take().expect("stdout is piped");
        let mut lines = BufReader::new(stdout).lines();

        let ready = tokio::time::timeout(Duration::from_secs(10), async {
            while let Ok(Some(line)) = lines.next_line().await {
                if line.contains(READY_MARKER) {
                    return true;
                }
            }
            false
        })
        .await;
        assert_eq!(ready, Ok(true), "ecswrap never became ready");

        // Keep draining so later log lines never block on a full pipe.
        tokio::spawn(async move { while let Ok(Some(_)) = lines.next_line().await {} });

        Self { child, pid }
    }

    /// Send `signal` to ecswrap and wait for it to exit.
    ///
    /// Returns the exit code and the time from sending to exit.
    pub async fn signal_and_wait(mut self, signal: Signal) -> (i32, Duration) {
        let sent = Instant::now();
        kill(self.pid, signal).expect("failed to signal ecswrap");

        let status = tokio::time::timeout(Duration::from_secs(20), self.child.wait())
            .await
            .expect("ecswrap did not exit")
            .expect("failed to wait for ecswrap");

        (status.code().expect("ecswrap was killed"), sent.elapsed())
    }
}

/// Run ecswrap to completion without sending any signal.
pub async fn run_to_exit(args: &[&str], metadata_uri: Option<&str>) -> i32 {
    let status = wrapper_command(args, metadata_uri)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .expect("failed to run ecswrap");
    status.code().expect("ecswrap was killed")
}

fn wrapper_command(args: &[&str], metadata_uri: Option<&str>) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ecswrap"));
    cmd.args(args)
        .env_remove("ECSWRAP_STOP_WAIT_TIMEOUT")
        .env_remove("ECSWRAP_LINKED_CONTAINERS")
        .env_remove("ECSWRAP_SIGNAL_FORWARDING_DELAY")
        .env_remove("RUST_LOG")
        .kill_on_drop(true);

    match metadata_uri {
        Some(uri) => cmd.env("ECS_CONTAINER_METADATA_URI", uri),
        None => cmd.env_remove("ECS_CONTAINER_METADATA_URI"),
    };
    cmd
}
