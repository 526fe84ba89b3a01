use async_trait::async_trait;
use domain::ports::container_engine::{
    BuiltImage, ContainerEngine, ContainerHandle, LogSink, PortBinding,
};
use domain::ports::platform_api::RegistryCredentials;
use domain::{KonanError, Result};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;

/// Lines of engine output kept to explain a failed build or push.
const ERROR_TAIL_LINES: usize = 20;

/// Container engine backed by the `docker` command line client.
pub struct DockerCli {
    binary: PathBuf,
}

struct StreamOutcome {
    success: bool,
    tail: Vec<String>,
}

impl DockerCli {
    pub const BINARY_ENV: &'static str = "KONAN_DOCKER_BIN";

    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Uses `$KONAN_DOCKER_BIN` when set, otherwise the first `docker` on PATH.
    pub fn locate() -> Result<Self> {
        if let Some(binary) = std::env::var_os(Self::BINARY_ENV) {
            return Ok(Self::new(binary));
        }

        which::which("docker")
            .map(Self::new)
            .map_err(|_| KonanError::Engine("docker was not found on PATH".to_string()))
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Whether the engine daemon answers at all.
    pub async fn is_available(&self) -> bool {
        matches!(self.output(&["info"]).await, Ok(output) if output.status.success())
    }

    fn command(&self, args: &[&str]) -> Command {
        tracing::debug!(binary = ?self.binary, ?args, "invoking container engine");
        let mut cmd = Command::new(&self.binary);
        cmd.args(args).kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, err: std::io::Error) -> KonanError {
        KonanError::Engine(format!("failed to run {:?}: {}", self.binary, err))
    }

    async fn output(&self, args: &[&str]) -> Result<Output> {
        self.command(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))
    }

    /// Runs a command that must succeed and returns its trimmed stdout.
    async fn checked(&self, args: &[&str]) -> Result<String> {
        let output = self.output(args).await?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(KonanError::Engine(failure_message(&output)))
        }
    }

    /// Runs a long command, handing each stdout/stderr line to `sink` as it arrives.
    async fn streamed(&self, args: &[&str], sink: LogSink<'_>) -> Result<StreamOutcome> {
        let mut child = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| KonanError::Engine("engine stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| KonanError::Engine("engine stderr was not captured".to_string()))?;

        let mut out_reader = BufReader::new(stdout);
        let mut err_reader = BufReader::new(stderr);
        let (mut out_buf, mut err_buf) = (Vec::new(), Vec::new());
        let (mut out_open, mut err_open) = (true, true);
        let mut tail = VecDeque::with_capacity(ERROR_TAIL_LINES);

        while out_open || err_open {
            // Engine output is not guaranteed to be UTF-8, so lines are read raw.
            let (from_stdout, read) = tokio::select! {
                read = out_reader.read_until(b'\n', &mut out_buf), if out_open => (true, read),
                read = err_reader.read_until(b'\n', &mut err_buf), if err_open => (false, read),
            };
            let buf = if from_stdout { &mut out_buf } else { &mut err_buf };

            if read? == 0 {
                if from_stdout {
                    out_open = false;
                } else {
                    err_open = false;
                }
                continue;
            }

            let line = String::from_utf8_lossy(buf)
                .trim_end_matches(['\n', '\r'])
                .to_string();
            buf.clear();
            sink(&line);
            if tail.len() == ERROR_TAIL_LINES {
                tail.pop_front();
            }
            tail.push_back(line);
        }

        let status = child.wait().await.map_err(|e| self.spawn_error(e))?;
        Ok(StreamOutcome {
            success: status.success(),
            tail: tail.into_iter().collect(),
        })
    }
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let message = if stderr.trim().is_empty() {
        stdout.trim()
    } else {
        stderr.trim()
    };

    if message.is_empty() {
        format!("engine exited with {}", output.status)
    } else {
        message.to_string()
    }
}

#[async_trait]
impl ContainerEngine for DockerCli {
    async fn build_image(
        &self,
        context: &Path,
        tag: &str,
        logs: LogSink<'_>,
    ) -> Result<BuiltImage> {
        let context = context.to_string_lossy();
        let outcome = self.streamed(&["build", "--tag", tag, &context], logs).await?;
        if !outcome.success {
            return Err(KonanError::Build(outcome.tail.join("\n")));
        }

        let id = self
            .checked(&["image", "inspect", "--format", "{{.Id}}", tag])
            .await?;
        Ok(BuiltImage {
            id,
            tags: vec![tag.to_string()],
        })
    }

    async fn run_once(&self, image: &str, command: &[&str]) -> Result<String> {
        let mut args = vec!["run", "--rm", image];
        args.extend_from_slice(command);
        self.checked(&args).await
    }

    async fn create_container(&self, image: &str, ports: PortBinding) -> Result<ContainerHandle> {
        let mapping = format!("{}:{}", ports.host, ports.container);
        let id = self
            .checked(&["create", "--publish", &mapping, image])
            .await?;
        Ok(ContainerHandle { id })
    }

    async fn start_container(&self, container: &ContainerHandle) -> Result<()> {
        self.checked(&["start", &container.id]).await.map(|_| ())
    }

    async fn stop_and_remove(&self, container: &ContainerHandle) -> Result<()> {
        let stopped = self.checked(&["stop", &container.id]).await;
        // Remove even when stop failed, the container may already have exited.
        self.checked(&["rm", "--force", &container.id]).await?;
        stopped.map(|_| ())
    }

    async fn container_logs(&self, container: &ContainerHandle, lines: usize) -> Result<String> {
        let lines = lines.to_string();
        let output = self
            .output(&["logs", "--tail", &lines, &container.id])
            .await?;
        if !output.status.success() {
            return Err(KonanError::Engine(failure_message(&output)));
        }

        let mut logs = String::from_utf8_lossy(&output.stdout).into_owned();
        logs.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(logs)
    }

    async fn image_exists(&self, reference: &str) -> Result<bool> {
        let output = self.output(&["image", "inspect", reference]).await?;
        Ok(output.status.success())
    }

    async fn tag_image(&self, source: &str, target: &str) -> Result<()> {
        self.checked(&["tag", source, target]).await.map(|_| ())
    }

    async fn login(&self, registry: &str, credentials: &RegistryCredentials) -> Result<()> {
        let mut child = self
            .command(&[
                "login",
                registry,
                "--username",
                &credentials.username,
                "--password-stdin",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(credentials.password.as_bytes()).await?;
            // Dropping stdin closes it so docker stops reading.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.spawn_error(e))?;
        if output.status.success() {
            Ok(())
        } else {
            Err(KonanError::Engine(format!(
                "registry login failed: {}",
                failure_message(&output)
            )))
        }
    }

    async fn push(&self, reference: &str, progress: LogSink<'_>) -> Result<()> {
        let outcome = self.streamed(&["push", reference], progress).await?;
        if outcome.success {
            Ok(())
        } else {
            Err(KonanError::Engine(format!(
                "push of {} failed: {}",
                reference,
                outcome.tail.join("\n")
            )))
        }
    }
}
