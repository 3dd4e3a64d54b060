//! Process lifecycle for the external tool.
//!
//! # Design
//!
//! - Stdout and stderr are drained by independent tasks while the runner waits
//!   for exit, so neither pipe can fill up and stall the child.
//! - Every terminal state maps to a [`TorrentJobResult`]; the runner never errors.
//! - Children outlive dropped requests (`kill_on_drop(false)`).

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{Instrument, Span, debug, info, info_span, warn};
use uuid::Uuid;

use crate::command::JobCommand;
use crate::model::TorrentJobResult;

const DRAIN_CHUNK_BYTES: usize = 8 * 1024;

/// Executes prepared job commands.
#[async_trait]
pub trait JobExecutor: Send + Sync {
    /// Run `command` to completion and report how it ended.
    async fn execute(&self, command: JobCommand) -> TorrentJobResult;
}

/// [`JobExecutor`] that spawns the tool as a child process.
#[derive(Debug, Clone)]
pub struct ProcessJobRunner {
    chunk_bytes: usize,
}

impl Default for ProcessJobRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessJobRunner {
    /// Create a runner that reads tool output in 8 KiB chunks.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            chunk_bytes: DRAIN_CHUNK_BYTES,
        }
    }

    /// Spawn the tool, drain its output and wait for exit.
    pub async fn run(&self, command: JobCommand) -> TorrentJobResult {
        let job_id = Uuid::new_v4();
        let span = info_span!(
            "torrent.job",
            job_id = %job_id,
            program = %command.program().display(),
            output = %command.output_path().display()
        );
        run_child(job_id, command, self.chunk_bytes)
            .instrument(span)
            .await
    }
}

#[async_trait]
impl JobExecutor for ProcessJobRunner {
    async fn execute(&self, command: JobCommand) -> TorrentJobResult {
        self.run(command).await
    }
}

async fn run_child(job_id: Uuid, command: JobCommand, chunk_bytes: usize) -> TorrentJobResult {
    let started = Instant::now();
    let output_path = command.output_path().to_path_buf();
    info!(args = ?command.args(), "launching external tool");

    let spawned = Command::new(command.program())
        .args(command.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(false)
        .spawn();
    let mut child = match spawned {
        Ok(child) => child,
        Err(err) => {
            warn!(error = %err, "failed to start external tool");
            return TorrentJobResult::launch_failed(
                job_id,
                output_path,
                format!("failed to start external tool: {err}"),
                started.elapsed(),
            );
        }
    };

    let stdout_task = spawn_drain(child.stdout.take(), "stdout", chunk_bytes);
    let stderr_task = spawn_drain(child.stderr.take(), "stderr", chunk_bytes);

    let status = child.wait().await;
    if status.is_err() {
        request_kill(&mut child);
    }
    let stdout = join_drain(stdout_task, "stdout").await;
    let stderr = join_drain(stderr_task, "stderr").await;
    let elapsed = started.elapsed();

    match status {
        Ok(status) if status.success() => {
            info!(elapsed = ?elapsed, "external tool succeeded");
            TorrentJobResult::succeeded(job_id, output_path, &stdout, elapsed)
        }
        Ok(status) => {
            let exit_code = status.code();
            warn!(
                exit_code = ?exit_code,
                elapsed = ?elapsed,
                "external tool failed"
            );
            TorrentJobResult::failed(job_id, output_path, exit_code, &stdout, &stderr, elapsed)
        }
        Err(err) => {
            warn!(error = %err, "failed to wait for external tool");
            TorrentJobResult::launch_failed(
                job_id,
                output_path,
                format!("failed to wait for external tool: {err}"),
                elapsed,
            )
        }
    }
}

/// Ask the child to stop; returns whether the signal was delivered.
fn request_kill(child: &mut Child) -> bool {
    match child.start_kill() {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "failed to stop external tool");
            false
        }
    }
}

fn spawn_drain<R>(
    reader: Option<R>,
    stream: &'static str,
    chunk_bytes: usize,
) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(drain(reader, stream, chunk_bytes).instrument(Span::current()))
}

async fn drain<R>(reader: Option<R>, stream: &'static str, chunk_bytes: usize) -> Vec<u8>
where
    R: AsyncRead + Unpin,
{
    let mut collected = Vec::new();
    let Some(mut reader) = reader else {
        return collected;
    };
    let mut chunk = vec![0_u8; chunk_bytes.max(1)];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(read) => {
                debug!(
                    stream,
                    chunk = %String::from_utf8_lossy(&chunk[..read]),
                    "external tool output"
                );
                collected.extend_from_slice(&chunk[..read]);
            }
            Err(err) => {
                warn!(stream, error = %err, "failed to read external tool output");
                break;
            }
        }
    }
    collected
}

async fn join_drain(task: JoinHandle<Vec<u8>>, stream: &'static str) -> Vec<u8> {
    match task.await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(stream, error = %err, "output drain task did not complete");
            Vec::new()
        }
    }
}
