//! Executor backed by an external command.
//!
//! Each invocation spawns the command and feeds the payload as JSON to its
//! stdin from a separate task while stdout and stderr are drained, then
//! closes stdin. Everything the command prints to stdout is the output;
//! when streaming, each stdout line is one fragment. A non-zero exit status
//! is a failure carrying the command's stderr. The child is killed as soon
//! as its handle is dropped.

use crate::{Executor, Fragments, Invocation, Payload, ToolSet};
use anyhow::{Context, Result};
use async_stream::stream;
use std::{
    collections::BTreeMap,
    future::Future,
    process::{ExitStatus, Stdio},
};
use tokio::{
    io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    process::{Child, ChildStdin, Command},
    runtime::{Builder, Handle},
};

/// Runs a configured program once per invocation.
pub struct CommandExecutor {
    program: String,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    tools: ToolSet,
}

impl CommandExecutor {
    /// Create an executor for `program` with the built-in tool catalogue.
    pub fn new(program: impl Into<String>) -> Result<Self> {
        let program = program.into();
        if program.trim().is_empty() {
            anyhow::bail!("executor command must not be empty");
        }
        Ok(Self {
            program,
            args: Vec::new(),
            env: BTreeMap::new(),
            tools: ToolSet::builtin(),
        })
    }

    /// Set the command arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Set extra environment variables for the command.
    pub fn envs(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    /// Replace the tool catalogue.
    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    /// The configured program.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Spawn the command with all three pipes captured.
    fn spawn(&self) -> Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("failed to spawn executor command '{}'", self.program))
    }

    /// Run the command to completion and collect its stdout.
    async fn run(&self, payload: &Payload) -> Result<Invocation> {
        let input = serde_json::to_vec(payload)?;
        let mut child = self.spawn()?;
        let stdin = child.stdin.take().context("executor command stdin not captured")?;

        let (_, output) = tokio::join!(write_input(stdin, input), child.wait_with_output());
        let output = output.context("failed to wait for executor command")?;
        check_status(output.status, &String::from_utf8_lossy(&output.stderr))?;
        let text = String::from_utf8(output.stdout)
            .context("executor command produced non-UTF-8 output")?;
        Ok(Invocation::text(text))
    }
}

impl Executor for CommandExecutor {
    fn invoke(&self, payload: &Payload) -> Result<Invocation> {
        block_on(self.run(payload))?
    }

    fn supports_streaming(&self) -> bool {
        true
    }

    fn stream_invoke(&self, payload: &Payload) -> Result<Fragments<'_>> {
        let input = serde_json::to_vec(payload)?;
        let mut child = self.spawn()?;
        let stdin = child.stdin.take().context("executor command stdin not captured")?;
        let stdout = child.stdout.take().context("executor command stdout not captured")?;
        let mut stderr = child.stderr.take().context("executor command stderr not captured")?;

        tokio::spawn(write_input(stdin, input));
        let stderr = tokio::spawn(async move {
            let mut buf = String::new();
            let _ = stderr.read_to_string(&mut buf).await;
            buf
        });

        Ok(Box::pin(stream! {
            let mut reader = BufReader::new(stdout);
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line).await {
                    Ok(0) => break,
                    Ok(_) => {
                        yield Ok(line);
                    }
                    Err(e) => {
                        yield Err(anyhow::Error::new(e).context("failed to read executor output"));
                        return;
                    }
                }
            }

            let status = match child.wait().await {
                Ok(status) => status,
                Err(e) => {
                    yield Err(anyhow::Error::new(e).context("failed to wait for executor command"));
                    return;
                }
            };
            let stderr = stderr.await.unwrap_or_default();
            if let Err(e) = check_status(status, &stderr) {
                yield Err(e);
            }
        }))
    }

    fn tools(&self) -> &ToolSet {
        &self.tools
    }
}

/// Write the payload and close stdin.
///
/// A command that exits without reading its input is not an error.
async fn write_input(mut stdin: ChildStdin, input: Vec<u8>) {
    if let Err(e) = stdin.write_all(&input).await {
        tracing::debug!("executor command closed stdin early: {e}");
    }
}

/// Drive a future to completion from blocking code.
///
/// Uses the ambient runtime when called from one of its blocking workers,
/// otherwise a private current-thread runtime.
fn block_on<F: Future>(future: F) -> Result<F::Output> {
    match Handle::try_current() {
        Ok(handle) => Ok(handle.block_on(future)),
        Err(_) => {
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .context("failed to start executor runtime")?;
            Ok(runtime.block_on(future))
        }
    }
}

fn check_status(status: ExitStatus, stderr: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    let stderr = stderr.trim();
    if stderr.is_empty() {
        anyhow::bail!("executor command exited with {status}");
    }
    anyhow::bail!("executor command exited with {status}: {stderr}")
}
