//! Starting the engine executable.
//!
//! [`ProcessSpawner`] is the only capability the launcher needs from the OS:
//! start an executable and hand back a handle, or start it and wait for it to
//! exit. [`TokioSpawner`] is the real implementation; tests substitute their own.

use crate::error::ProcessError;
use camino::{Utf8Path, Utf8PathBuf};
use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};
use std::process::{ExitStatus, Stdio};
use std::time::Instant;
use tokio::net::TcpStream;
use tokio::process::{Child, Command};

/// Console/debug port the run-mode engine listens on.
pub const DEFAULT_ENGINE_CONSOLE_PORT: u16 = 14000;

/// Port passed to the engine during a compile pass.
pub const COMPILE_SERVER_PORT: u16 = 14999;

/// One engine invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub executable: Utf8PathBuf,
    pub args: Vec<String>,
    pub console_port: Option<u16>,
}

impl SpawnRequest {
    pub fn new(executable: impl Into<Utf8PathBuf>, args: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            args,
            console_port: None,
        }
    }

    pub fn with_console_port(mut self, port: u16) -> Self {
        self.console_port = Some(port);
        self
    }

    /// Command line as it would be typed, for logging.
    pub fn display_command(&self) -> String {
        std::iter::once(self.executable.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(|part| {
                if part.contains(' ') {
                    format!("\"{part}\"")
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Something that can start engine processes.
pub trait ProcessSpawner {
    /// Handle to a process left running.
    type Handle;

    /// Start the process and return without waiting for it.
    fn spawn(&self, request: &SpawnRequest) -> Result<Self::Handle, ProcessError>;

    /// Start the process and wait for it to exit. A non-zero exit is
    /// [`ProcessError::CompileFailed`].
    fn run_to_completion(
        &self,
        request: &SpawnRequest,
    ) -> impl Future<Output = Result<(), ProcessError>> + Send;
}

/// Spawns engine processes with `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

impl TokioSpawner {
    fn command(request: &SpawnRequest) -> Result<Command, ProcessError> {
        if !request.executable.is_file() {
            return Err(ProcessError::ExecutableNotFound(request.executable.clone()));
        }
        let mut cmd = Command::new(request.executable.as_std_path());
        cmd.args(&request.args).stdin(Stdio::null());
        if let Some(dir) = request.executable.parent() {
            cmd.current_dir(dir);
        }
        Ok(cmd)
    }
}

impl ProcessSpawner for TokioSpawner {
    type Handle = EngineProcess;

    fn spawn(&self, request: &SpawnRequest) -> Result<EngineProcess, ProcessError> {
        let mut cmd = Self::command(request)?;
        tracing::info!("Starting engine: {}", request.display_command());

        let child = cmd.spawn().map_err(|source| ProcessError::Spawn {
            executable: request.executable.clone(),
            source,
        })?;

        tracing::info!(
            "Engine started (pid {:?}, console port {:?})",
            child.id(),
            request.console_port
        );

        Ok(EngineProcess {
            child,
            executable: request.executable.clone(),
            console_port: request.console_port,
        })
    }

    async fn run_to_completion(&self, request: &SpawnRequest) -> Result<(), ProcessError> {
        let mut cmd = Self::command(request)?;
        tracing::info!("Executing: {}", request.display_command());

        let start = Instant::now();
        let status = cmd
            .status()
            .await
            .map_err(|source| ProcessError::Spawn {
                executable: request.executable.clone(),
                source,
            })?;

        tracing::info!(
            "Engine process completed in {:.2}s with exit code {:?}",
            start.elapsed().as_secs_f32(),
            status.code()
        );

        if status.success() {
            Ok(())
        } else {
            Err(ProcessError::CompileFailed {
                code: status.code(),
            })
        }
    }
}

/// A running engine process.
///
/// Dropping the handle leaves the engine running.
#[derive(Debug)]
pub struct EngineProcess {
    child: Child,
    executable: Utf8PathBuf,
    console_port: Option<u16>,
}

impl EngineProcess {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    pub fn executable(&self) -> &Utf8Path {
        &self.executable
    }

    pub fn console_port(&self) -> Option<u16> {
        self.console_port
    }

    /// Loopback address of the engine console, if the process has one.
    pub fn console_address(&self) -> Option<SocketAddr> {
        self.console_port
            .map(|port| SocketAddr::from((Ipv4Addr::LOCALHOST, port)))
    }

    /// Open a TCP connection to the engine console. Makes exactly one attempt;
    /// `Ok(None)` when the process has no console port.
    pub async fn connect_console(&self) -> std::io::Result<Option<TcpStream>> {
        match self.console_address() {
            Some(addr) => TcpStream::connect(addr).await.map(Some),
            None => Ok(None),
        }
    }

    /// Wait for the engine to exit.
    pub async fn wait(&mut self) -> Result<ExitStatus, ProcessError> {
        let status = self.child.wait().await.map_err(|source| ProcessError::Wait {
            executable: self.executable.clone(),
            source,
        })?;
        tracing::info!("Engine exited with {}", status);
        Ok(status)
    }

    /// Kill the engine and wait for it to exit.
    pub async fn kill(&mut self) -> Result<(), ProcessError> {
        self.child.kill().await.map_err(|source| ProcessError::Kill {
            executable: self.executable.clone(),
            source,
        })
    }
}
