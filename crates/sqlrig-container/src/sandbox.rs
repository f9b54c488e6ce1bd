//! Sandbox runtime capability
//!
//! The rig treats the sandboxing runtime as a capability: something that
//! can start an isolated process with port, env and file mappings, report
//! where it is reachable from the host, and stop it. `DockerSandbox` is the
//! production implementation; tests substitute fakes.

use std::path::PathBuf;

use async_trait::async_trait;
use sqlrig_core::Result;

/// Read-only file mapping from the host into the sandboxed process.
#[derive(Debug, Clone)]
pub struct FileBinding {
    /// Host path of the file.
    pub source: PathBuf,
    /// Absolute path inside the sandbox.
    pub target: String,
}

/// Everything the sandbox runtime needs to launch one isolated process.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub image: String,
    pub exposed_ports: Vec<u16>,
    pub env: Vec<(String, String)>,
    pub file_bindings: Vec<FileBinding>,
    /// Extra arguments appended to the image's entrypoint.
    pub args: Vec<String>,
}

/// Launches isolated processes.
#[async_trait]
pub trait SandboxRuntime: Send + Sync {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn SandboxHandle>>;
}

/// A running sandboxed process.
#[async_trait]
pub trait SandboxHandle: Send + Sync {
    /// Host address the process is reachable at from outside the sandbox.
    fn host(&self) -> String;

    /// Externally published port for an internal port.
    async fn mapped_port(&self, internal: u16) -> Result<u16>;

    /// Stop and release the process.
    async fn stop(&self) -> Result<()>;
}
