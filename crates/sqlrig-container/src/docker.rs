//! Docker-backed sandbox runtime

use std::time::Duration;

use async_trait::async_trait;
use sqlrig_core::{Result, RigError};
use testcontainers::core::{AccessMode, IntoContainerPort, Mount};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};

use crate::sandbox::{LaunchSpec, SandboxHandle, SandboxRuntime};

const STARTUP_TIMEOUT: Duration = Duration::from_secs(120);

/// Sandbox runtime backed by Docker via testcontainers.
pub struct DockerSandbox;

impl DockerSandbox {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DockerSandbox {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SandboxRuntime for DockerSandbox {
    async fn launch(&self, spec: &LaunchSpec) -> Result<Box<dyn SandboxHandle>> {
        let (name, tag) = spec
            .image
            .split_once(':')
            .unwrap_or((spec.image.as_str(), "latest"));

        let mut image = GenericImage::new(name, tag);
        for port in &spec.exposed_ports {
            image = image.with_exposed_port(port.tcp());
        }

        let mut request = image.with_startup_timeout(STARTUP_TIMEOUT);
        for (name, value) in &spec.env {
            request = request.with_env_var(name, value);
        }
        for binding in &spec.file_bindings {
            let mount = Mount::bind_mount(
                binding.source.display().to_string(),
                binding.target.clone(),
            )
            .with_access_mode(AccessMode::ReadOnly);
            request = request.with_mount(mount);
        }
        if !spec.args.is_empty() {
            request = request.with_cmd(spec.args.clone());
        }

        tracing::info!(image = %spec.image, "launching docker container");
        let container = request
            .start()
            .await
            .map_err(|error| RigError::sandbox(format!("failed to launch {}", spec.image), error))?;
        let host = container
            .get_host()
            .await
            .map_err(|error| RigError::sandbox("failed to resolve container host", error))?
            .to_string();

        Ok(Box::new(DockerHandle { container, host }))
    }
}

struct DockerHandle {
    container: ContainerAsync<GenericImage>,
    host: String,
}

#[async_trait]
impl SandboxHandle for DockerHandle {
    fn host(&self) -> String {
        self.host.clone()
    }

    async fn mapped_port(&self, internal: u16) -> Result<u16> {
        self.container
            .get_host_port_ipv4(internal.tcp())
            .await
            .map_err(|error| {
                RigError::sandbox(format!("no published port for internal port {internal}"), error)
            })
    }

    async fn stop(&self) -> Result<()> {
        self.container
            .stop()
            .await
            .map_err(|error| RigError::sandbox("failed to stop container", error))
    }
}
