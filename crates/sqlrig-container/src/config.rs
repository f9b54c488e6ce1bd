//! Container launch configuration

use std::path::PathBuf;

use crate::sandbox::{FileBinding, LaunchSpec};

/// Directory database images scan for initialization scripts.
pub const ENTRYPOINT_INIT_DIR: &str = "/docker-entrypoint-initdb.d";

/// Accumulated launch configuration for one storage container.
///
/// The lifecycle builds the base configuration, then the engine profile's
/// customize hook amends it before the sandbox is launched. Rebuilding the
/// config replaces it wholesale, so scripts are never mounted twice.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    image: String,
    exposed_ports: Vec<u16>,
    env: Vec<(String, String)>,
    file_bindings: Vec<FileBinding>,
    args: Vec<String>,
}

impl ContainerConfig {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            exposed_ports: Vec::new(),
            env: Vec::new(),
            file_bindings: Vec::new(),
            args: Vec::new(),
        }
    }

    pub fn expose_port(&mut self, port: u16) {
        self.exposed_ports.push(port);
    }

    pub fn set_env(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.env.push((name.into(), value.into()));
    }

    /// Bind a host file read-only into the container.
    pub fn bind_file(&mut self, source: impl Into<PathBuf>, target: impl Into<String>) {
        self.file_bindings.push(FileBinding {
            source: source.into(),
            target: target.into(),
        });
    }

    pub fn append_arg(&mut self, arg: impl Into<String>) {
        self.args.push(arg.into());
    }

    pub fn exposed_ports(&self) -> &[u16] {
        &self.exposed_ports
    }

    pub fn env(&self) -> &[(String, String)] {
        &self.env
    }

    pub fn file_bindings(&self) -> &[FileBinding] {
        &self.file_bindings
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn launch_spec(&self) -> LaunchSpec {
        LaunchSpec {
            image: self.image.clone(),
            exposed_ports: self.exposed_ports.clone(),
            env: self.env.clone(),
            file_bindings: self.file_bindings.clone(),
            args: self.args.clone(),
        }
    }
}
