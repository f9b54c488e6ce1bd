//! Engine profiles
//!
//! An engine variant is data, not a subclass: credentials, ports and
//! image plus an optional hook that amends the base container
//! configuration with engine-specific flags and mounts.

use sqlrig_core::{Credentials, EngineIdentity};

use crate::config::ContainerConfig;

type CustomizeHook = Box<dyn Fn(&mut ContainerConfig) + Send + Sync>;

/// Capability contract an engine variant supplies to the lifecycle.
pub struct EngineProfile {
    engine: EngineIdentity,
    image: String,
    root: Credentials,
    test_case: Credentials,
    port: u16,
    default_database: Option<String>,
    customize: Option<CustomizeHook>,
}

impl EngineProfile {
    pub fn new(
        engine: EngineIdentity,
        image: impl Into<String>,
        root: Credentials,
        test_case: Credentials,
        port: u16,
    ) -> Self {
        Self {
            engine,
            image: image.into(),
            root,
            test_case,
            port,
            default_database: None,
            customize: None,
        }
    }

    /// Database the engine creates by default, used by readiness probes.
    pub fn with_default_database(mut self, database: impl Into<String>) -> Self {
        self.default_database = Some(database.into());
        self
    }

    /// Hook run after the base configuration is built, before launch.
    pub fn with_customize(
        mut self,
        hook: impl Fn(&mut ContainerConfig) + Send + Sync + 'static,
    ) -> Self {
        self.customize = Some(Box::new(hook));
        self
    }

    pub fn engine(&self) -> &EngineIdentity {
        &self.engine
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn root(&self) -> &Credentials {
        &self.root
    }

    pub fn test_case(&self) -> &Credentials {
        &self.test_case
    }

    /// Port the engine listens on inside the sandbox.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn default_database(&self) -> Option<&str> {
        self.default_database.as_deref()
    }

    /// Apply the engine-specific configuration hook, if any.
    pub fn customize(&self, config: &mut ContainerConfig) {
        if let Some(hook) = &self.customize {
            hook(config);
        }
    }
}

impl std::fmt::Debug for EngineProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineProfile")
            .field("engine", &self.engine)
            .field("image", &self.image)
            .field("port", &self.port)
            .field("default_database", &self.default_database)
            .finish()
    }
}
