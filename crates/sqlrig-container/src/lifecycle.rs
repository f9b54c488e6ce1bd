//! Storage container lifecycle state machine

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use sqlrig_core::{
    ConnectCoordinates, DatabaseDriver, DatasetGroup, Result, RigError, jdbc_url,
};
use sqlrig_pool::{DatasourceFactory, DatasourceHandle};
use sqlrig_scenario::ScenarioDataResolver;

use crate::config::{ContainerConfig, ENTRYPOINT_INIT_DIR};
use crate::profile::EngineProfile;
use crate::sandbox::{SandboxHandle, SandboxRuntime};
use crate::state::ContainerState;
use crate::wait::ConnectionWaitStrategy;

/// One isolated database-engine process and the datasources seeded into it.
///
/// Lifecycle methods are meant to run on one coordinating task per
/// container; callers serialize `configure`/`start`/`stop`. Independent
/// containers share no state and may run concurrently.
///
/// The name→datasource mappings are populated exactly once, during
/// provisioning, and stay untouched until `stop()` releases them.
pub struct StorageContainer {
    profile: EngineProfile,
    scenario: Option<String>,
    resolver: ScenarioDataResolver,
    driver: Arc<dyn DatabaseDriver>,
    sandbox: Box<dyn SandboxRuntime>,
    wait: ConnectionWaitStrategy,
    state: ContainerState,
    config: Option<ContainerConfig>,
    sandbox_handle: Option<Box<dyn SandboxHandle>>,
    host: Option<String>,
    published_port: Option<u16>,
    actual: IndexMap<String, DatasourceHandle>,
    expected: IndexMap<String, DatasourceHandle>,
}

impl StorageContainer {
    pub fn new(
        profile: EngineProfile,
        scenario: Option<String>,
        seed_root: impl Into<PathBuf>,
        driver: Arc<dyn DatabaseDriver>,
        sandbox: Box<dyn SandboxRuntime>,
    ) -> Self {
        let default_database = profile
            .default_database()
            .unwrap_or(profile.engine().tag())
            .to_string();
        let resolver =
            ScenarioDataResolver::new(seed_root, profile.engine().clone(), default_database);
        Self {
            profile,
            scenario,
            resolver,
            driver,
            sandbox,
            wait: ConnectionWaitStrategy::default(),
            state: ContainerState::Created,
            config: None,
            sandbox_handle: None,
            host: None,
            published_port: None,
            actual: IndexMap::new(),
            expected: IndexMap::new(),
        }
    }

    pub fn with_wait_strategy(mut self, wait: ConnectionWaitStrategy) -> Self {
        self.wait = wait;
        self
    }

    pub fn state(&self) -> ContainerState {
        self.state
    }

    pub fn scenario(&self) -> Option<&str> {
        self.scenario.as_deref()
    }

    /// Lowercase engine tag, used by callers for logging.
    pub fn abbreviation(&self) -> &str {
        self.profile.engine().tag()
    }

    pub fn root_username(&self) -> &str {
        &self.profile.root().username
    }

    pub fn root_password(&self) -> &str {
        &self.profile.root().password
    }

    pub fn test_case_username(&self) -> &str {
        &self.profile.test_case().username
    }

    pub fn test_case_password(&self) -> &str {
        &self.profile.test_case().password
    }

    /// Datasources of the actual dataset group, in script-declared order.
    pub fn actual_datasources(&self) -> &IndexMap<String, DatasourceHandle> {
        &self.actual
    }

    /// Datasources of the expected dataset group, in script-declared order.
    pub fn expected_datasources(&self) -> &IndexMap<String, DatasourceHandle> {
        &self.expected
    }

    /// Resolve seed scripts and build the launch configuration.
    ///
    /// Allowed from CREATED, and from FAILED to permit a fresh attempt; the
    /// configuration is replaced wholesale, so nothing is ever mounted
    /// twice. Any other state is rejected.
    pub fn configure(&mut self) -> Result<()> {
        if !matches!(
            self.state,
            ContainerState::Created | ContainerState::Failed
        ) {
            return Err(RigError::InvalidState {
                operation: "configure",
                state: self.state.as_str(),
            });
        }
        match self.build_config() {
            Ok(config) => {
                self.config = Some(config);
                self.state = ContainerState::Configuring;
                Ok(())
            }
            Err(error) => {
                self.state = ContainerState::Failed;
                Err(error)
            }
        }
    }

    fn build_config(&self) -> Result<ContainerConfig> {
        let mut config = ContainerConfig::new(self.profile.image());
        match self.scenario.as_deref() {
            None => {
                let script = self.resolver.init_script_path(None, DatasetGroup::Actual)?;
                config.bind_file(script, format!("{ENTRYPOINT_INIT_DIR}/initdb.sql"));
            }
            Some(scenario) => {
                // The init directory runs scripts in name order; the actual
                // group's declarations come first.
                for (index, group) in DatasetGroup::ALL.into_iter().enumerate() {
                    let script = self.resolver.init_script_path(Some(scenario), group)?;
                    config.bind_file(
                        script,
                        format!("{ENTRYPOINT_INIT_DIR}/{}0-{group}.sql", index + 1),
                    );
                }
            }
        }
        config.expose_port(self.profile.port());
        self.profile.customize(&mut config);
        Ok(config)
    }

    /// Launch the engine and block until it is ready, then provision the
    /// datasources of both dataset groups.
    ///
    /// Readiness is probed with the profile's root credentials against its
    /// default database, or the connection-without-database form when the
    /// engine declares none. A probe that never succeeds within the wait
    /// budget fails with `ContainerStartFailed` wrapping the timeout.
    pub async fn start(&mut self) -> Result<()> {
        let Some(spec) = self
            .config
            .as_ref()
            .filter(|_| self.state == ContainerState::Configuring)
            .map(ContainerConfig::launch_spec)
        else {
            return Err(RigError::InvalidState {
                operation: "start",
                state: self.state.as_str(),
            });
        };

        self.state = ContainerState::Starting;
        // A retry after a failed attempt must not leak the old process;
        // sandbox handles release their process on drop.
        self.sandbox_handle = None;
        tracing::info!(
            engine = %self.profile.engine(),
            image = %spec.image,
            scenario = self.scenario.as_deref().unwrap_or("<generic>"),
            "starting storage container"
        );

        let handle = match self.sandbox.launch(&spec).await {
            Ok(handle) => handle,
            Err(error) => return Err(self.fail_start(error)),
        };
        let host = handle.host();
        let port = match handle.mapped_port(self.profile.port()).await {
            Ok(port) => port,
            Err(error) => {
                if let Err(stop_error) = handle.stop().await {
                    tracing::warn!(error = %stop_error, "failed to release sandbox after startup failure");
                }
                return Err(self.fail_start(error));
            }
        };
        self.sandbox_handle = Some(handle);
        self.host = Some(host.clone());
        self.published_port = Some(port);

        self.state = ContainerState::WaitingReady;
        let probe_coords = {
            let coords = ConnectCoordinates::new(host.clone(), port, self.profile.root().clone());
            match self.profile.default_database() {
                Some(database) => coords.with_database(database),
                None => coords,
            }
        };
        let driver = Arc::clone(&self.driver);
        let ready = self
            .wait
            .wait_until_ready(|| {
                let driver = Arc::clone(&driver);
                let coords = probe_coords.clone();
                async move { driver.connect(&coords).await }
            })
            .await;
        if let Err(error) = ready {
            return Err(self.fail_start(error));
        }

        self.post_start(host, port).await
    }

    fn fail_start(&mut self, cause: RigError) -> RigError {
        self.state = ContainerState::Failed;
        RigError::ContainerStartFailed {
            container: self.profile.engine().tag().to_string(),
            cause: Box::new(cause),
        }
    }

    /// Build one pooled datasource per declared database, per group.
    ///
    /// On the first failure every handle built so far is discarded and the
    /// container transitions to FAILED.
    async fn post_start(&mut self, host: String, port: u16) -> Result<()> {
        self.state = ContainerState::Provisioning;
        let factory = DatasourceFactory::new(Arc::clone(&self.driver));
        let coords = ConnectCoordinates::new(host, port, self.profile.root().clone());

        for group in DatasetGroup::ALL {
            let names = match self.resolver.database_names(self.scenario.as_deref(), group) {
                Ok(names) => names,
                Err(error) => {
                    self.discard_datasources().await;
                    self.state = ContainerState::Failed;
                    return Err(error);
                }
            };
            for name in names {
                match factory.create_datasource(&coords, &name) {
                    Ok(handle) => {
                        self.group_map(group).insert(name, handle);
                    }
                    Err(error) => {
                        self.discard_datasources().await;
                        self.state = ContainerState::Failed;
                        return Err(RigError::ProvisioningFailed {
                            database: name,
                            cause: Box::new(error),
                        });
                    }
                }
            }
        }

        self.state = ContainerState::Running;
        tracing::info!(
            actual = self.actual.len(),
            expected = self.expected.len(),
            port,
            "storage container running"
        );
        Ok(())
    }

    fn group_map(&mut self, group: DatasetGroup) -> &mut IndexMap<String, DatasourceHandle> {
        match group {
            DatasetGroup::Actual => &mut self.actual,
            DatasetGroup::Expected => &mut self.expected,
        }
    }

    /// Connection URL for a logical database.
    ///
    /// Available once configured. Embeds the externally published port when
    /// the sandbox is running; before that it falls back to the engine's
    /// declared port.
    pub fn jdbc_url(&self, database: &str) -> Result<String> {
        if self.config.is_none() {
            return Err(RigError::InvalidState {
                operation: "build jdbc url",
                state: self.state.as_str(),
            });
        }
        let host = self.host.as_deref().unwrap_or("localhost");
        let port = self.published_port.unwrap_or_else(|| self.profile.port());
        Ok(jdbc_url(self.profile.engine(), host, port, Some(database)))
    }

    /// Tear the container down: close every owned datasource handle and
    /// release the sandbox process.
    ///
    /// Idempotent and infallible; cleanup errors are logged so a broken
    /// environment can still be torn down. A FAILED container stays FAILED,
    /// every other state becomes STOPPED.
    pub async fn stop(&mut self) {
        if self.state == ContainerState::Stopped {
            return;
        }
        tracing::info!(engine = %self.profile.engine(), state = %self.state, "stopping storage container");
        self.discard_datasources().await;
        if let Some(handle) = self.sandbox_handle.take() {
            if let Err(error) = handle.stop().await {
                tracing::warn!(error = %error, "failed to release sandbox process");
            }
        }
        if self.state != ContainerState::Failed {
            self.state = ContainerState::Stopped;
        }
    }

    async fn discard_datasources(&mut self) {
        for (_, handle) in self.actual.drain(..) {
            handle.close().await;
        }
        for (_, handle) in self.expected.drain(..) {
            handle.close().await;
        }
    }
}
