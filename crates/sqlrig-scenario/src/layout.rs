//! Seed-script directory conventions

use std::path::{Path, PathBuf};

use sqlrig_core::{DatasetGroup, EngineIdentity};

/// Convention-based layout of seed scripts under one root directory.
///
/// ```text
/// <root>/<engine-tag>/initdb.sql                                     generic
/// <root>/scenario/<name>/data/<group>/init-sql/<engine-tag>/init.sql scenario
/// ```
#[derive(Debug, Clone)]
pub struct SeedScriptLayout {
    root: PathBuf,
}

impl SeedScriptLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generic per-engine default script, used when no scenario is named.
    pub fn generic_script(&self, engine: &EngineIdentity) -> PathBuf {
        self.root.join(engine.tag()).join("initdb.sql")
    }

    /// Scenario-specific script for one dataset group.
    pub fn scenario_script(
        &self,
        scenario: &str,
        group: DatasetGroup,
        engine: &EngineIdentity,
    ) -> PathBuf {
        self.root
            .join("scenario")
            .join(scenario)
            .join("data")
            .join(group.dir_name())
            .join("init-sql")
            .join(engine.tag())
            .join("init.sql")
    }
}
