//! Scenario data resolution

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use sqlrig_core::{DatasetGroup, EngineIdentity, Result, RigError};

use crate::layout::SeedScriptLayout;
use crate::script::declared_databases;

/// Resolves seed scripts and logical database names for one engine.
///
/// The resolver is deterministic: the same (scenario, group) input always
/// maps to the same path and name list. When no scenario is named, the
/// engine's generic `initdb.sql` is used and a single implicit default
/// database is reported.
#[derive(Debug, Clone)]
pub struct ScenarioDataResolver {
    layout: SeedScriptLayout,
    engine: EngineIdentity,
    default_database: String,
}

impl ScenarioDataResolver {
    pub fn new(
        root: impl Into<PathBuf>,
        engine: EngineIdentity,
        default_database: impl Into<String>,
    ) -> Self {
        Self {
            layout: SeedScriptLayout::new(root),
            engine,
            default_database: default_database.into(),
        }
    }

    pub fn engine(&self) -> &EngineIdentity {
        &self.engine
    }

    /// Path of the seed script for (scenario, group).
    ///
    /// Fails with `ScenarioNotFound` when no script exists at the
    /// convention path.
    pub fn init_script_path(
        &self,
        scenario: Option<&str>,
        group: DatasetGroup,
    ) -> Result<PathBuf> {
        let path = match scenario {
            None => self.layout.generic_script(&self.engine),
            Some(name) => self.layout.scenario_script(name, group, &self.engine),
        };
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "seed script missing");
            return Err(RigError::ScenarioNotFound {
                scenario: scenario.map(str::to_string),
                group,
                engine: self.engine.name().to_string(),
            });
        }
        Ok(path)
    }

    /// Logical database names declared by (scenario, group), in
    /// declaration order.
    ///
    /// Without a scenario the single implicit default name is returned.
    /// A name declared twice within one group fails with
    /// `DuplicateDatabaseName`.
    pub fn database_names(
        &self,
        scenario: Option<&str>,
        group: DatasetGroup,
    ) -> Result<Vec<String>> {
        if scenario.is_none() {
            return Ok(vec![self.default_database.clone()]);
        }
        let path = self.init_script_path(scenario, group)?;
        let names = declared_databases(&fs::read_to_string(&path)?);
        reject_duplicates(&names, &path)?;
        tracing::debug!(
            scenario = scenario.unwrap_or_default(),
            group = %group,
            count = names.len(),
            "resolved logical databases"
        );
        Ok(names)
    }
}

fn reject_duplicates(names: &[String], script: &Path) -> Result<()> {
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name.as_str()) {
            return Err(RigError::DuplicateDatabaseName {
                name: name.clone(),
                script: script.display().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sqlrig_core::{DatasetGroup, EngineIdentity, RigError};
    use tempfile::TempDir;

    use super::*;

    fn postgres() -> EngineIdentity {
        EngineIdentity::new("PostgreSQL")
    }

    fn write_script(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn scenario_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_script(
            dir.path(),
            "postgresql/initdb.sql",
            "CREATE DATABASE it_db;",
        );
        write_script(
            dir.path(),
            "scenario/order_sharding/data/actual/init-sql/postgresql/init.sql",
            "CREATE DATABASE ds_0;\nCREATE DATABASE ds_1;",
        );
        write_script(
            dir.path(),
            "scenario/order_sharding/data/expected/init-sql/postgresql/init.sql",
            "CREATE DATABASE expected_dataset;",
        );
        dir
    }

    fn resolver(dir: &TempDir) -> ScenarioDataResolver {
        ScenarioDataResolver::new(dir.path(), postgres(), "postgres")
    }

    #[test]
    fn no_scenario_uses_generic_script_and_default_name() {
        let dir = scenario_tree();
        let resolver = resolver(&dir);

        let path = resolver
            .init_script_path(None, DatasetGroup::Actual)
            .unwrap();
        assert!(path.ends_with("postgresql/initdb.sql"));

        let names = resolver.database_names(None, DatasetGroup::Actual).unwrap();
        assert_eq!(names, vec!["postgres"]);
    }

    #[test]
    fn scenario_names_keep_declaration_order() {
        let dir = scenario_tree();
        let resolver = resolver(&dir);

        let names = resolver
            .database_names(Some("order_sharding"), DatasetGroup::Actual)
            .unwrap();
        assert_eq!(names, vec!["ds_0", "ds_1"]);
    }

    #[rstest]
    #[case(DatasetGroup::Actual, vec!["ds_0", "ds_1"])]
    #[case(DatasetGroup::Expected, vec!["expected_dataset"])]
    fn groups_resolve_independently(
        #[case] group: DatasetGroup,
        #[case] expected: Vec<&str>,
    ) {
        let dir = scenario_tree();
        let names = resolver(&dir)
            .database_names(Some("order_sharding"), group)
            .unwrap();
        assert_eq!(names, expected);
    }

    #[test]
    fn unknown_scenario_is_scenario_not_found() {
        let dir = scenario_tree();
        let err = resolver(&dir)
            .init_script_path(Some("nope"), DatasetGroup::Actual)
            .unwrap_err();
        assert!(matches!(err, RigError::ScenarioNotFound { .. }));
    }

    #[test]
    fn missing_group_script_is_scenario_not_found() {
        let dir = TempDir::new().unwrap();
        write_script(
            dir.path(),
            "scenario/lonely/data/actual/init-sql/postgresql/init.sql",
            "CREATE DATABASE only_actual;",
        );
        let err = resolver(&dir)
            .database_names(Some("lonely"), DatasetGroup::Expected)
            .unwrap_err();
        assert!(matches!(
            err,
            RigError::ScenarioNotFound {
                group: DatasetGroup::Expected,
                ..
            }
        ));
    }

    #[test]
    fn duplicate_declaration_is_rejected() {
        let dir = TempDir::new().unwrap();
        write_script(
            dir.path(),
            "scenario/dup/data/actual/init-sql/postgresql/init.sql",
            "CREATE DATABASE ds_0;\nCREATE DATABASE ds_0;",
        );
        let err = resolver(&dir)
            .database_names(Some("dup"), DatasetGroup::Actual)
            .unwrap_err();
        match err {
            RigError::DuplicateDatabaseName { name, .. } => assert_eq!(name, "ds_0"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
