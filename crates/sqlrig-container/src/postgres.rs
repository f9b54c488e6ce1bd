//! PostgreSQL engine variant

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlrig_core::{Credentials, EngineIdentity};
use sqlrig_postgres::PostgresDriver;

use crate::docker::DockerSandbox;
use crate::lifecycle::StorageContainer;
use crate::profile::EngineProfile;

const IMAGE: &str = "postgres:12-alpine";

/// Engine profile for PostgreSQL.
///
/// Root credentials root/root, test-case credentials scaling/root, port
/// 5432, default database `postgres`. The customize hook raises the
/// connection limit, enables logical replication and binds the static
/// `postgresql.conf` from the seed root.
pub fn profile(seed_root: impl AsRef<Path>) -> EngineProfile {
    let conf_path: PathBuf = seed_root.as_ref().join("postgresql").join("postgresql.conf");
    let root = Credentials::new("root", "root");
    let env_root = root.clone();

    EngineProfile::new(
        EngineIdentity::new("PostgreSQL"),
        IMAGE,
        root,
        Credentials::new("scaling", "root"),
        5432,
    )
    .with_default_database("postgres")
    .with_customize(move |config| {
        config.append_arg("--max_connections=600");
        config.append_arg("--wal_level=logical");
        config.set_env("POSTGRES_USER", &env_root.username);
        config.set_env("POSTGRES_PASSWORD", &env_root.password);
        config.bind_file(conf_path.clone(), "/etc/postgresql/postgresql.conf");
    })
}

/// A PostgreSQL storage container wired to the Docker sandbox.
pub fn container(scenario: Option<String>, seed_root: impl AsRef<Path>) -> StorageContainer {
    StorageContainer::new(
        profile(&seed_root),
        scenario,
        seed_root.as_ref(),
        Arc::new(PostgresDriver::new()),
        Box::new(DockerSandbox::new()),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::ContainerConfig;

    #[test]
    fn profile_matches_engine_defaults() {
        let profile = profile("/env");
        assert_eq!(profile.engine().tag(), "postgresql");
        assert_eq!(profile.port(), 5432);
        assert_eq!(profile.default_database(), Some("postgres"));
        assert_eq!(profile.root().username, "root");
        assert_eq!(profile.root().password, "root");
        assert_eq!(profile.test_case().username, "scaling");
        assert_eq!(profile.test_case().password, "root");
    }

    #[test]
    fn customize_appends_flags_env_and_conf_binding() {
        let profile = profile("/env");
        let mut config = ContainerConfig::new(profile.image());
        profile.customize(&mut config);

        assert_eq!(
            config.args(),
            ["--max_connections=600", "--wal_level=logical"]
        );
        assert!(config
            .env()
            .contains(&("POSTGRES_USER".to_string(), "root".to_string())));
        assert!(config
            .env()
            .contains(&("POSTGRES_PASSWORD".to_string(), "root".to_string())));

        let conf = &config.file_bindings()[0];
        assert!(conf.source.ends_with("postgresql/postgresql.conf"));
        assert_eq!(conf.target, "/etc/postgresql/postgresql.conf");
    }
}
