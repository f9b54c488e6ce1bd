//! Database engine identity and URL construction

use std::fmt;

/// Immutable descriptor of a database engine kind.
///
/// The canonical lowercase tag selects seed-script directories and drives
/// URL construction; callers use it as a logging abbreviation as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EngineIdentity {
    name: String,
    tag: String,
}

impl EngineIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let tag = name.to_lowercase();
        Self { name, tag }
    }

    /// Display name, e.g. "PostgreSQL".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical lowercase tag, e.g. "postgresql".
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl fmt::Display for EngineIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Build a JDBC-style connection URL for an engine.
///
/// `None` for `database` yields the engine's connection-without-database
/// form, used by readiness probes when the engine has no default database.
pub fn jdbc_url(engine: &EngineIdentity, host: &str, port: u16, database: Option<&str>) -> String {
    match database {
        Some(db) => format!("jdbc:{}://{}:{}/{}", engine.tag(), host, port, db),
        None => format!("jdbc:{}://{}:{}", engine.tag(), host, port),
    }
}
