//! Dataset group tags

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two independent seed-data universes.
///
/// Seed scripts and the datasource mappings built from them are partitioned
/// by group; a container never mixes the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetGroup {
    /// Data the system under test operates on.
    Actual,
    /// Reference data used to verify the system under test.
    Expected,
}

impl DatasetGroup {
    /// Both groups, in provisioning order.
    pub const ALL: [DatasetGroup; 2] = [DatasetGroup::Actual, DatasetGroup::Expected];

    /// Directory name used by the seed-script layout.
    pub fn dir_name(&self) -> &'static str {
        match self {
            DatasetGroup::Actual => "actual",
            DatasetGroup::Expected => "expected",
        }
    }
}

impl fmt::Display for DatasetGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}
