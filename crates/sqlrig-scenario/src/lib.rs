//! sqlrig scenario - seed-script layout and logical database enumeration
//!
//! A scenario is a named bundle of seed SQL scripts describing one test
//! topology. This crate maps (scenario, dataset group, engine) onto script
//! paths and lists the logical databases each script declares.

mod layout;
mod resolver;
mod script;

pub use layout::SeedScriptLayout;
pub use resolver::ScenarioDataResolver;
pub use script::{declared_databases, split_statements};
