//! sqlrig core - shared abstractions for the test database rig
//!
//! This crate provides the fundamental traits and types the other sqlrig
//! crates depend on. It defines:
//!
//! - `DatabaseDriver` - Trait for database driver implementations
//! - `Connection` - Trait for live database connections
//! - `EngineIdentity` - Descriptor of a database engine kind
//! - `DatasetGroup` - The actual/expected seed-data partition
//! - `RigError` - Error taxonomy shared across the workspace

mod connection;
mod coords;
mod driver;
mod engine;
mod error;
mod group;

pub use connection::*;
pub use coords::*;
pub use driver::*;
pub use engine::*;
pub use error::*;
pub use group::*;
