#![forbid(unsafe_code)]

pub mod adapt;
pub mod curve;
pub mod error;
pub mod guid;
pub mod math;
pub mod migrate;
pub mod schema;
pub mod stages;
pub mod value;

pub use error::{MigrateError, MigrateResult};
pub use migrate::{MigrationContext, migrate_scene};
pub use schema::{ItemType, ParticleOrigin};
