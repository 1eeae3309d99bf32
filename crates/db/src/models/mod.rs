//! Row structs and DTOs.
//!
//! Each submodule contains `FromRow` entity structs matching the database
//! rows plus conversions into the plain records used by `gearlog_core`.
//! Write DTOs are shared with core, which owns their validation.

pub mod build;
pub mod master;
