//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod build_repo;
pub mod master_data_repo;

pub use build_repo::BuildRepo;
pub use master_data_repo::{MasterDataError, MasterDataRepo};
