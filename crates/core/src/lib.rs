//! Domain logic for the gear build tracker.
//!
//! This crate has no database or HTTP dependencies. Callers load rows and
//! master data elsewhere and pass them in.

pub mod catalog;
pub mod enrichment;
pub mod error;
pub mod master_data;
pub mod payload;
pub mod slots;
pub mod types;
