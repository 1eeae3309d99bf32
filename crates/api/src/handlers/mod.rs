pub mod builds;
pub mod master_data;
pub mod session;
