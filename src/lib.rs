//! EDI import: load-tender summaries for operations staff.

pub mod batch;
pub mod config;
pub mod edi;
pub mod error;
pub mod notify;
