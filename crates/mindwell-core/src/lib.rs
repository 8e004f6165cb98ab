//! mindwell-core
//!
//! Shared vocabulary of the mindwell system: answer sets, the persisted
//! assessment envelope and record key conventions. No scoring logic lives
//! here; see `mindwell-instruments`.

pub mod error;
pub mod models;
pub mod record_keys;
