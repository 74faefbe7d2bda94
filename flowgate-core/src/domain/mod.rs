//! Core domain types
//!
//! These types represent what the gateway hands to a worker. They are
//! immutable snapshots from the client's point of view: outcomes are reported
//! by job key, never by mutating the job.

pub mod job;
