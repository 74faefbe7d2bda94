//! Data Transfer Objects for gateway communication
//!
//! Requests and responses exchanged between the client and the
//! workflow-engine gateway.

pub mod job;
