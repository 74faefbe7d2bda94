//! Flowgate Core
//!
//! Core types shared by the Flowgate gateway client and job workers.
//!
//! This crate contains:
//! - Domain types: Jobs handed out by the workflow-engine gateway
//! - DTOs: Request and response shapes exchanged with the gateway

pub mod domain;
pub mod dto;
