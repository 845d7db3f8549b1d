//! Flowdeck Core
//!
//! Core types and abstractions for the Flowdeck CI/CD dashboard client.
//!
//! This crate contains:
//! - Domain types: entities served by the backend (executions, graph shape,
//!   activities, secrets, artifacts, log lines)
//! - DTOs: request/response and channel wire types
//! - Live state: reconciliation of streamed step events with a fetched graph

pub mod domain;
pub mod dto;
pub mod live;
