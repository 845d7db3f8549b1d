//! Core domain types
//!
//! This module contains the domain structures the backend serves to the
//! dashboard. They mirror the backend's JSON shapes and are shared between
//! the HTTP client and the CLI.

pub mod activity;
pub mod artifact;
pub mod execution;
pub mod graph;
pub mod log;
pub mod repository;
pub mod secret;
pub mod status;
pub mod user;
