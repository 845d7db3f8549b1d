//! Data transfer objects
//!
//! Wire-level types: the uniform HTTP response envelope, request bodies for
//! control and secret operations, and the realtime channel message format.

pub mod control;
pub mod envelope;
pub mod events;
pub mod repo;
pub mod secrets;
