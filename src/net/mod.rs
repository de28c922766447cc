//! Network layer: transport, API client, error taxonomy, and wire types.

pub mod api;
pub mod error;
pub mod services;
pub mod transport;
pub mod types;
