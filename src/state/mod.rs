//! Client-side session state.
//!
//! ARCHITECTURE
//! ============
//! `token` and `session` hold identity and persistence, `auth` drives the
//! login lifecycle over them, and `toast` queues notifications for display.

pub mod auth;
pub mod session;
pub mod toast;
pub mod token;
