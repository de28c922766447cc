//! Browser-glue helpers shared across state and routing.
//!
//! SYSTEM CONTEXT
//! ==============
//! `notify` is the user-visible failure channel, `storage` persists the token
//! and session record, and `auth` wires the route guard into the Leptos
//! router.

pub mod auth;
pub mod notify;
pub mod storage;
