//! Client-side navigation: route metadata and the per-navigation guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `routes` maps paths to the permission they require, `guard` decides each
//! navigation's outcome, and [`Navigator`] is how non-guard code (the HTTP
//! client on 401, `check_permission`) issues redirects.

pub mod guard;
pub mod routes;

/// Issues client-side redirects.
pub trait Navigator {
    fn navigate(&self, path: &str);
}
