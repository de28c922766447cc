//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages read the shared [`AuthContext`](crate::util::auth::AuthContext) and
//! call into the session core; access control itself lives in the guard.

pub mod home;
pub mod login;
pub mod logout;
