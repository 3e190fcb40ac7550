//! Session-stored identity types.

pub mod identity;

pub use identity::{IdentityRecord, Login, keys as session_keys};
