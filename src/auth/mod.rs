//! Credential handling.
//!
//! The account API key is an opaque string with account/unlocks scope. It is
//! kept in the OS keychain via `ApiKeyStore`; only a short fingerprint of it
//! is ever written to disk alongside the unlock snapshot.

pub mod credentials;

pub use credentials::{fingerprint, ApiKeyStore};
