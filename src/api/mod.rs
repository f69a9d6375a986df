//! REST API client module for the Guild Wars 2 v2 API.
//!
//! This module provides the `SkinApi` trait (the seam the sync engine and
//! overlay fetcher are written against) and `CatalogClient`, its HTTP
//! implementation.
//!
//! The entitlements endpoint authenticates with an opaque account API key
//! passed as a query parameter.

pub mod client;
pub mod error;

pub use client::{CatalogClient, SkinApi};
pub use error::ApiError;
