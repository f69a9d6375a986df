//! Data models for the GW2 skin catalog.
//!
//! - `Skin`, `SkinDetails`: validated domain records, immutable once fetched
//! - `RawSkin`: loosely-typed record as returned by the remote API, validated
//!   into a `Skin` on ingestion

pub mod skin;

pub use skin::{RawSkin, Skin, SkinDetails};
