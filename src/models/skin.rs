//! Domain model for a catalog skin.
//!
//! The remote API occasionally returns placeholder records with no name.
//! `RawSkin` mirrors the wire format with everything optional; `validate`
//! turns it into a strict `Skin` or drops it.

use serde::{Deserialize, Serialize};

/// A skin record from the catalog. Identity is `id`; records are treated as
/// immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skin {
    pub id: u64,
    pub name: String,
    /// Top-level category: "Weapon", "Armor", "Back", ...
    #[serde(rename = "type")]
    pub kind: String,
    pub rarity: String,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub restrictions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<SkinDetails>,
}

impl Skin {
    /// Whether the record is complete enough to show to a user (named and
    /// with an icon to render).
    pub fn is_displayable(&self) -> bool {
        !self.name.is_empty() && self.icon.is_some()
    }
}

/// Type-specific detail block (weapon/armor subtype information).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinDetails {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<String>,
}

/// A skin as deserialized from the batch-details endpoint, before validation.
/// Every field except `id` may be missing or empty on malformed records.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSkin {
    pub id: u64,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub rarity: Option<String>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub restrictions: Vec<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
    pub details: Option<SkinDetails>,
}

impl RawSkin {
    /// Validate into a strict `Skin`. Returns `None` when the record has no
    /// usable name; malformed entries are filtered, not propagated.
    pub fn validate(self) -> Option<Skin> {
        let name = self.name?;
        if name.trim().is_empty() {
            return None;
        }
        Some(Skin {
            id: self.id,
            name,
            kind: self.kind.unwrap_or_default(),
            rarity: self.rarity.unwrap_or_default(),
            flags: self.flags,
            restrictions: self.restrictions,
            icon: self.icon,
            description: self.description,
            details: self.details,
        })
    }
}
