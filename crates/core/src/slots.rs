//! Gear slot enumeration and fixed slot capacities.
//!
//! Slot names are persisted as plain strings in `build_gear.slot_name`.
//! Inside the crate they are modelled as the closed [`GearSlot`] enum so
//! that bucketing into armor and weapon loadouts is checked exhaustively.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SLOT_HELMET: &str = "helmet";
pub const SLOT_JACKET: &str = "jacket";
pub const SLOT_PANTS: &str = "pants";
pub const SLOT_BOOTS: &str = "boots";
pub const SLOT_GLOVES: &str = "gloves";
pub const SLOT_MASK: &str = "mask";
pub const SLOT_WEAPON_1: &str = "weapon_1";
pub const SLOT_WEAPON_2: &str = "weapon_2";
pub const SLOT_MELEE: &str = "melee";

/// Older rows stored the mask slot under this name. Accepted on read only.
pub const SLOT_ACCESSORY_LEGACY: &str = "accessory";

/// All slot names accepted on write.
pub const VALID_SLOT_NAMES: &[&str] = &[
    SLOT_HELMET,
    SLOT_JACKET,
    SLOT_PANTS,
    SLOT_BOOTS,
    SLOT_GLOVES,
    SLOT_MASK,
    SLOT_WEAPON_1,
    SLOT_WEAPON_2,
    SLOT_MELEE,
];

/// Number of ordinal cradle slots on a build (slots are numbered `1..=8`).
pub const CRADLE_CAPACITY: i32 = 8;

/// Number of ranked ability slots on a build (ranks are numbered `1..=3`).
pub const ABILITY_CAPACITY: i32 = 3;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Whether a raw slot identifier denotes a weapon slot.
///
/// A slot is a weapon slot when its name contains `"weapon"` or equals
/// `"melee"`. Every other identifier, including unknown ones, is treated as
/// armor.
pub fn is_weapon_slot_name(slot_name: &str) -> bool {
    slot_name.contains("weapon") || slot_name == SLOT_MELEE
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// One of the six armor positions on the armor loadout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSlot {
    Helmet,
    Jacket,
    Pants,
    Gloves,
    Boots,
    Mask,
}

/// One of the three weapon positions on the weapon loadout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponSlot {
    Primary,
    Secondary,
    Melee,
}

/// Armor or weapon projection of a [`GearSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Armor(ArmorSlot),
    Weapon(WeaponSlot),
}

/// A gear slot on a build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GearSlot {
    #[serde(rename = "helmet")]
    Helmet,
    #[serde(rename = "jacket")]
    Jacket,
    #[serde(rename = "pants")]
    Pants,
    #[serde(rename = "boots")]
    Boots,
    #[serde(rename = "gloves")]
    Gloves,
    #[serde(rename = "mask")]
    Mask,
    #[serde(rename = "weapon_1")]
    Weapon1,
    #[serde(rename = "weapon_2")]
    Weapon2,
    #[serde(rename = "melee")]
    Melee,
}

impl GearSlot {
    pub const ALL: [GearSlot; 9] = [
        Self::Helmet,
        Self::Jacket,
        Self::Pants,
        Self::Boots,
        Self::Gloves,
        Self::Mask,
        Self::Weapon1,
        Self::Weapon2,
        Self::Melee,
    ];

    /// Parse a slot name submitted for writing. The legacy `accessory`
    /// alias is rejected here.
    pub fn from_str_value(s: &str) -> Result<Self, String> {
        match s {
            SLOT_HELMET => Ok(Self::Helmet),
            SLOT_JACKET => Ok(Self::Jacket),
            SLOT_PANTS => Ok(Self::Pants),
            SLOT_BOOTS => Ok(Self::Boots),
            SLOT_GLOVES => Ok(Self::Gloves),
            SLOT_MASK => Ok(Self::Mask),
            SLOT_WEAPON_1 => Ok(Self::Weapon1),
            SLOT_WEAPON_2 => Ok(Self::Weapon2),
            SLOT_MELEE => Ok(Self::Melee),
            _ => Err(format!(
                "Invalid gear slot '{s}'. Must be one of: {}",
                VALID_SLOT_NAMES.join(", ")
            )),
        }
    }

    /// Parse a slot name read back from storage, mapping `accessory` to
    /// [`GearSlot::Mask`]. Returns `None` for unknown names.
    pub fn from_stored(s: &str) -> Option<Self> {
        if s == SLOT_ACCESSORY_LEGACY {
            return Some(Self::Mask);
        }
        Self::from_str_value(s).ok()
    }

    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Helmet => SLOT_HELMET,
            Self::Jacket => SLOT_JACKET,
            Self::Pants => SLOT_PANTS,
            Self::Boots => SLOT_BOOTS,
            Self::Gloves => SLOT_GLOVES,
            Self::Mask => SLOT_MASK,
            Self::Weapon1 => SLOT_WEAPON_1,
            Self::Weapon2 => SLOT_WEAPON_2,
            Self::Melee => SLOT_MELEE,
        }
    }

    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Helmet => SlotKind::Armor(ArmorSlot::Helmet),
            Self::Jacket => SlotKind::Armor(ArmorSlot::Jacket),
            Self::Pants => SlotKind::Armor(ArmorSlot::Pants),
            Self::Boots => SlotKind::Armor(ArmorSlot::Boots),
            Self::Gloves => SlotKind::Armor(ArmorSlot::Gloves),
            Self::Mask => SlotKind::Armor(ArmorSlot::Mask),
            Self::Weapon1 => SlotKind::Weapon(WeaponSlot::Primary),
            Self::Weapon2 => SlotKind::Weapon(WeaponSlot::Secondary),
            Self::Melee => SlotKind::Weapon(WeaponSlot::Melee),
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind(), SlotKind::Weapon(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
