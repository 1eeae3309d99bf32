//! Admin build payload and its validation.
//!
//! The same payload shape is used for create and for the full-replace
//! update. [`prepare`] normalizes a submitted payload and rejects anything
//! that would break the slot invariants before it reaches the database.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::slots::{GearSlot, ABILITY_CAPACITY, CRADLE_CAPACITY};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const MAX_BUILD_NAME_LENGTH: usize = 120;

pub const VALID_TIERS: &[&str] = &["S", "A", "B", "C"];

pub const MIN_RATING: i32 = 0;
pub const MAX_RATING: i32 = 5;

// ---------------------------------------------------------------------------
// Payload types
// ---------------------------------------------------------------------------

/// One gear or weapon slot submitted by the admin form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GearItemInput {
    pub slot_name: String,
    #[serde(default)]
    pub gear_set_id: Option<DbId>,
    #[serde(default)]
    pub weapon_id: Option<DbId>,
    #[serde(default)]
    pub hide_material_id: Option<DbId>,
    #[serde(default)]
    pub mod_id: Option<DbId>,
}

impl GearItemInput {
    /// A row with neither item nor mod carries no information and is dropped.
    fn is_empty(&self) -> bool {
        self.gear_set_id.is_none() && self.weapon_id.is_none() && self.mod_id.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CradleItemInput {
    pub cradle_item_id: DbId,
    pub slot_number: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityItemInput {
    pub ability_id: DbId,
    pub rank: i32,
}

/// Optional stat block. Absent values are stored as NULL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsInput {
    pub crit_rate: Option<f64>,
    pub crit_dmg: Option<f64>,
    pub elemental_dmg: Option<f64>,
    pub defense: Option<f64>,
    pub hp: Option<f64>,
    pub stamina: Option<f64>,
}

/// Create / full-replace update payload for a build and its children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPayload {
    pub build_name: String,
    #[serde(default)]
    pub calibration_id: Option<DbId>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub rating: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stats: StatsInput,
    #[serde(default)]
    pub gear_items: Vec<GearItemInput>,
    #[serde(default)]
    pub cradle_items: Vec<CradleItemInput>,
    #[serde(default)]
    pub abilities: Vec<AbilityItemInput>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a build name: non-empty after trimming and within length limits.
pub fn validate_build_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("build_name must not be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_BUILD_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "build_name must be at most {MAX_BUILD_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate a gear row against its slot kind.
///
/// Weapon slots reference `weapon_id` and never a gear set or hide; armor
/// slots reference `gear_set_id` and never a weapon.
pub fn validate_gear_item(item: &GearItemInput) -> Result<GearSlot, CoreError> {
    let slot = GearSlot::from_str_value(&item.slot_name).map_err(CoreError::Validation)?;
    let name = slot.as_str();

    if slot.is_weapon() {
        if item.gear_set_id.is_some() {
            return Err(CoreError::Validation(format!(
                "weapon slot '{name}' must not reference a gear set"
            )));
        }
        if item.hide_material_id.is_some() {
            return Err(CoreError::Validation(format!(
                "weapon slot '{name}' must not reference a hide material"
            )));
        }
    } else if item.weapon_id.is_some() {
        return Err(CoreError::Validation(format!(
            "armor slot '{name}' must not reference a weapon"
        )));
    }

    Ok(slot)
}

/// Validate that ordinals fall within `1..=capacity` and are unique.
fn validate_ordinals(
    field: &str,
    values: impl Iterator<Item = i32>,
    capacity: i32,
) -> Result<(), CoreError> {
    let mut seen = HashSet::new();
    for value in values {
        if !(1..=capacity).contains(&value) {
            return Err(CoreError::Validation(format!(
                "{field} must be between 1 and {capacity}, got {value}"
            )));
        }
        if !seen.insert(value) {
            return Err(CoreError::Validation(format!("duplicate {field} {value}")));
        }
    }
    Ok(())
}

pub fn validate_tier(tier: &str) -> Result<(), CoreError> {
    if VALID_TIERS.contains(&tier) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid tier '{tier}'. Must be one of: {}",
            VALID_TIERS.join(", ")
        )))
    }
}

pub fn validate_rating(rating: i32) -> Result<(), CoreError> {
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        )))
    }
}

/// Normalize and validate a submitted payload.
///
/// Trims the name, blanks out empty optional text, drops gear rows that
/// carry no item and no mod, then checks every remaining row.
pub fn prepare(mut payload: BuildPayload) -> Result<BuildPayload, CoreError> {
    validate_build_name(&payload.build_name)?;
    payload.build_name = payload.build_name.trim().to_string();

    for field in [&mut payload.author, &mut payload.tier, &mut payload.description] {
        if field.as_deref().is_some_and(|s| s.trim().is_empty()) {
            *field = None;
        }
    }
    if let Some(tier) = payload.tier.as_deref() {
        validate_tier(tier)?;
    }
    if let Some(rating) = payload.rating {
        validate_rating(rating)?;
    }

    payload.gear_items.retain(|g| !g.is_empty());
    let mut slots = HashSet::new();
    for item in &payload.gear_items {
        let slot = validate_gear_item(item)?;
        if !slots.insert(slot) {
            return Err(CoreError::Validation(format!(
                "duplicate gear slot '{}'",
                slot.as_str()
            )));
        }
    }

    validate_ordinals(
        "cradle slot_number",
        payload.cradle_items.iter().map(|c| c.slot_number),
        CRADLE_CAPACITY,
    )?;
    validate_ordinals(
        "ability rank",
        payload.abilities.iter().map(|a| a.rank),
        ABILITY_CAPACITY,
    )?;

    Ok(payload)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
