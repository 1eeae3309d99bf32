//! Build enrichment: resolves the foreign keys of a stored build and its
//! child rows into a display-ready [`EnrichedBuild`].
//!
//! Enrichment is a pure function over pre-loaded rows and [`LookupMaps`].
//! Ids that no longer resolve degrade to sentinel labels instead of
//! failing.

use serde::{Deserialize, Serialize};

use crate::master_data::LookupMaps;
use crate::slots::{is_weapon_slot_name, ArmorSlot, GearSlot, SlotKind, WeaponSlot};
use crate::slots::{SLOT_WEAPON_1, SLOT_WEAPON_2};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Label for any reference that is missing or does not resolve.
pub const NOT_AVAILABLE: &str = "N/A";

/// Hide label shown for weapon slots, which never carry a hide.
pub const WEAPON_HIDE: &str = "-";

/// Damage-type label when neither weapon resolves to a known type.
pub const NO_DMG_TYPE: &str = "None";

pub const DEFAULT_AUTHOR: &str = "ANONYMOUS_OPERATIVE";
pub const DEFAULT_TIER: &str = "B";
pub const DEFAULT_RATING: i32 = 5;
pub const DEFAULT_VIEWS: i32 = 0;
pub const DEFAULT_DESCRIPTION: &str = "TACTICAL_DATA_ENCRYPTED";

// ---------------------------------------------------------------------------
// Input rows
// ---------------------------------------------------------------------------

/// The parent `builds` row as needed for enrichment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildRecord {
    pub id: DbId,
    pub build_name: String,
    pub calibration_id: Option<DbId>,
    pub author: Option<String>,
    pub tier: Option<String>,
    pub rating: Option<i32>,
    pub views: Option<i32>,
    pub description: Option<String>,
    pub crit_rate: Option<f64>,
    pub crit_dmg: Option<f64>,
    pub elemental_dmg: Option<f64>,
    pub defense: Option<f64>,
    pub hp: Option<f64>,
    pub stamina: Option<f64>,
}

/// A `build_gear` row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GearRecord {
    pub slot_name: String,
    pub gear_set_id: Option<DbId>,
    pub weapon_id: Option<DbId>,
    pub hide_material_id: Option<DbId>,
    pub mod_id: Option<DbId>,
}

/// A `build_cradle` row.
#[derive(Debug, Clone, PartialEq)]
pub struct CradleRecord {
    pub item_slot: i32,
    pub cradle_item_id: Option<DbId>,
}

/// A `build_ability_assignment` row.
#[derive(Debug, Clone, PartialEq)]
pub struct AbilityRecord {
    pub ability_rank: i32,
    pub ability_master_id: Option<DbId>,
}

/// A build together with all of its child rows, in storage order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildSource {
    pub build: BuildRecord,
    pub gear: Vec<GearRecord>,
    pub cradle: Vec<CradleRecord>,
    pub abilities: Vec<AbilityRecord>,
}

// ---------------------------------------------------------------------------
// Output view model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorPiece {
    pub item: String,
    pub hide: String,
    #[serde(rename = "mod")]
    pub mod_name: String,
}

impl Default for ArmorPiece {
    fn default() -> Self {
        Self {
            item: NOT_AVAILABLE.to_string(),
            hide: NOT_AVAILABLE.to_string(),
            mod_name: NOT_AVAILABLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponPiece {
    pub item: String,
    #[serde(rename = "mod")]
    pub mod_name: String,
}

impl Default for WeaponPiece {
    fn default() -> Self {
        Self {
            item: NOT_AVAILABLE.to_string(),
            mod_name: NOT_AVAILABLE.to_string(),
        }
    }
}

/// Fixed-shape armor loadout. Every slot is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorLoadout {
    pub helmet: ArmorPiece,
    pub jacket: ArmorPiece,
    pub pants: ArmorPiece,
    pub gloves: ArmorPiece,
    pub boots: ArmorPiece,
    pub mask: ArmorPiece,
}

impl ArmorLoadout {
    pub fn slot(&self, slot: ArmorSlot) -> &ArmorPiece {
        match slot {
            ArmorSlot::Helmet => &self.helmet,
            ArmorSlot::Jacket => &self.jacket,
            ArmorSlot::Pants => &self.pants,
            ArmorSlot::Gloves => &self.gloves,
            ArmorSlot::Boots => &self.boots,
            ArmorSlot::Mask => &self.mask,
        }
    }

    pub fn slot_mut(&mut self, slot: ArmorSlot) -> &mut ArmorPiece {
        match slot {
            ArmorSlot::Helmet => &mut self.helmet,
            ArmorSlot::Jacket => &mut self.jacket,
            ArmorSlot::Pants => &mut self.pants,
            ArmorSlot::Gloves => &mut self.gloves,
            ArmorSlot::Boots => &mut self.boots,
            ArmorSlot::Mask => &mut self.mask,
        }
    }
}

/// Fixed-shape weapon loadout. Every slot is always present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponLoadout {
    pub primary: WeaponPiece,
    pub secondary: WeaponPiece,
    pub melee: WeaponPiece,
}

impl WeaponLoadout {
    pub fn slot(&self, slot: WeaponSlot) -> &WeaponPiece {
        match slot {
            WeaponSlot::Primary => &self.primary,
            WeaponSlot::Secondary => &self.secondary,
            WeaponSlot::Melee => &self.melee,
        }
    }

    pub fn slot_mut(&mut self, slot: WeaponSlot) -> &mut WeaponPiece {
        match slot {
            WeaponSlot::Primary => &mut self.primary,
            WeaponSlot::Secondary => &mut self.secondary,
            WeaponSlot::Melee => &mut self.melee,
        }
    }
}

/// One row of the flat gear table, in storage order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearListEntry {
    pub slot: String,
    pub hide: String,
    pub item: String,
    #[serde(rename = "mod")]
    pub mod_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildStats {
    pub crit_rate: f64,
    pub crit_dmg: f64,
    pub elemental_dmg: f64,
    pub defense: f64,
    pub hp: f64,
    pub stamina: f64,
}

/// Display-ready build with every reference resolved to a label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedBuild {
    pub id: DbId,
    pub name: String,
    pub author: String,
    pub dmg_type: String,
    /// Summary weapon shown in list views.
    pub weapon: String,
    pub weapons: WeaponLoadout,
    pub tier: String,
    pub rating: i32,
    pub views: i32,
    pub description: String,
    pub calibration: String,
    pub cradle: Vec<String>,
    pub abilities: Vec<String>,
    pub gear: ArmorLoadout,
    pub gear_list: Vec<GearListEntry>,
    pub stats: BuildStats,
}

// ---------------------------------------------------------------------------
// Enrichment
// ---------------------------------------------------------------------------

fn label_or_na(label: Option<&str>) -> String {
    label.unwrap_or(NOT_AVAILABLE).to_string()
}

/// Treat `None` and blank strings alike, falling back to `default`.
fn text_or(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Resolve the displayed item of a gear row: gear set first, then weapon.
pub fn resolve_gear_item<'a>(row: &GearRecord, maps: &'a LookupMaps) -> Option<&'a str> {
    maps.gear_set(row.gear_set_id)
        .or_else(|| maps.weapon(row.weapon_id))
}

/// Resolve one gear row into its flat table entry.
pub fn resolve_gear_row(row: &GearRecord, maps: &LookupMaps) -> GearListEntry {
    let hide = if is_weapon_slot_name(&row.slot_name) {
        WEAPON_HIDE.to_string()
    } else {
        label_or_na(maps.hide(row.hide_material_id))
    };

    GearListEntry {
        slot: row.slot_name.clone(),
        hide,
        item: label_or_na(resolve_gear_item(row, maps)),
        mod_name: label_or_na(maps.mod_name(row.mod_id)),
    }
}

/// Weapon id of the first row stored under `slot_name`, if any.
fn weapon_id_in(gear: &[GearRecord], slot_name: &str) -> Option<DbId> {
    gear.iter()
        .find(|g| g.slot_name == slot_name)
        .and_then(|g| g.weapon_id)
}

/// Enrich a build and its child rows.
pub fn enrich(source: &BuildSource, maps: &LookupMaps) -> EnrichedBuild {
    let build = &source.build;

    let gear_list: Vec<GearListEntry> = source
        .gear
        .iter()
        .map(|row| resolve_gear_row(row, maps))
        .collect();

    let mut gear = ArmorLoadout::default();
    let mut weapons = WeaponLoadout::default();
    for entry in &gear_list {
        match GearSlot::from_stored(&entry.slot).map(|s| s.kind()) {
            Some(SlotKind::Armor(slot)) => {
                *gear.slot_mut(slot) = ArmorPiece {
                    item: entry.item.clone(),
                    hide: entry.hide.clone(),
                    mod_name: entry.mod_name.clone(),
                };
            }
            Some(SlotKind::Weapon(slot)) => {
                *weapons.slot_mut(slot) = WeaponPiece {
                    item: entry.item.clone(),
                    mod_name: entry.mod_name.clone(),
                };
            }
            None => {}
        }
    }

    let weapon = if weapons.primary.item != NOT_AVAILABLE {
        weapons.primary.item.clone()
    } else {
        weapons.secondary.item.clone()
    };

    let dmg_weapon_id = weapon_id_in(&source.gear, SLOT_WEAPON_1)
        .or_else(|| weapon_id_in(&source.gear, SLOT_WEAPON_2));
    let dmg_type = maps
        .weapon_dmg_label(dmg_weapon_id)
        .unwrap_or(NO_DMG_TYPE)
        .to_string();

    let mut cradle_rows: Vec<&CradleRecord> = source.cradle.iter().collect();
    cradle_rows.sort_by_key(|c| c.item_slot);
    let cradle = cradle_rows
        .into_iter()
        .map(|c| label_or_na(maps.cradle_item(c.cradle_item_id)))
        .collect();

    let mut ability_rows: Vec<&AbilityRecord> = source.abilities.iter().collect();
    ability_rows.sort_by_key(|a| a.ability_rank);
    let abilities = ability_rows
        .into_iter()
        .map(|a| label_or_na(maps.ability(a.ability_master_id)))
        .collect();

    EnrichedBuild {
        id: build.id,
        name: build.build_name.clone(),
        author: text_or(build.author.as_deref(), DEFAULT_AUTHOR),
        dmg_type,
        weapon,
        weapons,
        tier: text_or(build.tier.as_deref(), DEFAULT_TIER),
        rating: build.rating.unwrap_or(DEFAULT_RATING),
        views: build.views.unwrap_or(DEFAULT_VIEWS),
        description: text_or(build.description.as_deref(), DEFAULT_DESCRIPTION),
        calibration: label_or_na(maps.calibration(build.calibration_id)),
        cradle,
        abilities,
        gear,
        gear_list,
        stats: BuildStats {
            crit_rate: build.crit_rate.unwrap_or_default(),
            crit_dmg: build.crit_dmg.unwrap_or_default(),
            elemental_dmg: build.elemental_dmg.unwrap_or_default(),
            defense: build.defense.unwrap_or_default(),
            hp: build.hp.unwrap_or_default(),
            stamina: build.stamina.unwrap_or_default(),
        },
    }
}

/// Enrich a page of builds against one snapshot, preserving input order.
pub fn enrich_all(sources: &[BuildSource], maps: &LookupMaps) -> Vec<EnrichedBuild> {
    sources.iter().map(|s| enrich(s, maps)).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
