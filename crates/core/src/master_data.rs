//! Master reference data snapshot and the lookup maps derived from it.
//!
//! The snapshot is loaded by the db crate; this module only holds the
//! shapes and the pure derivations used by enrichment and by form
//! dropdowns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// Damage-type label as stored by older seed data.
const MISSPELLED_FORTRESS_LABEL: &str = "Fortress Warefare";
const FORTRESS_LABEL: &str = "Fortress Warfare";

/// Weapon type value that marks a melee weapon.
pub const WEAPON_TYPE_MELEE: &str = "melee";

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// A generic `{id, name}` row from any master list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterEntry {
    pub id: DbId,
    pub name: String,
}

/// A row from `weapon_master_list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponEntry {
    pub id: DbId,
    pub name: String,
    pub weapon_type: Option<String>,
    pub dmg_type_id: Option<DbId>,
}

impl WeaponEntry {
    pub fn is_melee(&self) -> bool {
        self.weapon_type
            .as_deref()
            .is_some_and(|t| t.trim().eq_ignore_ascii_case(WEAPON_TYPE_MELEE))
    }
}

/// All master lists, each ordered by display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    pub calibrations: Vec<MasterEntry>,
    pub cradle_items: Vec<MasterEntry>,
    pub abilities: Vec<MasterEntry>,
    pub hide_materials: Vec<MasterEntry>,
    pub mods: Vec<MasterEntry>,
    pub gear_sets: Vec<MasterEntry>,
    /// Ranged and melee weapons share one table.
    pub weapons: Vec<WeaponEntry>,
    pub dmg_types: Vec<MasterEntry>,
}

impl MasterData {
    /// Weapons eligible for the primary/secondary slots.
    pub fn ranged_weapons(&self) -> impl Iterator<Item = &WeaponEntry> {
        self.weapons.iter().filter(|w| !w.is_melee())
    }

    /// Weapons eligible for the melee slot.
    pub fn melee_weapons(&self) -> impl Iterator<Item = &WeaponEntry> {
        self.weapons.iter().filter(|w| w.is_melee())
    }
}

/// Correct known typos in damage-type labels coming from storage.
pub fn normalize_dmg_label(label: &str) -> String {
    if label == MISSPELLED_FORTRESS_LABEL {
        FORTRESS_LABEL.to_string()
    } else {
        label.to_string()
    }
}

// ---------------------------------------------------------------------------
// Lookup maps
// ---------------------------------------------------------------------------

/// id → display-name maps built from a [`MasterData`] snapshot.
#[derive(Debug, Clone, Default)]
pub struct LookupMaps {
    gear_sets: HashMap<DbId, String>,
    weapons: HashMap<DbId, String>,
    mods: HashMap<DbId, String>,
    hides: HashMap<DbId, String>,
    calibrations: HashMap<DbId, String>,
    cradle_items: HashMap<DbId, String>,
    abilities: HashMap<DbId, String>,
    weapon_dmg_types: HashMap<DbId, DbId>,
    dmg_labels: HashMap<DbId, String>,
}

fn name_map(entries: &[MasterEntry]) -> HashMap<DbId, String> {
    entries.iter().map(|e| (e.id, e.name.clone())).collect()
}

fn lookup(map: &HashMap<DbId, String>, id: Option<DbId>) -> Option<&str> {
    id.and_then(|id| map.get(&id)).map(String::as_str)
}

impl LookupMaps {
    pub fn from_snapshot(master: &MasterData) -> Self {
        Self {
            gear_sets: name_map(&master.gear_sets),
            weapons: master
                .weapons
                .iter()
                .map(|w| (w.id, w.name.clone()))
                .collect(),
            mods: name_map(&master.mods),
            hides: name_map(&master.hide_materials),
            calibrations: name_map(&master.calibrations),
            cradle_items: name_map(&master.cradle_items),
            abilities: name_map(&master.abilities),
            weapon_dmg_types: master
                .weapons
                .iter()
                .filter_map(|w| w.dmg_type_id.map(|dt| (w.id, dt)))
                .collect(),
            dmg_labels: name_map(&master.dmg_types),
        }
    }

    pub fn gear_set(&self, id: Option<DbId>) -> Option<&str> {
        lookup(&self.gear_sets, id)
    }

    pub fn weapon(&self, id: Option<DbId>) -> Option<&str> {
        lookup(&self.weapons, id)
    }

    pub fn mod_name(&self, id: Option<DbId>) -> Option<&str> {
        lookup(&self.mods, id)
    }

    pub fn hide(&self, id: Option<DbId>) -> Option<&str> {
        lookup(&self.hides, id)
    }

    pub fn calibration(&self, id: Option<DbId>) -> Option<&str> {
        lookup(&self.calibrations, id)
    }

    pub fn cradle_item(&self, id: Option<DbId>) -> Option<&str> {
        lookup(&self.cradle_items, id)
    }

    pub fn ability(&self, id: Option<DbId>) -> Option<&str> {
        lookup(&self.abilities, id)
    }

    /// Resolve a weapon id to its damage-type label in two hops.
    pub fn weapon_dmg_label(&self, weapon_id: Option<DbId>) -> Option<&str> {
        let dmg_type_id = weapon_id.and_then(|id| self.weapon_dmg_types.get(&id)).copied();
        lookup(&self.dmg_labels, dmg_type_id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
