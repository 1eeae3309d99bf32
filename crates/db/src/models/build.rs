//! Build aggregate rows: `builds` plus its three child tables.

use gearlog_core::enrichment::{
    AbilityRecord, BuildRecord, BuildSource, CradleRecord, GearRecord,
};
use gearlog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub use gearlog_core::payload::{
    AbilityItemInput, BuildPayload, CradleItemInput, GearItemInput, StatsInput,
};

/// A row from the `builds` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Build {
    pub id: DbId,
    pub build_name: String,
    pub calibration_id: Option<DbId>,
    pub author: Option<String>,
    pub tier: Option<String>,
    pub rating: Option<i32>,
    pub views: i32,
    pub description: Option<String>,
    pub crit_rate: Option<f64>,
    pub crit_dmg: Option<f64>,
    pub elemental_dmg: Option<f64>,
    pub defense: Option<f64>,
    pub hp: Option<f64>,
    pub stamina: Option<f64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from `build_gear`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GearAssignment {
    pub id: DbId,
    pub build_id: DbId,
    pub slot_name: String,
    pub gear_set_id: Option<DbId>,
    pub weapon_id: Option<DbId>,
    pub hide_material_id: Option<DbId>,
    pub mod_id: Option<DbId>,
}

/// A row from `build_cradle`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CradleAssignment {
    pub id: DbId,
    pub build_id: DbId,
    pub item_slot: i32,
    pub cradle_item_id: Option<DbId>,
}

/// A row from `build_ability_assignment`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AbilityAssignment {
    pub id: DbId,
    pub build_id: DbId,
    pub ability_rank: i32,
    pub ability_master_id: Option<DbId>,
}

/// The child collections of one build, in storage order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildChildren {
    pub gear: Vec<GearAssignment>,
    pub cradle: Vec<CradleAssignment>,
    pub abilities: Vec<AbilityAssignment>,
}

/// Raw build with its children, as served to the edit form.
#[derive(Debug, Clone, Serialize)]
pub struct BuildWithChildren {
    #[serde(flatten)]
    pub build: Build,
    #[serde(flatten)]
    pub children: BuildChildren,
}

// ---------------------------------------------------------------------------
// Conversions into enrichment records
// ---------------------------------------------------------------------------

impl From<&Build> for BuildRecord {
    fn from(b: &Build) -> Self {
        Self {
            id: b.id,
            build_name: b.build_name.clone(),
            calibration_id: b.calibration_id,
            author: b.author.clone(),
            tier: b.tier.clone(),
            rating: b.rating,
            views: Some(b.views),
            description: b.description.clone(),
            crit_rate: b.crit_rate,
            crit_dmg: b.crit_dmg,
            elemental_dmg: b.elemental_dmg,
            defense: b.defense,
            hp: b.hp,
            stamina: b.stamina,
        }
    }
}

impl From<&GearAssignment> for GearRecord {
    fn from(g: &GearAssignment) -> Self {
        Self {
            slot_name: g.slot_name.clone(),
            gear_set_id: g.gear_set_id,
            weapon_id: g.weapon_id,
            hide_material_id: g.hide_material_id,
            mod_id: g.mod_id,
        }
    }
}

impl From<&CradleAssignment> for CradleRecord {
    fn from(c: &CradleAssignment) -> Self {
        Self {
            item_slot: c.item_slot,
            cradle_item_id: c.cradle_item_id,
        }
    }
}

impl From<&AbilityAssignment> for AbilityRecord {
    fn from(a: &AbilityAssignment) -> Self {
        Self {
            ability_rank: a.ability_rank,
            ability_master_id: a.ability_master_id,
        }
    }
}

impl BuildWithChildren {
    /// Convert into the input shape expected by the enrichment mapper.
    pub fn to_source(&self) -> BuildSource {
        BuildSource {
            build: BuildRecord::from(&self.build),
            gear: self.children.gear.iter().map(GearRecord::from).collect(),
            cradle: self.children.cradle.iter().map(CradleRecord::from).collect(),
            abilities: self
                .children
                .abilities
                .iter()
                .map(AbilityRecord::from)
                .collect(),
        }
    }
}
