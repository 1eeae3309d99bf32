//! Master list rows.
//!
//! Every master table has its own display-name column; queries alias it to
//! `name` so a single row struct covers them all.

use gearlog_core::master_data::{normalize_dmg_label, MasterEntry, WeaponEntry};
use gearlog_core::types::DbId;
use sqlx::FromRow;

/// An `{id, name}` row from any master list.
#[derive(Debug, Clone, FromRow)]
pub struct MasterRow {
    pub id: DbId,
    pub name: String,
}

/// A row from `weapon_master_list`.
#[derive(Debug, Clone, FromRow)]
pub struct WeaponRow {
    pub id: DbId,
    pub name: String,
    pub weapon_type: Option<String>,
    pub dmg_type_id: Option<DbId>,
}

impl From<MasterRow> for MasterEntry {
    fn from(row: MasterRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
        }
    }
}

impl From<WeaponRow> for WeaponEntry {
    fn from(row: WeaponRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            weapon_type: row.weapon_type,
            dmg_type_id: row.dmg_type_id,
        }
    }
}

/// Convert a `dmg_types` row, correcting legacy label typos.
pub fn dmg_type_entry(row: MasterRow) -> MasterEntry {
    MasterEntry {
        id: row.id,
        name: normalize_dmg_label(&row.name),
    }
}
