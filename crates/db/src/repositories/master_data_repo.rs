//! Repository for the read-only master reference lists.

use gearlog_core::master_data::{MasterData, MasterEntry, WeaponEntry};
use sqlx::PgPool;

use crate::models::master::{dmg_type_entry, MasterRow, WeaponRow};

/// Error returned when one or more master list queries fail.
///
/// There is no partial snapshot: every list must load for the snapshot to
/// be usable.
#[derive(Debug, thiserror::Error)]
pub enum MasterDataError {
    #[error("Master data failed to fetch: {}", .failed.join(", "))]
    Partial {
        /// Table names of every query that failed.
        failed: Vec<&'static str>,
        /// The first underlying error, kept for diagnostics.
        #[source]
        source: sqlx::Error,
    },
}

/// Collects failures across the concurrent master list queries.
#[derive(Default)]
struct Failures {
    names: Vec<&'static str>,
    first: Option<sqlx::Error>,
}

impl Failures {
    fn take<T>(&mut self, table: &'static str, result: Result<Vec<T>, sqlx::Error>) -> Vec<T> {
        match result {
            Ok(rows) => rows,
            Err(err) => {
                tracing::error!(table, error = %err, "Master list query failed");
                self.names.push(table);
                if self.first.is_none() {
                    self.first = Some(err);
                }
                Vec::new()
            }
        }
    }
}

/// Loads master reference data.
pub struct MasterDataRepo;

impl MasterDataRepo {
    /// Load every master list concurrently into one snapshot.
    ///
    /// All queries run to completion before failures are reported, so the
    /// error names every list that could not be read.
    pub async fn load_snapshot(pool: &PgPool) -> Result<MasterData, MasterDataError> {
        let (calibrations, cradle_items, abilities, hides, mods, gear_sets, weapons, dmg_types) = tokio::join!(
            Self::list_named(pool, "calibration", "name"),
            Self::list_named(pool, "cradle_master_list", "item_name"),
            Self::list_named(pool, "ability_master_list", "ability_name"),
            Self::list_named(pool, "hide_master_list", "material_name"),
            Self::list_named(pool, "mod_master_list", "mod_name"),
            Self::list_named(pool, "gear_set_master_list", "set_name"),
            Self::list_weapons(pool),
            Self::list_named(pool, "dmg_types", "label"),
        );

        let mut failures = Failures::default();
        let snapshot = MasterData {
            calibrations: entries(failures.take("calibration", calibrations)),
            cradle_items: entries(failures.take("cradle_master_list", cradle_items)),
            abilities: entries(failures.take("ability_master_list", abilities)),
            hide_materials: entries(failures.take("hide_master_list", hides)),
            mods: entries(failures.take("mod_master_list", mods)),
            gear_sets: entries(failures.take("gear_set_master_list", gear_sets)),
            weapons: failures
                .take("weapon_master_list", weapons)
                .into_iter()
                .map(WeaponEntry::from)
                .collect(),
            dmg_types: failures
                .take("dmg_types", dmg_types)
                .into_iter()
                .map(dmg_type_entry)
                .collect(),
        };

        match failures.first {
            Some(source) => Err(MasterDataError::Partial {
                failed: failures.names,
                source,
            }),
            None => Ok(snapshot),
        }
    }

    /// List `{id, name}` rows of one master table ordered by display name.
    ///
    /// `table` and `column` are always crate-internal literals.
    async fn list_named(
        pool: &PgPool,
        table: &'static str,
        column: &'static str,
    ) -> Result<Vec<MasterRow>, sqlx::Error> {
        let query = format!("SELECT id, {column} AS name FROM {table} ORDER BY {column} ASC");
        sqlx::query_as::<_, MasterRow>(&query).fetch_all(pool).await
    }

    /// List all weapons (ranged and melee) ordered by weapon name.
    async fn list_weapons(pool: &PgPool) -> Result<Vec<WeaponRow>, sqlx::Error> {
        sqlx::query_as::<_, WeaponRow>(
            "SELECT id, weapon_name AS name, weapon_type, dmg_type_id
             FROM weapon_master_list
             ORDER BY weapon_name ASC",
        )
        .fetch_all(pool)
        .await
    }
}

fn entries(rows: Vec<MasterRow>) -> Vec<MasterEntry> {
    rows.into_iter().map(MasterEntry::from).collect()
}
