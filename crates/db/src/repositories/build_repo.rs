//! Repository for the `builds` aggregate and its child tables
//! (`build_gear`, `build_cradle`, `build_ability_assignment`).
//!
//! Every write runs in a single transaction: a build and its children
//! change together or not at all.

use futures::future::try_join_all;
use gearlog_core::enrichment::BuildSource;
use gearlog_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::build::{
    AbilityAssignment, Build, BuildChildren, BuildPayload, BuildWithChildren, CradleAssignment,
    GearAssignment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, build_name, calibration_id, author, tier, rating, views, description, \
     crit_rate, crit_dmg, elemental_dmg, defense, hp, stamina, created_at, updated_at";

const GEAR_COLUMNS: &str = "id, build_id, slot_name, gear_set_id, weapon_id, hide_material_id, mod_id";
const CRADLE_COLUMNS: &str = "id, build_id, item_slot, cradle_item_id";
const ABILITY_COLUMNS: &str = "id, build_id, ability_rank, ability_master_id";

/// Provides CRUD operations for builds and their child collections.
pub struct BuildRepo;

impl BuildRepo {
    /// Insert a build and all of its children, returning the created row.
    pub async fn create(pool: &PgPool, input: &BuildPayload) -> Result<Build, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO builds
                (build_name, calibration_id, author, tier, rating, description,
                 crit_rate, crit_dmg, elemental_dmg, defense, hp, stamina)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        let build = sqlx::query_as::<_, Build>(&query)
            .bind(&input.build_name)
            .bind(input.calibration_id)
            .bind(&input.author)
            .bind(&input.tier)
            .bind(input.rating)
            .bind(&input.description)
            .bind(input.stats.crit_rate)
            .bind(input.stats.crit_dmg)
            .bind(input.stats.elemental_dmg)
            .bind(input.stats.defense)
            .bind(input.stats.hp)
            .bind(input.stats.stamina)
            .fetch_one(&mut *tx)
            .await?;

        Self::insert_children_inner(&mut tx, build.id, input).await?;

        tx.commit().await?;
        Ok(build)
    }

    /// Find a build by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Build>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM builds WHERE id = $1");
        sqlx::query_as::<_, Build>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all builds, ordered by name ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<Build>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM builds ORDER BY build_name ASC, id ASC");
        sqlx::query_as::<_, Build>(&query).fetch_all(pool).await
    }

    /// Replace a build's fields and all of its children.
    ///
    /// Child collections are treated as a single value: existing rows are
    /// deleted and the submitted rows inserted. `views` is never touched.
    /// Returns `None` if no build with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &BuildPayload,
    ) -> Result<Option<Build>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE builds SET
                build_name = $2,
                calibration_id = $3,
                author = $4,
                tier = $5,
                rating = $6,
                description = $7,
                crit_rate = $8,
                crit_dmg = $9,
                elemental_dmg = $10,
                defense = $11,
                hp = $12,
                stamina = $13,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let build = sqlx::query_as::<_, Build>(&query)
            .bind(id)
            .bind(&input.build_name)
            .bind(input.calibration_id)
            .bind(&input.author)
            .bind(&input.tier)
            .bind(input.rating)
            .bind(&input.description)
            .bind(input.stats.crit_rate)
            .bind(input.stats.crit_dmg)
            .bind(input.stats.elemental_dmg)
            .bind(input.stats.defense)
            .bind(input.stats.hp)
            .bind(input.stats.stamina)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(ref build) = build {
            Self::delete_children_inner(&mut tx, build.id).await?;
            Self::insert_children_inner(&mut tx, build.id, input).await?;
        }

        tx.commit().await?;
        Ok(build)
    }

    /// Delete a build and its children. Returns `true` if the build existed.
    ///
    /// Children are removed explicitly (abilities, cradle, gear) before the
    /// parent row, independent of the cascade on the foreign keys.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        Self::delete_children_inner(&mut tx, id).await?;
        let result = sqlx::query("DELETE FROM builds WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Children
    // -----------------------------------------------------------------------

    /// List gear rows for a build, ordered by slot name.
    pub async fn list_gear(pool: &PgPool, build_id: DbId) -> Result<Vec<GearAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {GEAR_COLUMNS} FROM build_gear WHERE build_id = $1 ORDER BY slot_name ASC"
        );
        sqlx::query_as::<_, GearAssignment>(&query)
            .bind(build_id)
            .fetch_all(pool)
            .await
    }

    /// List cradle rows for a build, ordered by slot.
    pub async fn list_cradle(
        pool: &PgPool,
        build_id: DbId,
    ) -> Result<Vec<CradleAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {CRADLE_COLUMNS} FROM build_cradle WHERE build_id = $1 ORDER BY item_slot ASC"
        );
        sqlx::query_as::<_, CradleAssignment>(&query)
            .bind(build_id)
            .fetch_all(pool)
            .await
    }

    /// List ability rows for a build, ordered by rank.
    pub async fn list_abilities(
        pool: &PgPool,
        build_id: DbId,
    ) -> Result<Vec<AbilityAssignment>, sqlx::Error> {
        let query = format!(
            "SELECT {ABILITY_COLUMNS} FROM build_ability_assignment
             WHERE build_id = $1
             ORDER BY ability_rank ASC"
        );
        sqlx::query_as::<_, AbilityAssignment>(&query)
            .bind(build_id)
            .fetch_all(pool)
            .await
    }

    /// Fetch all three child collections of a build concurrently.
    pub async fn children(pool: &PgPool, build_id: DbId) -> Result<BuildChildren, sqlx::Error> {
        let (gear, cradle, abilities) = tokio::try_join!(
            Self::list_gear(pool, build_id),
            Self::list_cradle(pool, build_id),
            Self::list_abilities(pool, build_id),
        )?;
        Ok(BuildChildren {
            gear,
            cradle,
            abilities,
        })
    }

    /// Find a build together with its children.
    pub async fn find_with_children(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<BuildWithChildren>, sqlx::Error> {
        let Some(build) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let children = Self::children(pool, build.id).await?;
        Ok(Some(BuildWithChildren { build, children }))
    }

    /// Load a build as enrichment input.
    pub async fn load_source(pool: &PgPool, id: DbId) -> Result<Option<BuildSource>, sqlx::Error> {
        Ok(Self::find_with_children(pool, id)
            .await?
            .map(|b| b.to_source()))
    }

    /// List every build with its children. Child fetches for all builds run
    /// concurrently; the first failure fails the whole listing.
    pub async fn list_with_children(pool: &PgPool) -> Result<Vec<BuildWithChildren>, sqlx::Error> {
        let builds = Self::list(pool).await?;
        try_join_all(builds.into_iter().map(|build| async move {
            let children = Self::children(pool, build.id).await?;
            Ok::<_, sqlx::Error>(BuildWithChildren { build, children })
        }))
        .await
    }

    // -----------------------------------------------------------------------
    // Transaction helpers
    // -----------------------------------------------------------------------

    /// Insert every child row of `input` under `build_id`.
    async fn insert_children_inner(
        tx: &mut Transaction<'_, Postgres>,
        build_id: DbId,
        input: &BuildPayload,
    ) -> Result<(), sqlx::Error> {
        for item in &input.gear_items {
            sqlx::query(
                "INSERT INTO build_gear
                    (build_id, slot_name, gear_set_id, weapon_id, hide_material_id, mod_id)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .bind(build_id)
            .bind(&item.slot_name)
            .bind(item.gear_set_id)
            .bind(item.weapon_id)
            .bind(item.hide_material_id)
            .bind(item.mod_id)
            .execute(&mut **tx)
            .await?;
        }

        for item in &input.cradle_items {
            sqlx::query(
                "INSERT INTO build_cradle (build_id, item_slot, cradle_item_id) VALUES ($1, $2, $3)",
            )
            .bind(build_id)
            .bind(item.slot_number)
            .bind(item.cradle_item_id)
            .execute(&mut **tx)
            .await?;
        }

        for ability in &input.abilities {
            sqlx::query(
                "INSERT INTO build_ability_assignment (build_id, ability_rank, ability_master_id)
                 VALUES ($1, $2, $3)",
            )
            .bind(build_id)
            .bind(ability.rank)
            .bind(ability.ability_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }

    /// Delete every child row of a build: abilities, then cradle, then gear.
    async fn delete_children_inner(
        tx: &mut Transaction<'_, Postgres>,
        build_id: DbId,
    ) -> Result<(), sqlx::Error> {
        for table in ["build_ability_assignment", "build_cradle", "build_gear"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE build_id = $1"))
                .bind(build_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}
