//! Menu permission seeding
//!
//! Every user receives one row per menu. Viewing is always allowed; create,
//! edit and delete are granted to privileged roles only. Seeding replaces a
//! user's existing rows inside a single transaction.

use crate::{
    models::{MenuDb, PermissionDb, UserDb},
    queries::{MenuQueries, PermissionQueries, UserQueries},
};
use erp_core::{Error, Result};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};

/// Permission rows for every user on every menu, user-major
pub fn plan_permissions(users: &[UserDb], menus: &[MenuDb]) -> Vec<PermissionDb> {
    users
        .iter()
        .flat_map(|user| menus.iter().map(move |menu| PermissionDb::for_user(user, menu)))
        .collect()
}

/// Outcome of a seeding run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    /// Users processed
    pub users: usize,
    /// Menus processed
    pub menus: usize,
    /// Privileged users among them
    pub privileged_users: usize,
    /// Existing rows removed
    pub rows_deleted: u64,
    /// Rows written
    pub rows_inserted: u64,
    /// Whether the run only planned without writing
    pub dry_run: bool,
}

impl SeedReport {
    fn planned(users: &[UserDb], menus: &[MenuDb], rows: usize) -> Self {
        Self {
            users: users.len(),
            menus: menus.len(),
            privileged_users: users.iter().filter(|user| user.is_privileged()).count(),
            rows_deleted: 0,
            rows_inserted: u64::try_from(rows).unwrap_or(u64::MAX),
            dry_run: true,
        }
    }
}

/// Replace the permissions of `users` on `menus` in one transaction
///
/// # Errors
///
/// Returns an error if any statement fails; nothing is written in that case.
pub async fn apply_permissions(
    pool: &PgPool,
    users: &[UserDb],
    menus: &[MenuDb],
) -> Result<SeedReport> {
    let rows = plan_permissions(users, menus);
    let mut report = SeedReport::planned(users, menus, rows.len());
    report.dry_run = false;

    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::Database(format!("Failed to begin transaction: {e}")))?;

    let mut deleted = 0;
    for user in users {
        let removed = PermissionQueries::delete_for_user(&mut *tx, user.id).await?;
        debug!(user_id = user.id, username = %user.username, removed, "cleared permissions");
        deleted += removed;
    }

    let inserted = PermissionQueries::insert_batch(&mut *tx, &rows).await?;

    tx.commit()
        .await
        .map_err(|e| Error::Database(format!("Failed to commit permissions: {e}")))?;

    report.rows_deleted = deleted;
    report.rows_inserted = inserted;
    info!(
        users = report.users,
        menus = report.menus,
        deleted,
        inserted,
        "permissions seeded"
    );
    Ok(report)
}

/// Load every user and menu and seed their permissions
///
/// With `dry_run` nothing is written; the report shows what would be.
///
/// # Errors
///
/// Returns an error if loading or writing fails.
pub async fn seed_permissions(pool: &PgPool, dry_run: bool) -> Result<SeedReport> {
    let users = UserQueries::list_all(pool).await?;
    let menus = MenuQueries::list_all(pool).await?;
    info!(users = users.len(), menus = menus.len(), dry_run, "loaded users and menus");

    if dry_run {
        let rows = plan_permissions(&users, &menus);
        return Ok(SeedReport::planned(&users, &menus, rows.len()));
    }

    apply_permissions(pool, &users, &menus).await
}
