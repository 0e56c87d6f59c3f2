//! Database query operations for users, menus and permissions

use crate::models::{MenuDb, PermissionDb, UserDb};
use erp_core::{Error, Result};
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

/// Postgres accepts at most this many bind parameters per statement
const MAX_BIND_PARAMS: usize = 65_535;

/// Columns written per permission row
const PERMISSION_COLUMNS: usize = 6;

/// Rows per bulk insert statement
pub const INSERT_CHUNK_ROWS: usize = MAX_BIND_PARAMS / PERMISSION_COLUMNS;

/// User database operations
#[derive(Debug)]
pub struct UserQueries;

impl UserQueries {
    /// Every user, by id
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<UserDb>> {
        sqlx::query_as::<_, UserDb>(
            "SELECT id, username, name, role, created_at FROM users ORDER BY id",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list users: {e}")))
    }
}

/// Menu database operations
#[derive(Debug)]
pub struct MenuQueries;

impl MenuQueries {
    /// Every menu, in navigation order
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<MenuDb>> {
        sqlx::query_as::<_, MenuDb>(
            "SELECT id, code, name, path, sort_order FROM menus ORDER BY sort_order, id",
        )
        .fetch_all(pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list menus: {e}")))
    }
}

/// Menu permission database operations
#[derive(Debug)]
pub struct PermissionQueries;

impl PermissionQueries {
    /// Remove every permission row of one user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn delete_for_user(conn: &mut PgConnection, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM menu_permissions WHERE user_id = $1")
            .bind(user_id)
            .execute(conn)
            .await
            .map_err(|e| Error::Database(format!("Failed to delete permissions: {e}")))?;

        Ok(result.rows_affected())
    }

    /// Bulk insert permission rows, chunked under the bind parameter limit
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails.
    pub async fn insert_batch(conn: &mut PgConnection, rows: &[PermissionDb]) -> Result<u64> {
        let mut inserted = 0;
        for chunk in rows.chunks(INSERT_CHUNK_ROWS) {
            let mut builder = insert_builder(chunk);
            let result = builder
                .build()
                .execute(&mut *conn)
                .await
                .map_err(|e| Error::Database(format!("Failed to insert permissions: {e}")))?;
            inserted += result.rows_affected();
        }
        Ok(inserted)
    }

    /// Permissions of one user
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn for_user(pool: &PgPool, user_id: i64) -> Result<Vec<PermissionDb>> {
        sqlx::query_as::<_, PermissionDb>(
            r"
            SELECT user_id, menu_id, can_view, can_create, can_edit, can_delete
            FROM menu_permissions
            WHERE user_id = $1
            ORDER BY menu_id
            ",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to load permissions: {e}")))
    }

    /// Total number of permission rows
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn count(pool: &PgPool) -> Result<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM menu_permissions")
            .fetch_one(pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to count permissions: {e}")))
    }
}

/// Multi-row `INSERT` for `rows`
pub fn insert_builder(rows: &[PermissionDb]) -> QueryBuilder<'static, Postgres> {
    let mut builder = QueryBuilder::new(
        "INSERT INTO menu_permissions (user_id, menu_id, can_view, can_create, can_edit, can_delete) ",
    );
    builder.push_values(rows.iter().copied(), |mut row, permission| {
        row.push_bind(permission.user_id)
            .push_bind(permission.menu_id)
            .push_bind(permission.can_view)
            .push_bind(permission.can_create)
            .push_bind(permission.can_edit)
            .push_bind(permission.can_delete);
    });
    builder
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn permission(user_id: i64, menu_id: i64) -> PermissionDb {
        PermissionDb {
            user_id,
            menu_id,
            can_view: true,
            can_create: false,
            can_edit: false,
            can_delete: false,
        }
    }

    #[test]
    fn test_insert_builder_sql() {
        let rows = vec![permission(1, 1), permission(1, 2)];
        let builder = insert_builder(&rows);
        assert_eq!(
            builder.sql(),
            "INSERT INTO menu_permissions (user_id, menu_id, can_view, can_create, can_edit, can_delete) \
             VALUES ($1, $2, $3, $4, $5, $6), ($7, $8, $9, $10, $11, $12)"
        );
    }

    #[test]
    fn test_chunk_fits_bind_limit() {
        assert!(INSERT_CHUNK_ROWS * PERMISSION_COLUMNS <= MAX_BIND_PARAMS);
        assert_eq!(INSERT_CHUNK_ROWS, 10_922);
    }
}
