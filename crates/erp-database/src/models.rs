//! Database models for users, menus and menu permissions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Roles that receive create, edit and delete rights on every menu
pub const PRIVILEGED_ROLES: &[&str] = &["admin", "root"];

/// Database model for users
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserDb {
    /// Primary key
    pub id: i64,

    /// Login name
    pub username: String,

    /// Display name
    pub name: String,

    /// Role, e.g. `admin`, `root`, `user`
    pub role: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl UserDb {
    /// Whether the role grants full rights
    pub fn is_privileged(&self) -> bool {
        PRIVILEGED_ROLES.contains(&self.role.as_str())
    }
}

/// Database model for menus
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MenuDb {
    /// Primary key
    pub id: i64,

    /// Stable menu code
    pub code: String,

    /// Display name
    pub name: String,

    /// Route path
    pub path: Option<String>,

    /// Position in the navigation
    pub sort_order: i32,
}

/// One user's rights on one menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct PermissionDb {
    /// User
    pub user_id: i64,

    /// Menu
    pub menu_id: i64,

    /// May open the menu
    pub can_view: bool,

    /// May create records
    pub can_create: bool,

    /// May edit records
    pub can_edit: bool,

    /// May delete records
    pub can_delete: bool,
}

impl PermissionDb {
    /// Default rights of `user` on `menu`
    pub fn for_user(user: &UserDb, menu: &MenuDb) -> Self {
        let privileged = user.is_privileged();
        Self {
            user_id: user.id,
            menu_id: menu.id,
            can_view: true,
            can_create: privileged,
            can_edit: privileged,
            can_delete: privileged,
        }
    }
}
