//! Optional column sorting applied between filtering and pagination

use crate::filter::FieldFn;
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, cmp::Ordering, fmt};

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Asc,
    /// Largest first
    Desc,
}

/// What a sort compares
pub enum SortKey<R> {
    /// String field, compared lexically
    Text(FieldFn<R>),
    /// Numeric field; NaN sorts last
    Number(fn(&R) -> f64),
    /// Integer field
    Integer(fn(&R) -> i64),
}

impl<R> Clone for SortKey<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for SortKey<R> {}

/// A stable sort over one column
pub struct SortSpec<R> {
    /// Column key as shown in list views
    pub column: &'static str,
    /// Compared value
    pub key: SortKey<R>,
    /// Direction
    pub direction: SortDirection,
}

impl<R> SortSpec<R> {
    /// Ascending sort
    pub const fn ascending(column: &'static str, key: SortKey<R>) -> Self {
        Self {
            column,
            key,
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort
    pub const fn descending(column: &'static str, key: SortKey<R>) -> Self {
        Self {
            column,
            key,
            direction: SortDirection::Desc,
        }
    }

    /// Same column, opposite direction
    #[must_use]
    pub const fn reversed(&self) -> Self {
        Self {
            column: self.column,
            key: self.key,
            direction: match self.direction {
                SortDirection::Asc => SortDirection::Desc,
                SortDirection::Desc => SortDirection::Asc,
            },
        }
    }

    /// Compare two records
    pub fn compare(&self, a: &R, b: &R) -> Ordering {
        let ordering = match self.key {
            SortKey::Text(field) => field(a).cmp(field(b)),
            SortKey::Number(field) => field(a).total_cmp(&field(b)),
            SortKey::Integer(field) => field(a).cmp(&field(b)),
        };

        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }

    /// Sort in place; equal rows keep their relative order
    pub fn sort<T: Borrow<R>>(&self, items: &mut [T]) {
        items.sort_by(|a, b| {
            self.compare(<T as Borrow<R>>::borrow(a), <T as Borrow<R>>::borrow(b))
        });
    }
}

impl<R> Clone for SortSpec<R> {
    fn clone(&self) -> Self {
        Self {
            column: self.column,
            key: self.key,
            direction: self.direction,
        }
    }
}

impl<R> fmt::Debug for SortSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortSpec")
            .field("column", &self.column)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}
