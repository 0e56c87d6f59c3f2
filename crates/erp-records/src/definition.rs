//! Everything that makes one record type into a page

use crate::{
    aggregate::{StatCard, StatSpec, stat_cards},
    chart::{ChartData, ChartSpec},
    filter::FilterSchema,
    sort::SortSpec,
    view::ListView,
};
use erp_core::{Record, RecordId};
use std::{borrow::Borrow, fmt, sync::Arc};

/// Filters, columns, stat cards, chart and sorts of a page
pub struct PageDefinition<R: Record> {
    /// Filters offered above the list
    pub schema: Arc<FilterSchema<R>>,
    /// Columns and row actions
    pub list: ListView<R>,
    /// Stat cards, in display order
    pub stats: Vec<StatSpec<R>>,
    /// Chart panel, if the page has one
    pub chart: Option<ChartSpec<R>>,
    /// Sortable columns
    pub sorts: Vec<SortSpec<R>>,
    /// Blank record a create form starts from, given the id it will receive
    pub draft: fn(RecordId) -> R,
}

impl<R: Record> PageDefinition<R> {
    /// Page title
    pub const fn title(&self) -> &'static str {
        R::TITLE
    }

    /// Stat cards over `records`
    pub fn stat_cards<T: Borrow<R>>(&self, records: &[T]) -> Vec<StatCard> {
        stat_cards(&self.stats, records)
    }

    /// Chart panel over `records`
    pub fn chart<T: Borrow<R>>(&self, records: &[T]) -> Option<ChartData> {
        self.chart.as_ref().map(|chart| chart.build(records))
    }

    /// Sort by column key
    pub fn sort(&self, column: &str) -> Option<&SortSpec<R>> {
        self.sorts.iter().find(|sort| sort.column == column)
    }
}

impl<R: Record> fmt::Debug for PageDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageDefinition")
            .field("title", &R::TITLE)
            .field("schema", &self.schema)
            .field("list", &self.list)
            .field("stats", &self.stats)
            .field("chart", &self.chart)
            .field("sorts", &self.sorts)
            .finish_non_exhaustive()
    }
}
