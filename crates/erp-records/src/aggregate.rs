//! Stat card aggregates
//!
//! Aggregates always run over the full, unfiltered record array and never
//! produce `NaN`: an empty array yields 0 for every kind.

use erp_core::{
    ChipColor,
    utils::{format_number, format_percent, format_won},
};
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

/// How a stat value is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatFormat {
    /// Plain number with thousands separators
    #[default]
    Number,
    /// Korean won
    Won,
    /// Ratio shown in percent
    Percent,
}

impl StatFormat {
    /// Render `value` in this format
    pub fn render(self, value: f64) -> String {
        match self {
            Self::Number => format_number(value),
            Self::Won => format_won(value),
            Self::Percent => format_percent(value),
        }
    }
}

/// An aggregate over a record array
pub enum Aggregate<R> {
    /// Number of records
    Count,
    /// Number of records matching a predicate
    CountWhere(fn(&R) -> bool),
    /// Share of records matching a predicate, between 0 and 1
    Share(fn(&R) -> bool),
    /// Sum of a value
    Sum(fn(&R) -> f64),
    /// Sum of a value over records matching a predicate
    SumWhere(fn(&R) -> bool, fn(&R) -> f64),
    /// Mean of a value
    Average(fn(&R) -> f64),
    /// Largest value
    Max(fn(&R) -> f64),
}

impl<R> Aggregate<R> {
    /// Evaluate over `records`
    pub fn evaluate<T: Borrow<R>>(&self, records: &[T]) -> f64 {
        let values = records.iter().map(|record| <T as Borrow<R>>::borrow(record));

        let result = match self {
            Self::Count => records.len() as f64,
            Self::CountWhere(predicate) => values.filter(|r| predicate(r)).count() as f64,
            Self::Share(predicate) => {
                if records.is_empty() {
                    0.0
                } else {
                    values.filter(|r| predicate(r)).count() as f64 / records.len() as f64
                }
            }
            Self::Sum(value) => values.map(value).sum(),
            Self::SumWhere(predicate, value) => values.filter(|r| predicate(r)).map(value).sum(),
            Self::Average(value) => {
                if records.is_empty() {
                    0.0
                } else {
                    values.map(value).sum::<f64>() / records.len() as f64
                }
            }
            Self::Max(value) => values.map(value).fold(None, |max: Option<f64>, v| {
                Some(max.map_or(v, |m| m.max(v)))
            })
            .unwrap_or(0.0),
        };

        if result.is_finite() { result } else { 0.0 }
    }
}

/// Definition of one stat card
pub struct StatSpec<R> {
    /// Stable key
    pub key: &'static str,
    /// Card title
    pub title: &'static str,
    /// Computed value
    pub aggregate: Aggregate<R>,
    /// Display format
    pub format: StatFormat,
    /// Accent colour
    pub color: ChipColor,
}

impl<R> StatSpec<R> {
    /// Card with the default colour
    pub const fn new(
        key: &'static str,
        title: &'static str,
        aggregate: Aggregate<R>,
        format: StatFormat,
    ) -> Self {
        Self {
            key,
            title,
            aggregate,
            format,
            color: ChipColor::Primary,
        }
    }

    /// Override the accent colour
    #[must_use]
    pub const fn color(mut self, color: ChipColor) -> Self {
        self.color = color;
        self
    }

    /// Compute the card
    pub fn card<T: Borrow<R>>(&self, records: &[T]) -> StatCard {
        let value = self.aggregate.evaluate(records);
        StatCard {
            key: self.key,
            title: self.title,
            value,
            display: self.format.render(value),
            color: self.color,
        }
    }
}

impl<R> fmt::Debug for StatSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatSpec")
            .field("key", &self.key)
            .field("format", &self.format)
            .finish_non_exhaustive()
    }
}

/// A computed stat card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    /// Stable key
    pub key: &'static str,
    /// Card title
    pub title: &'static str,
    /// Raw value
    pub value: f64,
    /// Formatted value
    pub display: String,
    /// Accent colour
    pub color: ChipColor,
}

/// Compute every card in order
pub fn stat_cards<R, T: Borrow<R>>(specs: &[StatSpec<R>], records: &[T]) -> Vec<StatCard> {
    specs.iter().map(|spec| spec.card(records)).collect()
}
