//! Chart panel data derived from the record array

use crate::aggregate::StatFormat;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt};

/// Chart renderer kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Line chart
    Line,
    /// Bar chart
    Bar,
    /// Pie chart
    Pie,
}

/// How a series value is computed per category
pub enum SeriesValue<R> {
    /// Sum of a value
    Sum(fn(&R) -> f64),
    /// Number of records
    Count,
}

/// One named series
pub struct SeriesSpec<R> {
    /// Data key, bound to the y axis
    pub key: &'static str,
    /// Legend label
    pub label: &'static str,
    /// Computed value
    pub value: SeriesValue<R>,
}

impl<R> SeriesSpec<R> {
    /// Series summing a value per category
    pub const fn sum(key: &'static str, label: &'static str, value: fn(&R) -> f64) -> Self {
        Self {
            key,
            label,
            value: SeriesValue::Sum(value),
        }
    }

    /// Series counting records per category
    pub const fn count(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            value: SeriesValue::Count,
        }
    }
}

/// Definition of a chart panel
pub struct ChartSpec<R> {
    /// Panel title
    pub title: &'static str,
    /// Renderer kind
    pub kind: ChartKind,
    /// Category of a record, bound to the x axis
    pub category: fn(&R) -> String,
    /// Series drawn per category
    pub series: Vec<SeriesSpec<R>>,
    /// Tooltip value format
    pub format: StatFormat,
}

impl<R> ChartSpec<R> {
    /// Chart with no series yet
    pub const fn new(
        title: &'static str,
        kind: ChartKind,
        category: fn(&R) -> String,
        format: StatFormat,
    ) -> Self {
        Self {
            title,
            kind,
            category,
            series: Vec::new(),
            format,
        }
    }

    /// Add a series
    #[must_use]
    pub fn series(mut self, series: SeriesSpec<R>) -> Self {
        self.series.push(series);
        self
    }

    /// Group `records` by category, in first-seen order
    pub fn build<T: Borrow<R>>(&self, records: &[T]) -> ChartData {
        let mut groups: IndexMap<String, IndexMap<&'static str, f64>> = IndexMap::new();

        for record in records.iter().map(|r| <T as Borrow<R>>::borrow(r)) {
            let values = groups.entry((self.category)(record)).or_insert_with(|| {
                self.series.iter().map(|series| (series.key, 0.0)).collect()
            });

            for series in &self.series {
                let increment = match series.value {
                    SeriesValue::Sum(value) => value(record),
                    SeriesValue::Count => 1.0,
                };
                if let Some(total) = values.get_mut(series.key) {
                    *total += increment;
                }
            }
        }

        ChartData {
            title: self.title,
            kind: self.kind,
            x_key: "category",
            y_keys: self.series.iter().map(|series| series.key).collect(),
            labels: self.series.iter().map(|series| series.label).collect(),
            points: groups
                .into_iter()
                .map(|(category, values)| ChartPoint { category, values })
                .collect(),
            format: self.format,
        }
    }
}

impl<R> fmt::Debug for ChartSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartSpec")
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field(
                "series",
                &self.series.iter().map(|s| s.key).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// One x-axis position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    /// Category value
    pub category: String,
    /// Series values keyed by series key
    pub values: IndexMap<&'static str, f64>,
}

/// Chart panel content ready for a renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    /// Panel title
    pub title: &'static str,
    /// Renderer kind
    pub kind: ChartKind,
    /// Data key bound to the x axis
    pub x_key: &'static str,
    /// Data keys bound to the y axis
    pub y_keys: Vec<&'static str>,
    /// Legend labels, aligned with `y_keys`
    pub labels: Vec<&'static str>,
    /// Points in first-seen category order
    pub points: Vec<ChartPoint>,
    /// Tooltip value format
    pub format: StatFormat,
}

impl ChartData {
    /// Value of a series at a category
    pub fn value(&self, category: &str, series: &str) -> Option<f64> {
        self.points
            .iter()
            .find(|point| point.category == category)
            .and_then(|point| point.values.get(series).copied())
    }

    /// Tooltip text for a series at a category, e.g. `매출: ₩1,500,000`
    pub fn tooltip(&self, category: &str, series: &str) -> Option<String> {
        let value = self.value(category, series)?;
        let label = self
            .y_keys
            .iter()
            .zip(&self.labels)
            .find(|(key, _)| **key == series)
            .map_or(series, |(_, label)| *label);
        Some(format!("{label}: {}", self.format.render(value)))
    }

    /// Sum of one series across all categories
    pub fn series_total(&self, series: &str) -> f64 {
        self.points
            .iter()
            .filter_map(|point| point.values.get(series))
            .sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Entry {
        month: &'static str,
        amount: f64,
    }

    fn month_of(entry: &Entry) -> String {
        entry.month.to_string()
    }

    fn entries() -> Vec<Entry> {
        vec![
            Entry {
                month: "2024-02",
                amount: 100.0,
            },
            Entry {
                month: "2024-01",
                amount: 1_500_000.0,
            },
            Entry {
                month: "2024-02",
                amount: 50.0,
            },
        ]
    }

    fn spec() -> ChartSpec<Entry> {
        ChartSpec::new("월별 매출", ChartKind::Bar, month_of, StatFormat::Won)
            .series(SeriesSpec::sum("amount", "매출", |e: &Entry| e.amount))
            .series(SeriesSpec::count("count", "건수"))
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        let chart = spec().build(&entries());
        let categories: Vec<&str> = chart.points.iter().map(|p| p.category.as_str()).collect();

        assert_eq!(categories, vec!["2024-02", "2024-01"]);
        assert_eq!(chart.value("2024-02", "amount"), Some(150.0));
        assert_eq!(chart.value("2024-02", "count"), Some(2.0));
        assert_eq!(chart.y_keys, vec!["amount", "count"]);
        assert_eq!(chart.x_key, "category");
    }

    #[test]
    fn test_tooltip_uses_currency_format() {
        let chart = spec().build(&entries());
        assert_eq!(
            chart.tooltip("2024-01", "amount").unwrap(),
            "매출: ₩1,500,000"
        );
        assert!(chart.tooltip("2023-12", "amount").is_none());
    }

    #[test]
    fn test_chart_totals_match_records() {
        let data = entries();
        let chart = spec().build(&data);
        let direct: f64 = data.iter().map(|e| e.amount).sum();
        assert_eq!(chart.series_total("amount"), direct);
        assert_eq!(chart.series_total("count"), 3.0);
    }

    #[test]
    fn test_empty_records_give_no_points() {
        let chart = spec().build(&Vec::<Entry>::new());
        assert!(chart.points.is_empty());
        assert_eq!(chart.series_total("amount"), 0.0);
    }
}
