//! Predicate filters and the filter bar that produces them
//!
//! A [`FilterSchema`] declares which fields a page can be searched and
//! narrowed by. A [`FilterBar`] holds the values the user picked and turns
//! them into a [`FilterSet`]: every active predicate must match (logical
//! AND) and source order is preserved.

use crate::error::{RecordError, RecordResult};
use chrono::NaiveDate;
use erp_core::{Status, utils::calendar_date};
use indexmap::IndexMap;
use serde::Serialize;
use std::{borrow::Borrow, fmt, sync::Arc};

/// Accessor returning a string field of a record
pub type FieldFn<R> = fn(&R) -> &str;

/// Dropdown value meaning "no restriction"
pub const ALL_OPTION: &str = "all";

/// A boolean test over one record
pub enum Predicate<R> {
    /// Case-insensitive substring match; any listed field may match
    Contains {
        /// Lowercased query text
        needle: String,
        /// Searched fields
        fields: Vec<FieldFn<R>>,
    },
    /// Exact match on a categorical field
    Equals {
        /// Compared field
        field: FieldFn<R>,
        /// Required value
        value: String,
    },
    /// The field's calendar date equals `date`
    DateEquals {
        /// Date or timestamp field
        field: FieldFn<R>,
        /// Required date
        date: NaiveDate,
    },
}

impl<R> Predicate<R> {
    /// Substring search across `fields`
    pub fn contains(query: &str, fields: Vec<FieldFn<R>>) -> Self {
        Self::Contains {
            needle: query.to_lowercase(),
            fields,
        }
    }

    /// Equality on a categorical field
    pub fn equals(field: FieldFn<R>, value: impl Into<String>) -> Self {
        Self::Equals {
            field,
            value: value.into(),
        }
    }

    /// Calendar date equality
    pub const fn date_equals(field: FieldFn<R>, date: NaiveDate) -> Self {
        Self::DateEquals { field, date }
    }

    /// Whether the predicate restricts anything
    ///
    /// A blank search and the `all` dropdown value are inactive.
    pub fn is_active(&self) -> bool {
        match self {
            Self::Contains { needle, fields } => !needle.trim().is_empty() && !fields.is_empty(),
            Self::Equals { value, .. } => !value.is_empty() && value != ALL_OPTION,
            Self::DateEquals { .. } => true,
        }
    }

    /// Test one record; inactive predicates match everything
    pub fn matches(&self, record: &R) -> bool {
        if !self.is_active() {
            return true;
        }

        match self {
            Self::Contains { needle, fields } => fields
                .iter()
                .any(|field| field(record).to_lowercase().contains(needle.as_str())),
            Self::Equals { field, value } => field(record) == value,
            Self::DateEquals { field, date } => calendar_date(field(record)) == Some(*date),
        }
    }
}

impl<R> Clone for Predicate<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Contains { needle, fields } => Self::Contains {
                needle: needle.clone(),
                fields: fields.clone(),
            },
            Self::Equals { field, value } => Self::Equals {
                field: *field,
                value: value.clone(),
            },
            Self::DateEquals { field, date } => Self::DateEquals {
                field: *field,
                date: *date,
            },
        }
    }
}

impl<R> fmt::Debug for Predicate<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contains { needle, fields } => f
                .debug_struct("Contains")
                .field("needle", needle)
                .field("fields", &fields.len())
                .finish(),
            Self::Equals { value, .. } => f.debug_struct("Equals").field("value", value).finish(),
            Self::DateEquals { date, .. } => {
                f.debug_struct("DateEquals").field("date", date).finish()
            }
        }
    }
}

/// Conjunction of predicates
pub struct FilterSet<R> {
    predicates: Vec<Predicate<R>>,
}

impl<R> FilterSet<R> {
    /// Empty set, matching everything
    pub const fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Add a predicate
    #[must_use]
    pub fn with(mut self, predicate: Predicate<R>) -> Self {
        self.push(predicate);
        self
    }

    /// Add a predicate in place
    pub fn push(&mut self, predicate: Predicate<R>) {
        self.predicates.push(predicate);
    }

    /// Conjunction of `self` and `other`
    #[must_use]
    pub fn and(mut self, other: Self) -> Self {
        self.predicates.extend(other.predicates);
        self
    }

    /// Number of active predicates
    pub fn active_count(&self) -> usize {
        self.predicates.iter().filter(|p| p.is_active()).count()
    }

    /// Whether nothing is filtered out
    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Whether a record passes every predicate
    pub fn matches(&self, record: &R) -> bool {
        self.predicates.iter().all(|p| p.matches(record))
    }

    /// Matching items, in source order
    pub fn apply<'a, T>(&self, items: &'a [T]) -> Vec<&'a T>
    where
        T: Borrow<R>,
    {
        items
            .iter()
            .filter(|item| self.matches(<T as Borrow<R>>::borrow(item)))
            .collect()
    }

    /// Matching items cloned out of `items`, in source order
    pub fn apply_cloned<T>(&self, items: &[T]) -> Vec<T>
    where
        T: Borrow<R> + Clone,
    {
        items
            .iter()
            .filter(|item| self.matches(<T as Borrow<R>>::borrow(item)))
            .cloned()
            .collect()
    }
}

impl<R> Default for FilterSet<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Clone for FilterSet<R> {
    fn clone(&self) -> Self {
        Self {
            predicates: self.predicates.clone(),
        }
    }
}

impl<R> fmt::Debug for FilterSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.predicates).finish()
    }
}

/// One dropdown entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    /// Value compared against the record field
    pub value: String,
    /// Text shown in the dropdown
    pub label: String,
}

impl SelectOption {
    /// Create an option
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A categorical dropdown filter
pub struct SelectFilter<R> {
    /// Key used to address the filter
    pub key: &'static str,
    /// Dropdown caption
    pub label: &'static str,
    /// Compared field
    pub field: FieldFn<R>,
    /// Accepted values
    pub options: Vec<SelectOption>,
}

impl<R> SelectFilter<R> {
    /// Dropdown with explicit options
    pub const fn new(
        key: &'static str,
        label: &'static str,
        field: FieldFn<R>,
        options: Vec<SelectOption>,
    ) -> Self {
        Self {
            key,
            label,
            field,
            options,
        }
    }

    /// Dropdown whose labels equal its values
    pub fn from_values(
        key: &'static str,
        label: &'static str,
        field: FieldFn<R>,
        values: &[&str],
    ) -> Self {
        let options = values
            .iter()
            .map(|value| SelectOption::new(*value, *value))
            .collect();
        Self::new(key, label, field, options)
    }

    /// Dropdown over every member of a status enumeration
    pub fn status<S: Status>(key: &'static str, label: &'static str, field: FieldFn<R>) -> Self {
        let options = S::ALL
            .iter()
            .map(|status| SelectOption::new(status.as_str(), status.label()))
            .collect();
        Self::new(key, label, field, options)
    }

    /// Whether `value` is one of the declared options
    pub fn accepts(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

/// A date picker filter
pub struct DateFilter<R> {
    /// Picker caption
    pub label: &'static str,
    /// Date or timestamp field
    pub field: FieldFn<R>,
}

/// Filters a page offers
pub struct FilterSchema<R> {
    /// Placeholder of the search box
    pub search_placeholder: &'static str,
    /// Fields the search box looks at
    pub search_fields: Vec<FieldFn<R>>,
    /// Dropdown filters
    pub selects: Vec<SelectFilter<R>>,
    /// Optional date picker
    pub date: Option<DateFilter<R>>,
}

impl<R> FilterSchema<R> {
    /// Schema with a search box and nothing else
    pub const fn new(search_placeholder: &'static str) -> Self {
        Self {
            search_placeholder,
            search_fields: Vec::new(),
            selects: Vec::new(),
            date: None,
        }
    }

    /// Add a searched field
    #[must_use]
    pub fn search_field(mut self, field: FieldFn<R>) -> Self {
        self.search_fields.push(field);
        self
    }

    /// Add a dropdown
    #[must_use]
    pub fn select(mut self, filter: SelectFilter<R>) -> Self {
        self.selects.push(filter);
        self
    }

    /// Set the date picker
    #[must_use]
    pub fn date(mut self, label: &'static str, field: FieldFn<R>) -> Self {
        self.date = Some(DateFilter { label, field });
        self
    }

    /// Look up a dropdown by key
    pub fn select_filter(&self, key: &str) -> Option<&SelectFilter<R>> {
        self.selects.iter().find(|filter| filter.key == key)
    }
}

impl<R> fmt::Debug for FilterSchema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterSchema")
            .field("search_fields", &self.search_fields.len())
            .field(
                "selects",
                &self.selects.iter().map(|s| s.key).collect::<Vec<_>>(),
            )
            .field("date", &self.date.as_ref().map(|d| d.label))
            .finish()
    }
}

/// Values currently entered in a page's filter controls
pub struct FilterBar<R> {
    schema: Arc<FilterSchema<R>>,
    search: String,
    selections: IndexMap<&'static str, String>,
    date: Option<NaiveDate>,
}

impl<R> FilterBar<R> {
    /// Empty filter bar for `schema`
    pub fn new(schema: Arc<FilterSchema<R>>) -> Self {
        Self {
            schema,
            search: String::new(),
            selections: IndexMap::new(),
            date: None,
        }
    }

    /// Declared filters
    pub fn schema(&self) -> &FilterSchema<R> {
        &self.schema
    }

    /// Current search text
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search text
    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    /// Pick a dropdown value; empty or `all` clears the dropdown
    pub fn select(&mut self, key: &str, value: &str) -> RecordResult<()> {
        let filter = self
            .schema
            .select_filter(key)
            .ok_or_else(|| RecordError::UnknownFilter {
                filter: key.to_string(),
            })?;

        if value.is_empty() || value == ALL_OPTION {
            self.selections.shift_remove(key);
            return Ok(());
        }

        if !filter.accepts(value) {
            return Err(RecordError::UnknownFilterOption {
                filter: key.to_string(),
                value: value.to_string(),
            });
        }

        self.selections.insert(filter.key, value.to_string());
        Ok(())
    }

    /// Current dropdown value
    pub fn selection(&self, key: &str) -> Option<&str> {
        self.selections.get(key).map(String::as_str)
    }

    /// Set or clear the date picker
    pub const fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    /// Current date
    pub const fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Clear every control
    pub fn clear(&mut self) {
        self.search.clear();
        self.selections.clear();
        self.date = None;
    }

    /// Whether any control restricts the list
    pub fn is_active(&self) -> bool {
        self.filter_set().active_count() > 0
    }

    /// Predicates for the current values
    pub fn filter_set(&self) -> FilterSet<R> {
        let mut set = FilterSet::new();

        if !self.search.trim().is_empty() {
            set.push(Predicate::contains(
                &self.search,
                self.schema.search_fields.clone(),
            ));
        }

        for (key, value) in &self.selections {
            if let Some(filter) = self.schema.select_filter(key) {
                set.push(Predicate::equals(filter.field, value.clone()));
            }
        }

        if let (Some(date), Some(picker)) = (self.date, &self.schema.date) {
            set.push(Predicate::date_equals(picker.field, date));
        }

        set
    }
}

impl<R> Clone for FilterBar<R> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            search: self.search.clone(),
            selections: self.selections.clone(),
            date: self.date,
        }
    }
}

impl<R> fmt::Debug for FilterBar<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterBar")
            .field("search", &self.search)
            .field("selections", &self.selections)
            .field("date", &self.date)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        name: String,
        team: String,
        day: String,
    }

    fn row(name: &str, team: &str, day: &str) -> Row {
        Row {
            name: name.to_string(),
            team: team.to_string(),
            day: day.to_string(),
        }
    }

    fn name_of(r: &Row) -> &str {
        &r.name
    }

    fn team_of(r: &Row) -> &str {
        &r.team
    }

    fn day_of(r: &Row) -> &str {
        &r.day
    }

    fn rows() -> Vec<Row> {
        vec![
            row("Kim Minsu", "sales", "2024-01-15"),
            row("Lee Jieun", "finance", "2024-01-15 10:00:00"),
            row("Park Minji", "sales", "2024-02-01"),
            row("Choi Hyun", "ops", "not a date"),
        ]
    }

    fn schema() -> Arc<FilterSchema<Row>> {
        Arc::new(
            FilterSchema::new("이름, 팀 검색")
                .search_field(name_of)
                .search_field(team_of)
                .select(SelectFilter::from_values(
                    "team",
                    "팀",
                    team_of,
                    &["sales", "finance", "ops"],
                ))
                .date("날짜", day_of),
        )
    }

    #[test]
    fn test_contains_is_case_insensitive_across_fields() {
        let set = FilterSet::new().with(Predicate::contains("MIN", vec![name_of, team_of]));
        let data = rows();
        let names: Vec<&str> = set.apply(&data).iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Kim Minsu", "Park Minji"]);
    }

    #[test]
    fn test_blank_search_is_inactive() {
        let predicate = Predicate::contains("   ", vec![name_of as FieldFn<Row>]);
        assert!(!predicate.is_active());
        assert!(predicate.matches(&rows()[0]));
    }

    #[test]
    fn test_date_equals_uses_calendar_date() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let set = FilterSet::new().with(Predicate::date_equals(day_of, day));
        let data = rows();
        let matched = set.apply(&data);
        assert_eq!(matched.len(), 2);
        assert!(!set.matches(&data[3]));
    }

    #[test]
    fn test_filter_bar_builds_conjunction() {
        let mut bar = FilterBar::new(schema());
        bar.set_search("min");
        bar.select("team", "sales").unwrap();

        let data = rows();
        let set = bar.filter_set();
        assert_eq!(set.active_count(), 2);
        assert_eq!(set.apply(&data).len(), 2);

        bar.set_date(NaiveDate::from_ymd_opt(2024, 2, 1));
        let matched = bar.filter_set().apply_cloned(&data);
        assert_eq!(matched, vec![row("Park Minji", "sales", "2024-02-01")]);
    }

    #[test]
    fn test_filter_bar_rejects_unknown_options() {
        let mut bar = FilterBar::new(schema());

        let err = bar.select("team", "legal").unwrap_err();
        assert!(matches!(err, RecordError::UnknownFilterOption { .. }));

        let err = bar.select("region", "seoul").unwrap_err();
        assert!(matches!(err, RecordError::UnknownFilter { .. }));
        assert!(!bar.is_active());
    }

    #[test]
    fn test_all_option_clears_selection() {
        let mut bar = FilterBar::new(schema());
        bar.select("team", "ops").unwrap();
        assert_eq!(bar.selection("team"), Some("ops"));

        bar.select("team", ALL_OPTION).unwrap();
        assert_eq!(bar.selection("team"), None);
        assert!(bar.filter_set().is_empty());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut bar = FilterBar::new(schema());
        bar.set_search("kim");
        bar.select("team", "sales").unwrap();
        bar.set_date(NaiveDate::from_ymd_opt(2024, 1, 15));

        bar.clear();

        assert_eq!(bar.search(), "");
        assert!(bar.date().is_none());
        assert!(!bar.is_active());
    }

    fn arb_rows() -> impl Strategy<Value = Vec<Row>> {
        proptest::collection::vec(
            ("[a-dA-D]{0,4}", prop_oneof!["sales", "finance", "ops"], 1u32..4)
                .prop_map(|(name, team, day)| row(&name, &team, &format!("2024-01-0{day}"))),
            0..30,
        )
    }

    fn team_is(team: &str) -> Predicate<Row> {
        Predicate::equals(team_of, team)
    }

    proptest! {
        #[test]
        fn filter_is_ordered_subset(data in arb_rows(), query in "[a-d]{0,2}") {
            let set = FilterSet::new().with(Predicate::contains(&query, vec![name_of as FieldFn<Row>]));
            let filtered = set.apply_cloned(&data);

            let mut cursor = data.iter();
            for item in &filtered {
                prop_assert!(cursor.any(|candidate| candidate == item));
            }
            prop_assert!(filtered.len() <= data.len());
        }

        #[test]
        fn filters_compose_as_conjunction(data in arb_rows(), query in "[a-d]{0,2}", team in prop_oneof!["sales", "ops"]) {
            let first = FilterSet::new().with(Predicate::contains(&query, vec![name_of as FieldFn<Row>]));
            let second = FilterSet::new().with(team_is(&team));

            let chained = second.apply_cloned(&first.apply_cloned(&data));
            let combined = first.and(second).apply_cloned(&data);
            prop_assert_eq!(chained, combined);
        }
    }
}
