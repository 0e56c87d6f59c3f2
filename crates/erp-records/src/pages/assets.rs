//! 자산 관리

use crate::{
    aggregate::{Aggregate, StatFormat, StatSpec},
    chart::{ChartKind, ChartSpec, SeriesSpec},
    definition::PageDefinition,
    filter::{FilterSchema, SelectFilter, SelectOption},
    sort::{SortKey, SortSpec},
    view::{Cell, Column, ListView},
};
use erp_core::{ChipColor, RecordId, Status, status::AssetStatus, types::Asset};
use std::sync::Arc;

/// Asset categories offered in the category dropdown
pub const CATEGORIES: &[(&str, &str)] = &[
    ("it", "IT 장비"),
    ("equipment", "사무 기기"),
    ("furniture", "가구"),
    ("vehicle", "차량"),
];

fn category_label(category: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|(value, _)| *value == category)
        .map_or(category, |(_, label)| *label)
}

fn asset_code(asset: &Asset) -> &str {
    &asset.asset_code
}

fn name(asset: &Asset) -> &str {
    &asset.name
}

fn manager(asset: &Asset) -> &str {
    &asset.manager
}

fn category(asset: &Asset) -> &str {
    &asset.category
}

fn department(asset: &Asset) -> &str {
    &asset.department
}

fn status(asset: &Asset) -> &str {
    asset.status.as_str()
}

fn purchase_date(asset: &Asset) -> &str {
    &asset.purchase_date
}

fn purchase_price(asset: &Asset) -> f64 {
    asset.purchase_price
}

fn current_value(asset: &Asset) -> f64 {
    asset.current_value
}

const fn in_use(asset: &Asset) -> bool {
    matches!(asset.status, AssetStatus::InUse)
}

const fn in_repair(asset: &Asset) -> bool {
    matches!(asset.status, AssetStatus::Repair)
}

fn category_name(asset: &Asset) -> String {
    category_label(&asset.category).to_string()
}

fn draft(id: RecordId) -> Asset {
    Asset {
        id,
        asset_code: format!("AST-{id:04}"),
        name: String::new(),
        category: "it".to_string(),
        department: String::new(),
        location: String::new(),
        purchase_date: String::new(),
        purchase_price: 0.0,
        current_value: 0.0,
        status: AssetStatus::Idle,
        manager: String::new(),
    }
}

/// Asset page
pub fn definition() -> PageDefinition<Asset> {
    let categories = CATEGORIES
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect();

    let schema = FilterSchema::new("자산코드, 자산명, 담당자 검색")
        .search_field(asset_code)
        .search_field(name)
        .search_field(manager)
        .select(SelectFilter::new("category", "분류", category, categories))
        .select(SelectFilter::status::<AssetStatus>("status", "상태", status))
        .select(SelectFilter::from_values(
            "department",
            "부서",
            department,
            &["개발팀", "디자인팀", "영업팀", "인사팀", "총무팀", "정보보안팀"],
        ));

    let list = ListView::new(vec![
        Column::new("asset_code", "자산코드", |a: &Asset| Cell::text(&a.asset_code)),
        Column::new("name", "자산명", |a: &Asset| Cell::text(&a.name)),
        Column::new("category", "분류", |a: &Asset| {
            Cell::text(category_label(&a.category))
        }),
        Column::new("department", "부서", |a: &Asset| Cell::text(&a.department)),
        Column::new("purchase_date", "취득일", |a: &Asset| {
            Cell::date(&a.purchase_date)
        }),
        Column::new("current_value", "현재가치", |a: &Asset| {
            Cell::currency(a.current_value)
        }),
        Column::new("status", "상태", |a: &Asset| Cell::status(a.status)),
    ]);

    let stats = vec![
        StatSpec::new("count", "전체 자산", Aggregate::Count, StatFormat::Number),
        StatSpec::new(
            "book_value",
            "총 자산가치",
            Aggregate::Sum(current_value),
            StatFormat::Won,
        ),
        StatSpec::new(
            "utilisation",
            "사용률",
            Aggregate::Share(in_use),
            StatFormat::Percent,
        )
        .color(ChipColor::Success),
        StatSpec::new(
            "repair",
            "수리중",
            Aggregate::CountWhere(in_repair),
            StatFormat::Number,
        )
        .color(ChipColor::Warning),
    ];

    let chart = ChartSpec::new("분류별 자산가치", ChartKind::Pie, category_name, StatFormat::Won)
        .series(SeriesSpec::sum("value", "현재가치", current_value));

    PageDefinition {
        schema: Arc::new(schema),
        list,
        stats,
        chart: Some(chart),
        sorts: vec![
            SortSpec::ascending("asset_code", SortKey::Text(asset_code)),
            SortSpec::descending("purchase_date", SortKey::Text(purchase_date)),
            SortSpec::descending("purchase_price", SortKey::Number(purchase_price)),
            SortSpec::descending("current_value", SortKey::Number(current_value)),
        ],
        draft,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::filter::FilterBar;
    use crate::sample;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_category_and_department_filters() {
        let assets = sample::assets();
        let definition = definition();
        let mut bar = FilterBar::new(Arc::clone(&definition.schema));
        bar.select("category", "it").unwrap();
        bar.select("department", "영업팀").unwrap();

        let codes: Vec<&str> = bar
            .filter_set()
            .apply(&assets)
            .into_iter()
            .map(|a| a.asset_code.as_str())
            .collect();
        assert_eq!(codes, vec!["AST-0008"]);

        assert!(bar.select("category", "weapons").is_err());
    }

    #[test]
    fn test_utilisation_share() {
        let cards = definition().stat_cards(&sample::assets());
        assert_eq!(cards[0].value, 8.0);
        assert_eq!(cards[2].display, "50.0%");
        assert_eq!(cards[3].value, 1.0);
    }

    #[test]
    fn test_chart_uses_category_labels() {
        let chart = definition().chart(&sample::assets()).unwrap();
        assert_eq!(chart.points[0].category, "IT 장비");
        assert_eq!(chart.value("차량", "value"), Some(24_500_000.0));
    }
}
