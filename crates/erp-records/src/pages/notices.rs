//! 공지사항

use crate::{
    aggregate::{Aggregate, StatFormat, StatSpec},
    chart::{ChartKind, ChartSpec, SeriesSpec},
    definition::PageDefinition,
    filter::{FilterSchema, SelectFilter, SelectOption},
    sort::{SortKey, SortSpec},
    view::{Cell, Column, ListView},
};
use erp_core::{ChipColor, RecordId, Status, status::NoticeStatus, types::Notice};
use std::sync::Arc;

/// Notice categories
pub const CATEGORIES: &[(&str, &str)] = &[
    ("general", "일반"),
    ("system", "시스템"),
    ("hr", "인사"),
    ("event", "행사"),
];

fn category_label(category: &str) -> &str {
    CATEGORIES
        .iter()
        .find(|(value, _)| *value == category)
        .map_or(category, |(_, label)| *label)
}

fn title(notice: &Notice) -> &str {
    &notice.title
}

fn author(notice: &Notice) -> &str {
    &notice.author
}

fn content(notice: &Notice) -> &str {
    &notice.content
}

fn category(notice: &Notice) -> &str {
    &notice.category
}

fn status(notice: &Notice) -> &str {
    notice.status.as_str()
}

fn created_at(notice: &Notice) -> &str {
    &notice.created_at
}

fn views(notice: &Notice) -> f64 {
    f64::from(notice.views)
}

fn pinned_first(notice: &Notice) -> i64 {
    i64::from(notice.is_pinned)
}

const fn is_published(notice: &Notice) -> bool {
    matches!(notice.status, NoticeStatus::Published)
}

const fn is_pinned(notice: &Notice) -> bool {
    notice.is_pinned
}

fn category_name(notice: &Notice) -> String {
    category_label(&notice.category).to_string()
}

fn draft(id: RecordId) -> Notice {
    Notice {
        id,
        document_id: format!("NT-{id:03}"),
        title: String::new(),
        category: "general".to_string(),
        author: String::new(),
        content: String::new(),
        created_at: String::new(),
        views: 0,
        is_pinned: false,
        status: NoticeStatus::Draft,
    }
}

/// Notice board page
pub fn definition() -> PageDefinition<Notice> {
    let categories = CATEGORIES
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect();

    let schema = FilterSchema::new("제목, 작성자, 내용 검색")
        .search_field(title)
        .search_field(author)
        .search_field(content)
        .select(SelectFilter::new("category", "분류", category, categories))
        .select(SelectFilter::status::<NoticeStatus>("status", "상태", status))
        .date("등록일", created_at);

    let list = ListView::new(vec![
        Column::new("document_id", "번호", |n: &Notice| Cell::text(&n.document_id)),
        Column::new("title", "제목", |n: &Notice| Cell::text(&n.title)),
        Column::new("category", "분류", |n: &Notice| {
            Cell::text(category_label(&n.category))
        }),
        Column::new("author", "작성자", |n: &Notice| Cell::text(&n.author)),
        Column::new("created_at", "등록일", |n: &Notice| Cell::date(&n.created_at)),
        Column::new("views", "조회수", |n: &Notice| Cell::number(f64::from(n.views))),
        Column::new("is_pinned", "고정", |n: &Notice| Cell::flag(n.is_pinned)),
        Column::new("status", "상태", |n: &Notice| Cell::status(n.status)),
    ]);

    let stats = vec![
        StatSpec::new("count", "전체 공지", Aggregate::Count, StatFormat::Number),
        StatSpec::new(
            "published",
            "게시중",
            Aggregate::CountWhere(is_published),
            StatFormat::Number,
        )
        .color(ChipColor::Success),
        StatSpec::new(
            "pinned",
            "고정 공지",
            Aggregate::CountWhere(is_pinned),
            StatFormat::Number,
        )
        .color(ChipColor::Info),
        StatSpec::new(
            "average_views",
            "평균 조회수",
            Aggregate::Average(views),
            StatFormat::Number,
        ),
    ];

    let chart = ChartSpec::new("분류별 조회수", ChartKind::Bar, category_name, StatFormat::Number)
        .series(SeriesSpec::sum("views", "조회수", views))
        .series(SeriesSpec::count("posts", "게시글"));

    PageDefinition {
        schema: Arc::new(schema),
        list,
        stats,
        chart: Some(chart),
        sorts: vec![
            SortSpec::descending("is_pinned", SortKey::Integer(pinned_first)),
            SortSpec::descending("created_at", SortKey::Text(created_at)),
            SortSpec::descending("views", SortKey::Number(views)),
        ],
        draft,
    }
}
