//! 백업 관리

use crate::{
    aggregate::{Aggregate, StatFormat, StatSpec},
    chart::{ChartKind, ChartSpec, SeriesSpec},
    definition::PageDefinition,
    filter::{FilterSchema, SelectFilter, SelectOption},
    sort::{SortKey, SortSpec},
    view::{Cell, Column, ListView},
};
use erp_core::{
    ChipColor, RecordId, Status, status::BackupStatus, types::BackupJob, utils::format_number,
};
use std::sync::Arc;

/// Backup targets
pub const TARGETS: &[(&str, &str)] = &[
    ("database", "데이터베이스"),
    ("files", "파일"),
    ("full", "전체"),
];

fn target_label(target: &str) -> &str {
    TARGETS
        .iter()
        .find(|(value, _)| *value == target)
        .map_or(target, |(_, label)| *label)
}

fn job_code(job: &BackupJob) -> &str {
    &job.job_code
}

fn name(job: &BackupJob) -> &str {
    &job.name
}

fn target(job: &BackupJob) -> &str {
    &job.target
}

fn status(job: &BackupJob) -> &str {
    job.status.as_str()
}

fn last_run(job: &BackupJob) -> &str {
    job.last_run.as_deref().unwrap_or_default()
}

fn size_mb(job: &BackupJob) -> f64 {
    job.size_mb
}

fn duration(job: &BackupJob) -> f64 {
    job.duration_seconds
}

const fn is_completed(job: &BackupJob) -> bool {
    matches!(job.status, BackupStatus::Completed)
}

const fn is_failed(job: &BackupJob) -> bool {
    matches!(job.status, BackupStatus::Failed)
}

fn target_name(job: &BackupJob) -> String {
    target_label(&job.target).to_string()
}

fn draft(id: RecordId) -> BackupJob {
    BackupJob {
        id,
        job_code: format!("BK-{id:03}"),
        name: String::new(),
        target: "database".to_string(),
        schedule: String::new(),
        last_run: None,
        size_mb: 0.0,
        duration_seconds: 0.0,
        status: BackupStatus::Scheduled,
    }
}

/// Backup job page
pub fn definition() -> PageDefinition<BackupJob> {
    let targets = TARGETS
        .iter()
        .map(|(value, label)| SelectOption::new(*value, *label))
        .collect();

    let schema = FilterSchema::new("작업코드, 작업명 검색")
        .search_field(job_code)
        .search_field(name)
        .select(SelectFilter::new("target", "대상", target, targets))
        .select(SelectFilter::status::<BackupStatus>("status", "상태", status))
        .date("마지막 실행", last_run);

    let list = ListView::new(vec![
        Column::new("job_code", "작업코드", |j: &BackupJob| Cell::text(&j.job_code)),
        Column::new("name", "작업명", |j: &BackupJob| Cell::text(&j.name)),
        Column::new("target", "대상", |j: &BackupJob| {
            Cell::text(target_label(&j.target))
        }),
        Column::new("schedule", "일정", |j: &BackupJob| Cell::text(&j.schedule)),
        Column::new("last_run", "마지막 실행", |j: &BackupJob| {
            j.last_run
                .as_ref()
                .map_or_else(|| Cell::text("-"), Cell::datetime)
        }),
        Column::new("size_mb", "크기", |j: &BackupJob| {
            Cell::text(format!("{} MB", format_number(j.size_mb)))
        }),
        Column::new("duration_seconds", "소요시간", |j: &BackupJob| {
            Cell::text(format!("{}초", format_number(j.duration_seconds)))
        }),
        Column::new("status", "상태", |j: &BackupJob| Cell::status(j.status)),
    ]);

    let stats = vec![
        StatSpec::new("count", "전체 작업", Aggregate::Count, StatFormat::Number),
        StatSpec::new(
            "success_rate",
            "성공률",
            Aggregate::Share(is_completed),
            StatFormat::Percent,
        )
        .color(ChipColor::Success),
        StatSpec::new(
            "failed",
            "실패",
            Aggregate::CountWhere(is_failed),
            StatFormat::Number,
        )
        .color(ChipColor::Error),
        StatSpec::new(
            "size",
            "총 백업 용량 (MB)",
            Aggregate::Sum(size_mb),
            StatFormat::Number,
        ),
    ];

    let chart = ChartSpec::new("대상별 백업 용량", ChartKind::Bar, target_name, StatFormat::Number)
        .series(SeriesSpec::sum("size_mb", "용량 (MB)", size_mb));

    PageDefinition {
        schema: Arc::new(schema),
        list,
        stats,
        chart: Some(chart),
        sorts: vec![
            SortSpec::descending("last_run", SortKey::Text(last_run)),
            SortSpec::descending("size_mb", SortKey::Number(size_mb)),
            SortSpec::descending("duration_seconds", SortKey::Number(duration)),
        ],
        draft,
    }
}
