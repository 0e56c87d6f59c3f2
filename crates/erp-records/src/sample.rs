//! Sample records used by in-memory repositories and demos

use erp_core::{
    status::{
        ApprovalStatus, AssetStatus, BackupStatus, InvoiceStatus, NoticeStatus, StepDecision,
    },
    types::{
        ApprovalDocument, ApprovalStep, Asset, BackupJob, Invoice, LineItem, Notice, RecordId,
    },
};

fn line(id: RecordId, description: &str, quantity: f64, unit_price: f64) -> LineItem {
    LineItem {
        id,
        description: description.to_string(),
        quantity,
        unit_price,
    }
}

fn invoice(
    id: RecordId,
    customer: &str,
    issue_date: &str,
    due_date: &str,
    status: InvoiceStatus,
    items: Vec<LineItem>,
) -> Invoice {
    let total_amount = items.iter().map(LineItem::amount).sum();
    Invoice {
        id,
        invoice_number: format!("INV-2024-{id:03}"),
        customer_name: customer.to_string(),
        issue_date: issue_date.to_string(),
        due_date: due_date.to_string(),
        status,
        items,
        total_amount,
        memo: None,
    }
}

/// Sales invoices
pub fn invoices() -> Vec<Invoice> {
    vec![
        invoice(
            1,
            "한빛상사",
            "2024-01-15",
            "2024-02-15",
            InvoiceStatus::Sent,
            vec![line(1, "ERP 컨설팅", 3.0, 500_000.0)],
        ),
        invoice(
            2,
            "새한물산",
            "2024-01-20",
            "2024-02-20",
            InvoiceStatus::Paid,
            vec![
                line(1, "서버 유지보수", 1.0, 2_000_000.0),
                line(2, "라이선스 갱신", 3.0, 250_000.0),
            ],
        ),
        invoice(
            3,
            "대성테크",
            "2024-02-01",
            "2024-03-01",
            InvoiceStatus::Draft,
            Vec::new(),
        ),
        invoice(
            4,
            "미래전자",
            "2024-02-05",
            "2024-03-05",
            InvoiceStatus::Overdue,
            vec![line(1, "네트워크 장비", 4.0, 320_000.0)],
        ),
        invoice(
            5,
            "한빛상사",
            "2024-02-12",
            "2024-03-12",
            InvoiceStatus::Paid,
            vec![line(1, "교육 서비스", 2.0, 450_000.0)],
        ),
        invoice(
            6,
            "동양정밀",
            "2024-02-20",
            "2024-03-20",
            InvoiceStatus::Cancelled,
            vec![line(1, "부품 공급", 100.0, 12_000.0)],
        ),
        invoice(
            7,
            "새한물산",
            "2024-03-02",
            "2024-04-02",
            InvoiceStatus::Sent,
            vec![
                line(1, "클라우드 이용료", 1.0, 880_000.0),
                line(2, "백업 스토리지", 2.0, 60_000.0),
            ],
        ),
        invoice(
            8,
            "그린에너지",
            "2024-03-08",
            "2024-04-08",
            InvoiceStatus::Paid,
            vec![line(1, "태양광 모니터링", 1.0, 1_250_000.0)],
        ),
        invoice(
            9,
            "대성테크",
            "2024-03-15",
            "2024-04-15",
            InvoiceStatus::Draft,
            vec![line(1, "보안 점검", 1.0, 700_000.0)],
        ),
        invoice(
            10,
            "미래전자",
            "2024-03-21",
            "2024-04-21",
            InvoiceStatus::Sent,
            vec![line(1, "소프트웨어 개발", 10.0, 150_000.0)],
        ),
        invoice(
            11,
            "동양정밀",
            "2024-03-28",
            "2024-04-28",
            InvoiceStatus::Overdue,
            vec![line(1, "설비 점검", 1.0, 540_000.0)],
        ),
        invoice(
            12,
            "그린에너지",
            "2024-04-03",
            "2024-05-03",
            InvoiceStatus::Paid,
            vec![line(1, "유지보수 계약", 12.0, 90_000.0)],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn asset(
    id: RecordId,
    name: &str,
    category: &str,
    department: &str,
    location: &str,
    purchase_date: &str,
    purchase_price: f64,
    current_value: f64,
    status: AssetStatus,
    manager: &str,
) -> Asset {
    Asset {
        id,
        asset_code: format!("AST-{id:04}"),
        name: name.to_string(),
        category: category.to_string(),
        department: department.to_string(),
        location: location.to_string(),
        purchase_date: purchase_date.to_string(),
        purchase_price,
        current_value,
        status,
        manager: manager.to_string(),
    }
}

/// Fixed assets
pub fn assets() -> Vec<Asset> {
    vec![
        asset(
            1,
            "개발용 노트북",
            "it",
            "개발팀",
            "본사 3층",
            "2023-03-02",
            2_400_000.0,
            1_800_000.0,
            AssetStatus::InUse,
            "이지은",
        ),
        asset(
            2,
            "27인치 모니터",
            "it",
            "디자인팀",
            "본사 4층",
            "2023-05-17",
            450_000.0,
            360_000.0,
            AssetStatus::InUse,
            "박민지",
        ),
        asset(
            3,
            "회의실 프로젝터",
            "equipment",
            "총무팀",
            "본사 2층",
            "2021-11-08",
            1_200_000.0,
            400_000.0,
            AssetStatus::Repair,
            "최현우",
        ),
        asset(
            4,
            "업무용 차량",
            "vehicle",
            "영업팀",
            "지하 주차장",
            "2022-06-30",
            32_000_000.0,
            24_500_000.0,
            AssetStatus::InUse,
            "김민수",
        ),
        asset(
            5,
            "사무용 책상",
            "furniture",
            "인사팀",
            "본사 5층",
            "2020-01-10",
            300_000.0,
            90_000.0,
            AssetStatus::Idle,
            "정수빈",
        ),
        asset(
            6,
            "파일 서버",
            "it",
            "정보보안팀",
            "전산실",
            "2019-09-23",
            8_900_000.0,
            0.0,
            AssetStatus::Disposed,
            "한도윤",
        ),
        asset(
            7,
            "복합기",
            "equipment",
            "총무팀",
            "본사 1층",
            "2023-08-14",
            3_100_000.0,
            2_700_000.0,
            AssetStatus::InUse,
            "최현우",
        ),
        asset(
            8,
            "태블릿",
            "it",
            "영업팀",
            "본사 3층",
            "2024-01-05",
            900_000.0,
            880_000.0,
            AssetStatus::Idle,
            "김민수",
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn notice(
    id: RecordId,
    title: &str,
    category: &str,
    author: &str,
    content: &str,
    created_at: &str,
    views: u32,
    is_pinned: bool,
    status: NoticeStatus,
) -> Notice {
    Notice {
        id,
        document_id: format!("NT-{id:03}"),
        title: title.to_string(),
        category: category.to_string(),
        author: author.to_string(),
        content: content.to_string(),
        created_at: created_at.to_string(),
        views,
        is_pinned,
        status,
    }
}

/// Notice board posts
pub fn notices() -> Vec<Notice> {
    vec![
        notice(
            1,
            "2024년 시무식 안내",
            "general",
            "총무팀",
            "1월 2일 오전 10시 대회의실에서 시무식이 진행됩니다.",
            "2023-12-28 09:00:00",
            214,
            true,
            NoticeStatus::Published,
        ),
        notice(
            2,
            "ERP 시스템 정기 점검",
            "system",
            "정보보안팀",
            "1월 20일 22시부터 2시간 동안 시스템 점검이 있습니다.",
            "2024-01-15 14:30:00",
            98,
            true,
            NoticeStatus::Published,
        ),
        notice(
            3,
            "연말정산 서류 제출",
            "hr",
            "인사팀",
            "1월 31일까지 연말정산 서류를 제출해 주세요.",
            "2024-01-15 10:00:00",
            156,
            false,
            NoticeStatus::Published,
        ),
        notice(
            4,
            "사내 동호회 모집",
            "event",
            "인사팀",
            "상반기 동호회 신청을 받습니다.",
            "2024-02-01 11:20:00",
            47,
            false,
            NoticeStatus::Draft,
        ),
        notice(
            5,
            "2023년 하반기 워크숍 결과",
            "general",
            "경영지원팀",
            "워크숍 결과 보고서를 공유합니다.",
            "2023-11-30 17:00:00",
            302,
            false,
            NoticeStatus::Archived,
        ),
        notice(
            6,
            "보안 교육 이수 안내",
            "system",
            "정보보안팀",
            "전 직원은 2월 말까지 보안 교육을 이수해야 합니다.",
            "2024-02-05 09:30:00",
            12,
            false,
            NoticeStatus::Published,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn backup(
    id: RecordId,
    name: &str,
    target: &str,
    schedule: &str,
    last_run: Option<&str>,
    size_mb: f64,
    duration_seconds: f64,
    status: BackupStatus,
) -> BackupJob {
    BackupJob {
        id,
        job_code: format!("BK-{id:03}"),
        name: name.to_string(),
        target: target.to_string(),
        schedule: schedule.to_string(),
        last_run: last_run.map(str::to_string),
        size_mb,
        duration_seconds,
        status,
    }
}

/// Backup jobs
pub fn backups() -> Vec<BackupJob> {
    vec![
        backup(
            1,
            "일일 DB 백업",
            "database",
            "매일 02:00",
            Some("2024-03-14 02:00:00"),
            2_048.0,
            312.0,
            BackupStatus::Completed,
        ),
        backup(
            2,
            "주간 전체 백업",
            "full",
            "매주 일요일 03:00",
            Some("2024-03-10 03:00:00"),
            51_200.0,
            4_380.0,
            BackupStatus::Completed,
        ),
        backup(
            3,
            "첨부파일 백업",
            "files",
            "매일 04:00",
            Some("2024-03-14 04:00:00"),
            8_700.0,
            905.0,
            BackupStatus::Failed,
        ),
        backup(
            4,
            "월간 아카이브",
            "full",
            "매월 1일 01:00",
            None,
            0.0,
            0.0,
            BackupStatus::Scheduled,
        ),
        backup(
            5,
            "로그 백업",
            "files",
            "매시 정각",
            Some("2024-03-14 11:00:00"),
            120.0,
            41.0,
            BackupStatus::Running,
        ),
    ]
}

fn step(id: RecordId, approver: &str, position: &str, decision: StepDecision) -> ApprovalStep {
    ApprovalStep {
        id,
        approver: approver.to_string(),
        position: position.to_string(),
        decision,
        decided_at: None,
        comment: None,
    }
}

#[allow(clippy::too_many_arguments)]
fn approval(
    id: RecordId,
    title: &str,
    doc_type: &str,
    requester: &str,
    department: &str,
    amount: f64,
    submitted_at: &str,
    status: ApprovalStatus,
    steps: Vec<ApprovalStep>,
) -> ApprovalDocument {
    ApprovalDocument {
        id,
        document_id: format!("AP-2024-{id:03}"),
        title: title.to_string(),
        doc_type: doc_type.to_string(),
        requester: requester.to_string(),
        department: department.to_string(),
        amount,
        submitted_at: submitted_at.to_string(),
        status,
        steps,
    }
}

/// Electronic approval documents
pub fn approvals() -> Vec<ApprovalDocument> {
    vec![
        approval(
            1,
            "1월 출장비 정산",
            "expense",
            "김민수",
            "영업팀",
            350_000.0,
            "2024-01-15 09:30:00",
            ApprovalStatus::Submitted,
            vec![
                step(1, "박서준", "팀장", StepDecision::Approved),
                step(2, "오하늘", "본부장", StepDecision::Pending),
            ],
        ),
        approval(
            2,
            "연차 사용 신청",
            "leave",
            "이지은",
            "개발팀",
            0.0,
            "2024-01-18 13:10:00",
            ApprovalStatus::Approved,
            vec![step(1, "강태오", "팀장", StepDecision::Approved)],
        ),
        approval(
            3,
            "개발 서버 구매",
            "purchase",
            "한도윤",
            "정보보안팀",
            12_800_000.0,
            "2024-02-02 16:45:00",
            ApprovalStatus::Rejected,
            vec![
                step(1, "강태오", "팀장", StepDecision::Approved),
                step(2, "오하늘", "본부장", StepDecision::Rejected),
            ],
        ),
        approval(
            4,
            "사무용품 구매",
            "purchase",
            "정수빈",
            "인사팀",
            420_000.0,
            "2024-02-14 10:00:00",
            ApprovalStatus::Draft,
            vec![step(1, "윤세아", "팀장", StepDecision::Pending)],
        ),
        approval(
            5,
            "고객사 접대비",
            "expense",
            "김민수",
            "영업팀",
            780_000.0,
            "2024-02-21 18:20:00",
            ApprovalStatus::Submitted,
            vec![step(1, "박서준", "팀장", StepDecision::Pending)],
        ),
        approval(
            6,
            "교육 참가 신청",
            "training",
            "박민지",
            "디자인팀",
            600_000.0,
            "2024-03-04 08:50:00",
            ApprovalStatus::Approved,
            vec![
                step(1, "윤세아", "팀장", StepDecision::Approved),
                step(2, "오하늘", "본부장", StepDecision::Approved),
            ],
        ),
    ]
}
