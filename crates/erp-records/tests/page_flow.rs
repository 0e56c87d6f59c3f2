//! End-to-end flows through the page controller

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::float_cmp)]

use async_trait::async_trait;
use erp_core::{
    RecordId,
    status::InvoiceStatus,
    types::{Invoice, InvoicePatch, LineItem},
};
use erp_records::{
    AlwaysConfirm, Backend, DialogState, InMemoryRepository, LoadOutcome, PageController,
    RecordError, RecordResult, Repository, Severity, pages, sample,
};
use pretty_assertions::assert_eq;
use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::time::sleep;

fn first_three() -> Vec<Invoice> {
    sample::invoices().into_iter().take(3).collect()
}

async fn controller(records: Vec<Invoice>) -> PageController<Invoice> {
    let repository = Arc::new(InMemoryRepository::new(records));
    let controller = PageController::new(repository, pages::invoices::definition());
    assert_eq!(controller.reload().await.unwrap(), LoadOutcome::Applied);
    controller
}

/// Answers the n-th `list` call after `delays[n]` with `datasets[n]`
struct SequencedRepository {
    calls: AtomicUsize,
    delays: Vec<Duration>,
    datasets: Vec<Vec<Invoice>>,
}

#[async_trait]
impl Repository<Invoice> for SequencedRepository {
    async fn list(&self) -> RecordResult<Vec<Invoice>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.delays.get(call).copied().unwrap_or_default();
        sleep(delay).await;
        self.datasets
            .get(call)
            .cloned()
            .ok_or_else(|| RecordError::backend_message("no more responses"))
    }

    async fn get(&self, id: RecordId) -> RecordResult<Invoice> {
        Err(RecordError::NotFound {
            resource: "invoices",
            id,
        })
    }

    async fn create(&self, _draft: Invoice) -> RecordResult<Invoice> {
        Err(RecordError::backend_message("read only"))
    }

    async fn update(&self, _id: RecordId, _patch: &InvoicePatch) -> RecordResult<Invoice> {
        Err(RecordError::backend_message("read only"))
    }

    async fn replace(&self, _record: Invoice) -> RecordResult<Invoice> {
        Err(RecordError::backend_message("read only"))
    }

    async fn delete(&self, _id: RecordId) -> RecordResult<()> {
        Err(RecordError::backend_message("read only"))
    }

    fn backend(&self) -> Backend {
        Backend::Http
    }
}

#[tokio::test]
async fn test_invoice_scenario() {
    let controller = controller(first_three()).await;

    let issued = controller
        .stat_cards()
        .into_iter()
        .find(|card| card.key == "issued")
        .unwrap();
    assert_eq!(issued.value, 4_250_000.0);
    assert_eq!(issued.display, "₩4,250,000");

    controller.select("status", "paid").unwrap();
    let paid: Vec<RecordId> = controller.visible().iter().map(|i| i.id).collect();
    assert_eq!(paid, vec![2]);

    let table = controller.list_view();
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].cells[4].display(), "₩2,750,000");
    assert_eq!(table.rows[0].cells[5].display(), "결제완료");
}

#[tokio::test]
async fn test_create_edit_delete_cycle() {
    let controller = controller(first_three()).await;
    let before: Vec<Arc<Invoice>> = controller.records();

    controller.open_create();
    assert!(controller.update_draft(|draft| {
        draft.customer_name = "그린에너지".to_string();
        draft.issue_date = "2024-02-10".to_string();
        draft.due_date = "2024-03-10".to_string();
        draft.items = vec![LineItem {
            id: 1,
            description: "컨설팅".to_string(),
            quantity: 2.0,
            unit_price: 300_000.0,
        }];
        draft.total_amount = draft.items_total();
    }));
    let created = controller.save().await.unwrap();
    assert_eq!(created.id, 4);
    assert_eq!(created.invoice_number, "INV-2024-004");
    assert!(matches!(controller.dialog(), DialogState::Closed));
    assert_eq!(
        controller.notifications().last().unwrap().message,
        "저장되었습니다"
    );

    controller.open_edit(4).unwrap();
    controller.update_patch(|patch| patch.memo = Some(Some("분할 납부".to_string())));
    let edited = controller.save().await.unwrap();
    assert_eq!(edited.memo.as_deref(), Some("분할 납부"));
    assert_eq!(edited.customer_name, "그린에너지");

    let after = controller.records();
    for (old, new) in before.iter().zip(&after) {
        assert!(Arc::ptr_eq(old, new), "record {} kept its identity", old.id);
    }

    let prompts = AtomicUsize::new(0);
    let confirm = |message: &str| {
        prompts.fetch_add(1, Ordering::SeqCst);
        message.starts_with("INV-2024-004")
    };
    assert!(controller.delete(4, &confirm).await.unwrap());
    assert_eq!(prompts.load(Ordering::SeqCst), 1);

    let remaining: Vec<Invoice> = controller.records().iter().map(|i| (**i).clone()).collect();
    assert_eq!(remaining, first_three());
}

#[tokio::test]
async fn test_transition_through_repository() {
    let controller = controller(first_three()).await;

    let sent = controller.transition(1, InvoiceStatus::Paid).await.unwrap();
    assert_eq!(sent.status, InvoiceStatus::Paid);

    controller.select("status", "paid").unwrap();
    assert_eq!(controller.visible().len(), 2);

    let err = controller
        .transition(3, InvoiceStatus::Paid)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Status transition not allowed: draft -> paid"
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_load_is_discarded() {
    let repository = Arc::new(SequencedRepository {
        calls: AtomicUsize::new(0),
        delays: vec![Duration::from_millis(500), Duration::from_millis(10)],
        datasets: vec![sample::invoices(), first_three()],
    });
    let controller = PageController::new(repository, pages::invoices::definition());
    assert_eq!(controller.backend(), Backend::Http);

    let (slow, fast) = tokio::join!(controller.reload(), async {
        sleep(Duration::from_millis(1)).await;
        assert!(controller.is_loading());
        controller.reload().await
    });

    assert_eq!(fast.unwrap(), LoadOutcome::Applied);
    assert_eq!(slow.unwrap(), LoadOutcome::Stale);
    assert_eq!(controller.records().len(), 3);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_failed_load_keeps_records_and_notifies() {
    let repository = Arc::new(InMemoryRepository::new(first_three()));
    let controller = PageController::new(
        Arc::clone(&repository) as Arc<dyn Repository<Invoice>>,
        pages::invoices::definition(),
    );
    controller.reload().await.unwrap();

    repository.set_failing(Some("connection reset".to_string()));
    let err = controller.reload().await.unwrap_err();
    assert!(err.is_backend());
    assert_eq!(controller.records().len(), 3);
    assert!(!controller.is_loading());

    let toast = controller.notifications().pop().unwrap();
    assert_eq!(toast.severity, Severity::Error);
    assert!(controller.dismiss(toast.id));
    assert!(controller.notifications().is_empty());
}

#[tokio::test]
async fn test_failed_save_does_not_block_next_action() {
    let repository = Arc::new(InMemoryRepository::new(first_three()));
    let controller = PageController::new(
        Arc::clone(&repository) as Arc<dyn Repository<Invoice>>,
        pages::invoices::definition(),
    );
    controller.reload().await.unwrap();

    controller.open_edit(1).unwrap();
    controller.update_patch(|patch| patch.customer_name = Some("한빛상사(주)".to_string()));

    repository.set_failing(Some("timeout".to_string()));
    assert!(controller.save().await.is_err());
    assert!(controller.dialog().is_open());

    repository.set_failing(None);
    let saved = controller.save().await.unwrap();
    assert_eq!(saved.customer_name, "한빛상사(주)");
    assert!(controller.delete(3, &AlwaysConfirm).await.unwrap());

    let messages: Vec<String> = controller
        .notifications()
        .into_iter()
        .map(|toast| toast.message)
        .collect();
    assert_eq!(
        messages,
        vec!["저장에 실패했습니다", "저장되었습니다", "삭제되었습니다"]
    );
}
