//! Stock engine behavior against an in-memory database.

mod common;

use common::{seed_sku, test_db};
use shared::ErrorCode;
use tally_server::db::repository::{SettingsRepository, StockHistoryRepository};
use tally_server::stock::{StockAdjustment, StockEngine, find_low_stock};

fn adjustment(sku_id: &str, delta: i64, reason: &str) -> StockAdjustment {
    StockAdjustment {
        sku_id: sku_id.to_string(),
        delta,
        reason: reason.to_string(),
        actor: Some("user:tester".to_string()),
        order_ref: None,
        metadata: None,
    }
}

#[tokio::test]
async fn receiving_shipment_increases_stock_and_writes_ledger() {
    let db = test_db().await;
    let sku = seed_sku(&db, "WIDGET-A", 4.99, 120).await;
    let sku_id = sku.id.unwrap().to_string();

    let engine = StockEngine::new(db.clone());
    let (updated, entry) = engine
        .adjust(adjustment(&sku_id, 500, "shipment:PO-1042"))
        .await
        .unwrap();

    assert_eq!(updated.stock, 620);
    assert_eq!(entry.change, 500);
    assert_eq!(entry.previous_stock, 120);
    assert_eq!(entry.new_stock, 620);
    assert_eq!(entry.reason, "shipment:PO-1042");
    assert_eq!(entry.actor.as_deref(), Some("user:tester"));
}

#[tokio::test]
async fn overdraft_is_rejected_and_leaves_no_trace() {
    let db = test_db().await;
    let sku = seed_sku(&db, "WIDGET-B", 2.50, 3).await;
    let sku_id = sku.id.unwrap().to_string();

    let engine = StockEngine::new(db.clone());
    let err = engine
        .adjust(adjustment(&sku_id, -5, "damage write-off"))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert!(err.message.contains("WIDGET-B"));

    // Stock untouched, only the seeding entry in the ledger
    let history = StockHistoryRepository::new(db.clone())
        .find_by_sku(&sku_id, 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].new_stock, 3);
}

#[tokio::test]
async fn unknown_sku_is_not_found() {
    let db = test_db().await;
    let engine = StockEngine::new(db.clone());
    let err = engine
        .adjust(adjustment("sku:doesnotexist", 5, "restock"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SkuNotFound);
}

#[tokio::test]
async fn zero_delta_and_empty_reason_are_rejected() {
    let db = test_db().await;
    let sku = seed_sku(&db, "WIDGET-C", 1.00, 10).await;
    let sku_id = sku.id.unwrap().to_string();

    let engine = StockEngine::new(db.clone());
    let err = engine
        .adjust(adjustment(&sku_id, 0, "cycle count"))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidAdjustment);

    let err = engine
        .adjust(adjustment(&sku_id, 5, "   "))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::EmptyReason);
}

#[tokio::test]
async fn bulk_adjustment_rolls_back_on_mid_batch_failure() {
    let db = test_db().await;
    let a = seed_sku(&db, "BULK-A", 1.00, 100).await;
    let b = seed_sku(&db, "BULK-B", 1.00, 2).await;
    let a_id = a.id.unwrap().to_string();
    let b_id = b.id.unwrap().to_string();

    let engine = StockEngine::new(db.clone());
    let err = engine
        .adjust_bulk(vec![
            adjustment(&a_id, -50, "transfer:out"),
            adjustment(&b_id, -10, "transfer:out"),
        ])
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);

    // First item must not have been applied
    let history_repo = StockHistoryRepository::new(db.clone());
    let a_history = history_repo.find_by_sku(&a_id, 50).await.unwrap();
    assert_eq!(a_history.len(), 1);
    assert_eq!(a_history[0].new_stock, 100);
}

#[tokio::test]
async fn bulk_adjustment_applies_all_items() {
    let db = test_db().await;
    let a = seed_sku(&db, "BULK-C", 1.00, 10).await;
    let b = seed_sku(&db, "BULK-D", 1.00, 20).await;
    let a_id = a.id.unwrap().to_string();
    let b_id = b.id.unwrap().to_string();

    let engine = StockEngine::new(db.clone());
    let results = engine
        .adjust_bulk(vec![
            adjustment(&a_id, 5, "recount"),
            adjustment(&b_id, -5, "recount"),
        ])
        .await
        .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].0.stock, 15);
    assert_eq!(results[1].0.stock, 15);
}

#[tokio::test]
async fn ledger_replays_to_current_stock() {
    let db = test_db().await;
    let sku = seed_sku(&db, "LEDGER-A", 1.00, 50).await;
    let sku_id = sku.id.unwrap().to_string();

    let engine = StockEngine::new(db.clone());
    for delta in [25_i64, -30, 5] {
        engine
            .adjust(adjustment(&sku_id, delta, "recount"))
            .await
            .unwrap();
    }

    let history = StockHistoryRepository::new(db.clone())
        .find_by_sku(&sku_id, 50)
        .await
        .unwrap();
    assert_eq!(history.len(), 4);

    // Newest first; every entry satisfies new = previous + change
    for entry in &history {
        assert_eq!(entry.new_stock, entry.previous_stock + entry.change);
    }
    let replayed: i64 = history.iter().map(|e| e.change).sum();
    assert_eq!(replayed, 50);
    assert_eq!(history[0].new_stock, 50);
}

#[tokio::test]
async fn low_stock_uses_effective_threshold() {
    let db = test_db().await;
    let settings = SettingsRepository::new(db.clone())
        .ensure_seeded()
        .await
        .unwrap();
    assert_eq!(settings.default_reorder_threshold, 5);

    // stock at the default threshold boundary is included
    seed_sku(&db, "LOW-A", 1.00, 5).await;
    // above default threshold, excluded
    seed_sku(&db, "LOW-B", 1.00, 6).await;
    // own threshold overrides the default
    let c = seed_sku(&db, "LOW-C", 1.00, 8).await;
    db.query("UPDATE $thing SET reorder_threshold = 10")
        .bind(("thing", c.id.clone().unwrap()))
        .await
        .unwrap();

    let alerts = find_low_stock(&db, settings.default_reorder_threshold)
        .await
        .unwrap();
    let codes: Vec<&str> = alerts.iter().map(|a| a.sku.as_str()).collect();
    assert_eq!(codes, vec!["LOW-A", "LOW-C"]);
    assert_eq!(alerts[1].reorder_threshold, 10);

    // Read-only and idempotent
    let again = find_low_stock(&db, settings.default_reorder_threshold)
        .await
        .unwrap();
    assert_eq!(again.len(), alerts.len());
}
