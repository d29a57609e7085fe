//! Order coordinator behavior against an in-memory database.

mod common;

use common::{seed_sku, test_db};
use shared::ErrorCode;
use tally_server::db::models::{OrderCreate, OrderItemInput, OrderStatus};
use tally_server::db::repository::{OrderRepository, SkuRepository, StockHistoryRepository};
use tally_server::orders::OrderCoordinator;

fn order(items: Vec<(String, i64)>) -> OrderCreate {
    OrderCreate {
        items: items
            .into_iter()
            .map(|(sku_id, quantity)| OrderItemInput { sku_id, quantity })
            .collect(),
        customer: None,
        tax: None,
        tax_rate: None,
        metadata: None,
    }
}

#[tokio::test]
async fn multi_item_order_deducts_stock_and_totals_add_up() {
    let db = test_db().await;
    let a = seed_sku(&db, "TEE-RED-M", 19.99, 10).await;
    let b = seed_sku(&db, "TEE-BLU-L", 24.50, 4).await;
    let a_id = a.id.unwrap().to_string();
    let b_id = b.id.unwrap().to_string();

    let coordinator = OrderCoordinator::new(db.clone());
    let mut request = order(vec![(a_id.clone(), 3), (b_id.clone(), 2)]);
    request.tax_rate = Some(0.10);
    let created = coordinator
        .create_order(request, Some("user:clerk".to_string()))
        .await
        .unwrap();

    assert_eq!(created.status, OrderStatus::Completed);
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.total_items, 5);
    assert_eq!(created.created_by.as_deref(), Some("user:clerk"));

    // Totals law: sub_total = sum of line totals, total = sub_total + tax
    assert_eq!(created.items[0].line_total, 59.97);
    assert_eq!(created.items[1].line_total, 49.0);
    assert_eq!(created.sub_total, 108.97);
    assert_eq!(created.tax, 10.9);
    assert_eq!(created.total, 119.87);

    // Stock deducted per line
    let sku_repo = SkuRepository::new(db.clone());
    assert_eq!(sku_repo.find_by_id(&a_id).await.unwrap().unwrap().stock, 7);
    assert_eq!(sku_repo.find_by_id(&b_id).await.unwrap().unwrap().stock, 2);

    // One ledger entry per line, referencing the order
    let order_id = created.id.unwrap().to_string();
    let entries = StockHistoryRepository::new(db.clone())
        .find_by_order(&order_id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        assert_eq!(entry.reason, format!("order:{}", created.order_number));
        assert!(entry.change < 0);
    }
}

#[tokio::test]
async fn order_number_has_expected_shape() {
    let db = test_db().await;
    let sku = seed_sku(&db, "NUM-A", 1.00, 5).await;
    let sku_id = sku.id.unwrap().to_string();

    let coordinator = OrderCoordinator::new(db.clone());
    let created = coordinator
        .create_order(order(vec![(sku_id, 1)]), None)
        .await
        .unwrap();

    let parts: Vec<&str> = created.order_number.split('-').collect();
    assert_eq!(parts[0], "ORD");
    assert_eq!(parts[1].len(), 14);
    assert_eq!(parts[2].len(), 8);

    // Retrievable by number
    let found = OrderRepository::new(db.clone())
        .find_by_number(&created.order_number)
        .await
        .unwrap();
    assert!(found.is_some());
}

#[tokio::test]
async fn failing_line_aborts_the_whole_order() {
    let db = test_db().await;
    let a = seed_sku(&db, "ATOM-A", 5.00, 10).await;
    let b = seed_sku(&db, "ATOM-B", 5.00, 1).await;
    let a_id = a.id.unwrap().to_string();
    let b_id = b.id.unwrap().to_string();

    let coordinator = OrderCoordinator::new(db.clone());
    let err = coordinator
        .create_order(order(vec![(a_id.clone(), 2), (b_id.clone(), 3)]), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::InsufficientStock);
    assert!(err.message.contains("ATOM-B"));

    // Nothing applied: stocks intact, no order, no order ledger entries
    let sku_repo = SkuRepository::new(db.clone());
    assert_eq!(sku_repo.find_by_id(&a_id).await.unwrap().unwrap().stock, 10);
    assert_eq!(sku_repo.find_by_id(&b_id).await.unwrap().unwrap().stock, 1);

    let orders = OrderRepository::new(db.clone()).find_all(50).await.unwrap();
    assert!(orders.is_empty());

    let a_history = StockHistoryRepository::new(db.clone())
        .find_by_sku(&a_id, 50)
        .await
        .unwrap();
    assert_eq!(a_history.len(), 1, "only the seeding entry survives");
}

#[tokio::test]
async fn unknown_sku_fails_the_order() {
    let db = test_db().await;
    let coordinator = OrderCoordinator::new(db.clone());
    let err = coordinator
        .create_order(order(vec![("sku:missing".to_string(), 1)]), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::SkuNotFound);
}

#[tokio::test]
async fn last_unit_goes_to_exactly_one_order() {
    let db = test_db().await;
    let sku = seed_sku(&db, "LAST-ONE", 9.99, 1).await;
    let sku_id = sku.id.unwrap().to_string();

    let coordinator = OrderCoordinator::new(db.clone());
    let first = coordinator
        .create_order(order(vec![(sku_id.clone(), 1)]), None)
        .await
        .unwrap();
    let second = coordinator
        .create_order(order(vec![(sku_id.clone(), 1)]), None)
        .await
        .unwrap_err();

    assert_eq!(second.code, ErrorCode::InsufficientStock);

    let sku_repo = SkuRepository::new(db.clone());
    assert_eq!(sku_repo.find_by_id(&sku_id).await.unwrap().unwrap().stock, 0);

    // Exactly one deduction entry for the winning order
    let entries = StockHistoryRepository::new(db.clone())
        .find_by_order(&first.id.unwrap().to_string())
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].new_stock, 0);
}

#[tokio::test]
async fn line_snapshots_survive_later_sku_edits() {
    let db = test_db().await;
    let sku = seed_sku(&db, "SNAP-A", 12.00, 5).await;
    let sku_id = sku.id.clone().unwrap().to_string();

    let coordinator = OrderCoordinator::new(db.clone());
    let created = coordinator
        .create_order(order(vec![(sku_id.clone(), 1)]), None)
        .await
        .unwrap();

    // Reprice the SKU after the sale
    db.query("UPDATE $thing SET price = 99.0")
        .bind(("thing", sku.id.clone().unwrap()))
        .await
        .unwrap();

    let reloaded = OrderRepository::new(db.clone())
        .find_by_id(&created.id.unwrap().to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.items[0].unit_price, 12.0);
    assert_eq!(reloaded.items[0].sku_code, "SNAP-A");
    assert_eq!(reloaded.total, 12.0);
}

#[tokio::test]
async fn explicit_tax_amount_wins_over_rate() {
    let db = test_db().await;
    let sku = seed_sku(&db, "TAX-A", 10.00, 5).await;
    let sku_id = sku.id.unwrap().to_string();

    let coordinator = OrderCoordinator::new(db.clone());
    let mut request = order(vec![(sku_id, 2)]);
    request.tax = Some(1.25);
    request.tax_rate = Some(0.50);
    let created = coordinator.create_order(request, None).await.unwrap();

    assert_eq!(created.sub_total, 20.0);
    assert_eq!(created.tax, 1.25);
    assert_eq!(created.total, 21.25);
}
