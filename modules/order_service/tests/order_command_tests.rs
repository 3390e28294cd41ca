//! Command handler tests over a mock backend

use std::collections::BTreeMap;

use chrono::Utc;
use datakit_cqrs::CommandHandler;
use order_service::infra::storage::entity::order;
use order_service::{
    CreateOrder, CreateOrderHandler, DeleteOrder, DeleteOrderHandler, OrderError, OrderLine,
    SubmitOrder, SubmitOrderHandler,
};
use sea_orm::{DatabaseBackend, MockDatabase, Value};

mod common;
use common::{item_row, mock_store, order_row};

#[tokio::test]
async fn create_order_returns_the_stored_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order_row(1, None)]]);
    let handler = CreateOrderHandler::new(mock_store(db));

    let order = handler
        .handle(CreateOrder {
            order_date: Utc::now(),
            user_id: None,
        })
        .await
        .unwrap();
    assert_eq!(order.id, 1);
    assert_eq!(order.user_id, None);
}

#[tokio::test]
async fn create_order_checks_that_the_user_exists() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![BTreeMap::from([("has_any", Value::from(false))])]]);
    let handler = CreateOrderHandler::new(mock_store(db));

    let err = handler
        .handle(CreateOrder {
            order_date: Utc::now(),
            user_id: Some(7),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        OrderError::NotFound {
            resource: "user".to_owned(),
            id: "7".to_owned(),
        }
    );
}

#[tokio::test]
async fn submit_order_persists_order_and_lines_in_one_scope() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order_row(5, Some(2))]])
        .append_query_results([vec![item_row(10, 5, 3, 2), item_row(11, 5, 4, 1)]]);
    let handler = SubmitOrderHandler::new(mock_store(db));

    let receipt = handler
        .handle(SubmitOrder {
            order_date: Utc::now(),
            user_id: Some(2),
            lines: vec![
                OrderLine {
                    product_id: 3,
                    quantity: 2,
                },
                OrderLine {
                    product_id: 4,
                    quantity: 1,
                },
            ],
        })
        .await
        .unwrap();
    assert_eq!(receipt.order.id, 5);
    assert_eq!(receipt.items.len(), 2);
    assert_eq!(receipt.items[0].order_id, 5);
}

#[tokio::test]
async fn submit_order_rejects_an_empty_line_set() {
    let db = MockDatabase::new(DatabaseBackend::Postgres);
    let handler = SubmitOrderHandler::new(mock_store(db));

    let err = handler
        .handle(SubmitOrder {
            order_date: Utc::now(),
            user_id: None,
            lines: Vec::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::Validation { .. }));
}

#[tokio::test]
async fn delete_order_returns_the_deleted_snapshot() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order_row(5, None)]])
        .append_query_results([vec![item_row(10, 5, 3, 2)]]);
    let handler = DeleteOrderHandler::new(mock_store(db));

    let removed = handler.handle(DeleteOrder { order_id: 5 }).await.unwrap();
    assert_eq!(removed.id, 5);
}

#[tokio::test]
async fn delete_order_rolls_back_when_nothing_matched() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<order::Model>::new()]);
    let handler = DeleteOrderHandler::new(mock_store(db));

    let err = handler.handle(DeleteOrder { order_id: 404 }).await.unwrap_err();
    assert_eq!(
        err,
        OrderError::NotFound {
            resource: "order".to_owned(),
            id: "404".to_owned(),
        }
    );
}

#[tokio::test]
async fn delete_order_surfaces_item_deletion_failures() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order_row(5, None)]])
        .append_query_errors([sea_orm::DbErr::Custom("wire dropped".to_owned())]);
    let handler = DeleteOrderHandler::new(mock_store(db));

    let err = handler.handle(DeleteOrder { order_id: 5 }).await.unwrap_err();
    assert!(matches!(err, OrderError::Storage { .. }));
}
