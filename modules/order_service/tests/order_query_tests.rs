//! Query handler tests over a mock backend

use std::collections::BTreeMap;

use datakit_cqrs::QueryHandler;
use order_service::{
    GetOrderById, GetOrderByIdHandler, ListUserOrders, ListUserOrdersHandler, OrderError,
};
use sea_orm::{DatabaseBackend, MockDatabase, Value};

mod common;
use common::{item_row, mock_store, order_row, product_row, user_row};

#[tokio::test]
async fn get_order_by_id_hydrates_related_rows() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order_row(5, Some(2))]])
        .append_query_results([vec![user_row(2, "ada")]])
        .append_query_results([vec![item_row(10, 5, 3, 2), item_row(11, 5, 4, 1)]])
        .append_query_results([vec![product_row(3, 500, 2), product_row(4, 120, 1)]]);
    let handler = GetOrderByIdHandler::new(mock_store(db));

    let details = handler.handle(GetOrderById { order_id: 5 }).await.unwrap();
    assert_eq!(details.order.id, 5);
    assert_eq!(details.user.map(|u| u.username), Some("ada".to_owned()));
    assert_eq!(details.items.len(), 2);
    assert_eq!(details.products.len(), 2);
    assert_eq!(details.products[0].price, 500);
}

#[tokio::test]
async fn get_order_by_id_skips_user_lookup_without_a_user() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order_row(6, None)]])
        .append_query_results([Vec::<order_service::infra::storage::entity::order_item::Model>::new()]);
    let handler = GetOrderByIdHandler::new(mock_store(db));

    let details = handler.handle(GetOrderById { order_id: 6 }).await.unwrap();
    assert_eq!(details.user, None);
    assert!(details.items.is_empty());
    assert!(details.products.is_empty());
}

#[tokio::test]
async fn get_order_by_id_reports_absence_as_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).append_query_results([
        Vec::<order_service::infra::storage::entity::order::Model>::new(),
    ]);
    let handler = GetOrderByIdHandler::new(mock_store(db));

    let err = handler
        .handle(GetOrderById { order_id: 404 })
        .await
        .unwrap_err();
    assert!(matches!(err, OrderError::NotFound { .. }));
}

#[tokio::test]
async fn list_user_orders_pairs_rows_with_their_total() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![order_row(1, Some(2)), order_row(5, Some(2))]])
        .append_query_results([vec![BTreeMap::from([("num_items", Value::from(2i64))])]]);
    let handler = ListUserOrdersHandler::new(mock_store(db));

    let page = handler.handle(ListUserOrders { user_id: 2 }).await.unwrap();
    assert_eq!(page.orders.len(), 2);
    assert_eq!(page.total, 2);
    assert!(page.orders.iter().all(|order| order.user_id == Some(2)));
}
