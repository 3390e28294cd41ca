//! Shared fixtures for order service tests

use chrono::DateTime;
use datakit_db::Datastore;
use order_service::infra::storage::entity::{order, order_item, product, user};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::MockDatabase;

pub fn ts(raw: &str) -> DateTimeWithTimeZone {
    DateTime::parse_from_rfc3339(raw).unwrap()
}

pub fn order_row(id: i32, user_id: Option<i32>) -> order::Model {
    order::Model {
        id,
        created_at: ts("2024-03-01T10:00:00Z"),
        order_date: ts("2024-03-02T00:00:00Z"),
        user_id,
    }
}

pub fn user_row(id: i32, username: &str) -> user::Model {
    user::Model {
        id,
        first_name: "Ada".to_owned(),
        last_name: "Lovelace".to_owned(),
        username: username.to_owned(),
        hashed_password: None,
    }
}

pub fn product_row(id: i32, price: i32, weight: i16) -> product::Model {
    product::Model {
        id,
        created_at: ts("2024-02-20T08:30:00Z"),
        price,
        weight,
    }
}

pub fn item_row(id: i32, order_id: i32, product_id: i32, quantity: i16) -> order_item::Model {
    order_item::Model {
        id,
        order_id,
        product_id: Some(product_id),
        quantity,
    }
}

pub fn mock_store(db: MockDatabase) -> Datastore {
    Datastore::from_connection(db.into_connection())
}
