//! Entity relation graph and mapper tests

use chrono::{TimeZone, Utc};
use order_service::infra::storage::entity::{order, order_item, product, user};
use order_service::{Order, OrderItem, Product, User};
use sea_orm::sea_query::ForeignKeyAction;
use sea_orm::{Related, RelationTrait};

mod common;
use common::{item_row, order_row, product_row, ts, user_row};

#[test]
fn order_item_foreign_keys_cascade() {
    let to_order = order_item::Relation::Order.def();
    assert!(matches!(to_order.on_delete, Some(ForeignKeyAction::Cascade)));
    assert!(matches!(to_order.on_update, Some(ForeignKeyAction::Cascade)));

    let to_product = order_item::Relation::Product.def();
    assert!(matches!(
        to_product.on_delete,
        Some(ForeignKeyAction::Cascade)
    ));
}

#[test]
fn orders_reach_products_through_the_association_entity() {
    assert!(<order::Entity as Related<product::Entity>>::via().is_some());
    assert!(<product::Entity as Related<order::Entity>>::via().is_some());
    assert!(<order::Entity as Related<user::Entity>>::via().is_none());
}

#[test]
fn entity_rows_map_onto_contract_models() {
    let order = Order::from(order_row(5, Some(2)));
    assert_eq!(order.id, 5);
    assert_eq!(
        order.order_date,
        Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap()
    );

    let user = User::from(user_row(2, "ada"));
    assert_eq!(user.username, "ada");
    assert_eq!(user.hashed_password, None);

    let product = Product::from(product_row(3, 500, 2));
    assert_eq!(product.price, 500);
    assert_eq!(product.weight, 2);

    let item = OrderItem::from(item_row(10, 5, 3, 2));
    assert_eq!(item.product_id, Some(3));
    assert_eq!(item.quantity, 2);
}

#[test]
fn fixture_timestamps_parse_with_offsets() {
    let stamp = ts("2024-03-01T10:00:00+02:00");
    assert_eq!(stamp.timezone().local_minus_utc(), 2 * 3600);
}
