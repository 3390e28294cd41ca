//! Entity to contract model conversions

use chrono::Utc;

use super::entity;
use crate::contract::{Order, OrderItem, Product, User};

impl From<entity::order::Model> for Order {
    fn from(model: entity::order::Model) -> Self {
        Self {
            id: model.id,
            created_at: model.created_at.with_timezone(&Utc),
            order_date: model.order_date.with_timezone(&Utc),
            user_id: model.user_id,
        }
    }
}

impl From<entity::order_item::Model> for OrderItem {
    fn from(model: entity::order_item::Model) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            product_id: model.product_id,
            quantity: model.quantity,
        }
    }
}

impl From<entity::product::Model> for Product {
    fn from(model: entity::product::Model) -> Self {
        Self {
            id: model.id,
            created_at: model.created_at.with_timezone(&Utc),
            price: model.price,
            weight: model.weight,
        }
    }
}

impl From<entity::user::Model> for User {
    fn from(model: entity::user::Model) -> Self {
        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            username: model.username,
            hashed_password: model.hashed_password,
        }
    }
}
