//! SeaORM entities for the order-management tables
//!
//! Identity columns are storage-generated; `created_at`, `weight` and
//! `quantity` carry server-side defaults in the schema. The `order_items`
//! foreign keys cascade on update and delete.

pub mod order;
pub mod order_item;
pub mod product;
pub mod user;
