//! Transport-agnostic contract for the order service

pub mod error;
pub mod model;

pub use error::OrderError;
pub use model::{
    Order, OrderDetails, OrderItem, OrderReceipt, OrdersPage, Product, User,
};
