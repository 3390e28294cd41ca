//! Order Service Module
//!
//! Order-management commands and queries over the datakit repository /
//! unit-of-work layer. Handlers bind entity-scoped repositories per request
//! and wrap multi-entity writes in one transactional scope.

// Public exports
pub mod contract;
pub use contract::{
    Order, OrderDetails, OrderError, OrderItem, OrderReceipt, OrdersPage, Product, User,
};

pub mod domain;
pub use domain::{
    CreateOrder, CreateOrderHandler, DeleteOrder, DeleteOrderHandler, GetOrderById,
    GetOrderByIdHandler, ListUserOrders, ListUserOrdersHandler, OrderLine, SubmitOrder,
    SubmitOrderHandler,
};

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod infra;
