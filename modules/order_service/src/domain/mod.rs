//! Domain layer - command and query handlers

pub mod commands;
pub mod queries;

pub use commands::{
    CreateOrder, CreateOrderHandler, DeleteOrder, DeleteOrderHandler, OrderLine, SubmitOrder,
    SubmitOrderHandler,
};
pub use queries::{GetOrderById, GetOrderByIdHandler, ListUserOrders, ListUserOrdersHandler};
