//! Command handlers
//!
//! Each handler owns a [`Datastore`] and binds repositories per request.
//! Multi-entity writes run inside one unit-of-work scope; a failure anywhere
//! in the scope rolls the whole scope back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use datakit_cqrs::{Command, CommandHandler};
use datakit_db::{repository, Assignments, BulkInsert, Clause, Datastore, Repository};
use sea_orm::ActiveValue::Set;
use tracing::debug;

use crate::contract::{Order, OrderError, OrderItem, OrderReceipt};
use crate::infra::storage::entity::{order, order_item, user};

/// Create an order without lines.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub order_date: DateTime<Utc>,
    pub user_id: Option<i32>,
}

impl Command for CreateOrder {
    type Result = Order;
}

pub struct CreateOrderHandler {
    store: Datastore,
}

impl CreateOrderHandler {
    pub fn new(store: Datastore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler<CreateOrder> for CreateOrderHandler {
    type Error = OrderError;

    async fn handle(&self, command: CreateOrder) -> Result<Order, OrderError> {
        if let Some(user_id) = command.user_id {
            let users = self.store.repository::<user::Entity>();
            if !users.exists(&[Clause::eq(user::Column::Id, user_id)]).await? {
                return Err(OrderError::NotFound {
                    resource: "user".to_owned(),
                    id: user_id.to_string(),
                });
            }
        }

        let orders = self.store.repository::<order::Entity>();
        let stored = orders
            .add(
                Assignments::new()
                    .set(order::Column::OrderDate, command.order_date)
                    .set(order::Column::UserId, command.user_id),
            )
            .await?;
        stored.map(Order::from).ok_or_else(|| OrderError::Storage {
            message: "backend returned no inserted row".to_owned(),
        })
    }
}

/// One line of a submitted order.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub product_id: i32,
    pub quantity: i16,
}

/// Create an order together with its lines, atomically.
#[derive(Debug, Clone)]
pub struct SubmitOrder {
    pub order_date: DateTime<Utc>,
    pub user_id: Option<i32>,
    pub lines: Vec<OrderLine>,
}

impl Command for SubmitOrder {
    type Result = OrderReceipt;
}

pub struct SubmitOrderHandler {
    store: Datastore,
}

impl SubmitOrderHandler {
    pub fn new(store: Datastore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler<SubmitOrder> for SubmitOrderHandler {
    type Error = OrderError;

    async fn handle(&self, command: SubmitOrder) -> Result<OrderReceipt, OrderError> {
        if command.lines.is_empty() {
            return Err(OrderError::Validation {
                message: "an order needs at least one line".to_owned(),
            });
        }

        let uow = self.store.unit_of_work();
        uow.pipeline(move |txn| {
            Box::pin(async move {
                let orders = repository::<order::Entity, _>(txn);
                let stored = orders
                    .add(
                        Assignments::new()
                            .set(order::Column::OrderDate, command.order_date)
                            .set(order::Column::UserId, command.user_id),
                    )
                    .await?;
                let order = stored.map(Order::from).ok_or_else(|| OrderError::Storage {
                    message: "backend returned no inserted row".to_owned(),
                })?;

                let entries: Vec<order_item::ActiveModel> = command
                    .lines
                    .iter()
                    .map(|line| order_item::ActiveModel {
                        order_id: Set(order.id),
                        product_id: Set(Some(line.product_id)),
                        quantity: Set(line.quantity),
                        ..Default::default()
                    })
                    .collect();
                let applied = BulkInsert::new(entries)
                    .return_defaults(true)
                    .execute(txn)
                    .await?;
                debug!(order_id = order.id, lines = applied.rows_affected, "order submitted");

                let items = applied.returned.into_iter().map(OrderItem::from).collect();
                Ok(OrderReceipt { order, items })
            })
        })
        .await
    }
}

/// Delete an order and its lines in one scope.
#[derive(Debug, Clone)]
pub struct DeleteOrder {
    pub order_id: i32,
}

impl Command for DeleteOrder {
    type Result = Order;
}

pub struct DeleteOrderHandler {
    store: Datastore,
}

impl DeleteOrderHandler {
    pub fn new(store: Datastore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CommandHandler<DeleteOrder> for DeleteOrderHandler {
    type Error = OrderError;

    async fn handle(&self, command: DeleteOrder) -> Result<Order, OrderError> {
        let order_id = command.order_id;
        let uow = self.store.unit_of_work();
        uow.pipeline(move |txn| {
            Box::pin(async move {
                let orders = repository::<order::Entity, _>(txn);
                let removed = orders
                    .delete(&[Clause::eq(order::Column::Id, order_id)])
                    .await?;
                let Some(order_model) = removed.into_iter().next() else {
                    return Err(OrderError::NotFound {
                        resource: "order".to_owned(),
                        id: order_id.to_string(),
                    });
                };

                orders
                    .with_changed_query_model::<order_item::Entity>()
                    .delete(&[Clause::eq(order_item::Column::OrderId, order_id)])
                    .await?;
                debug!(order_id, "order removed");

                Ok(Order::from(order_model))
            })
        })
        .await
    }
}
