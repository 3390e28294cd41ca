//! Query handlers
//!
//! Reads hydrate relationships by foreign-key lookup through rebound
//! repositories; no write scope is opened.

use async_trait::async_trait;
use datakit_cqrs::{Query, QueryHandler};
use datakit_db::{Clause, Datastore, Repository};

use crate::contract::{Order, OrderDetails, OrderError, OrderItem, OrdersPage, Product, User};
use crate::infra::storage::entity::{order, order_item, product, user};

/// Fetch one order with its user, lines and products.
#[derive(Debug, Clone)]
pub struct GetOrderById {
    pub order_id: i32,
}

impl Query for GetOrderById {
    type Result = OrderDetails;
}

pub struct GetOrderByIdHandler {
    store: Datastore,
}

impl GetOrderByIdHandler {
    pub fn new(store: Datastore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QueryHandler<GetOrderById> for GetOrderByIdHandler {
    type Error = OrderError;

    async fn handle(&self, query: GetOrderById) -> Result<OrderDetails, OrderError> {
        let orders = self.store.repository::<order::Entity>();
        let Some(order_model) = orders
            .get_one(&[Clause::eq(order::Column::Id, query.order_id)])
            .await?
        else {
            return Err(OrderError::NotFound {
                resource: "order".to_owned(),
                id: query.order_id.to_string(),
            });
        };

        let user = match order_model.user_id {
            Some(user_id) => orders
                .with_changed_query_model::<user::Entity>()
                .get_one(&[Clause::eq(user::Column::Id, user_id)])
                .await?
                .map(User::from),
            None => None,
        };

        let item_models = orders
            .with_changed_query_model::<order_item::Entity>()
            .get_all(&[Clause::eq(order_item::Column::OrderId, order_model.id)])
            .await?;

        let product_ids: Vec<i32> = item_models
            .iter()
            .filter_map(|item| item.product_id)
            .collect();
        let products = if product_ids.is_empty() {
            Vec::new()
        } else {
            orders
                .with_changed_query_model::<product::Entity>()
                .get_all(&[Clause::is_in(product::Column::Id, product_ids)])
                .await?
                .into_iter()
                .map(Product::from)
                .collect()
        };

        Ok(OrderDetails {
            order: Order::from(order_model),
            user,
            items: item_models.into_iter().map(OrderItem::from).collect(),
            products,
        })
    }
}

/// List a user's orders with the matching total.
#[derive(Debug, Clone)]
pub struct ListUserOrders {
    pub user_id: i32,
}

impl Query for ListUserOrders {
    type Result = OrdersPage;
}

pub struct ListUserOrdersHandler {
    store: Datastore,
}

impl ListUserOrdersHandler {
    pub fn new(store: Datastore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl QueryHandler<ListUserOrders> for ListUserOrdersHandler {
    type Error = OrderError;

    async fn handle(&self, query: ListUserOrders) -> Result<OrdersPage, OrderError> {
        let orders = self.store.repository::<order::Entity>();
        let clauses = [Clause::eq(order::Column::UserId, query.user_id)];
        let models = orders.get_all(&clauses).await?;
        let total = orders.count(&clauses).await?;
        Ok(OrdersPage {
            orders: models.into_iter().map(Order::from).collect(),
            total,
        })
    }
}
