//! Order repository.
//!
//! Checkout runs in a single transaction: each requested artwork is locked
//! (`FOR UPDATE`), its availability verified, its price frozen into the
//! order item, and the piece flipped to `sold`. Two concurrent checkouts of
//! the same original cannot both succeed.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use atelier_core::{ArtworkId, OrderId, OrderItemId, OrderStatus};

use super::{PageParams, RepositoryError};
use crate::models::order::{Order, OrderItem};

/// Internal row type for `"order"` queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    customer_name: String,
    customer_email: String,
    shipping_address: String,
    status: OrderStatus,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: OrderId::new(row.id),
            customer_name: row.customer_name,
            customer_email: row.customer_email,
            shipping_address: row.shipping_address,
            status: row.status,
            total_amount: row.total_amount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Internal row type for `order_item` queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    artwork_id: i32,
    price: Decimal,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            order_id: OrderId::new(row.order_id),
            artwork_id: ArtworkId::new(row.artwork_id),
            price: row.price,
            quantity: row.quantity,
        }
    }
}

/// Guest customer details captured at checkout.
#[derive(Debug, Clone)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub shipping_address: String,
}

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy)]
pub struct CheckoutLine {
    pub artwork_id: ArtworkId,
    pub quantity: i32,
}

const ORDER_COLUMNS: &str = "id, customer_name, customer_email, shipping_address, status, \
                             total_amount, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, artwork_id, price, quantity";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order from a guest checkout.
    ///
    /// Locks each artwork row, verifies it is still available, freezes its
    /// current price into the item, computes `total_amount` as the sum of
    /// `price * quantity`, and marks the artworks sold. Everything commits
    /// or nothing does.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a referenced artwork doesn't
    /// exist.
    /// Returns `RepositoryError::Conflict` if a piece is no longer available,
    /// including when the same artwork appears on two lines of one request.
    pub async fn create_checkout(
        &self,
        customer: &CustomerInfo,
        lines: &[CheckoutLine],
    ) -> Result<(Order, Vec<OrderItem>), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock, price, and immediately take each requested artwork off the
        // market. Marking within the loop means a second line for the same
        // piece reads the in-transaction `sold` state and conflicts.
        let mut priced: Vec<(CheckoutLine, Decimal)> = Vec::with_capacity(lines.len());
        let mut total = Decimal::ZERO;

        for line in lines {
            let row: Option<(Decimal, bool)> = sqlx::query_as(
                "SELECT price, availability = 'available'::artwork_availability \
                 FROM artwork WHERE id = $1 FOR UPDATE",
            )
            .bind(line.artwork_id.as_i32())
            .fetch_optional(&mut *tx)
            .await?;

            let (price, available) = row.ok_or(RepositoryError::NotFound)?;
            if !available {
                return Err(RepositoryError::Conflict(format!(
                    "artwork {} is no longer available",
                    line.artwork_id
                )));
            }

            sqlx::query(
                "UPDATE artwork SET availability = 'sold'::artwork_availability, \
                 updated_at = now() WHERE id = $1",
            )
            .bind(line.artwork_id.as_i32())
            .execute(&mut *tx)
            .await?;

            total += price * Decimal::from(line.quantity);
            priced.push((*line, price));
        }

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO \"order\" (customer_name, customer_email, shipping_address, total_amount) \
             VALUES ($1, $2, $3, $4) RETURNING {ORDER_COLUMNS}"
        ))
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.shipping_address)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(priced.len());
        for (line, price) in &priced {
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                "INSERT INTO order_item (order_id, artwork_id, price, quantity) \
                 VALUES ($1, $2, $3, $4) RETURNING {ITEM_COLUMNS}"
            ))
            .bind(order_row.id)
            .bind(line.artwork_id.as_i32())
            .bind(price)
            .bind(line.quantity)
            .fetch_one(&mut *tx)
            .await?;

            items.push(item_row.into());
        }

        tx.commit().await?;

        Ok((order_row.into(), items))
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(
        &self,
        id: OrderId,
    ) -> Result<Option<(Order, Vec<OrderItem>)>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_item WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(Some((
            row.into(),
            items.into_iter().map(Into::into).collect(),
        )))
    }

    /// List orders, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(
        &self,
        status: Option<OrderStatus>,
        page: PageParams,
    ) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM \"order\" \
             WHERE ($1::order_status IS NULL OR status = $1) \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        ))
        .bind(status)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE \"order\" SET status = $1, updated_at = now() \
             WHERE id = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(status)
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
