use chrono::{DateTime, Utc};
use gsb_common::Rupees;
use log::debug;
use sqlx::{FromRow, SqliteConnection};

use crate::{
    db_types::{
        Order,
        OrderLine,
        OrderStatus,
        PaymentMethod,
        PaymentResult,
        PaymentSettlement,
        ShippingAddress,
    },
    order_objects::{OrderWithOwner, OwnerIdentity},
    traits::OrderApiError,
};

/// The raw `orders` table shape. Status, payment method and the nullable settlement columns are
/// folded into their domain types by [`OrderRow::into_order`].
#[derive(Debug, Clone, FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub total: Rupees,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub phone: String,
    pub payment_method: String,
    pub status: String,
    pub is_paid: bool,
    pub paid_at: Option<DateTime<Utc>>,
    pub payment_id: Option<String>,
    pub payment_status: Option<String>,
    pub payment_update_time: Option<DateTime<Utc>>,
    pub payer_email: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderRow {
    pub fn into_order(self, lines: Vec<OrderLine>) -> Result<Order, OrderApiError> {
        let status: OrderStatus =
            self.status.parse().map_err(|e| OrderApiError::DatabaseError(format!("Corrupt order record: {e}")))?;
        let payment_method: PaymentMethod = self
            .payment_method
            .parse()
            .map_err(|e| OrderApiError::DatabaseError(format!("Corrupt order record: {e}")))?;
        let payment_result = match (self.payment_id, self.payment_update_time) {
            (Some(id), Some(update_time)) => Some(PaymentResult {
                id,
                status: self.payment_status.unwrap_or_else(|| "completed".to_string()),
                update_time,
                email_address: self.payer_email.unwrap_or_default(),
            }),
            _ => None,
        };
        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            lines,
            total: self.total,
            shipping_address: ShippingAddress {
                address: self.address,
                city: self.city,
                postal_code: self.postal_code,
                phone: self.phone,
            },
            payment_method,
            status,
            is_paid: self.is_paid,
            paid_at: self.paid_at,
            payment_result,
            shipped_at: self.shipped_at,
            delivered_at: self.delivered_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
struct OrderOwnerRow {
    #[sqlx(flatten)]
    order: OrderRow,
    owner_id: i64,
    owner_name: String,
    owner_email: String,
}

/// Inserts the order header row. Lines are inserted separately with [`insert_order_line`]; callers
/// are expected to run both inside one transaction.
pub async fn insert_order(
    user_id: i64,
    total: Rupees,
    shipping: &ShippingAddress,
    payment_method: PaymentMethod,
    conn: &mut SqliteConnection,
) -> Result<OrderRow, OrderApiError> {
    let row = sqlx::query_as::<_, OrderRow>(
        r#"
            INSERT INTO orders (user_id, total, address, city, postal_code, phone, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *;
        "#,
    )
    .bind(user_id)
    .bind(total)
    .bind(&shipping.address)
    .bind(&shipping.city)
    .bind(&shipping.postal_code)
    .bind(&shipping.phone)
    .bind(payment_method.to_string())
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order inserted with id {}", row.id);
    Ok(row)
}

pub async fn insert_order_line(
    order_id: i64,
    product_id: i64,
    title: &str,
    quantity: i64,
    unit_price: Rupees,
    conn: &mut SqliteConnection,
) -> Result<OrderLine, OrderApiError> {
    let line = sqlx::query_as::<_, OrderLine>(
        r#"
            INSERT INTO order_lines (order_id, product_id, title, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *;
        "#,
    )
    .bind(order_id)
    .bind(product_id)
    .bind(title)
    .bind(quantity)
    .bind(unit_price)
    .fetch_one(conn)
    .await?;
    Ok(line)
}

pub async fn fetch_order_row(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<OrderRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(order_id).fetch_optional(conn).await
}

pub async fn fetch_lines_for_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderLine>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM order_lines WHERE order_id = $1 ORDER BY id ASC")
        .bind(order_id)
        .fetch_all(conn)
        .await
}

pub async fn fetch_order(order_id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, OrderApiError> {
    let row = match fetch_order_row(order_id, conn).await? {
        Some(row) => row,
        None => return Ok(None),
    };
    let lines = fetch_lines_for_order(order_id, conn).await?;
    Ok(Some(row.into_order(lines)?))
}

pub async fn fetch_orders_for_user(user_id: i64, conn: &mut SqliteConnection) -> Result<Vec<Order>, OrderApiError> {
    let rows: Vec<OrderRow> = sqlx::query_as("SELECT * FROM orders WHERE user_id = $1 ORDER BY created_at ASC")
        .bind(user_id)
        .fetch_all(&mut *conn)
        .await?;
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let lines = fetch_lines_for_order(row.id, conn).await?;
        orders.push(row.into_order(lines)?);
    }
    Ok(orders)
}

pub async fn fetch_all_orders_with_owner(conn: &mut SqliteConnection) -> Result<Vec<OrderWithOwner>, OrderApiError> {
    let rows: Vec<OrderOwnerRow> = sqlx::query_as(
        r#"
        SELECT orders.*, users.id AS owner_id, users.name AS owner_name, users.email AS owner_email
        FROM orders JOIN users ON orders.user_id = users.id
        ORDER BY orders.created_at ASC
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;
    collect_orders_with_owner(rows, conn).await
}

/// The `limit` most recently created orders, newest first, with owner identity.
pub async fn fetch_recent_orders(limit: i64, conn: &mut SqliteConnection) -> Result<Vec<OrderWithOwner>, OrderApiError> {
    let rows: Vec<OrderOwnerRow> = sqlx::query_as(
        r#"
        SELECT orders.*, users.id AS owner_id, users.name AS owner_name, users.email AS owner_email
        FROM orders JOIN users ON orders.user_id = users.id
        ORDER BY orders.created_at DESC, orders.id DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(&mut *conn)
    .await?;
    collect_orders_with_owner(rows, conn).await
}

async fn collect_orders_with_owner(
    rows: Vec<OrderOwnerRow>,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderWithOwner>, OrderApiError> {
    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let lines = fetch_lines_for_order(row.order.id, conn).await?;
        let owner = OwnerIdentity { id: row.owner_id, name: row.owner_name, email: Some(row.owner_email) };
        orders.push(OrderWithOwner { order: row.order.into_order(lines)?, owner });
    }
    Ok(orders)
}

/// Sets the order status, stamping `delivered_at` or `shipped_at` where the new status calls for
/// it. No transition validation happens here.
pub async fn update_order_status(
    order_id: i64,
    status: OrderStatus,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderApiError> {
    let now = Utc::now();
    let row: Option<OrderRow> = match status {
        OrderStatus::Delivered => {
            sqlx::query_as(
                "UPDATE orders SET status = $1, delivered_at = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3 \
                 RETURNING *",
            )
            .bind(status.to_string())
            .bind(now)
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await?
        },
        OrderStatus::Shipped => {
            sqlx::query_as(
                "UPDATE orders SET status = $1, shipped_at = $2, updated_at = CURRENT_TIMESTAMP WHERE id = $3 \
                 RETURNING *",
            )
            .bind(status.to_string())
            .bind(now)
            .bind(order_id)
            .fetch_optional(&mut *conn)
            .await?
        },
        _ => {
            sqlx::query_as("UPDATE orders SET status = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2 RETURNING *")
                .bind(status.to_string())
                .bind(order_id)
                .fetch_optional(&mut *conn)
                .await?
        },
    };
    let row = row.ok_or(OrderApiError::OrderNotFound(order_id))?;
    let lines = fetch_lines_for_order(order_id, conn).await?;
    row.into_order(lines)
}

/// Records a verified gateway payment. If the order is already paid, nothing is written and the
/// stored order is returned as-is.
pub async fn settle_order(
    order_id: i64,
    settlement: PaymentSettlement,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderApiError> {
    let existing = fetch_order_row(order_id, conn).await?.ok_or(OrderApiError::OrderNotFound(order_id))?;
    if existing.is_paid {
        debug!("🗃️ Order {order_id} is already paid. Settlement request is a no-op.");
        let lines = fetch_lines_for_order(order_id, conn).await?;
        return existing.into_order(lines);
    }
    let now = Utc::now();
    let row: Option<OrderRow> = sqlx::query_as(
        r#"
        UPDATE orders SET
            is_paid = 1,
            paid_at = $1,
            payment_method = $2,
            payment_id = $3,
            payment_status = 'completed',
            payment_update_time = $1,
            payer_email = $4,
            status = $5,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = $6
        RETURNING *;
        "#,
    )
    .bind(now)
    .bind(PaymentMethod::Razorpay.to_string())
    .bind(&settlement.payment_id)
    .bind(&settlement.payer_email)
    .bind(OrderStatus::Approved.to_string())
    .bind(order_id)
    .fetch_optional(&mut *conn)
    .await?;
    let row = row.ok_or(OrderApiError::OrderNotFound(order_id))?;
    let lines = fetch_lines_for_order(order_id, conn).await?;
    row.into_order(lines)
}

pub async fn count_orders(conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders").fetch_one(conn).await?;
    Ok(count)
}

/// Revenue is the sum of totals over paid orders that have progressed past `pending` and were not
/// cancelled.
pub async fn total_revenue(conn: &mut SqliteConnection) -> Result<Rupees, sqlx::Error> {
    let (paise,): (i64,) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total), 0) FROM orders
        WHERE is_paid = 1 AND status IN ('approved', 'processing', 'shipped', 'on the way', 'delivered')
        "#,
    )
    .fetch_one(conn)
    .await?;
    Ok(Rupees::from_paise(paise))
}
