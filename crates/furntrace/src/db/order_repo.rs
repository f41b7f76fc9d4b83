//! Order repository: orders and their line items.
//!
//! Line items are owned by their order: they are only ever written together
//! with it, inside one transaction, and replaced wholesale on edit.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::catalog_repo::ensure_customer_in;
use super::{now_timestamp, Database, DatabaseError};
use crate::pipeline::OrderStatus;

/// A production order with its line items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub qr_code: String,
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub remark: String,
    pub specs: String,
    pub amount: f64,
    pub deadline: Option<String>,
    pub status: OrderStatus,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    pub items: Vec<LineItem>,
}

impl Order {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            order_no: row.get("order_no")?,
            qr_code: row.get("qr_code")?,
            customer_name: row.get("customer_name")?,
            phone: row.get("phone")?,
            address: row.get("address")?,
            remark: row.get("remark")?,
            specs: row.get("specs")?,
            amount: row.get("amount")?,
            deadline: row.get("deadline")?,
            status: row.get("status")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
            items: Vec::new(),
        })
    }
}

/// One product configuration within an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    /// Name of the referenced product, if it is still live.
    pub product_name: Option<String>,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub quantity: i64,
    pub unit: String,
    pub unit_price: f64,
    pub total_price: f64,
    pub extra_attrs: serde_json::Value,
}

/// Line item to be written. `total_price` is derived, never supplied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLineItem {
    pub product_id: i64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub quantity: i64,
    pub unit: String,
    pub unit_price: f64,
    pub extra_attrs: serde_json::Map<String, serde_json::Value>,
}

impl NewLineItem {
    pub fn total_price(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Sum of the line totals; the value `amount` must hold when items exist.
pub fn items_total(items: &[NewLineItem]) -> f64 {
    items.iter().map(NewLineItem::total_price).sum()
}

/// Descriptive order columns editable by administrators. Status is not
/// part of this set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDetails {
    pub customer_name: String,
    pub phone: String,
    pub address: String,
    pub remark: String,
    pub specs: String,
    pub deadline: Option<String>,
}

/// A new order ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_no: String,
    pub details: OrderDetails,
    /// Used only when `items` is empty; otherwise the items' sum is stored.
    pub amount: f64,
    pub items: Vec<NewLineItem>,
    pub created_at: String,
}

/// Query filter parameters for order listing.
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    /// Substring matched against order number, customer name and phone.
    pub q: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Scan token printed on an order's QR code.
pub fn scan_token(id: i64) -> String {
    format!("ORDER-{}", id)
}

/// Inserts an order with its line items in one transaction.
///
/// The order starts in the initial pipeline status, its scan token is derived
/// from the assigned id, and a customer record is created for the phone
/// number if none exists.
pub fn insert(db: &Database, order: &NewOrder) -> Result<Order, DatabaseError> {
    db.with_transaction(|conn| {
        let d = &order.details;
        if !d.phone.is_empty() {
            ensure_customer_in(conn, &d.customer_name, &d.phone)?;
        }

        let amount = if order.items.is_empty() {
            order.amount
        } else {
            items_total(&order.items)
        };

        conn.execute(
            "INSERT INTO orders (order_no, customer_name, phone, address, remark, specs, amount,
             deadline, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
            params![
                order.order_no,
                d.customer_name,
                d.phone,
                d.address,
                d.remark,
                d.specs,
                amount,
                d.deadline,
                OrderStatus::INITIAL,
                order.created_at,
            ],
        )?;
        let id = conn.last_insert_rowid();
        conn.execute(
            "UPDATE orders SET qr_code = ?2 WHERE id = ?1",
            params![id, scan_token(id)],
        )?;

        insert_items_in(conn, id, &order.items)?;

        find_in(conn, id)?.ok_or(DatabaseError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    })
}

fn insert_items_in(
    conn: &Connection,
    order_id: i64,
    items: &[NewLineItem],
) -> Result<(), DatabaseError> {
    let mut stmt = conn.prepare(
        "INSERT INTO order_items (order_id, product_id, length, width, height, quantity, unit,
         unit_price, total_price, extra_attrs)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )?;
    for item in items {
        let extra = serde_json::to_string(&item.extra_attrs)?;
        stmt.execute(params![
            order_id,
            item.product_id,
            item.length,
            item.width,
            item.height,
            item.quantity,
            item.unit,
            item.unit_price,
            item.total_price(),
            extra,
        ])?;
    }
    Ok(())
}

/// Finds a live order by id, with its line items.
pub fn find_by_id(db: &Database, id: i64) -> Result<Option<Order>, DatabaseError> {
    db.with_conn(|conn| find_in(conn, id))
}

pub(crate) fn find_in(conn: &Connection, id: i64) -> Result<Option<Order>, DatabaseError> {
    let order = conn
        .query_row(
            "SELECT * FROM orders WHERE id = ?1 AND deleted_at IS NULL",
            params![id],
            Order::from_row,
        )
        .optional()?;
    match order {
        Some(mut order) => {
            order.items = items_in(conn, order.id)?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

fn items_in(conn: &Connection, order_id: i64) -> Result<Vec<LineItem>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT order_items.*, products.name AS product_name
         FROM order_items
         LEFT JOIN products ON products.id = order_items.product_id
              AND products.deleted_at IS NULL
         WHERE order_items.order_id = ?1
         ORDER BY order_items.id",
    )?;
    let rows = stmt
        .query_map(params![order_id], |row| {
            Ok((
                LineItem {
                    id: row.get("id")?,
                    order_id: row.get("order_id")?,
                    product_id: row.get("product_id")?,
                    product_name: row.get("product_name")?,
                    length: row.get("length")?,
                    width: row.get("width")?,
                    height: row.get("height")?,
                    quantity: row.get("quantity")?,
                    unit: row.get("unit")?,
                    unit_price: row.get("unit_price")?,
                    total_price: row.get("total_price")?,
                    extra_attrs: serde_json::Value::Null,
                },
                row.get::<_, String>("extra_attrs")?,
            ))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    rows.into_iter()
        .map(|(mut item, extra)| {
            item.extra_attrs = serde_json::from_str(&extra)?;
            Ok(item)
        })
        .collect()
}

/// Applies an administrative edit.
///
/// With `Some(items)` the order's line items are replaced wholesale and
/// `amount` is recomputed as their sum. With `None` the items are left
/// alone; `amount` is then taken from `fallback_amount` only if the order
/// has no items. Returns `None` if the order is not live.
pub fn update_details(
    db: &Database,
    id: i64,
    details: &OrderDetails,
    items: Option<&[NewLineItem]>,
    fallback_amount: Option<f64>,
) -> Result<Option<Order>, DatabaseError> {
    db.with_transaction(|conn| {
        let existing = match find_in(conn, id)? {
            Some(order) => order,
            None => return Ok(None),
        };

        let amount = match items {
            Some(items) => {
                conn.execute("DELETE FROM order_items WHERE order_id = ?1", params![id])?;
                insert_items_in(conn, id, items)?;
                items_total(items)
            }
            None if existing.items.is_empty() => fallback_amount.unwrap_or(existing.amount),
            None => existing.amount,
        };

        conn.execute(
            "UPDATE orders SET customer_name = ?2, phone = ?3, address = ?4, remark = ?5,
             specs = ?6, deadline = ?7, amount = ?8, updated_at = ?9
             WHERE id = ?1",
            params![
                id,
                details.customer_name,
                details.phone,
                details.address,
                details.remark,
                details.specs,
                details.deadline,
                amount,
                now_timestamp(),
            ],
        )?;

        find_in(conn, id)
    })
}

/// Sets the status unconditionally. This is the administrative override;
/// it bypasses the transition table and writes no audit rows.
pub fn override_status(
    db: &Database,
    id: i64,
    status: OrderStatus,
) -> Result<Option<Order>, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE orders SET status = ?2, updated_at = ?3 WHERE id = ?1 AND deleted_at IS NULL",
            params![id, status, now_timestamp()],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        find_in(conn, id)
    })
}

/// Moves a live order from `expected` to `next`. Returns false, leaving the
/// row untouched, if the stored status is no longer `expected`.
pub(crate) fn conditional_update_status_in(
    conn: &Connection,
    id: i64,
    expected: OrderStatus,
    next: OrderStatus,
    updated_at: &str,
) -> Result<bool, DatabaseError> {
    let changed = conn.execute(
        "UPDATE orders SET status = ?3, updated_at = ?4
         WHERE id = ?1 AND status = ?2 AND deleted_at IS NULL",
        params![id, expected, next, updated_at],
    )?;
    Ok(changed == 1)
}

/// Tombstones an order. Returns false if it was not live.
pub fn soft_delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE orders SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
            params![id, now_timestamp()],
        )?;
        Ok(changed > 0)
    })
}

/// Queries live orders with filters, newest first, returning
/// (rows, total_count).
pub fn query(db: &Database, filter: &OrderFilter) -> Result<(Vec<Order>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let mut conditions = vec!["deleted_at IS NULL".to_string()];
        let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push(format!("status = ?{}", param_values.len() + 1));
            param_values.push(Box::new(status));
        }
        if let Some(ref q) = filter.q {
            let n = param_values.len() + 1;
            conditions.push(format!(
                "(order_no LIKE ?{n} OR customer_name LIKE ?{n} OR phone LIKE ?{n})"
            ));
            param_values.push(Box::new(format!("%{}%", q)));
        }

        let where_clause = format!("WHERE {}", conditions.join(" AND "));

        // Count total matching rows.
        let count_sql = format!("SELECT COUNT(*) FROM orders {}", where_clause);
        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let total: u64 = conn.query_row(&count_sql, params_ref.as_slice(), |r| r.get(0))?;

        // Fetch paginated results.
        let limit = filter.limit.unwrap_or(100) as i64;
        let offset = filter.offset.unwrap_or(0) as i64;
        param_values.push(Box::new(limit));
        param_values.push(Box::new(offset));
        let query_sql = format!(
            "SELECT * FROM orders {} ORDER BY created_at DESC, id DESC LIMIT ?{} OFFSET ?{}",
            where_clause,
            param_values.len() - 1,
            param_values.len()
        );

        let params_ref: Vec<&dyn rusqlite::types::ToSql> =
            param_values.iter().map(|p| p.as_ref()).collect();
        let mut stmt = conn.prepare(&query_sql)?;
        let mut rows: Vec<Order> = stmt
            .query_map(params_ref.as_slice(), Order::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        for order in &mut rows {
            order.items = items_in(conn, order.id)?;
        }

        Ok((rows, total))
    })
}
