//! Catalog repository: products and customers.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use super::{now_timestamp, Database, DatabaseError};

/// A product that line items can reference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub icon: String,
    pub image: String,
    pub sort_order: i64,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl Product {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            code: row.get("code")?,
            icon: row.get("icon")?,
            image: row.get("image")?,
            sort_order: row.get("sort_order")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
        })
    }
}

/// Writable product columns.
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    pub name: String,
    pub code: String,
    pub icon: String,
    pub image: String,
    pub sort_order: i64,
}

/// A customer, keyed by phone number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub remark: String,
    pub created_at: String,
    pub updated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

impl Customer {
    fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            phone: row.get("phone")?,
            address: row.get("address")?,
            remark: row.get("remark")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
            deleted_at: row.get("deleted_at")?,
        })
    }
}

/// Writable customer columns.
#[derive(Debug, Clone, Default)]
pub struct CustomerFields {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub remark: String,
}

/// Inserts a product and returns the stored row.
pub fn insert_product(db: &Database, fields: &ProductFields) -> Result<Product, DatabaseError> {
    db.with_conn(|conn| {
        let now = now_timestamp();
        conn.execute(
            "INSERT INTO products (name, code, icon, image, sort_order, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                fields.name,
                fields.code,
                fields.icon,
                fields.image,
                fields.sort_order,
                now
            ],
        )?;
        let id = conn.last_insert_rowid();
        product_in(conn, id)?.ok_or(DatabaseError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    })
}

/// Overwrites a live product. Returns `None` if it does not exist.
pub fn update_product(
    db: &Database,
    id: i64,
    fields: &ProductFields,
) -> Result<Option<Product>, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE products SET name = ?2, code = ?3, icon = ?4, image = ?5, sort_order = ?6,
             updated_at = ?7 WHERE id = ?1 AND deleted_at IS NULL",
            params![
                id,
                fields.name,
                fields.code,
                fields.icon,
                fields.image,
                fields.sort_order,
                now_timestamp()
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        product_in(conn, id)
    })
}

/// Finds a live product by id.
pub fn find_product(db: &Database, id: i64) -> Result<Option<Product>, DatabaseError> {
    db.with_conn(|conn| product_in(conn, id))
}

pub(crate) fn product_in(conn: &Connection, id: i64) -> Result<Option<Product>, DatabaseError> {
    Ok(conn
        .query_row(
            "SELECT * FROM products WHERE id = ?1 AND deleted_at IS NULL",
            params![id],
            Product::from_row,
        )
        .optional()?)
}

/// Lists live products ordered by `sort_order`, optionally matching `q`
/// against name or code.
pub fn list_products(db: &Database, q: Option<&str>) -> Result<Vec<Product>, DatabaseError> {
    db.with_conn(|conn| {
        let pattern = q.map(|q| format!("%{}%", q));
        let mut stmt = conn.prepare(
            "SELECT * FROM products WHERE deleted_at IS NULL
             AND (?1 IS NULL OR name LIKE ?1 OR code LIKE ?1)
             ORDER BY sort_order ASC, id ASC",
        )?;
        let rows = stmt
            .query_map(params![pattern], Product::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    })
}

/// True if a live order has a line item referencing the product.
pub fn product_in_use(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM order_items
             JOIN orders ON orders.id = order_items.order_id
             WHERE order_items.product_id = ?1 AND orders.deleted_at IS NULL",
            params![id],
            |r| r.get(0),
        )?;
        Ok(count > 0)
    })
}

/// Tombstones a product. Returns false if it was not live.
pub fn soft_delete_product(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE products SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
            params![id, now_timestamp()],
        )?;
        Ok(changed > 0)
    })
}

/// Inserts a customer and returns the stored row.
pub fn insert_customer(db: &Database, fields: &CustomerFields) -> Result<Customer, DatabaseError> {
    db.with_conn(|conn| {
        let id = insert_customer_in(conn, fields)?;
        customer_in(conn, id)?.ok_or(DatabaseError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    })
}

fn insert_customer_in(conn: &Connection, fields: &CustomerFields) -> Result<i64, DatabaseError> {
    let now = now_timestamp();
    conn.execute(
        "INSERT INTO customers (name, phone, address, remark, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![fields.name, fields.phone, fields.address, fields.remark, now],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Creates a customer for `phone` unless a live one already exists.
/// Returns true when a row was inserted.
pub(crate) fn ensure_customer_in(
    conn: &Connection,
    name: &str,
    phone: &str,
) -> Result<bool, DatabaseError> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM customers WHERE phone = ?1 AND deleted_at IS NULL",
            params![phone],
            |r| r.get(0),
        )
        .optional()?;
    if existing.is_some() {
        return Ok(false);
    }
    insert_customer_in(
        conn,
        &CustomerFields {
            name: name.to_string(),
            phone: phone.to_string(),
            ..Default::default()
        },
    )?;
    Ok(true)
}

/// Overwrites a live customer. Returns `None` if it does not exist.
pub fn update_customer(
    db: &Database,
    id: i64,
    fields: &CustomerFields,
) -> Result<Option<Customer>, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE customers SET name = ?2, phone = ?3, address = ?4, remark = ?5, updated_at = ?6
             WHERE id = ?1 AND deleted_at IS NULL",
            params![
                id,
                fields.name,
                fields.phone,
                fields.address,
                fields.remark,
                now_timestamp()
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }
        customer_in(conn, id)
    })
}

/// Finds a live customer by id.
pub fn find_customer(db: &Database, id: i64) -> Result<Option<Customer>, DatabaseError> {
    db.with_conn(|conn| customer_in(conn, id))
}

fn customer_in(conn: &Connection, id: i64) -> Result<Option<Customer>, DatabaseError> {
    Ok(conn
        .query_row(
            "SELECT * FROM customers WHERE id = ?1 AND deleted_at IS NULL",
            params![id],
            Customer::from_row,
        )
        .optional()?)
}

/// Pages through live customers, newest first. Returns (rows, total_count).
pub fn list_customers(
    db: &Database,
    q: Option<&str>,
    limit: u64,
    offset: u64,
) -> Result<(Vec<Customer>, u64), DatabaseError> {
    db.with_conn(|conn| {
        let pattern = q.map(|q| format!("%{}%", q));
        let total: u64 = conn.query_row(
            "SELECT COUNT(*) FROM customers WHERE deleted_at IS NULL
             AND (?1 IS NULL OR name LIKE ?1 OR phone LIKE ?1)",
            params![pattern],
            |r| r.get(0),
        )?;
        let mut stmt = conn.prepare(
            "SELECT * FROM customers WHERE deleted_at IS NULL
             AND (?1 IS NULL OR name LIKE ?1 OR phone LIKE ?1)
             ORDER BY id DESC LIMIT ?2 OFFSET ?3",
        )?;
        let rows = stmt
            .query_map(
                params![pattern, limit as i64, offset as i64],
                Customer::from_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok((rows, total))
    })
}

/// Tombstones a customer. Returns false if it was not live.
pub fn soft_delete_customer(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    db.with_conn(|conn| {
        let changed = conn.execute(
            "UPDATE customers SET deleted_at = ?2 WHERE id = ?1 AND deleted_at IS NULL",
            params![id, now_timestamp()],
        )?;
        Ok(changed > 0)
    })
}
