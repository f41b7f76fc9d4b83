//! Order administration: create, list, edit, status override, delete.
//!
//! Scans never go through here; they use [`crate::scan`].

pub mod order_no;
pub mod request;

use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::db::catalog_repo;
use crate::db::order_repo::{self, NewLineItem, NewOrder, Order, OrderFilter};
use crate::db::stats_repo::{self, OrderSummary};
use crate::db::{timestamp, Database};
use crate::error::{FurntraceError, Result, ValidationError};

pub use request::{
    CreateOrderRequest, LineItemRequest, ListOrdersQuery, StatusOverrideRequest,
    UpdateOrderRequest,
};

/// Attempts at drawing an unused order number before giving up.
const ORDER_NO_ATTEMPTS: u32 = 3;

/// One page of orders plus headline numbers that ignore the filters.
#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
    pub data: Vec<Order>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub stats: OrderSummary,
}

fn ensure_products_live(db: &Database, items: &[NewLineItem]) -> Result<()> {
    for (i, item) in items.iter().enumerate() {
        if catalog_repo::find_product(db, item.product_id)?.is_none() {
            return Err(ValidationError::new(
                format!("items[{}].product_id", i),
                format!("product {} does not exist", item.product_id),
            )
            .into());
        }
    }
    Ok(())
}

/// Creates an order in the initial pipeline status.
pub fn create_order(db: &Database, request: &CreateOrderRequest) -> Result<Order> {
    create_order_at(db, request, Utc::now())
}

/// [`create_order`] with an explicit creation time.
pub fn create_order_at(
    db: &Database,
    request: &CreateOrderRequest,
    now: DateTime<Utc>,
) -> Result<Order> {
    let valid = request.validate()?;
    ensure_products_live(db, &valid.items)?;

    let mut attempt = 1;
    loop {
        let new_order = NewOrder {
            order_no: order_no::generate(&now.with_timezone(&Local)),
            details: valid.details.clone(),
            amount: 0.0,
            items: valid.items.clone(),
            created_at: timestamp(now),
        };
        match order_repo::insert(db, &new_order) {
            Ok(order) => {
                log::info!("Created order {} (id {})", order.order_no, order.id);
                return Ok(order);
            }
            Err(e) if e.is_unique_violation() && attempt < ORDER_NO_ATTEMPTS => {
                log::warn!("Order number {} already taken, retrying", new_order.order_no);
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}

pub fn list_orders(db: &Database, query: &ListOrdersQuery) -> Result<OrderPage> {
    let paging = query.paging();
    let filter = OrderFilter {
        status: query.status()?,
        q: query.search(),
        limit: Some(paging.limit()),
        offset: Some(paging.offset()),
    };
    let (data, total) = order_repo::query(db, &filter)?;
    let stats = stats_repo::order_summary(db)?;

    Ok(OrderPage {
        data,
        total,
        page: paging.page(),
        page_size: paging.page_size(),
        stats,
    })
}

pub fn get_order(db: &Database, id: i64) -> Result<Order> {
    order_repo::find_by_id(db, id)?.ok_or(FurntraceError::not_found("order", id))
}

/// Edits descriptive fields and, when given, replaces all line items.
/// Status is left alone.
pub fn update_order(db: &Database, id: i64, request: &UpdateOrderRequest) -> Result<Order> {
    let valid = request.validate()?;
    if let Some(items) = &valid.items {
        ensure_products_live(db, items)?;
    }

    order_repo::update_details(db, id, &valid.details, valid.items.as_deref(), valid.amount)?
        .ok_or(FurntraceError::not_found("order", id))
}

/// Administrative status override. Bypasses the pipeline and writes no
/// process record.
pub fn override_status(db: &Database, id: i64, request: &StatusOverrideRequest) -> Result<Order> {
    let status = request.validate()?;
    let order = order_repo::override_status(db, id, status)?
        .ok_or(FurntraceError::not_found("order", id))?;
    log::info!("Order {} status overridden to {}", order.order_no, status);
    Ok(order)
}

pub fn delete_order(db: &Database, id: i64) -> Result<()> {
    if !order_repo::soft_delete(db, id)? {
        return Err(FurntraceError::not_found("order", id));
    }
    log::info!("Deleted order {}", id);
    Ok(())
}
