//! Request bodies for the order endpoints and their field validation.
//!
//! Validation runs before any storage access and reports the first offending
//! field.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::db::order_repo::{NewLineItem, OrderDetails};
use crate::error::ValidationError;
use crate::paging::PageRequest;
use crate::pipeline::OrderStatus;

/// One line item as submitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemRequest {
    pub product_id: i64,
    #[serde(default)]
    pub length: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    pub quantity: i64,
    #[serde(default)]
    pub unit: String,
    pub unit_price: f64,
    #[serde(default)]
    pub extra_attrs: Option<serde_json::Value>,
}

impl LineItemRequest {
    fn validate(&self, index: usize) -> Result<NewLineItem, ValidationError> {
        let field = |name: &str| format!("items[{}].{}", index, name);

        if self.product_id <= 0 {
            return Err(ValidationError::new(field("product_id"), "is required"));
        }
        if self.quantity < 1 {
            return Err(ValidationError::new(field("quantity"), "must be at least 1"));
        }
        if !self.unit_price.is_finite() || self.unit_price < 0.0 {
            return Err(ValidationError::new(
                field("unit_price"),
                "must be a non-negative number",
            ));
        }
        for (name, value) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ValidationError::new(
                    field(name),
                    "must be a non-negative number",
                ));
            }
        }

        let extra_attrs = match &self.extra_attrs {
            None | Some(serde_json::Value::Null) => serde_json::Map::new(),
            Some(serde_json::Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(ValidationError::new(
                    field("extra_attrs"),
                    "must be a JSON object",
                ))
            }
        };

        Ok(NewLineItem {
            product_id: self.product_id,
            length: self.length,
            width: self.width,
            height: self.height,
            quantity: self.quantity,
            unit: self.unit.trim().to_string(),
            unit_price: self.unit_price,
            extra_attrs,
        })
    }
}

fn validate_items(items: &[LineItemRequest]) -> Result<Vec<NewLineItem>, ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::new("items", "at least one product is required"));
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| item.validate(i))
        .collect()
}

/// Parses an optional `YYYY-MM-DD` deadline. Blank means none.
fn parse_deadline(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(|d| Some(crate::db::date_string(d)))
            .map_err(|_| ValidationError::new("deadline", "must be a date in YYYY-MM-DD form")),
    }
}

fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }
    Ok(value.to_string())
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub specs: String,
    #[serde(default)]
    pub deadline: Option<String>,
    pub items: Vec<LineItemRequest>,
}

/// A create request that passed validation.
#[derive(Debug, Clone)]
pub struct ValidCreateOrder {
    pub details: OrderDetails,
    pub items: Vec<NewLineItem>,
}

impl CreateOrderRequest {
    pub fn validate(&self) -> Result<ValidCreateOrder, ValidationError> {
        let customer_name = required("customer_name", &self.customer_name)?;
        let phone = required("phone", &self.phone)?;
        let deadline = parse_deadline(self.deadline.as_deref())?;
        let items = validate_items(&self.items)?;

        if crate::db::order_repo::items_total(&items) <= 0.0 {
            return Err(ValidationError::new("amount", "order amount must be positive"));
        }

        Ok(ValidCreateOrder {
            details: OrderDetails {
                customer_name,
                phone,
                address: self.address.trim().to_string(),
                remark: self.remark.clone(),
                specs: self.specs.clone(),
                deadline,
            },
            items,
        })
    }
}

/// Body of `PUT /orders/{id}`. Omitting `items` leaves them untouched;
/// supplying them replaces the whole set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    pub customer_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub remark: String,
    #[serde(default)]
    pub specs: String,
    #[serde(default)]
    pub deadline: Option<String>,
    /// Only honoured for orders without line items.
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub items: Option<Vec<LineItemRequest>>,
}

#[derive(Debug, Clone)]
pub struct ValidUpdateOrder {
    pub details: OrderDetails,
    pub items: Option<Vec<NewLineItem>>,
    pub amount: Option<f64>,
}

impl UpdateOrderRequest {
    pub fn validate(&self) -> Result<ValidUpdateOrder, ValidationError> {
        let customer_name = required("customer_name", &self.customer_name)?;
        let deadline = parse_deadline(self.deadline.as_deref())?;
        let items = self.items.as_deref().map(validate_items).transpose()?;

        if let Some(amount) = self.amount {
            if !amount.is_finite() || amount < 0.0 {
                return Err(ValidationError::new(
                    "amount",
                    "must be a non-negative number",
                ));
            }
        }

        Ok(ValidUpdateOrder {
            details: OrderDetails {
                customer_name,
                phone: self.phone.trim().to_string(),
                address: self.address.trim().to_string(),
                remark: self.remark.clone(),
                specs: self.specs.clone(),
                deadline,
            },
            items,
            amount: self.amount,
        })
    }
}

/// Body of `PUT /orders/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusOverrideRequest {
    pub status: String,
}

impl StatusOverrideRequest {
    pub fn validate(&self) -> Result<OrderStatus, ValidationError> {
        self.status
            .parse()
            .map_err(|e: crate::pipeline::UnknownName| ValidationError::new("status", e.to_string()))
    }
}

/// Query of `GET /orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListOrdersQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "crate::paging::blank_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "crate::paging::blank_as_none")]
    pub page_size: Option<u64>,
}

impl ListOrdersQuery {
    pub fn paging(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }

    pub fn status(&self) -> Result<Option<OrderStatus>, ValidationError> {
        match self.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(s) => s
                .parse()
                .map(Some)
                .map_err(|e: crate::pipeline::UnknownName| {
                    ValidationError::new("status", e.to_string())
                }),
        }
    }

    pub fn search(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }
}
