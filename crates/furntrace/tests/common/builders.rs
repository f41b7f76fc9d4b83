//! Builders for request bodies used across integration tests.
//!
//! Each builder starts from a valid request so a test only spells out the
//! fields it cares about.

#![allow(dead_code)]

use furntrace::catalog::ProductRequest;
use furntrace::orders::{CreateOrderRequest, LineItemRequest};
use furntrace::workers::WorkerRequest;
use furntrace::ScanRequest;

/// Builder for [`CreateOrderRequest`].
pub struct OrderBuilder {
    request: CreateOrderRequest,
}

impl OrderBuilder {
    pub fn new(customer_name: &str) -> Self {
        Self {
            request: CreateOrderRequest {
                customer_name: customer_name.to_string(),
                phone: "13800000000".to_string(),
                ..Default::default()
            },
        }
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.request.phone = phone.to_string();
        self
    }

    pub fn deadline(mut self, deadline: &str) -> Self {
        self.request.deadline = Some(deadline.to_string());
        self
    }

    /// Adds a line item of `quantity` units at `unit_price`.
    pub fn item(mut self, product_id: i64, quantity: i64, unit_price: f64) -> Self {
        self.request.items.push(LineItemRequest {
            product_id,
            quantity,
            unit_price,
            unit: "pcs".to_string(),
            ..Default::default()
        });
        self
    }

    pub fn build(self) -> CreateOrderRequest {
        self.request
    }
}

/// Builder for [`WorkerRequest`].
pub struct WorkerBuilder {
    request: WorkerRequest,
}

impl WorkerBuilder {
    pub fn new(name: &str, station: &str) -> Self {
        Self {
            request: WorkerRequest {
                name: name.to_string(),
                station: station.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn scanner(mut self, code: &str) -> Self {
        self.request.scanner_code = Some(code.to_string());
        self
    }

    pub fn build(self) -> WorkerRequest {
        self.request
    }
}

pub fn product(name: &str) -> ProductRequest {
    ProductRequest {
        name: name.to_string(),
        ..Default::default()
    }
}

/// A scan identified by scanner code.
pub fn scan_by_scanner(qr_code: &str, scanner_code: &str) -> ScanRequest {
    ScanRequest {
        qr_code: qr_code.to_string(),
        worker_id: None,
        scanner_code: Some(scanner_code.to_string()),
    }
}

/// A scan identified by legacy worker id.
pub fn scan_by_worker(qr_code: &str, worker_id: i64) -> ScanRequest {
    ScanRequest {
        qr_code: qr_code.to_string(),
        worker_id: Some(worker_id),
        scanner_code: None,
    }
}
