//! Product and customer administration.

use serde::{Deserialize, Serialize};

use crate::db::catalog_repo::{self, Customer, CustomerFields, Product, ProductFields};
use crate::db::Database;
use crate::error::{FurntraceError, Result, ValidationError};
use crate::paging::PageRequest;

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRequest {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub sort_order: i64,
}

impl ProductRequest {
    pub fn validate(&self) -> std::result::Result<ProductFields, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("name", "is required"));
        }
        Ok(ProductFields {
            name: name.to_string(),
            code: self.code.trim().to_string(),
            icon: self.icon.clone(),
            image: self.image.clone(),
            sort_order: self.sort_order,
        })
    }
}

/// Body of `POST /customers` and `PUT /customers/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerRequest {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub remark: String,
}

impl CustomerRequest {
    pub fn validate(&self) -> std::result::Result<CustomerFields, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("name", "is required"));
        }
        let phone = self.phone.trim();
        if phone.is_empty() {
            return Err(ValidationError::new("phone", "is required"));
        }
        Ok(CustomerFields {
            name: name.to_string(),
            phone: phone.to_string(),
            address: self.address.trim().to_string(),
            remark: self.remark.clone(),
        })
    }
}

/// Query of the catalog list endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "crate::paging::blank_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "crate::paging::blank_as_none")]
    pub page_size: Option<u64>,
}

impl CatalogQuery {
    fn search(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerPage {
    pub data: Vec<Customer>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

pub fn create_product(db: &Database, request: &ProductRequest) -> Result<Product> {
    let fields = request.validate()?;
    Ok(catalog_repo::insert_product(db, &fields)?)
}

pub fn update_product(db: &Database, id: i64, request: &ProductRequest) -> Result<Product> {
    let fields = request.validate()?;
    catalog_repo::update_product(db, id, &fields)?.ok_or(FurntraceError::not_found("product", id))
}

pub fn list_products(db: &Database, query: &CatalogQuery) -> Result<Vec<Product>> {
    Ok(catalog_repo::list_products(db, query.search())?)
}

/// Soft-deletes a product unless a live order still references it.
pub fn delete_product(db: &Database, id: i64) -> Result<()> {
    if catalog_repo::find_product(db, id)?.is_none() {
        return Err(FurntraceError::not_found("product", id));
    }
    if catalog_repo::product_in_use(db, id)? {
        return Err(FurntraceError::Conflict(format!(
            "product {} is used by existing orders",
            id
        )));
    }
    catalog_repo::soft_delete_product(db, id)?;
    log::info!("Deleted product {}", id);
    Ok(())
}

fn phone_taken(e: crate::db::DatabaseError, phone: &str) -> FurntraceError {
    if e.is_unique_violation() {
        return FurntraceError::Conflict(format!("a customer with phone {} already exists", phone));
    }
    e.into()
}

pub fn create_customer(db: &Database, request: &CustomerRequest) -> Result<Customer> {
    let fields = request.validate()?;
    catalog_repo::insert_customer(db, &fields).map_err(|e| phone_taken(e, &fields.phone))
}

pub fn update_customer(db: &Database, id: i64, request: &CustomerRequest) -> Result<Customer> {
    let fields = request.validate()?;
    catalog_repo::update_customer(db, id, &fields)
        .map_err(|e| phone_taken(e, &fields.phone))?
        .ok_or(FurntraceError::not_found("customer", id))
}

pub fn list_customers(db: &Database, query: &CatalogQuery) -> Result<CustomerPage> {
    let paging = PageRequest {
        page: query.page,
        page_size: query.page_size,
    };
    let (data, total) =
        catalog_repo::list_customers(db, query.search(), paging.limit(), paging.offset())?;
    Ok(CustomerPage {
        data,
        total,
        page: paging.page(),
        page_size: paging.page_size(),
    })
}

pub fn delete_customer(db: &Database, id: i64) -> Result<()> {
    if !catalog_repo::soft_delete_customer(db, id)? {
        return Err(FurntraceError::not_found("customer", id));
    }
    Ok(())
}
