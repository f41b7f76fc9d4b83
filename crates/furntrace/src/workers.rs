//! Worker administration.

use serde::{Deserialize, Serialize};

use crate::db::worker_repo::{self, Worker, WorkerFields, WorkerFilter};
use crate::db::{Database, DatabaseError};
use crate::error::{FurntraceError, Result, ValidationError};
use crate::paging::PageRequest;
use crate::pipeline::Station;

/// Body of `POST /workers` and `PUT /workers/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkerRequest {
    pub name: String,
    pub station: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub scanner_code: Option<String>,
}

impl WorkerRequest {
    /// Checks the fields and normalizes the station name (`shipping` is
    /// stored as `delivery`).
    pub fn validate(&self) -> std::result::Result<WorkerFields, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::new("name", "is required"));
        }
        let station: Station = self
            .station
            .parse()
            .map_err(|e: crate::pipeline::UnknownName| ValidationError::new("station", e.to_string()))?;

        Ok(WorkerFields {
            name: name.to_string(),
            station: station.as_str().to_string(),
            phone: self.phone.trim().to_string(),
            scanner_code: self
                .scanner_code
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        })
    }
}

/// Query of `GET /workers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListWorkersQuery {
    #[serde(default)]
    pub station: Option<String>,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default, deserialize_with = "crate::paging::blank_as_none")]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "crate::paging::blank_as_none")]
    pub page_size: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkerPage {
    pub data: Vec<Worker>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

fn scanner_taken(e: DatabaseError, fields: &WorkerFields) -> FurntraceError {
    if e.is_unique_violation() {
        return FurntraceError::Conflict(format!(
            "scanner code '{}' is already bound to another worker",
            fields.scanner_code.as_deref().unwrap_or_default()
        ));
    }
    e.into()
}

pub fn create_worker(db: &Database, request: &WorkerRequest) -> Result<Worker> {
    let fields = request.validate()?;
    let worker = worker_repo::insert(db, &fields).map_err(|e| scanner_taken(e, &fields))?;
    log::info!("Created worker {} at {}", worker.name, worker.station);
    Ok(worker)
}

pub fn update_worker(db: &Database, id: i64, request: &WorkerRequest) -> Result<Worker> {
    let fields = request.validate()?;
    worker_repo::update(db, id, &fields)
        .map_err(|e| scanner_taken(e, &fields))?
        .ok_or(FurntraceError::not_found("worker", id))
}

pub fn get_worker(db: &Database, id: i64) -> Result<Worker> {
    worker_repo::find_by_id(db, id)?.ok_or(FurntraceError::not_found("worker", id))
}

pub fn list_workers(db: &Database, query: &ListWorkersQuery) -> Result<WorkerPage> {
    let station = match query.station.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(s) => Some(
            s.parse::<Station>()
                .map_err(|e| ValidationError::new("station", e.to_string()))?
                .as_str()
                .to_string(),
        ),
        None => None,
    };
    let paging = PageRequest {
        page: query.page,
        page_size: query.page_size,
    };
    let (data, total) = worker_repo::query(
        db,
        &WorkerFilter {
            station,
            q: query
                .q
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            limit: Some(paging.limit()),
            offset: Some(paging.offset()),
        },
    )?;

    Ok(WorkerPage {
        data,
        total,
        page: paging.page(),
        page_size: paging.page_size(),
    })
}

/// Soft-deletes a worker. Their process records and scan attempts remain.
pub fn delete_worker(db: &Database, id: i64) -> Result<()> {
    if !worker_repo::soft_delete(db, id)? {
        return Err(FurntraceError::not_found("worker", id));
    }
    log::info!("Deleted worker {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        Database::open_in_memory().expect("Failed to create test database")
    }

    fn request(name: &str, station: &str, code: Option<&str>) -> WorkerRequest {
        WorkerRequest {
            name: name.to_string(),
            station: station.to_string(),
            phone: String::new(),
            scanner_code: code.map(str::to_string),
        }
    }

    #[test]
    fn test_shipping_stored_as_delivery() {
        let db = test_db();
        let w = create_worker(&db, &request("Zhao", "Shipping", None)).unwrap();
        assert_eq!(w.station, "delivery");
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            request(" ", "cutting", None).validate().unwrap_err().field,
            "name"
        );
        assert_eq!(
            request("Li", "polishing", None).validate().unwrap_err().field,
            "station"
        );
        let fields = request("Li", "cutting", Some("  ")).validate().unwrap();
        assert_eq!(fields.scanner_code, None);
    }

    #[test]
    fn test_duplicate_scanner_code_conflicts() {
        let db = test_db();
        create_worker(&db, &request("A", "cutting", Some("XL1#"))).unwrap();
        let err = create_worker(&db, &request("B", "cutting", Some("XL1#"))).unwrap_err();
        assert!(matches!(err, FurntraceError::Conflict(_)));
    }

    #[test]
    fn test_update_get_delete() {
        let db = test_db();
        let w = create_worker(&db, &request("A", "cutting", None)).unwrap();
        let updated = update_worker(&db, w.id, &request("A", "payment", Some("SK1#"))).unwrap();
        assert_eq!(updated.station, "payment");
        assert_eq!(get_worker(&db, w.id).unwrap().scanner_code.as_deref(), Some("SK1#"));

        delete_worker(&db, w.id).unwrap();
        assert!(matches!(
            get_worker(&db, w.id),
            Err(FurntraceError::NotFound { .. })
        ));
        assert!(matches!(
            update_worker(&db, w.id, &request("A", "payment", None)),
            Err(FurntraceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_list_by_station_alias() {
        let db = test_db();
        create_worker(&db, &request("A", "delivery", None)).unwrap();
        create_worker(&db, &request("B", "cutting", None)).unwrap();

        let page = list_workers(
            &db,
            &ListWorkersQuery {
                station: Some("shipping".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0].name, "A");
    }
}
