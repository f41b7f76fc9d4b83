//! Resolution of the scanning worker.

use super::error::{ScanError, ScanRejection};
use super::store::ScanStore;
use crate::db::worker_repo::Worker;

/// Resolves the worker behind a scan.
///
/// A non-empty scanner code wins over an explicit worker id. Ids of zero or
/// below count as absent.
pub fn resolve_actor<S: ScanStore + ?Sized>(
    store: &S,
    scanner_code: Option<&str>,
    worker_id: Option<i64>,
) -> Result<Result<Worker, ScanRejection>, ScanError> {
    if let Some(code) = scanner_code.map(str::trim).filter(|c| !c.is_empty()) {
        return Ok(store
            .find_worker_by_scanner_code(code)?
            .ok_or_else(|| ScanRejection::UnknownScanner(code.to_string())));
    }

    match worker_id.filter(|id| *id > 0) {
        Some(id) => Ok(store
            .find_worker(id)?
            .ok_or(ScanRejection::UnknownWorker(id))),
        None => Ok(Err(ScanRejection::MissingActor)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::worker_repo::{self, WorkerFields};
    use crate::db::Database;

    fn setup() -> (Database, Worker) {
        let db = Database::open_in_memory().expect("Failed to create test database");
        let w = worker_repo::insert(
            &db,
            &WorkerFields {
                name: "Zhang".to_string(),
                station: "cutting".to_string(),
                scanner_code: Some("XL1#".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        (db, w)
    }

    #[test]
    fn test_scanner_code_takes_precedence() {
        let (db, w) = setup();
        let found = resolve_actor(&db, Some("XL1#"), Some(999)).unwrap().unwrap();
        assert_eq!(found.id, w.id);
    }

    #[test]
    fn test_unknown_scanner_does_not_fall_back() {
        let (db, w) = setup();
        let res = resolve_actor(&db, Some("NOPE"), Some(w.id)).unwrap();
        assert_eq!(res, Err(ScanRejection::UnknownScanner("NOPE".to_string())));
    }

    #[test]
    fn test_worker_id_fallback() {
        let (db, w) = setup();
        assert_eq!(resolve_actor(&db, Some("  "), Some(w.id)).unwrap().unwrap().id, w.id);
        assert_eq!(
            resolve_actor(&db, None, Some(404)).unwrap(),
            Err(ScanRejection::UnknownWorker(404))
        );
    }

    #[test]
    fn test_missing_actor() {
        let (db, _) = setup();
        assert_eq!(
            resolve_actor(&db, None, None).unwrap(),
            Err(ScanRejection::MissingActor)
        );
        assert_eq!(
            resolve_actor(&db, Some(""), Some(0)).unwrap(),
            Err(ScanRejection::MissingActor)
        );
    }

    #[test]
    fn test_deleted_worker_does_not_resolve() {
        let (db, w) = setup();
        worker_repo::soft_delete(&db, w.id).unwrap();
        assert_eq!(
            resolve_actor(&db, None, Some(w.id)).unwrap(),
            Err(ScanRejection::UnknownWorker(w.id))
        );
    }
}
