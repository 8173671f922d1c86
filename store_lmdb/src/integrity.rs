//! LMDB database integrity checks.
//!
//! Run on startup to detect corruption early, before the splitter accepts
//! any mutation or payment.

use std::path::Path;

use heed::Env;
use splitter_store::{decode_state, StoreError};

use crate::LmdbError;

/// Summary of an integrity check run.
#[derive(Debug)]
pub struct IntegrityReport {
    pub databases_checked: u32,
    pub total_entries: u64,
    pub errors: Vec<String>,
}

impl IntegrityReport {
    /// Returns `true` if no errors were detected.
    pub fn is_healthy(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Database names that exist in a valid splitter LMDB environment.
pub const EXPECTED_DATABASES: &[&str] = &["registry", "meta"];

/// Check every expected database and decode every registry record.
///
/// Read failures are collected into the report rather than aborting.
pub fn check_integrity(env: &Env) -> Result<IntegrityReport, LmdbError> {
    let mut report = IntegrityReport {
        databases_checked: 0,
        total_entries: 0,
        errors: Vec::new(),
    };

    let rtxn = env.read_txn()?;

    for &db_name in EXPECTED_DATABASES {
        match env.open_database::<heed::types::Bytes, heed::types::Bytes>(&rtxn, Some(db_name)) {
            Ok(Some(db)) => {
                report.databases_checked += 1;
                match db.len(&rtxn) {
                    Ok(count) => report.total_entries += count,
                    Err(e) => report
                        .errors
                        .push(format!("failed to read database '{}': {}", db_name, e)),
                }
                if db_name == "registry" {
                    check_registry_records(&db, &rtxn, &mut report);
                }
            }
            Ok(None) => report
                .errors
                .push(format!("database '{}' is missing", db_name)),
            Err(e) => report
                .errors
                .push(format!("failed to open database '{}': {}", db_name, e)),
        }
    }

    Ok(report)
}

fn check_registry_records(
    db: &heed::Database<heed::types::Bytes, heed::types::Bytes>,
    rtxn: &heed::RoTxn,
    report: &mut IntegrityReport,
) {
    let iter = match db.iter(rtxn) {
        Ok(iter) => iter,
        Err(e) => {
            report.errors.push(format!("failed to iterate registry: {}", e));
            return;
        }
    };
    for entry in iter {
        match entry {
            Ok((key, value)) => {
                if let Err(StoreError::Corruption(msg) | StoreError::Serialization(msg)) =
                    decode_state(value)
                {
                    report.errors.push(format!(
                        "registry record '{}' unreadable: {}",
                        String::from_utf8_lossy(key),
                        msg
                    ));
                }
            }
            Err(e) => report.errors.push(format!("registry read failed: {}", e)),
        }
    }
}

/// Check if the LMDB data directory looks valid before opening.
///
/// Returns `Ok(())` for a nonexistent or empty directory. Returns an error
/// if the directory holds files but `data.mdb` is missing, which suggests
/// a wrong path or a damaged store.
pub fn check_data_dir(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Ok(());
    }
    let mut entries = path
        .read_dir()
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    if entries.next().is_none() {
        return Ok(());
    }
    if !path.join("data.mdb").exists() {
        return Err(format!(
            "directory {} is not empty but data.mdb is missing",
            path.display()
        ));
    }
    Ok(())
}
