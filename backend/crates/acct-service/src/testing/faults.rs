use acct_cache::CacheError;
use acct_core::ErrorLocation;
use acct_db::DbError;

use std::panic::Location;
use std::sync::atomic::{AtomicBool, Ordering};

/// Switches that make the in-memory collaborators fail.
#[derive(Debug, Default)]
pub struct Faults {
    pub store_reads: AtomicBool,
    pub store_writes: AtomicBool,
    pub audit: AtomicBool,
    pub commit: AtomicBool,
    pub cache_reads: AtomicBool,
    pub cache_writes: AtomicBool,
    pub cache_deletes: AtomicBool,
}

impl Faults {
    pub fn set(flag: &AtomicBool, on: bool) {
        flag.store(on, Ordering::SeqCst);
    }

    pub(crate) fn check_db(flag: &AtomicBool) -> acct_db::Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(DbError::from(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    #[track_caller]
    pub(crate) fn check_cache(
        flag: &AtomicBool,
        operation: &'static str,
    ) -> acct_cache::Result<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(CacheError::Timeout {
                operation,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}
