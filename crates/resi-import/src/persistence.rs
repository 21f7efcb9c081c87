//! Persistence collaborator seam.

use resi_model::ResidentRecord;

use crate::error::PersistenceError;

/// Insert operations the importer needs from a backing store.
///
/// Implementations must either insert every record of a bulk call or none
/// of them; the importer retries and degrades on that assumption.
pub trait Persistence {
    fn insert_many(&self, table: &str, records: &[ResidentRecord]) -> Result<(), PersistenceError>;

    fn insert_one(&self, table: &str, record: &ResidentRecord) -> Result<(), PersistenceError> {
        self.insert_many(table, std::slice::from_ref(record))
    }
}

impl<P: Persistence + ?Sized> Persistence for &P {
    fn insert_many(&self, table: &str, records: &[ResidentRecord]) -> Result<(), PersistenceError> {
        (**self).insert_many(table, records)
    }

    fn insert_one(&self, table: &str, record: &ResidentRecord) -> Result<(), PersistenceError> {
        (**self).insert_one(table, record)
    }
}

impl<P: Persistence + ?Sized> Persistence for Box<P> {
    fn insert_many(&self, table: &str, records: &[ResidentRecord]) -> Result<(), PersistenceError> {
        (**self).insert_many(table, records)
    }

    fn insert_one(&self, table: &str, record: &ResidentRecord) -> Result<(), PersistenceError> {
        (**self).insert_one(table, record)
    }
}
