//! Unit of work scoping one transaction and its repositories.
//!
//! Acquiring a unit of work opens a transaction; the repositories it hands
//! out stage their writes against that transaction. Committing consumes the
//! value, so a second commit is unrepresentable, and dropping an uncommitted
//! unit of work aborts — the default outcome is rollback, never commit.

use std::sync::Arc;

use crate::domain::ports::{StoreError, StoreTransaction, TransactionalStore};
use crate::domain::repository::{ManagerRepository, PackageRepository, TruckRepository};

/// One transaction and the repositories writing through it.
pub struct UnitOfWork {
    tx: Option<Box<dyn StoreTransaction>>,
}

impl UnitOfWork {
    fn new(tx: Box<dyn StoreTransaction>) -> Self {
        Self { tx: Some(tx) }
    }

    /// Truck repository bound to this transaction.
    pub fn trucks(&mut self) -> TruckRepository<'_> {
        TruckRepository::new(self.transaction())
    }

    /// Package repository bound to this transaction.
    pub fn packages(&mut self) -> PackageRepository<'_> {
        PackageRepository::new(self.transaction())
    }

    /// Manager repository bound to this transaction.
    pub fn managers(&mut self) -> ManagerRepository<'_> {
        ManagerRepository::new(self.transaction())
    }

    /// Apply every staged write atomically.
    ///
    /// Consumes the unit of work: commit happens at most once per scope.
    ///
    /// # Errors
    /// Propagates the store's commit failure; staged writes are discarded.
    pub async fn commit(mut self) -> Result<(), StoreError> {
        match self.tx.take() {
            Some(tx) => tx.commit().await,
            None => Err(StoreError::TransactionFinished),
        }
    }

    /// Abort the transaction explicitly.
    ///
    /// Safe to call on an already-finished transaction; the in-progress
    /// check lives in the transaction itself.
    pub fn rollback(&mut self) {
        if let Some(tx) = self.tx.as_mut() {
            tx.rollback();
        }
    }

    /// Whether the scoped transaction can still stage work.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.tx.as_ref().is_some_and(|tx| tx.is_active())
    }

    fn transaction(&mut self) -> &mut dyn StoreTransaction {
        self.tx
            .as_deref_mut()
            .expect("transaction present until commit consumes the unit of work")
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        // Exiting the scope without an explicit commit aborts.
        if let Some(tx) = self.tx.as_mut() {
            tx.rollback();
        }
    }
}

/// Opens units of work against the injected store.
///
/// The store connection is created once at startup and handed in; nothing in
/// the domain constructs its own client.
#[derive(Clone)]
pub struct UnitOfWorkFactory {
    store: Arc<dyn TransactionalStore>,
}

impl UnitOfWorkFactory {
    /// Bind the factory to a store.
    #[must_use]
    pub fn new(store: Arc<dyn TransactionalStore>) -> Self {
        Self { store }
    }

    /// Open a fresh transaction wrapped in a unit of work.
    ///
    /// # Errors
    /// Propagates the store's failure to open a transaction.
    pub async fn begin(&self) -> Result<UnitOfWork, StoreError> {
        let tx = self.store.begin().await?;
        Ok(UnitOfWork::new(tx))
    }
}
