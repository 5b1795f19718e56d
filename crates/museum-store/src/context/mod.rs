//! Persistence context
//!
//! An [`EntityManagerFactory`] owns the connection of one persistence unit
//! and hands out [`EntityManager`]s. A manager keeps an identity map of the
//! entities it has loaded or staged, tracks their changes against snapshots,
//! and flushes everything in one SQLite transaction on commit.
//!
//! ```
//! use museum_core::model::Museum;
//! use museum_store::config::PersistenceUnit;
//! use museum_store::context::EntityManagerFactory;
//!
//! let emf = EntityManagerFactory::open(PersistenceUnit::in_memory("doc")).unwrap();
//! let mut em = emf.create_entity_manager();
//!
//! em.begin().unwrap();
//! em.persist(Museum::new(1, "MOLAA", "Long Beach, CA")).unwrap();
//! em.commit().unwrap();
//!
//! let a = em.find::<Museum>(1).unwrap().unwrap();
//! let b = em.find::<Museum>(1).unwrap().unwrap();
//! assert!(a.same_instance(&b));
//! ```

#![allow(clippy::result_large_err)]

pub mod managed;
mod navigation;
pub mod query;
pub mod unit_of_work;

pub use managed::Managed;
pub use query::TypedQuery;
pub use unit_of_work::FlushSummary;

use crate::config::PersistenceUnit;
use crate::db;
use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use crate::repo::SqliteRepo;
use museum_core::errors::{ExError, MuseumError};
use museum_core::model::{Entity, EntityKey, EntityKind};
use museum_core::query::compile;
use rusqlite::Connection;
use unit_of_work::UnitOfWork;

/// Entry point to a persistence unit
///
/// Opening the factory opens the unit's database and brings its schema up
/// to date. The connection is released when the factory is dropped.
pub struct EntityManagerFactory {
    unit: PersistenceUnit,
    conn: Connection,
}

impl EntityManagerFactory {
    /// Open the database of `unit` and apply pending migrations
    pub fn open(unit: PersistenceUnit) -> Result<Self> {
        let mut conn = db::open_location(unit.database())?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        tracing::debug!(unit = unit.name(), database = %unit.database(), "persistence unit opened");
        Ok(Self { unit, conn })
    }

    /// Resolve a unit by name from the environment and open it
    pub fn from_unit_name(name: &str) -> Result<Self> {
        Self::open(PersistenceUnit::resolve(name)?)
    }

    pub fn unit(&self) -> &PersistenceUnit {
        &self.unit
    }

    /// A new persistence context with an empty identity map
    pub fn create_entity_manager(&self) -> EntityManager<'_> {
        EntityManager {
            conn: &self.conn,
            unit: &self.unit,
            uow: UnitOfWork::default(),
            active: false,
        }
    }

    /// Close the underlying connection
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| from_rusqlite(e))
    }
}

/// A persistence context
///
/// Borrowing the factory ties every manager, and with it lazy association
/// navigation, to a live connection.
pub struct EntityManager<'f> {
    conn: &'f Connection,
    unit: &'f PersistenceUnit,
    uow: UnitOfWork,
    active: bool,
}

impl<'f> EntityManager<'f> {
    /// Look up an entity by identity
    ///
    /// The identity map is consulted first, so repeated finds return the same
    /// handle. Absence is `Ok(None)`, never an error.
    pub fn find<T: Entity>(&mut self, id: i32) -> Result<Option<Managed<T>>> {
        self.ensure_registered(T::KIND)?;
        let key = EntityKey::new(T::KIND, id);

        if self.uow.is_removed(key) {
            return Ok(None);
        }
        if let Some(handle) = self.uow.get::<T>(key)? {
            tracing::debug!(%key, "identity map hit");
            return Ok(Some(handle));
        }

        match SqliteRepo::find_row(self.conn, key)? {
            None => Ok(None),
            Some(row) => self.uow.reconcile(T::from_row(&row)?),
        }
    }

    /// Stage a new entity for insertion at commit
    ///
    /// # Errors
    ///
    /// `TransactionRequired` outside a transaction, `IdentityConflict` if the
    /// identity is already managed or stored.
    pub fn persist<T: Entity>(&mut self, entity: T) -> Result<Managed<T>> {
        self.require_active("persist")?;
        self.ensure_registered(T::KIND)?;
        let key = entity.key();

        if self.uow.is_tracked(key) || SqliteRepo::exists(self.conn, key)? {
            return Err(ExError::from(MuseumError::IdentityConflict {
                kind: key.kind,
                id: key.id,
            })
            .with_op("persist"));
        }

        tracing::debug!(%key, "staged insert");
        Ok(self.uow.register_new(entity))
    }

    /// Stage a managed entity for deletion at commit
    ///
    /// # Errors
    ///
    /// `TransactionRequired` outside a transaction, `NotManaged` if the
    /// handle does not belong to this context.
    pub fn remove<T: Entity>(&mut self, entity: &Managed<T>) -> Result<()> {
        self.require_active("remove")?;
        if !self.contains(entity) {
            return Err(ExError::from(MuseumError::NotManaged {
                kind: T::KIND,
                id: entity.id(),
            })
            .with_op("remove"));
        }
        tracing::debug!(key = %entity.key(), "staged removal");
        self.uow.stage_removal(entity.key());
        Ok(())
    }

    /// Whether this handle is managed here and not staged for removal
    pub fn contains<T: Entity>(&self, entity: &Managed<T>) -> bool {
        matches!(self.uow.get::<T>(entity.key()), Ok(Some(h)) if h.same_instance(entity))
    }

    /// Number of entities in the identity map
    pub fn managed_count(&self) -> usize {
        self.uow.len()
    }

    /// Start a transaction
    pub fn begin(&mut self) -> Result<()> {
        if self.active {
            return Err(ExError::from(MuseumError::TransactionAlreadyActive).with_op("begin"));
        }
        self.active = true;
        Ok(())
    }

    /// Flush all pending changes atomically and end the transaction
    ///
    /// On failure the database transaction is rolled back, managed entities
    /// are reverted to their last synchronized state, and
    /// `TransactionFailure` is returned.
    pub fn commit(&mut self) -> Result<FlushSummary> {
        if !self.active {
            return Err(ExError::from(MuseumError::NoActiveTransaction).with_op("commit"));
        }
        self.active = false;

        match self.flush() {
            Ok(summary) => {
                self.uow.accept_all()?;
                tracing::debug!(
                    inserted = summary.inserted,
                    updated = summary.updated,
                    deleted = summary.deleted,
                    "transaction committed"
                );
                Ok(summary)
            }
            Err(cause) => {
                if let Err(revert) = self.uow.revert_all() {
                    tracing::warn!(error = %revert, "could not revert managed state");
                }
                Err(ExError::from(MuseumError::TransactionFailure {
                    reason: cause.message().to_string(),
                })
                .with_op("commit")
                .with_source(cause))
            }
        }
    }

    /// Discard pending changes and end the transaction
    pub fn rollback(&mut self) -> Result<()> {
        if !self.active {
            return Err(ExError::from(MuseumError::NoActiveTransaction).with_op("rollback"));
        }
        self.active = false;
        self.uow.revert_all()?;
        tracing::debug!("transaction rolled back");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run `work` in a transaction: commit on `Ok`, roll back on `Err`
    pub fn transactional<R>(
        &mut self,
        work: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        self.begin()?;
        match work(self) {
            Ok(value) => {
                self.commit()?;
                Ok(value)
            }
            Err(err) => {
                if self.active {
                    self.rollback()?;
                }
                Err(err)
            }
        }
    }

    /// Compile a query whose results are entities of type `T`
    ///
    /// # Errors
    ///
    /// `QueryMalformed` for invalid text, unregistered entities, or a query
    /// selecting something other than `T`.
    pub fn create_query<T: Entity>(&mut self, query: &str) -> Result<TypedQuery<'_, 'f, T>> {
        let plan = compile(query, self.unit.entities())
            .map_err(|e| ExError::from(e).with_op("create_query"))?;
        if plan.kind != T::KIND {
            return Err(ExError::from(MuseumError::WrongResultType {
                expected: T::KIND,
                actual: plan.kind,
            })
            .with_op("create_query"));
        }
        Ok(TypedQuery::new(self, plan))
    }

    /// End this context; outstanding handles become detached
    ///
    /// An active transaction is rolled back.
    pub fn close(mut self) -> Result<()> {
        if self.active {
            self.rollback()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<FlushSummary> {
        let tx = self.conn.unchecked_transaction().map_err(from_rusqlite)?;
        let summary = self.uow.flush(&tx)?;
        tx.commit().map_err(from_rusqlite)?;
        Ok(summary)
    }

    fn require_active(&self, op: &str) -> Result<()> {
        if self.active {
            Ok(())
        } else {
            Err(ExError::from(MuseumError::TransactionRequired { op: op.to_string() }))
        }
    }

    fn ensure_registered(&self, kind: EntityKind) -> Result<()> {
        if self.unit.registers(kind) {
            Ok(())
        } else {
            Err(ExError::from(MuseumError::UnknownEntity {
                name: kind.name().to_string(),
            }))
        }
    }
}

impl Drop for EntityManager<'_> {
    fn drop(&mut self) {
        if self.active {
            self.active = false;
            if let Err(err) = self.uow.revert_all() {
                tracing::warn!(error = %err, "could not revert managed state on drop");
            }
            tracing::debug!("open transaction rolled back on drop");
        }
    }
}
