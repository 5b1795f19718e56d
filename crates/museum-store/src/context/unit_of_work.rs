//! Identity map and unit of work
//!
//! Each managed entity sits in a slot next to a snapshot of its last
//! synchronized state. A slot without a snapshot is a pending insert. At
//! flush the unit of work writes pending inserts, then every entity whose
//! current row differs from its snapshot, then staged removals.

#![allow(clippy::result_large_err)]

use crate::context::managed::Managed;
use crate::errors::Result;
use crate::repo::SqliteRepo;
use museum_core::errors::{ExError, ExErrorKind};
use museum_core::model::{ColumnRole, Entity, EntityKey, EntityKind, Row, Value};
use rusqlite::Connection;
use std::any::Any;
use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap};

/// Counts of statements written by one flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl FlushSummary {
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.deleted == 0
    }
}

/// Type-erased view of a slot
pub(crate) trait Tracked {
    fn current_row(&self) -> Result<Row>;
    fn snapshot_row(&self) -> Option<Row>;
    /// Take the current state as the synchronized state
    fn accept(&mut self) -> Result<()>;
    /// Restore the synchronized state
    fn revert(&mut self) -> Result<()>;
    fn as_any(&self) -> &dyn Any;
}

struct Slot<T: Entity> {
    handle: Managed<T>,
    snapshot: Option<T>,
}

impl<T: Entity> Tracked for Slot<T> {
    fn current_row(&self) -> Result<Row> {
        Ok(self.handle.try_read(T::to_row)?)
    }

    fn snapshot_row(&self) -> Option<Row> {
        self.snapshot.as_ref().map(T::to_row)
    }

    fn accept(&mut self) -> Result<()> {
        self.snapshot = Some(self.handle.detach()?);
        Ok(())
    }

    fn revert(&mut self) -> Result<()> {
        if let Some(snapshot) = &self.snapshot {
            self.handle.try_replace(snapshot.clone())?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Position of a kind in foreign-key dependency order
fn dependency_rank(kind: EntityKind) -> usize {
    EntityKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(EntityKind::ALL.len())
}

/// `current` with every unique column whose value changed set to NULL, or
/// `None` if no held unique value is given up
fn release_unique_columns(snapshot: &Row, current: &Row) -> Option<Row> {
    let columns = current.kind().meta().columns;
    let mut values = current.values().to_vec();
    let mut released = false;

    for (index, column) in columns.iter().enumerate() {
        if column.role == ColumnRole::Id || !column.unique {
            continue;
        }
        let held = &snapshot.values()[index];
        if *held != Value::Null && *held != values[index] {
            values[index] = Value::Null;
            released = true;
        }
    }

    released.then(|| Row::new(current.kind(), values))
}

#[derive(Default)]
pub(crate) struct UnitOfWork {
    identity_map: HashMap<EntityKey, Box<dyn Tracked>>,
    pending_inserts: Vec<EntityKey>,
    pending_removals: BTreeSet<EntityKey>,
}

impl UnitOfWork {
    /// The managed handle for `key`, unless it is staged for removal
    pub fn get<T: Entity>(&self, key: EntityKey) -> Result<Option<Managed<T>>> {
        if self.pending_removals.contains(&key) {
            return Ok(None);
        }
        match self.identity_map.get(&key) {
            None => Ok(None),
            Some(tracked) => tracked
                .as_any()
                .downcast_ref::<Slot<T>>()
                .map(|slot| Some(slot.handle.clone()))
                .ok_or_else(|| {
                    ExError::new(ExErrorKind::Internal)
                        .with_entity_kind(key.kind)
                        .with_entity_id(key.id)
                        .with_message("identity map slot holds a different type")
                }),
        }
    }

    pub fn is_tracked(&self, key: EntityKey) -> bool {
        self.identity_map.contains_key(&key)
    }

    pub fn is_removed(&self, key: EntityKey) -> bool {
        self.pending_removals.contains(&key)
    }

    /// Track an entity loaded from the database
    ///
    /// If the row is already managed the existing handle wins and the loaded
    /// state is discarded.
    pub fn reconcile<T: Entity>(&mut self, entity: T) -> Result<Option<Managed<T>>> {
        let key = entity.key();
        if self.is_tracked(key) {
            return self.get(key);
        }
        let handle = Managed::new(entity.clone());
        self.identity_map.insert(
            key,
            Box::new(Slot {
                handle: handle.clone(),
                snapshot: Some(entity),
            }),
        );
        Ok(Some(handle))
    }

    /// Track a new entity as a pending insert
    pub fn register_new<T: Entity>(&mut self, entity: T) -> Managed<T> {
        let key = entity.key();
        let handle = Managed::new(entity);
        self.identity_map.insert(
            key,
            Box::new(Slot {
                handle: handle.clone(),
                snapshot: None,
            }),
        );
        self.pending_inserts.push(key);
        handle
    }

    /// Stage a removal; a pending insert is simply forgotten
    pub fn stage_removal(&mut self, key: EntityKey) {
        if let Some(pos) = self.pending_inserts.iter().position(|k| *k == key) {
            self.pending_inserts.remove(pos);
            self.identity_map.remove(&key);
        } else {
            self.pending_removals.insert(key);
        }
    }

    /// Handles of every managed entity of kind `T` not staged for removal, by identity
    pub fn managed_of_kind<T: Entity>(&self) -> Result<Vec<Managed<T>>> {
        let mut keys: Vec<EntityKey> = self
            .identity_map
            .keys()
            .filter(|k| k.kind == T::KIND && !self.pending_removals.contains(k))
            .copied()
            .collect();
        keys.sort();

        let mut handles = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(handle) = self.get(key)? {
                handles.push(handle);
            }
        }
        Ok(handles)
    }

    /// Write all pending changes through `conn`
    pub fn flush(&self, conn: &Connection) -> Result<FlushSummary> {
        let mut summary = FlushSummary::default();

        let mut inserts = self.pending_inserts.clone();
        inserts.sort_by_key(|k| dependency_rank(k.kind));
        for key in &inserts {
            let row = self.slot(*key)?.current_row()?;
            SqliteRepo::insert(conn, &row)?;
            summary.inserted += 1;
        }

        let mut keys: Vec<EntityKey> = self.identity_map.keys().copied().collect();
        keys.sort_by_key(|k| (dependency_rank(k.kind), k.id));
        let mut dirty = Vec::new();
        for key in keys {
            if self.pending_removals.contains(&key) {
                continue;
            }
            let slot = self.slot(key)?;
            if let Some(snapshot) = slot.snapshot_row() {
                let current = slot.current_row()?;
                if current != snapshot {
                    dirty.push((snapshot, current));
                }
            }
        }

        // Unique values being handed over are released first, so a value can
        // move between rows regardless of the order the rows are written in.
        for (snapshot, current) in &dirty {
            if let Some(released) = release_unique_columns(snapshot, current) {
                SqliteRepo::update(conn, &released)?;
            }
        }
        for (_, current) in &dirty {
            SqliteRepo::update(conn, current)?;
            summary.updated += 1;
        }

        let mut removals: Vec<EntityKey> = self.pending_removals.iter().copied().collect();
        removals.sort_by_key(|k| (Reverse(dependency_rank(k.kind)), k.id));
        for key in removals {
            SqliteRepo::delete(conn, key)?;
            summary.deleted += 1;
        }

        Ok(summary)
    }

    /// After a successful flush: snapshots follow current state, removals are evicted
    pub fn accept_all(&mut self) -> Result<()> {
        for key in std::mem::take(&mut self.pending_removals) {
            self.identity_map.remove(&key);
        }
        self.pending_inserts.clear();
        for slot in self.identity_map.values_mut() {
            slot.accept()?;
        }
        Ok(())
    }

    /// Discard pending changes: inserts are evicted, mutations reverted,
    /// removals cancelled
    ///
    /// Every slot is visited even if one fails; the first error is returned.
    pub fn revert_all(&mut self) -> Result<()> {
        for key in std::mem::take(&mut self.pending_inserts) {
            self.identity_map.remove(&key);
        }
        self.pending_removals.clear();

        let mut first_error = None;
        for slot in self.identity_map.values_mut() {
            if let Err(err) = slot.revert() {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.identity_map.len()
    }

    fn slot(&self, key: EntityKey) -> Result<&dyn Tracked> {
        self.identity_map
            .get(&key)
            .map(|b| b.as_ref())
            .ok_or_else(|| {
                ExError::new(ExErrorKind::Internal)
                    .with_entity_kind(key.kind)
                    .with_entity_id(key.id)
                    .with_message("pending change has no identity map slot")
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use museum_core::model::{Museum, Superintendent};

    #[test]
    fn test_reconcile_keeps_managed_instance() {
        let mut uow = UnitOfWork::default();
        let first = uow
            .reconcile(Museum::new(1, "MOLAA", "Long Beach, CA"))
            .unwrap()
            .unwrap();
        first.borrow_mut().set_name("Edited");

        let second = uow
            .reconcile(Museum::new(1, "MOLAA", "Long Beach, CA"))
            .unwrap()
            .unwrap();
        assert!(first.same_instance(&second));
        assert_eq!(second.borrow().name(), "Edited");
    }

    #[test]
    fn test_revert_restores_snapshot_and_evicts_inserts() {
        let mut uow = UnitOfWork::default();
        let loaded = uow
            .reconcile(Museum::new(1, "MOLAA", "Long Beach, CA"))
            .unwrap()
            .unwrap();
        loaded.borrow_mut().set_location("Elsewhere");
        uow.register_new(Superintendent::new(2, "Lourdes Ramos"));
        uow.stage_removal(loaded.key());

        uow.revert_all().unwrap();

        assert_eq!(loaded.borrow().location(), "Long Beach, CA");
        assert!(!uow.is_tracked(EntityKey::new(EntityKind::Superintendent, 2)));
        assert!(!uow.is_removed(loaded.key()));
        assert_eq!(uow.len(), 1);
    }

    #[test]
    fn test_removing_pending_insert_forgets_it() {
        let mut uow = UnitOfWork::default();
        let handle = uow.register_new(Museum::new(5, "New", "Here"));
        uow.stage_removal(handle.key());
        assert!(!uow.is_tracked(handle.key()));
        assert!(!uow.is_removed(handle.key()));
    }

    #[test]
    fn test_release_unique_columns() {
        let superintendent = Superintendent::new(10, "Lourdes Ramos");
        let mut holder = Museum::new(2, "Getty Center", "Los Angeles, CA");
        holder.set_superintendent(&superintendent);
        let snapshot = holder.to_row();

        holder.clear_superintendent();
        let released = release_unique_columns(&snapshot, &holder.to_row()).unwrap();
        assert_eq!(released.values()[3], Value::Null);

        // Gaining a value or renaming gives nothing up
        let mut gainer = Museum::new(1, "MOLAA", "Long Beach, CA");
        let before = gainer.to_row();
        gainer.set_superintendent(&superintendent);
        gainer.set_name("Museum of Latin American Art");
        assert!(release_unique_columns(&before, &gainer.to_row()).is_none());
    }

    #[test]
    fn test_dependency_rank_orders_parents_first() {
        assert!(dependency_rank(EntityKind::Superintendent) < dependency_rank(EntityKind::Museum));
        assert!(dependency_rank(EntityKind::Museum) < dependency_rank(EntityKind::Building));
        assert!(dependency_rank(EntityKind::Visitor) < dependency_rank(EntityKind::MuseumVisit));
    }
}
