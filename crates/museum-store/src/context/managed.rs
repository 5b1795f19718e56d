//! Handles to entities tracked by an entity manager

use museum_core::errors::{MuseumError, Result};
use museum_core::model::{Entity, EntityKey};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A managed entity
///
/// Every retrieval of the same row within one entity manager yields a clone
/// of the same handle, so a mutation through one handle is visible through
/// all of them and is picked up by dirty tracking at commit. Handles outlive
/// their manager; once it is closed they are detached and further changes are
/// never flushed.
pub struct Managed<T: Entity> {
    key: EntityKey,
    cell: Rc<RefCell<T>>,
}

impl<T: Entity> Managed<T> {
    pub(crate) fn new(entity: T) -> Self {
        Self {
            key: entity.key(),
            cell: Rc::new(RefCell::new(entity)),
        }
    }

    /// Identity of the entity
    pub fn id(&self) -> i32 {
        self.key.id
    }

    pub fn key(&self) -> EntityKey {
        self.key
    }

    /// Shared access to the entity
    ///
    /// # Panics
    ///
    /// Panics if the entity is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.cell.borrow()
    }

    /// Exclusive access to the entity; changes are tracked
    ///
    /// # Panics
    ///
    /// Panics if the entity is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.cell.borrow_mut()
    }

    /// Run `f` against the entity without panicking on a conflicting borrow
    ///
    /// # Errors
    ///
    /// Returns `EntityBorrowed` if the entity is mutably borrowed.
    pub fn try_read<R>(&self, f: impl FnOnce(&T) -> R) -> Result<R> {
        let entity = self.cell.try_borrow().map_err(|_| self.borrowed())?;
        Ok(f(&entity))
    }

    pub(crate) fn try_replace(&self, entity: T) -> Result<()> {
        let mut slot = self.cell.try_borrow_mut().map_err(|_| self.borrowed())?;
        *slot = entity;
        Ok(())
    }

    /// Whether both handles refer to the same in-memory instance
    pub fn same_instance(&self, other: &Managed<T>) -> bool {
        Rc::ptr_eq(&self.cell, &other.cell)
    }

    /// An unmanaged copy of the current state
    ///
    /// # Errors
    ///
    /// Returns `EntityBorrowed` if the entity is mutably borrowed.
    pub fn detach(&self) -> Result<T> {
        self.try_read(T::clone)
    }

    fn borrowed(&self) -> MuseumError {
        MuseumError::EntityBorrowed {
            kind: self.key.kind,
            id: self.key.id,
        }
    }
}

impl<T: Entity> Clone for Managed<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            cell: Rc::clone(&self.cell),
        }
    }
}

/// Handles compare by identity, like the entities they hold
impl<T: Entity> PartialEq for Managed<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T: Entity> Eq for Managed<T> {}

impl<T: Entity> Hash for Managed<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T: Entity> fmt::Display for Managed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.try_borrow() {
            Ok(entity) => fmt::Display::fmt(&*entity, f),
            Err(_) => write!(f, "{}", self.key),
        }
    }
}

impl<T: Entity> fmt::Debug for Managed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.try_borrow() {
            Ok(entity) => f.debug_tuple("Managed").field(&*entity).finish(),
            Err(_) => f.debug_tuple("Managed").field(&self.key).finish(),
        }
    }
}
