//! Lazy association navigation
//!
//! Only the owning side of an association is stored. The inverse side is
//! computed on demand from the database and merged with the context's
//! managed state, so pending inserts and in-memory reassignments are visible
//! before they are committed.

#![allow(clippy::result_large_err)]

use crate::context::{EntityManager, Managed};
use crate::errors::Result;
use crate::repo::SqliteRepo;
use museum_core::errors::{ExError, MuseumError};
use museum_core::model::{
    Building, Entity, Museum, MuseumVisit, Superintendent, Value, Visitor,
};
use museum_core::query::SingleResult;
use std::collections::BTreeSet;

impl EntityManager<'_> {
    /// The superintendent assigned to a museum
    pub fn superintendent_of(
        &mut self,
        museum: &Managed<Museum>,
    ) -> Result<Option<Managed<Superintendent>>> {
        match museum.try_read(Museum::superintendent_id)? {
            Some(id) => self.find_required(id).map(Some),
            None => Ok(None),
        }
    }

    /// The museum a superintendent is assigned to
    ///
    /// # Errors
    ///
    /// `NonUniqueResult` if uncommitted changes assign the superintendent to
    /// more than one museum.
    pub fn museum_of_superintendent(
        &mut self,
        superintendent: &Managed<Superintendent>,
    ) -> Result<Option<Managed<Museum>>> {
        let museums = self.inverse::<Museum>(
            "superintendent_id",
            superintendent.id(),
            Museum::superintendent_id,
        )?;
        match SingleResult::from_vec(museums) {
            SingleResult::None => Ok(None),
            SingleResult::One(museum) => Ok(Some(museum)),
            many => many
                .into_result("museum_of_superintendent")
                .map(Some)
                .map_err(ExError::from),
        }
    }

    /// Buildings belonging to a museum, by identity
    pub fn buildings_of(&mut self, museum: &Managed<Museum>) -> Result<Vec<Managed<Building>>> {
        self.inverse::<Building>("museum_id", museum.id(), |b| Some(b.museum_id()))
    }

    /// The museum a building belongs to
    pub fn museum_of(&mut self, building: &Managed<Building>) -> Result<Managed<Museum>> {
        let id = building.try_read(Building::museum_id)?;
        self.find_required(id)
    }

    /// Visits recorded at a museum, by identity
    pub fn visits_of_museum(
        &mut self,
        museum: &Managed<Museum>,
    ) -> Result<Vec<Managed<MuseumVisit>>> {
        self.inverse::<MuseumVisit>("museum_id", museum.id(), |v| Some(v.museum_id()))
    }

    /// Visits made by a visitor, by identity
    pub fn visits_of_visitor(
        &mut self,
        visitor: &Managed<Visitor>,
    ) -> Result<Vec<Managed<MuseumVisit>>> {
        self.inverse::<MuseumVisit>("visitor_id", visitor.id(), |v| Some(v.visitor_id()))
    }

    /// Distinct visitors who visited a museum, by identity
    pub fn members_of(&mut self, museum: &Managed<Museum>) -> Result<Vec<Managed<Visitor>>> {
        let visits = self.visits_of_museum(museum)?;
        let mut ids = BTreeSet::new();
        for visit in &visits {
            ids.insert(visit.try_read(MuseumVisit::visitor_id)?);
        }
        ids.into_iter().map(|id| self.find_required(id)).collect()
    }

    /// Distinct museums a visitor visited, by identity
    pub fn memberships_of(&mut self, visitor: &Managed<Visitor>) -> Result<Vec<Managed<Museum>>> {
        let visits = self.visits_of_visitor(visitor)?;
        let mut ids = BTreeSet::new();
        for visit in &visits {
            ids.insert(visit.try_read(MuseumVisit::museum_id)?);
        }
        ids.into_iter().map(|id| self.find_required(id)).collect()
    }

    pub fn museum_of_visit(&mut self, visit: &Managed<MuseumVisit>) -> Result<Managed<Museum>> {
        let id = visit.try_read(MuseumVisit::museum_id)?;
        self.find_required(id)
    }

    pub fn visitor_of_visit(&mut self, visit: &Managed<MuseumVisit>) -> Result<Managed<Visitor>> {
        let id = visit.try_read(MuseumVisit::visitor_id)?;
        self.find_required(id)
    }

    /// Follow a mandatory reference
    fn find_required<T: Entity>(&mut self, id: i32) -> Result<Managed<T>> {
        self.find::<T>(id)?.ok_or_else(|| {
            ExError::from(MuseumError::NotFound { kind: T::KIND, id }).with_op("navigate")
        })
    }

    /// Entities of kind `T` whose foreign key `column` refers to `owner`
    ///
    /// Matching rows are loaded into the identity map first; the answer is
    /// then read from managed state using `foreign_key`.
    fn inverse<T: Entity>(
        &mut self,
        column: &str,
        owner: i32,
        foreign_key: impl Fn(&T) -> Option<i32>,
    ) -> Result<Vec<Managed<T>>> {
        self.ensure_registered(T::KIND)?;

        let rows = SqliteRepo::select_where(self.conn, T::KIND, column, &Value::from(owner))?;
        for row in rows {
            let entity = T::from_row(&row)?;
            if !self.uow.is_removed(entity.key()) {
                self.uow.reconcile(entity)?;
            }
        }

        let mut related = Vec::new();
        for handle in self.uow.managed_of_kind::<T>()? {
            if handle.try_read(&foreign_key)? == Some(owner) {
                related.push(handle);
            }
        }
        Ok(related)
    }
}
