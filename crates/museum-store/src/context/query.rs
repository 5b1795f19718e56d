//! Typed queries over the entity query language

#![allow(clippy::result_large_err)]

use crate::context::{EntityManager, Managed};
use crate::errors::Result;
use crate::repo::SqliteRepo;
use museum_core::errors::{ExError, MuseumError};
use museum_core::model::{Entity, Value};
use museum_core::query::{Bind, QueryPlan, SingleResult};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// A compiled query producing entities of type `T`
///
/// Results are reconciled into the manager's identity map: a row that is
/// already managed yields the existing handle. Queries read the committed
/// database state.
pub struct TypedQuery<'m, 'f, T: Entity> {
    em: &'m mut EntityManager<'f>,
    plan: QueryPlan,
    parameters: BTreeMap<usize, Value>,
    _entity: PhantomData<T>,
}

impl<'m, 'f, T: Entity> TypedQuery<'m, 'f, T> {
    pub(crate) fn new(em: &'m mut EntityManager<'f>, plan: QueryPlan) -> Self {
        Self {
            em,
            plan,
            parameters: BTreeMap::new(),
            _entity: PhantomData,
        }
    }

    /// Bind positional parameter `?index` (1-based)
    ///
    /// # Errors
    ///
    /// `QueryMalformed` if the query has no such parameter or the value's
    /// type does not match the attribute it is compared with.
    pub fn set_parameter(&mut self, index: usize, value: impl Into<Value>) -> Result<&mut Self> {
        let value = value.into();
        let expected = self.plan.parameter_type(index).ok_or_else(|| {
            ExError::from(MuseumError::UnknownParameter { index }).with_op("set_parameter")
        })?;

        if !value.is_compatible_with(expected) {
            let actual = value
                .value_type()
                .map(|t| t.to_string())
                .unwrap_or_else(|| "null".to_string());
            return Err(ExError::from(MuseumError::ParameterType {
                index,
                expected: expected.to_string(),
                actual,
            })
            .with_op("set_parameter"));
        }

        self.parameters.insert(index, value.coerce_to(expected));
        Ok(self)
    }

    /// The query text
    pub fn query(&self) -> &str {
        &self.plan.query
    }

    /// All matching entities, ordered by identity
    pub fn get_result_list(&mut self) -> Result<Vec<Managed<T>>> {
        let values = self.bound_values()?;
        tracing::debug!(query = %self.plan.query, sql = %self.plan.sql, "executing query");

        let rows = SqliteRepo::query(self.em.conn, self.plan.kind, &self.plan.sql, &values)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let entity = T::from_row(&row)?;
            if self.em.uow.is_removed(entity.key()) {
                continue;
            }
            if let Some(handle) = self.em.uow.reconcile(entity)? {
                results.push(handle);
            }
        }
        Ok(results)
    }

    /// Zero, one, or many matches as data
    pub fn single_result(&mut self) -> Result<SingleResult<Managed<T>>> {
        Ok(SingleResult::from_vec(self.get_result_list()?))
    }

    /// The single matching entity
    ///
    /// # Errors
    ///
    /// `NoResult` if nothing matched, `NonUniqueResult` if more than one row did.
    pub fn get_single_result(&mut self) -> Result<Managed<T>> {
        let query = self.plan.query.clone();
        self.single_result()?
            .into_result(&query)
            .map_err(|e| ExError::from(e).with_op("get_single_result"))
    }

    fn bound_values(&self) -> Result<Vec<Value>> {
        self.plan
            .binds
            .iter()
            .map(|bind| match bind {
                Bind::Literal(value) => Ok(value.clone()),
                Bind::Parameter { index, .. } => {
                    self.parameters.get(index).cloned().ok_or_else(|| {
                        ExError::from(MuseumError::UnboundParameter { index: *index })
                            .with_op("execute_query")
                    })
                }
            })
            .collect()
    }
}
