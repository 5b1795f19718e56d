//! Finding, creating, and updating individual entities

use super::{logged, logged_entity, say};
use museum_core::errors::{ExError, ExErrorKind, MuseumError};
use museum_core::model::{EntityKey, EntityKind, Museum};
use museum_store::{EntityManager, EntityManagerFactory, Managed, Result};
use std::io::{BufRead, Write};

pub const NEW_MUSEUM_ID: i32 = 4;
pub const NEW_MUSEUM_NAME: &str = "Metropolitan Museum of Art of New York City";
pub const NEW_MUSEUM_LOCATION: &str = "New York, NY";
pub const UPDATED_LOCATION: &str = "Manhattan, New York, NY";

/// Examples 1 through 4
pub fn execute<R: BufRead, W: Write>(
    emf: &EntityManagerFactory,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let mut em = emf.create_entity_manager();

    let key = EntityKey::new(EntityKind::Museum, NEW_MUSEUM_ID);
    let existing = logged_entity("find_by_key", key, || find_by_key(&mut em, out))?;

    // Guarded so re-running never stages a second museum 4.
    if existing.is_none() {
        logged_entity("create_and_update", key, || create_and_update(&mut em, out))?;
    }

    logged("query_by_location", || query_by_location(&mut em, out))?;
    logged("query_by_name", || query_by_name(&mut em, input, out))?;
    logged("list_all", || list_all(&mut em, out))?;

    em.close()
}

/// Example 1
pub fn find_by_key<W: Write>(
    em: &mut EntityManager<'_>,
    out: &mut W,
) -> Result<Option<Managed<Museum>>> {
    say!(out, "Example 1: find an entity based on its primary key.")?;
    let museum = em.find::<Museum>(NEW_MUSEUM_ID)?;
    match &museum {
        Some(m) => say!(out, "Museum with ID {}: {}", NEW_MUSEUM_ID, m)?,
        None => say!(out, "There is no museum with ID {}", NEW_MUSEUM_ID)?,
    }
    Ok(museum)
}

/// Example 2: stage and commit a new museum, then update it through dirty tracking
pub fn create_and_update<W: Write>(em: &mut EntityManager<'_>, out: &mut W) -> Result<()> {
    say!(out)?;
    say!(out, "Example 2: creating a new entity.")?;

    em.begin()?;
    let museum = em.persist(Museum::new(
        NEW_MUSEUM_ID,
        NEW_MUSEUM_NAME,
        NEW_MUSEUM_LOCATION,
    ))?;
    em.commit()?;
    say!(out, "Museum {} added to database.", museum)?;

    let from_database = em.find::<Museum>(NEW_MUSEUM_ID)?.ok_or_else(|| {
        ExError::from(MuseumError::NotFound {
            kind: EntityKind::Museum,
            id: NEW_MUSEUM_ID,
        })
    })?;
    em.begin()?;
    from_database.borrow_mut().set_location(UPDATED_LOCATION);
    em.commit()?;

    Ok(())
}

/// Example 3: a query by attribute expecting exactly one result
pub fn query_by_location<W: Write>(em: &mut EntityManager<'_>, out: &mut W) -> Result<()> {
    say!(out)?;
    say!(out, "Example #3: retrieving an object without its primary key")?;

    let query = format!(
        "SELECT m FROM museums m WHERE m.location = '{}'",
        UPDATED_LOCATION
    );
    let museum = em.create_query::<Museum>(&query)?.get_single_result()?;
    say!(out, "MOLAA retrieved: {}", museum)?;
    Ok(())
}

/// Example 3b: a parameterized query with user input
pub fn query_by_name<R: BufRead, W: Write>(
    em: &mut EntityManager<'_>,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    say!(out, "Please enter a museum name: ")?;
    out.flush()
        .map_err(|e| museum_store::errors::io_error("write_output", e))?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .map_err(|e| museum_store::errors::io_error("read_input", e))?;
    let name = line.trim_end_matches(['\r', '\n']);

    let result = em
        .create_query::<Museum>("SELECT m FROM museums m WHERE m.name = ?1")?
        .set_parameter(1, name)?
        .get_single_result();

    match result {
        Ok(museum) => say!(out, "Your requested museum: {}", museum)?,
        Err(err) if err.kind() == ExErrorKind::NoResult => {
            say!(out, "Museum with name '{}' not found.", name)?
        }
        Err(err) => return Err(err),
    }
    Ok(())
}

/// Example 4: every museum
pub fn list_all<W: Write>(em: &mut EntityManager<'_>, out: &mut W) -> Result<()> {
    say!(out)?;
    say!(out, "Example #4: Using the query language to select all museums")?;

    let museums = em
        .create_query::<Museum>("select m from museums m")?
        .get_result_list()?;
    for museum in &museums {
        say!(out, "{}", museum)?;
    }
    Ok(())
}
