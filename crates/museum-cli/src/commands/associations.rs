//! Navigating associations in both directions

use super::{logged_entity, say};
use museum_core::model::{Building, Museum, Visitor};
use museum_store::{EntityManager, EntityManagerFactory, Managed, Result};
use std::io::Write;

/// Example 6 query: an association path compared with a literal identity
pub const MOLAA_BUILDINGS_QUERY: &str = "SELECT b FROM BUILDINGS b WHERE b.museum.museumId = 1";

/// Examples 5 through 7, centered on museum 1
pub fn execute<W: Write>(emf: &EntityManagerFactory, out: &mut W) -> Result<()> {
    let mut em = emf.create_entity_manager();

    let Some(molaa) = em.find::<Museum>(1)? else {
        say!(out)?;
        say!(out, "There is no museum with ID 1")?;
        return em.close();
    };

    logged_entity("one_to_one", molaa.key(), || one_to_one(&mut em, &molaa, out))?;
    logged_entity("one_to_many", molaa.key(), || one_to_many(&mut em, &molaa, out))?;
    logged_entity("many_to_many", molaa.key(), || many_to_many(&mut em, &molaa, out))?;

    em.close()
}

/// Example 5
pub fn one_to_one<W: Write>(
    em: &mut EntityManager<'_>,
    molaa: &Managed<Museum>,
    out: &mut W,
) -> Result<()> {
    say!(out)?;
    say!(out, "Example #5: Navigating a one-to-one association")?;

    match em.superintendent_of(molaa)? {
        Some(superintendent) => {
            say!(out, "MOLAA's Superintendent: {}", superintendent)?;
            if let Some(museum) = em.museum_of_superintendent(&superintendent)? {
                say!(out, "{} superintends {}", superintendent, museum)?;
            }
        }
        None => say!(out, "MOLAA has no superintendent")?,
    }
    Ok(())
}

/// Example 6: navigation and a query must agree on the building set
pub fn one_to_many<W: Write>(
    em: &mut EntityManager<'_>,
    molaa: &Managed<Museum>,
    out: &mut W,
) -> Result<()> {
    say!(out)?;
    say!(out, "Example #6: Navigating a one-to-many association")?;

    say!(out, "MOLAA's Buildings:")?;
    for building in em.buildings_of(molaa)? {
        say!(out, "{}", building)?;
    }

    say!(out)?;
    if let Some(building) = em.find::<Building>(1)? {
        let museum = em.museum_of(&building)?;
        say!(out, "{} is in Museum {}", building, museum)?;
    }

    let buildings = em
        .create_query::<Building>(MOLAA_BUILDINGS_QUERY)?
        .get_result_list()?;
    say!(out, "MOLAA's Buildings, using a query:")?;
    for building in &buildings {
        say!(out, "{}", building)?;
    }
    Ok(())
}

/// Example 7: members and memberships are projected from visits
pub fn many_to_many<W: Write>(
    em: &mut EntityManager<'_>,
    molaa: &Managed<Museum>,
    out: &mut W,
) -> Result<()> {
    say!(out)?;
    say!(out, "Example #7: Navigating a many-to-many association")?;

    say!(out, "The Members of {}:", molaa)?;
    for visitor in em.members_of(molaa)? {
        say!(out, "{}", visitor)?;
        for museum in em.memberships_of(&visitor)? {
            say!(out, "\tmember of {} ", museum)?;
        }
    }

    for visit in em.visits_of_museum(molaa)? {
        let visitor = em.visitor_of_visit(&visit)?;
        let museum = em.museum_of_visit(&visit)?;
        let date = visit.borrow().visit_date();
        say!(out, "{} went to {} on {}", visitor, museum, date)?;
    }

    if let Some(visitor) = em.find::<Visitor>(1)? {
        for visit in em.visits_of_visitor(&visitor)? {
            let museum = em.museum_of_visit(&visit)?;
            let date = visit.borrow().visit_date();
            say!(out, "{} went to {} on {}", visitor, museum, date)?;
        }
    }
    Ok(())
}
