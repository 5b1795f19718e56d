//! Sample dataset for the association examples
//!
//! MOLAA (museum 1) with its superintendent, two buildings, and two
//! visitors; the Getty Center (museum 2) shares one of the visitors.

use super::say;
use chrono::NaiveDate;
use museum_core::errors::{ExError, ExErrorKind};
use museum_core::model::{Building, Museum, MuseumVisit, Superintendent, Visitor};
use museum_store::{EntityManagerFactory, Result};
use std::io::Write;

fn date(year: i32, month: u32, day: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        ExError::new(ExErrorKind::InvalidInput)
            .with_op("seed")
            .with_message(format!("invalid date {}-{}-{}", year, month, day))
    })
}

/// Insert the sample dataset unless the database already holds museums
///
/// Returns whether anything was inserted.
pub fn execute<W: Write>(emf: &EntityManagerFactory, out: &mut W) -> Result<bool> {
    let mut em = emf.create_entity_manager();

    let existing = em
        .create_query::<Museum>("select m from museums m")?
        .get_result_list()?;
    if !existing.is_empty() {
        say!(out, "Database already holds {} museum(s); not seeding.", existing.len())?;
        return Ok(false);
    }

    let superintendent =
        Superintendent::new(1, "Lourdes Ramos").with_title("President and CEO");
    let mut molaa = Museum::new(1, "Museum of Latin American Art", "Long Beach, CA");
    molaa.set_superintendent(&superintendent);
    let getty = Museum::new(2, "Getty Center", "Los Angeles, CA");

    let main_gallery = Building::new(1, "Main Gallery", &molaa).with_address("628 Alamitos Ave");
    let sculpture_garden = Building::new(2, "Sculpture Garden", &molaa);

    let neal = Visitor::new(1, "Neal Terrell");
    let ana = Visitor::new(2, "Ana Lopez");

    let visits = vec![
        MuseumVisit::record(1, &molaa, &neal, date(2024, 3, 9)?),
        MuseumVisit::record(2, &molaa, &ana, date(2024, 3, 9)?),
        MuseumVisit::record(3, &getty, &neal, date(2024, 4, 13)?),
    ];

    em.transactional(|em| {
        em.persist(superintendent)?;
        em.persist(molaa)?;
        em.persist(getty)?;
        em.persist(main_gallery)?;
        em.persist(sculpture_garden)?;
        em.persist(neal)?;
        em.persist(ana)?;
        for visit in visits {
            em.persist(visit)?;
        }
        Ok(())
    })?;

    say!(out, "Sample data inserted.")?;
    em.close()?;
    Ok(true)
}
