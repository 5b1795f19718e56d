// Shared helpers for store integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use museum_core::model::{Building, EntityKind, Museum, MuseumVisit, Superintendent, Visitor};
use museum_store::config::{DatabaseLocation, PersistenceUnit};
use museum_store::context::EntityManagerFactory;
use std::path::Path;

/// Factory over a private in-memory database
pub fn setup_factory() -> EntityManagerFactory {
    EntityManagerFactory::open(PersistenceUnit::in_memory("test"))
        .expect("Failed to open in-memory persistence unit")
}

/// Factory over an on-disk database, for fresh-connection round trips
pub fn file_factory(path: &Path) -> EntityManagerFactory {
    let unit = PersistenceUnit::new(
        "test",
        DatabaseLocation::File(path.to_path_buf()),
        &EntityKind::ALL,
    );
    EntityManagerFactory::open(unit).expect("Failed to open file persistence unit")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// MOLAA (1) with superintendent 10, buildings 100 and 101, visitors 1000
/// and 1001, and MoMA (2) visited once by visitor 1000
pub fn seed(emf: &EntityManagerFactory) {
    let mut em = emf.create_entity_manager();
    em.begin().unwrap();

    let superintendent = Superintendent::new(10, "Lourdes Ramos").with_title("President and CEO");
    let mut molaa = Museum::new(1, "Museum of Latin American Art", "Long Beach, CA");
    molaa.set_superintendent(&superintendent);
    let moma = Museum::new(2, "Museum of Modern Art", "New York, NY");

    let main_hall = Building::new(100, "Main Hall", &molaa).with_address("628 Alamitos Ave");
    let sculpture = Building::new(101, "Sculpture Garden", &molaa);

    let ana = Visitor::new(1000, "Ana Lopez");
    let ben = Visitor::new(1001, "Ben Carter");

    let visits = [
        MuseumVisit::record(5000, &molaa, &ana, date(2024, 3, 9)),
        MuseumVisit::record(5001, &molaa, &ana, date(2024, 4, 2)),
        MuseumVisit::record(5002, &molaa, &ben, date(2024, 3, 9)),
        MuseumVisit::record(5003, &moma, &ana, date(2024, 5, 1)),
    ];

    em.persist(superintendent).unwrap();
    em.persist(molaa).unwrap();
    em.persist(moma).unwrap();
    em.persist(main_hall).unwrap();
    em.persist(sculpture).unwrap();
    em.persist(ana).unwrap();
    em.persist(ben).unwrap();
    for visit in visits {
        em.persist(visit).unwrap();
    }
    em.commit().unwrap();
}
