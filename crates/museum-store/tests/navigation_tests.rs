// Integration tests for association navigation in both directions

mod common;

use common::{date, seed, setup_factory};
use museum_core::model::{Building, Museum, MuseumVisit, Superintendent, Visitor};

fn ids<T: museum_core::model::Entity>(handles: &[museum_store::Managed<T>]) -> Vec<i32> {
    handles.iter().map(|h| h.id()).collect()
}

#[test]
fn test_one_to_one_both_directions() {
    let emf = setup_factory();
    seed(&emf);
    let mut em = emf.create_entity_manager();

    let museum = em.find::<Museum>(1).unwrap().unwrap();
    let superintendent = em.superintendent_of(&museum).unwrap().unwrap();
    assert_eq!(superintendent.borrow().name(), "Lourdes Ramos");

    let back = em.museum_of_superintendent(&superintendent).unwrap().unwrap();
    assert!(back.same_instance(&museum));

    let moma = em.find::<Museum>(2).unwrap().unwrap();
    assert!(em.superintendent_of(&moma).unwrap().is_none());
}

#[test]
fn test_buildings_and_museum_are_consistent() {
    // Given: Seeded buildings
    let emf = setup_factory();
    seed(&emf);
    let mut em = emf.create_entity_manager();
    let museum = em.find::<Museum>(1).unwrap().unwrap();

    // When: The museum's buildings are navigated
    let buildings = em.buildings_of(&museum).unwrap();

    // Then: Each building points back at the same museum instance
    assert_eq!(ids(&buildings), vec![100, 101]);
    for building in &buildings {
        let owner = em.museum_of(building).unwrap();
        assert!(owner.same_instance(&museum));
    }
}

#[test]
fn test_uncommitted_building_changes_are_visible() {
    let emf = setup_factory();
    seed(&emf);
    let mut em = emf.create_entity_manager();
    let molaa = em.find::<Museum>(1).unwrap().unwrap();
    let moma = em.find::<Museum>(2).unwrap().unwrap();

    // Given: A new building staged through the museum and an existing one moved
    em.begin().unwrap();
    let mut annex = Building::new(102, "Annex", &moma.borrow());
    molaa.borrow().add_building(&mut annex);
    em.persist(annex).unwrap();
    let garden = em.find::<Building>(101).unwrap().unwrap();
    garden.borrow_mut().move_to(&moma.borrow());

    // Then: Both sides agree before commit
    assert_eq!(ids(&em.buildings_of(&molaa).unwrap()), vec![100, 102]);
    assert_eq!(ids(&em.buildings_of(&moma).unwrap()), vec![101]);

    // And: After commit a fresh context agrees too
    em.commit().unwrap();
    let mut fresh = emf.create_entity_manager();
    let molaa = fresh.find::<Museum>(1).unwrap().unwrap();
    assert_eq!(ids(&fresh.buildings_of(&molaa).unwrap()), vec![100, 102]);
}

#[test]
fn test_members_are_derived_from_visits() {
    let emf = setup_factory();
    seed(&emf);
    let mut em = emf.create_entity_manager();
    let molaa = em.find::<Museum>(1).unwrap().unwrap();
    let ana = em.find::<Visitor>(1000).unwrap().unwrap();

    // Ana visited MOLAA twice but is one member
    assert_eq!(ids(&em.visits_of_museum(&molaa).unwrap()), vec![5000, 5001, 5002]);
    assert_eq!(ids(&em.members_of(&molaa).unwrap()), vec![1000, 1001]);

    assert_eq!(ids(&em.visits_of_visitor(&ana).unwrap()), vec![5000, 5001, 5003]);
    assert_eq!(ids(&em.memberships_of(&ana).unwrap()), vec![1, 2]);
}

#[test]
fn test_visit_navigates_to_both_ends() {
    let emf = setup_factory();
    seed(&emf);
    let mut em = emf.create_entity_manager();
    let visit = em.find::<MuseumVisit>(5002).unwrap().unwrap();

    let museum = em.museum_of_visit(&visit).unwrap();
    let visitor = em.visitor_of_visit(&visit).unwrap();

    assert_eq!(museum.id(), 1);
    assert_eq!(visitor.borrow().name(), "Ben Carter");
    assert!(visit.borrow().links(&museum.borrow(), &visitor.borrow()));
}

#[test]
fn test_new_visit_makes_new_member() {
    let emf = setup_factory();
    seed(&emf);
    let mut em = emf.create_entity_manager();
    let moma = em.find::<Museum>(2).unwrap().unwrap();
    let ben = em.find::<Visitor>(1001).unwrap().unwrap();

    em.begin().unwrap();
    let visit = MuseumVisit::record(5004, &moma.borrow(), &ben.borrow(), date(2024, 6, 1));
    em.persist(visit).unwrap();

    assert_eq!(ids(&em.members_of(&moma).unwrap()), vec![1000, 1001]);
    em.commit().unwrap();
}

#[test]
fn test_removed_entities_disappear_from_collections() {
    let emf = setup_factory();
    seed(&emf);
    let mut em = emf.create_entity_manager();
    let molaa = em.find::<Museum>(1).unwrap().unwrap();
    let hall = em.find::<Building>(100).unwrap().unwrap();

    em.begin().unwrap();
    em.remove(&hall).unwrap();

    assert_eq!(ids(&em.buildings_of(&molaa).unwrap()), vec![101]);
    em.rollback().unwrap();
    assert_eq!(ids(&em.buildings_of(&molaa).unwrap()), vec![100, 101]);
}

#[test]
fn test_superintendent_without_museum() {
    let emf = setup_factory();
    let mut em = emf.create_entity_manager();
    em.begin().unwrap();
    let s = em.persist(Superintendent::new(30, "Unassigned")).unwrap();

    assert!(em.museum_of_superintendent(&s).unwrap().is_none());
    em.commit().unwrap();
}
