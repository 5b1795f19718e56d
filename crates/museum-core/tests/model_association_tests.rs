// Owning-side association helpers and identity semantics of the model

mod common;

use common::{building, getty, molaa, superintendent, visit};
use museum_core::model::{Building, Entity, EntityKey, EntityKind, Museum, Visitor};
use std::collections::{BTreeSet, HashSet};

#[test]
fn test_add_building_sets_owning_side() {
    // Given: A building of the Getty
    let molaa = molaa();
    let getty = getty();
    let mut annex = building(7, &getty);

    // When: MOLAA adds it
    molaa.add_building(&mut annex);

    // Then: The building's museum reference follows
    assert_eq!(annex.museum_id(), molaa.museum_id());
    assert!(annex.belongs_to(&molaa));
    assert!(!annex.belongs_to(&getty));
}

#[test]
fn test_derived_building_set_is_consistent() {
    // A museum's buildings are exactly those whose reference points at it
    let molaa = molaa();
    let getty = getty();
    let mut buildings = vec![building(1, &molaa), building(2, &molaa), building(3, &getty)];
    buildings[1].move_to(&getty);

    let of_molaa: Vec<&Building> = buildings.iter().filter(|b| b.belongs_to(&molaa)).collect();
    let of_getty: Vec<&Building> = buildings.iter().filter(|b| b.belongs_to(&getty)).collect();

    assert_eq!(of_molaa.iter().map(|b| b.id()).collect::<Vec<_>>(), vec![1]);
    assert_eq!(of_getty.iter().map(|b| b.id()).collect::<Vec<_>>(), vec![2, 3]);
    for b in &buildings {
        assert!(b.belongs_to(&molaa) != b.belongs_to(&getty));
    }
}

#[test]
fn test_superintendent_link_is_owned_by_museum() {
    let mut museum = molaa();
    let s = superintendent();

    museum.set_superintendent(&s);
    assert_eq!(museum.superintendent_id(), Some(s.id()));

    museum.clear_superintendent();
    assert_eq!(museum.superintendent_id(), None);
}

#[test]
fn test_members_projected_from_visits() {
    // Given: Two visitors, one of whom visits MOLAA twice
    let molaa = molaa();
    let getty = getty();
    let ana = Visitor::new(1, "Ana Lopez");
    let ben = Visitor::new(2, "Ben Carter");
    let visits = vec![
        visit(1, &molaa, &ana, 1),
        visit(2, &molaa, &ana, 2),
        visit(3, &getty, &ben, 2),
    ];

    // When: Members are derived from the visits
    let members: BTreeSet<i32> = visits
        .iter()
        .filter(|v| v.museum_id() == molaa.museum_id())
        .map(|v| v.visitor_id())
        .collect();

    // Then: Each visitor appears once, and only if a visit links them
    assert_eq!(members.into_iter().collect::<Vec<_>>(), vec![ana.id()]);
    assert!(visits[0].links(&molaa, &ana));
    assert!(!visits[2].links(&molaa, &ben));
}

#[test]
fn test_equality_and_hashing_follow_identity() {
    let original = molaa();
    let mut renamed = original.clone();
    renamed.set_name("Renamed");

    assert_eq!(original, renamed);
    assert_ne!(original, getty());

    let set: HashSet<Museum> = [original.clone(), renamed, getty()].into_iter().collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn test_entity_keys() {
    let key = molaa().key();
    assert_eq!(key, EntityKey::new(EntityKind::Museum, 1));
    assert_eq!(key.to_string(), "Museum#1");
    assert_eq!(superintendent().key().kind, EntityKind::Superintendent);
}

#[test]
fn test_row_form_rebuilds_equal_state() {
    let museum = molaa();
    let row = museum.to_row();
    assert_eq!(Museum::from_row(&row).unwrap().to_row(), row);
}
