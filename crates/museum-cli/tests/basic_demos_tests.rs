// End-to-end scenarios for the basic demonstrations

mod common;

use common::{insert_museums, run_script, section, setup_factory};
use museum_cli::commands::basic;
use museum_cli::RunOptions;
use museum_core::errors::ExErrorKind;
use museum_core::model::Museum;

#[test]
fn test_first_run_creates_and_updates_museum_four() {
    // Given: An empty database
    let emf = setup_factory();

    // When: The driver runs
    let output = run_script(&emf, RunOptions::default(), "Nothing\n");

    // Then: Example 1 reports absence and Example 2 runs
    assert!(output.contains("There is no museum with ID 4"));
    assert!(output.contains("Example 2: creating a new entity."));
    assert!(output.contains(
        "Museum Metropolitan Museum of Art of New York City (4), located in New York, NY added to database."
    ));

    // And: Example 3 finds the updated museum
    assert!(output.contains(
        "MOLAA retrieved: Metropolitan Museum of Art of New York City (4), located in Manhattan, New York, NY"
    ));

    // And: A fresh context observes the update
    let mut fresh = emf.create_entity_manager();
    let museum = fresh.find::<Museum>(4).unwrap().unwrap();
    assert_eq!(museum.borrow().name(), basic::NEW_MUSEUM_NAME);
    assert_eq!(museum.borrow().location(), basic::UPDATED_LOCATION);
}

#[test]
fn test_second_run_skips_creation() {
    let emf = setup_factory();
    run_script(&emf, RunOptions::default(), "\n");

    // Re-running must not raise an identity conflict
    let output = run_script(&emf, RunOptions::default(), "\n");

    assert!(output.contains(
        "Museum with ID 4: Metropolitan Museum of Art of New York City (4), located in Manhattan, New York, NY"
    ));
    assert!(!output.contains("Example 2"));
}

#[test]
fn test_query_by_location_returns_single_museum() {
    // Given: Museum 1 is the only museum in Manhattan
    let emf = setup_factory();
    insert_museums(
        &emf,
        vec![
            Museum::new(1, "The Frick Collection", basic::UPDATED_LOCATION),
            Museum::new(2, "MOLAA", "Long Beach, CA"),
        ],
    );
    let mut em = emf.create_entity_manager();
    let mut out = Vec::new();

    // When: Example 3 runs
    basic::query_by_location(&mut em, &mut out).unwrap();

    // Then: Museum 1 is retrieved
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("MOLAA retrieved: The Frick Collection (1)"));
}

#[test]
fn test_query_by_location_with_two_matches_is_fatal() {
    let emf = setup_factory();
    insert_museums(
        &emf,
        vec![
            Museum::new(1, "The Frick Collection", basic::UPDATED_LOCATION),
            Museum::new(2, "The Morgan Library", basic::UPDATED_LOCATION),
        ],
    );
    let mut em = emf.create_entity_manager();

    let err = basic::query_by_location(&mut em, &mut Vec::new()).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NonUniqueResult);
}

#[test]
fn test_prompted_name_is_found() {
    let emf = setup_factory();
    insert_museums(&emf, vec![Museum::new(1, "MOLAA", "Long Beach, CA")]);

    let output = run_script(&emf, RunOptions::default(), "MOLAA\n");

    assert!(output.contains("Please enter a museum name: "));
    assert!(output.contains("Your requested museum: MOLAA (1), located in Long Beach, CA"));
}

#[test]
fn test_unknown_name_is_reported_and_script_continues() {
    let emf = setup_factory();

    let output = run_script(&emf, RunOptions::default(), "No Such Museum\r\n");

    assert!(output.contains("Museum with name 'No Such Museum' not found."));
    assert!(output.contains("Example #4: Using the query language to select all museums"));
}

#[test]
fn test_list_all_prints_one_line_per_museum() {
    // Given: Three museums, one of them museum 4
    let emf = setup_factory();
    insert_museums(
        &emf,
        vec![
            Museum::new(1, "MOLAA", "Long Beach, CA"),
            Museum::new(2, "Getty Center", "Los Angeles, CA"),
            Museum::new(4, basic::NEW_MUSEUM_NAME, basic::UPDATED_LOCATION),
        ],
    );

    // When: The driver runs
    let output = run_script(&emf, RunOptions::default(), "\n");

    // Then: Example 4 prints exactly three museums
    let listed = section(&output, "Example #4: Using the query language to select all museums");
    assert_eq!(listed.len(), 3);
    assert!(listed.iter().any(|line| line.starts_with("Getty Center (2)")));
}
