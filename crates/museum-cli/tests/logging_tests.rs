// Operation-boundary logging of the driver

mod common;

use common::{run_script, setup_factory};
use museum_cli::commands::basic;
use museum_cli::RunOptions;
use museum_core::logging_facility::init_test_capture;
use museum_core::model::Museum;
use museum_core_types::schema::{FIELD_ENTITY_ID, FIELD_ENTITY_KIND};

#[test]
fn test_examples_log_start_and_end() {
    let capture = init_test_capture();
    let emf = setup_factory();

    run_script(&emf, RunOptions::default(), "\n");

    for op in ["basic_demos", "find_by_key", "create_and_update", "list_all"] {
        capture.assert_event_exists(op, "start");
        capture.assert_event_exists(op, "end");
    }
    let end = capture
        .events_for_op("basic_demos")
        .into_iter()
        .find(|e| e.event.as_deref() == Some("end"))
        .unwrap();
    assert!(end.field("duration_ms").is_some());
}

#[test]
fn test_single_entity_examples_name_their_museum() {
    let capture = init_test_capture();
    let emf = setup_factory();

    // Given: The seeded database with the association examples enabled
    let options = RunOptions {
        seed: true,
        associations: true,
        ..RunOptions::default()
    };
    run_script(&emf, options, "\n");

    // Then: Example 1 names museum 4 and the navigation examples name museum 1
    let named = |op: &str, id: &str| {
        capture.count_events(|e| {
            e.op.as_deref() == Some(op)
                && e.field(FIELD_ENTITY_KIND) == Some("Museum")
                && e.field(FIELD_ENTITY_ID) == Some(id)
        })
    };
    assert!(named("find_by_key", "4") >= 2);
    for op in ["one_to_one", "one_to_many", "many_to_many"] {
        assert!(named(op, "1") >= 2, "{op} should carry museum 1");
    }
    // The whole-script wrapper is not tied to an entity
    assert!(capture
        .events_for_op("basic_demos")
        .iter()
        .all(|e| e.field(FIELD_ENTITY_KIND).is_none()));
}

#[test]
fn test_fatal_error_logs_code() {
    let capture = init_test_capture();
    let emf = setup_factory();
    let mut em = emf.create_entity_manager();
    em.begin().unwrap();
    em.persist(Museum::new(1, "A", basic::UPDATED_LOCATION)).unwrap();
    em.persist(Museum::new(2, "B", basic::UPDATED_LOCATION)).unwrap();
    em.commit().unwrap();
    drop(em);

    let mut input = std::io::Cursor::new(b"\n".to_vec());
    let result = museum_cli::run(&emf, &RunOptions::default(), &mut input, &mut Vec::new());

    assert!(result.is_err());
    let errors = capture.count_events(|e| {
        e.op.as_deref() == Some("query_by_location")
            && e.event.as_deref() == Some("end_error")
            && e.field("err_code") == Some("ERR_NON_UNIQUE_RESULT")
    });
    assert_eq!(errors, 1);
}
