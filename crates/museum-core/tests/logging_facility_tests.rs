// Boundary macro output checked through the shared test capture.
// Every test uses its own op name because the capture is global.

use museum_core::errors::MuseumError;
use museum_core::model::{EntityKey, EntityKind};
use museum_core::logging_facility::init_test_capture;
use museum_core::{log_op_end, log_op_error, log_op_start};
use museum_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_ENTITY_ID, FIELD_ENTITY_KIND,
};
use tracing::Level;

#[test]
fn test_start_and_end_are_paired() {
    let capture = init_test_capture();

    // Given: An operation wrapped in the boundary macros
    log_op_start!("lf_paired_op");
    log_op_end!("lf_paired_op", duration_ms = 5);

    // Then: Both events exist, in order, tagged with this module
    let events = capture.events_for_op("lf_paired_op");
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].event.as_deref(), Some(EVENT_START));
    assert_eq!(events[1].event.as_deref(), Some(EVENT_END));
    assert_eq!(events[1].field("duration_ms"), Some("5"));
    assert!(events[0]
        .component
        .as_deref()
        .is_some_and(|c| c.starts_with("logging_facility_tests")));
}

#[test]
fn test_extra_fields_are_recorded() {
    let capture = init_test_capture();

    log_op_start!("lf_fields_op", entity_id = 4);
    log_op_end!("lf_fields_op", duration_ms = 1, rows = 3);

    let events = capture.events_for_op("lf_fields_op");
    assert_eq!(events[0].field("entity_id"), Some("4"));
    assert_eq!(events[1].field("rows"), Some("3"));
}

#[test]
fn test_error_event_carries_code() {
    let capture = init_test_capture();

    // When: An operation ends in a domain error
    let err = MuseumError::NonUniqueResult {
        query: "SELECT m FROM museums m".to_string(),
        count: 2,
    };
    log_op_error!("lf_error_op", err, duration_ms = 2);

    // Then: The error event is at ERROR level with the stable code
    capture.assert_event_exists("lf_error_op", EVENT_END_ERROR);
    let events = capture.events_for_op("lf_error_op");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::ERROR);
    assert_eq!(events[0].field("err_code"), Some("ERR_NON_UNIQUE_RESULT"));
}

#[test]
fn test_entity_key_is_recorded_on_start_and_end() {
    let capture = init_test_capture();

    // Given: An operation on a single museum
    let key = EntityKey::new(EntityKind::Museum, 4);
    log_op_start!("lf_key_op", key = key);
    log_op_end!("lf_key_op", key = key, duration_ms = 2);

    // Then: Both events name the entity
    let events = capture.events_for_op("lf_key_op");
    assert_eq!(events.len(), 2);
    for event in &events {
        assert_eq!(event.field(FIELD_ENTITY_KIND), Some("Museum"));
        assert_eq!(event.field(FIELD_ENTITY_ID), Some("4"));
    }
    assert_eq!(events[1].field("duration_ms"), Some("2"));
}

#[test]
fn test_error_event_names_the_missing_entity() {
    let capture = init_test_capture();

    // When: The error identifies an entity
    let err = MuseumError::NotFound {
        kind: EntityKind::Building,
        id: 7,
    };
    log_op_error!("lf_not_found_op", err, duration_ms = 1);

    // Then: The entity is carried onto the error event
    let events = capture.events_for_op("lf_not_found_op");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("err_code"), Some("ERR_NOT_FOUND"));
    assert_eq!(events[0].field(FIELD_ENTITY_KIND), Some("Building"));
    assert_eq!(events[0].field(FIELD_ENTITY_ID), Some("7"));
}

#[test]
fn test_error_without_entity_omits_entity_fields() {
    let capture = init_test_capture();

    let err = MuseumError::NoResult {
        query: "SELECT m FROM museums m WHERE m.museumId = 99".to_string(),
    };
    log_op_error!("lf_no_entity_op", err, duration_ms = 1);

    let events = capture.events_for_op("lf_no_entity_op");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field(FIELD_ENTITY_KIND), None);
}

#[test]
fn test_count_events_filters_by_predicate() {
    let capture = init_test_capture();

    for _ in 0..3 {
        log_op_start!("lf_count_op");
    }

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some("lf_count_op") && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(starts, 3);
}
