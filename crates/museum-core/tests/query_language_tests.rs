// Query language: parsing, planning, and single-result classification

use museum_core::errors::MuseumError;
use museum_core::model::{EntityKind, Value, ValueType};
use museum_core::query::{compile, parse, Bind, Operand, SingleResult};
use proptest::prelude::*;

fn registry() -> Vec<EntityKind> {
    EntityKind::ALL.to_vec()
}

#[test]
fn test_location_query_binds_literal() {
    // Given: The location lookup from the basic demonstrations
    let plan = compile(
        "SELECT m FROM museums m WHERE m.location = 'Long Beach, CA'",
        &registry(),
    )
    .unwrap();

    // Then: The literal becomes a bind value rather than SQL text
    assert_eq!(plan.kind, EntityKind::Museum);
    assert!(!plan.sql.contains("Long Beach"));
    assert_eq!(
        plan.binds,
        vec![Bind::Literal(Value::Text("Long Beach, CA".to_string()))]
    );
    assert!(plan.parameters().is_empty());
}

#[test]
fn test_reused_parameter_is_listed_once() {
    let plan = compile(
        "SELECT m FROM museums m WHERE m.name = ?1 AND m.location = ?1",
        &registry(),
    )
    .unwrap();

    assert_eq!(plan.binds.len(), 2);
    assert_eq!(plan.parameters(), vec![1]);
}

#[test]
fn test_visit_query_through_both_associations() {
    let plan = compile(
        "SELECT v FROM museum_visits v WHERE v.museum.name = ?1 AND v.visitor.name = ?2",
        &registry(),
    )
    .unwrap();

    assert_eq!(plan.kind, EntityKind::MuseumVisit);
    assert_eq!(plan.sql.matches(" JOIN ").count(), 2);
    assert_eq!(plan.parameter_type(1), Some(ValueType::Text));
    assert_eq!(plan.parameter_type(2), Some(ValueType::Text));
}

#[test]
fn test_two_hop_path_rejected() {
    let err = compile(
        "SELECT b FROM buildings b WHERE b.museum.superintendent.name = 'x'",
        &registry(),
    )
    .unwrap_err();

    assert!(err.to_string().contains("more than one association"));
}

#[test]
fn test_association_target_must_be_registered() {
    let err = compile(
        "SELECT b FROM buildings b WHERE b.museum.name = 'x'",
        &[EntityKind::Building],
    )
    .unwrap_err();

    assert!(matches!(err, MuseumError::QueryMalformed { .. }));
}

#[test]
fn test_single_result_from_plan_outcome() {
    let err = SingleResult::from_vec(vec!["a", "b"])
        .into_result("SELECT m FROM museums m")
        .unwrap_err();

    assert!(err.to_string().starts_with("Query returned 2 results"));
    assert_eq!(SingleResult::from_vec(vec!["a"]).one(), Some("a"));
}

fn random_case(word: &'static str) -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
        word.chars()
            .zip(upper)
            .map(|(c, u)| {
                if u {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_string_literal_survives_quote_escaping(text in "[A-Za-z0-9 ,.'#-]{0,40}") {
        let query = format!(
            "SELECT m FROM museums m WHERE m.name = '{}'",
            text.replace('\'', "''")
        );

        let stmt = parse(&query).unwrap();

        prop_assert_eq!(
            &stmt.conditions[0].operand,
            &Operand::Literal(Value::Text(text))
        );
    }

    #[test]
    fn prop_keywords_are_case_insensitive(
        select in random_case("select"),
        from in random_case("from"),
        where_ in random_case("where"),
    ) {
        let query = format!("{} m {} museums m {} m.museumId = ?1", select, from, where_);

        let plan = compile(&query, &EntityKind::ALL).unwrap();
        let canonical = compile("SELECT m FROM museums m WHERE m.museumId = ?1", &EntityKind::ALL).unwrap();

        prop_assert_eq!(plan.sql, canonical.sql);
        prop_assert_eq!(plan.binds, canonical.binds);
    }

    #[test]
    fn prop_integer_literal_binds_exactly(id in any::<i32>()) {
        let query = format!("SELECT b FROM buildings b WHERE b.museum.museumId = {}", id);

        let plan = compile(&query, &EntityKind::ALL).unwrap();

        prop_assert_eq!(plan.binds, vec![Bind::Literal(Value::Integer(i64::from(id)))]);
    }

    #[test]
    fn prop_parameter_position_is_preserved(index in 1usize..1000) {
        let query = format!("SELECT v FROM visitors v WHERE v.name = ?{}", index);

        let plan = compile(&query, &EntityKind::ALL).unwrap();

        prop_assert_eq!(plan.parameters(), vec![index]);
        prop_assert_eq!(plan.parameter_type(index), Some(ValueType::Text));
    }
}
