// Shared helpers for driver tests

#![allow(dead_code)]

use museum_cli::{run, RunOptions};
use museum_core::model::Museum;
use museum_store::{EntityManagerFactory, PersistenceUnit};
use std::io::Cursor;

pub fn setup_factory() -> EntityManagerFactory {
    EntityManagerFactory::open(PersistenceUnit::in_memory("test"))
        .expect("Failed to open in-memory persistence unit")
}

/// Run the script with `input` on stdin and return stdout
pub fn run_script(emf: &EntityManagerFactory, options: RunOptions, input: &str) -> String {
    let mut reader = Cursor::new(input.as_bytes().to_vec());
    let mut output = Vec::new();
    run(emf, &options, &mut reader, &mut output).expect("script should succeed");
    String::from_utf8(output).expect("output is UTF-8")
}

pub fn insert_museums(emf: &EntityManagerFactory, museums: Vec<Museum>) {
    let mut em = emf.create_entity_manager();
    em.begin().unwrap();
    for museum in museums {
        em.persist(museum).unwrap();
    }
    em.commit().unwrap();
}

/// Lines printed after `header` up to the next blank line or header-like line
pub fn section<'a>(output: &'a str, header: &str) -> Vec<&'a str> {
    output
        .lines()
        .skip_while(|line| *line != header)
        .skip(1)
        .take_while(|line| !line.is_empty() && !line.ends_with(':'))
        .collect()
}
