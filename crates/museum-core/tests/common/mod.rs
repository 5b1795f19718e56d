// Shared fixtures for museum-core integration tests

#![allow(dead_code)]

use chrono::NaiveDate;
use museum_core::model::{Building, Museum, MuseumVisit, Superintendent, Visitor};

pub fn molaa() -> Museum {
    Museum::new(1, "Museum of Latin American Art", "Long Beach, CA")
}

pub fn getty() -> Museum {
    Museum::new(2, "Getty Center", "Los Angeles, CA")
}

pub fn superintendent() -> Superintendent {
    Superintendent::new(1, "Lourdes Ramos").with_title("President and CEO")
}

pub fn building(id: i32, museum: &Museum) -> Building {
    Building::new(id, format!("Building {}", id), museum)
}

pub fn visit(id: i32, museum: &Museum, visitor: &Visitor, day: u32) -> MuseumVisit {
    let date = NaiveDate::from_ymd_opt(2024, 3, day).expect("valid date");
    MuseumVisit::record(id, museum, visitor, date)
}
