//! Identity-based equality of entities

use super::say;
use museum_core::model::Museum;
use museum_store::{EntityManagerFactory, Result};
use std::collections::HashSet;
use std::io::Write;

/// Example 8
///
/// Two finds share one instance; a detached copy with different attributes
/// is still equal; different identities are unequal; a set deduplicates by
/// identity.
pub fn execute<W: Write>(emf: &EntityManagerFactory, out: &mut W) -> Result<()> {
    let mut em = emf.create_entity_manager();

    say!(out)?;
    say!(out, "Example #8: Entity equality is based on identity")?;

    let museums = em
        .create_query::<Museum>("select m from museums m")?
        .get_result_list()?;
    let Some(first) = museums.first() else {
        say!(out, "There are no museums to compare")?;
        return em.close();
    };

    if let Some(again) = em.find::<Museum>(first.id())? {
        say!(
            out,
            "Two finds of museum {} return the same instance: {}",
            first.id(),
            first.same_instance(&again)
        )?;
    }

    let mut copy = first.detach()?;
    copy.set_name(format!("{} (renamed copy)", copy.name()));
    let original = first.detach()?;
    say!(
        out,
        "A detached copy named '{}' equals {}: {}",
        copy.name(),
        original,
        copy == original
    )?;

    if let Some(other) = museums.last().filter(|m| m.id() != first.id()) {
        let other = other.detach()?;
        say!(
            out,
            "Museum {} equals museum {}: {}",
            original.museum_id(),
            other.museum_id(),
            original == other
        )?;
    }

    let mut distinct = HashSet::new();
    distinct.insert(copy);
    for museum in &museums {
        distinct.insert(museum.detach()?);
    }
    say!(
        out,
        "{} museums plus one renamed copy make {} distinct entries in a set",
        museums.len(),
        distinct.len()
    )?;

    em.close()
}
