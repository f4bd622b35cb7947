//! Field selection within a loaded item
//!
//! Matching is case-insensitive throughout. A selector never picks between
//! several equally good candidates: one match returns its value, anything
//! else is an error that says how to narrow the selector down.

use std::collections::HashSet;

use crate::matching::{exactly_one, Match};
use crate::types::{Field, Item};
use super::error::{ResolveError, ResolveResult};

const PASSWORD_PURPOSE: &str = "PASSWORD";
const PASSWORD_LABEL: &str = "password";

/// What a field selector asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector<'a> {
    /// No selector: the item's password
    DefaultPassword,
    /// `notes` or `notesPlain`
    Notes,
    /// A bare field label
    Label(&'a str),
    /// `section/label`
    Qualified { section: &'a str, label: &'a str },
}

impl<'a> Selector<'a> {
    pub fn parse(selector: &'a str) -> Self {
        let selector = selector.trim();
        if selector.is_empty() {
            return Selector::DefaultPassword;
        }
        if eq_fold(selector, "notes") || eq_fold(selector, "notesPlain") {
            return Selector::Notes;
        }
        match selector.split_once('/') {
            Some((section, label)) if !section.trim().is_empty() => Selector::Qualified {
                section: section.trim(),
                label: label.trim(),
            },
            Some((_, label)) => Selector::Label(label.trim()),
            None => Selector::Label(selector),
        }
    }
}

/// Pick the value `selector` refers to in `item`
pub fn select_field<'i>(item: &'i Item, selector: &str) -> ResolveResult<&'i str> {
    match Selector::parse(selector) {
        Selector::DefaultPassword => default_password(item),
        Selector::Notes => notes(item),
        Selector::Label(label) => find_by_label(item, label),
        Selector::Qualified { section, label } => find_in_section(item, section, label),
    }
}

/// The single password-purpose field, falling back to a field labeled "password"
fn default_password(item: &Item) -> ResolveResult<&str> {
    let candidates = item
        .fields
        .iter()
        .filter(|f| f.has_value() && eq_fold(&f.purpose, PASSWORD_PURPOSE));

    match exactly_one(candidates) {
        Match::One(field) => Ok(field.value.as_str()),
        // Vaults sometimes store a password without the purpose tag
        Match::None => find_by_label(item, PASSWORD_LABEL),
        Match::Many(count) => Err(ResolveError::AmbiguousPassword {
            item: item.title.clone(),
            count,
        }),
    }
}

fn notes(item: &Item) -> ResolveResult<&str> {
    if item.notes_plain.is_empty() {
        return Err(ResolveError::NotesNotFound {
            item: item.title.clone(),
        });
    }
    Ok(item.notes_plain.as_str())
}

fn find_by_label<'i>(item: &'i Item, label: &str) -> ResolveResult<&'i str> {
    let candidates = item.fields.iter().filter(|f| labeled(f, label));

    exactly_one(candidates)
        .map(|field| field.value.as_str())
        .into_result(
            || ResolveError::FieldNotFound {
                item: item.title.clone(),
                field: label.to_string(),
            },
            |count| ResolveError::AmbiguousField {
                item: item.title.clone(),
                field: label.to_string(),
                count,
            },
        )
}

fn find_in_section<'i>(item: &'i Item, section: &str, label: &str) -> ResolveResult<&'i str> {
    // Section labels can repeat; the lookup covers all of them
    let section_ids: HashSet<&str> = item
        .sections
        .iter()
        .filter(|s| eq_fold(&s.label, section))
        .map(|s| s.id.as_str())
        .collect();
    if section_ids.is_empty() {
        return Err(ResolveError::SectionNotFound {
            item: item.title.clone(),
            section: section.to_string(),
        });
    }

    let candidates = item.fields.iter().filter(|f| {
        f.section_id().map_or(false, |id| section_ids.contains(id)) && labeled(f, label)
    });

    exactly_one(candidates)
        .map(|field| field.value.as_str())
        .into_result(
            || ResolveError::FieldNotFoundInSection {
                item: item.title.clone(),
                section: section.to_string(),
                field: label.to_string(),
            },
            |count| ResolveError::DuplicateFieldInSection {
                item: item.title.clone(),
                section: section.to_string(),
                field: label.to_string(),
                count,
            },
        )
}

fn labeled(field: &Field, label: &str) -> bool {
    field.has_value() && eq_fold(&field.label, label)
}

/// Unicode case-insensitive equality
fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}
