//! Input validation for scheduling runs.
//!
//! Checks a snapshot before anything is cleared or written. Detects:
//! - Missing or empty target term
//! - Missing slot grid
//! - Collection keys that disagree with record ids
//! - Obligations and preferences referencing unknown entities
//!
//! All problems are collected, not just the first.

use crate::models::Snapshot;
use std::collections::BTreeMap;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The requested term is not in the snapshot.
    UnknownTerm,
    /// The term's date range yields zero weeks.
    EmptyTerm,
    /// No slots are defined.
    NoSlots,
    /// A keyed entry's key differs from its id.
    KeyMismatch,
    /// A record references an entity that doesn't exist.
    InvalidReference,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a snapshot for a run over `term_id`.
///
/// Checks:
/// 1. The term exists and spans at least one week
/// 2. At least one slot exists
/// 3. Every collection key equals its record's id
/// 4. Obligations of the term reference existing cohorts, courses and teachers
/// 5. Avoid preferences of the term reference existing teachers and slots
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(snapshot: &Snapshot, term_id: &str) -> ValidationResult {
    let mut errors = Vec::new();

    match snapshot.term(term_id) {
        None => errors.push(ValidationError::new(
            ValidationErrorKind::UnknownTerm,
            format!("Term '{term_id}' not found"),
        )),
        Some(term) if term.total_weeks() == 0 => errors.push(ValidationError::new(
            ValidationErrorKind::EmptyTerm,
            format!(
                "Term '{}' has no teaching weeks ({} to {})",
                term.label(),
                term.start_date,
                term.end_date
            ),
        )),
        Some(_) => {}
    }

    if snapshot.slots.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::NoSlots,
            "No slots defined",
        ));
    }

    check_keys(&mut errors, "term", &snapshot.terms, |t| &t.id);
    check_keys(&mut errors, "cohort", &snapshot.cohorts, |c| &c.id);
    check_keys(&mut errors, "teacher", &snapshot.teachers, |t| &t.id);
    check_keys(&mut errors, "room", &snapshot.rooms, |r| &r.id);
    check_keys(&mut errors, "course", &snapshot.courses, |c| &c.id);
    check_keys(&mut errors, "slot", &snapshot.slots, |s| &s.id);
    check_keys(&mut errors, "obligation", &snapshot.obligations, |o| &o.id);
    check_keys(&mut errors, "preference", &snapshot.preferences, |p| &p.id);

    for o in snapshot.obligations_for_term(term_id) {
        if snapshot.cohort(&o.cohort_id).is_none() {
            errors.push(invalid_ref("Obligation", &o.id, "cohort", &o.cohort_id));
        }
        if snapshot.course(&o.course_id).is_none() {
            errors.push(invalid_ref("Obligation", &o.id, "course", &o.course_id));
        }
        if snapshot.teacher(&o.teacher_id).is_none() {
            errors.push(invalid_ref("Obligation", &o.id, "teacher", &o.teacher_id));
        }
    }

    for p in snapshot.preferences.values().filter(|p| p.term_id == term_id) {
        if snapshot.teacher(&p.teacher_id).is_none() {
            errors.push(invalid_ref("Preference", &p.id, "teacher", &p.teacher_id));
        }
        if snapshot.slot(&p.slot_id).is_none() {
            errors.push(invalid_ref("Preference", &p.id, "slot", &p.slot_id));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_keys<T>(
    errors: &mut Vec<ValidationError>,
    what: &str,
    entries: &BTreeMap<String, T>,
    id_of: impl Fn(&T) -> &String,
) {
    for (key, value) in entries {
        let id = id_of(value);
        if key != id {
            errors.push(ValidationError::new(
                ValidationErrorKind::KeyMismatch,
                format!("{what} stored under key '{key}' has id '{id}'"),
            ));
        }
    }
}

fn invalid_ref(owner: &str, owner_id: &str, what: &str, id: &str) -> ValidationError {
    ValidationError::new(
        ValidationErrorKind::InvalidReference,
        format!("{owner} '{owner_id}' references unknown {what} '{id}'"),
    )
}
