//! Raw form field resolution
//!
//! Every evaluator starts by turning user-typed strings into typed values.
//! [`FieldReader`] records each offending field once, in the order fields
//! are read, so a single [`ValidationError`] names all of them.

use std::collections::BTreeSet;
use std::str::FromStr;

use shared_types::SectionId;

use crate::error::ValidationError;
use crate::extractors::numeric::parse_positive;

/// Collects field-level problems while resolving a raw input
#[derive(Debug, Default)]
pub struct FieldReader {
    issues: Vec<String>,
}

fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

impl FieldReader {
    pub fn new() -> Self {
        Self::default()
    }

    fn flag(&mut self, field: &str) {
        if !self.issues.iter().any(|f| f == field) {
            self.issues.push(field.to_string());
        }
    }

    /// Required non-blank free text, trimmed
    pub fn text(&mut self, field: &str, raw: &str) -> Option<String> {
        if is_blank(raw) {
            self.flag(field);
            None
        } else {
            Some(raw.trim().to_string())
        }
    }

    /// Required strictly positive number
    pub fn number(&mut self, field: &str, raw: &str) -> Option<f64> {
        let value = parse_positive(raw);
        if value.is_none() {
            self.flag(field);
        }
        value
    }

    /// Positive number that falls back to a project value when left blank
    pub fn number_or(&mut self, field: &str, raw: &str, fallback: f64) -> Option<f64> {
        if is_blank(raw) {
            Some(fallback)
        } else {
            self.number(field, raw)
        }
    }

    /// Optional positive number; a blank field is absent, anything else must be valid
    pub fn optional_number(&mut self, field: &str, raw: &str) -> Option<f64> {
        if is_blank(raw) {
            None
        } else {
            self.number(field, raw)
        }
    }

    /// Required value out of a closed set
    pub fn choice<T: FromStr>(&mut self, field: &str, raw: &str) -> Option<T> {
        let value = raw.parse::<T>().ok();
        if value.is_none() {
            self.flag(field);
        }
        value
    }

    /// Closed-set value that falls back to a default when left blank
    pub fn choice_or<T: FromStr>(&mut self, field: &str, raw: &str, fallback: T) -> Option<T> {
        if is_blank(raw) {
            Some(fallback)
        } else {
            self.choice(field, raw)
        }
    }

    /// Optional closed-set value
    pub fn optional_choice<T: FromStr>(&mut self, field: &str, raw: &str) -> Option<T> {
        if is_blank(raw) {
            None
        } else {
            self.choice(field, raw)
        }
    }

    /// Set of closed-set values; one unknown entry flags the whole field
    pub fn choices<T: FromStr + Ord>(&mut self, field: &str, raws: &[String]) -> Option<BTreeSet<T>> {
        let parsed: Result<BTreeSet<T>, _> = raws
            .iter()
            .filter(|raw| !is_blank(raw))
            .map(|raw| raw.parse::<T>())
            .collect();
        match parsed {
            Ok(set) => Some(set),
            Err(_) => {
                self.flag(field);
                None
            }
        }
    }

    /// Restricts an already resolved value to the set a section accepts
    pub fn accepted<T: PartialEq + Copy>(
        &mut self,
        field: &str,
        value: Option<T>,
        allowed: &[T],
    ) -> Option<T> {
        match value {
            Some(v) if allowed.contains(&v) => Some(v),
            Some(_) => {
                self.flag(field);
                None
            }
            None => None,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_error(self, section: Option<SectionId>) -> ValidationError {
        ValidationError::new(section, self.issues)
    }

    /// Fails when any field was flagged, including optional ones
    pub fn finish(self, section: Option<SectionId>) -> Result<(), ValidationError> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(self.into_error(section))
        }
    }
}
