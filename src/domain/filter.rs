//! Filter rows: attribute, predicate, search type and value.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::RowData;

/// Comparison of a filter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Predicate {
    #[default]
    Is,
    IsNot,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Is => write!(f, "IS"),
            Predicate::IsNot => write!(f, "IS NOT"),
        }
    }
}

impl FromStr for Predicate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "is" => Ok(Predicate::Is),
            "is_not" | "isnot" | "not" => Ok(Predicate::IsNot),
            _ => Err(invalid("predicate", s)),
        }
    }
}

/// How the value of a filter row is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    #[default]
    PartialMatch,
    ExactMatch,
    /// Matches rows where the attribute is empty; the value is ignored.
    BlankField,
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchType::PartialMatch => write!(f, "PARTIAL_MATCH"),
            SearchType::ExactMatch => write!(f, "EXACT_MATCH"),
            SearchType::BlankField => write!(f, "BLANK_FIELD"),
        }
    }
}

impl FromStr for SearchType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "partial" | "partial_match" => Ok(SearchType::PartialMatch),
            "exact" | "exact_match" => Ok(SearchType::ExactMatch),
            "blank" | "blank_field" => Ok(SearchType::BlankField),
            _ => Err(invalid("search", s)),
        }
    }
}

/// One filter predicate, e.g. `name IS PARTIAL_MATCH "abc"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRow {
    /// Selected attribute name
    pub attribute: String,
    pub predicate: Predicate,
    pub search_type: SearchType,
    /// Free text value, empty for a fresh row
    pub value: String,
}

impl RowData for FilterRow {
    fn blank(default_attribute: &str) -> Self {
        Self {
            attribute: default_attribute.to_string(),
            predicate: Predicate::Is,
            search_type: SearchType::PartialMatch,
            value: String::new(),
        }
    }

    fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Switching the attribute starts the row over with a blank predicate and value.
    fn set_field(&mut self, field: &str, value: &str) -> DomainResult<()> {
        match normalize(field).as_str() {
            "attribute" | "attr" => *self = Self::blank(value),
            "predicate" => self.predicate = value.parse()?,
            "search" | "search_type" => self.search_type = value.parse()?,
            "value" => self.value = value.to_string(),
            _ => {
                return Err(DomainError::UnknownField {
                    field: field.to_string(),
                })
            }
        }
        Ok(())
    }
}

impl fmt::Display for FilterRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let attribute = if self.attribute.is_empty() {
            "<attribute>"
        } else {
            &self.attribute
        };
        match self.search_type {
            SearchType::BlankField => {
                write!(f, "{} {} {}", attribute, self.predicate, self.search_type)
            }
            _ => write!(
                f,
                "{} {} {} {:?}",
                attribute, self.predicate, self.search_type, self.value
            ),
        }
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

fn invalid(field: &str, value: &str) -> DomainError {
    DomainError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}
