//! Managed attribute rows: an attribute paired with the value to assign.

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::node::RowData;

/// Selection of one managed attribute and its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRow {
    pub attribute: String,
    pub value: String,
}

impl RowData for AttributeRow {
    fn blank(default_attribute: &str) -> Self {
        Self {
            attribute: default_attribute.to_string(),
            value: String::new(),
        }
    }

    fn attribute(&self) -> &str {
        &self.attribute
    }

    fn set_field(&mut self, field: &str, value: &str) -> DomainResult<()> {
        match field.trim().to_ascii_lowercase().as_str() {
            "attribute" | "attr" => self.attribute = value.to_string(),
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

impl fmt::Display for AttributeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {:?}", self.attribute, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_attribute_row_when_edited_then_keeps_value_across_attribute_change() {
        let mut row = AttributeRow::blank("collector");
        row.set_field("value", "Darwin").unwrap();
        row.set_field("attr", "locality").unwrap();
        assert_eq!(row.attribute, "locality");
        assert_eq!(row.value, "Darwin");
        assert_eq!(row.to_string(), r#"locality = "Darwin""#);
        assert!(row.set_field("predicate", "is").is_err());
    }
}
