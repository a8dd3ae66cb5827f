use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::ledger::Category;

/// Form fields exactly as the user typed them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawInput {
    pub category: String,
    pub description: String,
    pub value: String,
}

/// Input that passed validation and can go straight into the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct NewEntry {
    pub category: Category,
    pub description: String,
    pub value: f64,
}

impl RawInput {
    pub fn new(category: &str, description: &str, value: &str) -> RawInput {
        RawInput {
            category: category.to_string(),
            description: description.to_string(),
            value: value.to_string(),
        }
    }

    /// Requires a known category, a non-empty description and a finite value > 0.
    pub fn validate(&self) -> Result<NewEntry> {
        let category = self.category.parse::<Category>()?;
        let invalid = || Error::InvalidValue(self.value.clone());

        if self.description.is_empty() {
            return Err(Error::EmptyDescription);
        }
        let value = self.value.trim().parse::<f64>().map_err(|_| invalid())?;

        NewEntry::new(category, &self.description, value).map_err(|e| match e {
            Error::InvalidValue(_) => invalid(),
            other => other,
        })
    }
}

impl NewEntry {
    /// Checks an already numeric value: description non-empty, value finite and > 0.
    pub fn new(category: Category, description: &str, value: f64) -> Result<NewEntry> {
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }
        if !value.is_finite() || value <= 0.0 {
            return Err(Error::InvalidValue(value.to_string()));
        }
        Ok(NewEntry {
            category,
            description: description.to_string(),
            value,
        })
    }
}

/// Composite `category-id` identifier used for rendered list items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemId {
    pub category: Category,
    pub id: u32,
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.category, self.id)
    }
}

impl FromStr for ItemId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedItemId(s.to_string());
        let (category, id) = s.split_once('-').ok_or_else(malformed)?;
        Ok(ItemId {
            category: category.parse().map_err(|_| malformed())?,
            id: id.parse().map_err(|_| malformed())?,
        })
    }
}
