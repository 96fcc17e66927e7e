//! Named entity groupings.
//!
//! Each domain carries its own section list. Every domain has one default
//! section that cannot be deleted; deleting another section moves its
//! entities back to the default.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::alarm::validate_title;
use crate::error::ValidationError;

/// Id of the per-domain default section.
pub const DEFAULT_SECTION_ID: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub name: String,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        validate_title(&name)?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
        })
    }

    pub fn default_section() -> Self {
        Self {
            id: DEFAULT_SECTION_ID.to_string(),
            name: "General".to_string(),
        }
    }

    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_SECTION_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_name() {
        assert!(Section::new("   ").is_err());
    }

    #[test]
    fn default_section_is_marked() {
        assert!(Section::default_section().is_default());
        assert!(!Section::new("Morning").unwrap().is_default());
    }
}
