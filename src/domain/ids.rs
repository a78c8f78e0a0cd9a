//! Domain identifier types with validation
//!
//! Newtype wrappers for the two join keys of an inventory line. Both reject
//! empty or whitespace-only values, so a constructed line always has a usable key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stock-keeping unit identifier
///
/// # Examples
///
/// ```
/// use bcats::domain::ids::Sku;
///
/// let sku = Sku::new("1896-S").unwrap();
/// assert_eq!(sku.as_str(), "1896-S");
/// assert!(Sku::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sku(String);

impl Sku {
    /// Creates a new Sku, failing on empty input
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("SKU cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the SKU as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Sku {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Warehouse (location) code
///
/// # Examples
///
/// ```
/// use bcats::domain::ids::WarehouseCode;
///
/// let warehouse: WarehouseCode = "EAST".parse().unwrap();
/// assert_eq!(warehouse.to_string(), "EAST");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WarehouseCode(String);

impl WarehouseCode {
    /// Creates a new WarehouseCode, failing on empty input
    pub fn new(code: impl Into<String>) -> Result<Self, String> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err("Warehouse code cannot be empty".to_string());
        }
        Ok(Self(code))
    }

    /// Returns the code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for WarehouseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WarehouseCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for WarehouseCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sku_creation() {
        let sku = Sku::new("1900-S").unwrap();
        assert_eq!(sku.as_str(), "1900-S");
        assert_eq!(sku.into_inner(), "1900-S");
    }

    #[test]
    fn test_sku_empty_fails() {
        assert!(Sku::new("").is_err());
        assert!(Sku::new("   ").is_err());
    }

    #[test]
    fn test_warehouse_code_empty_fails() {
        assert!(WarehouseCode::new("").is_err());
        assert!(WarehouseCode::from_str("\t").is_err());
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut codes = vec![
            WarehouseCode::new("WEST").unwrap(),
            WarehouseCode::new("EAST").unwrap(),
            WarehouseCode::new("MAIN").unwrap(),
        ];
        codes.sort();
        let names: Vec<_> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["EAST", "MAIN", "WEST"]);
    }
}
