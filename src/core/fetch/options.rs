//! Per-call query options
//!
//! A `QueryOptions` value is built for each fetch and never shared or mutated
//! afterwards.

use crate::domain::DuplicateKeys;

/// Options for one fetch
///
/// # Example
///
/// ```
/// use bcats::core::fetch::QueryOptions;
///
/// let options = QueryOptions::new()
///     .fields(["Item_No", "Location_Code", "Quantity"])
///     .filter("Quantity ne 0");
///
/// assert_eq!(
///     options.to_params(),
///     vec![
///         ("$select".to_string(), "Item_No,Location_Code,Quantity".to_string()),
///         ("$filter".to_string(), "Quantity ne 0".to_string()),
///     ]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Fields to request, in result column order
    pub fields: Option<Vec<String>>,

    /// Predicates in the source's filter language, combined with `and`
    pub filters: Vec<String>,

    /// Fields that key the result for direct lookup
    pub index: Option<Vec<String>>,

    /// Policy for index keys that occur more than once
    pub on_duplicate: DuplicateKeys,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict and order the result to these fields
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Add a filter predicate
    pub fn filter(mut self, predicate: impl Into<String>) -> Self {
        self.filters.push(predicate.into());
        self
    }

    /// Key the result by these fields
    pub fn index<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    pub fn on_duplicate(mut self, policy: DuplicateKeys) -> Self {
        self.on_duplicate = policy;
        self
    }

    /// OData query parameters for the first request
    ///
    /// Continuation requests never carry these: the cursor already encodes them.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(fields) = self.fields.as_ref().filter(|f| !f.is_empty()) {
            params.push(("$select".to_string(), fields.join(",")));
        }

        if !self.filters.is_empty() {
            let filter = if self.filters.len() == 1 {
                self.filters[0].clone()
            } else {
                self.filters
                    .iter()
                    .map(|f| format!("({f})"))
                    .collect::<Vec<_>>()
                    .join(" and ")
            };
            params.push(("$filter".to_string(), filter));
        }

        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_have_no_params() {
        assert!(QueryOptions::new().to_params().is_empty());
    }

    #[test]
    fn test_multiple_filters_are_combined() {
        let options = QueryOptions::new()
            .filter("Quantity ne 0")
            .filter("Location_Code eq 'EAST'");

        assert_eq!(
            options.to_params(),
            vec![(
                "$filter".to_string(),
                "(Quantity ne 0) and (Location_Code eq 'EAST')".to_string()
            )]
        );
    }

    #[test]
    fn test_builders_do_not_share_state() {
        let base = QueryOptions::new().filter("Quantity ne 0");
        let narrowed = base.clone().filter("Location_Code eq 'EAST'");

        assert_eq!(base.filters.len(), 1);
        assert_eq!(narrowed.filters.len(), 2);
    }

    #[test]
    fn test_index_and_duplicate_policy() {
        let options = QueryOptions::new()
            .index(["sku", "warehouse"])
            .on_duplicate(DuplicateKeys::LastWins);

        assert_eq!(
            options.index,
            Some(vec!["sku".to_string(), "warehouse".to_string()])
        );
        assert_eq!(options.on_duplicate, DuplicateKeys::LastWins);
        assert!(options.to_params().is_empty());
    }
}
