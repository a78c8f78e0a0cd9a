//! Result type alias for bcats
//!
//! This module provides a convenient Result type alias that uses AtsError
//! as the error type.

use super::errors::AtsError;

/// Result type alias for bcats operations
///
/// # Examples
///
/// ```
/// use bcats::domain::result::Result;
/// use bcats::domain::errors::AtsError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(AtsError::Shape("missing field 'sku'".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, AtsError>;
