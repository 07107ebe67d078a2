//! Result type alias for titlesync
//!
//! This module provides a convenient Result type alias that uses TitleSyncError
//! as the error type.

use super::errors::TitleSyncError;

/// Result type alias for titlesync operations
///
/// # Examples
///
/// ```
/// use titlesync::domain::result::Result;
/// use titlesync::domain::errors::TitleSyncError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(TitleSyncError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, TitleSyncError>;
