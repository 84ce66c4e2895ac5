//! Result type alias for Clinidoc

use super::errors::DocsError;

/// Result type alias for Clinidoc operations
///
/// # Examples
///
/// ```
/// use clinidoc::domain::result::Result;
/// use clinidoc::domain::errors::DocsError;
///
/// fn failing_function() -> Result<()> {
///     Err(DocsError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, DocsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(DocsError::Validation("test error".to_string()));
        assert!(result.is_err());
    }
}
