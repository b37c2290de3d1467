use crate::common::error::ForkctlError;

/// Result alias used across the crate.
///
/// # Examples
///
/// ```
/// use forkctl::common::result::ForkctlResult;
/// use forkctl::common::error::ForkctlError;
///
/// fn example_function() -> ForkctlResult<String> {
///     Ok("success".to_string())
/// }
///
/// fn example_with_error() -> ForkctlResult<()> {
///     Err(ForkctlError::internal_error("Something went wrong"))
/// }
/// ```
pub type ForkctlResult<T> = Result<T, ForkctlError>;

/// Conversions from `Option` into [`ForkctlResult`].
pub trait OptionExt<T> {
    /// Turn `None` into an [`ForkctlError::InternalError`].
    ///
    /// ```
    /// use forkctl::common::result::{ForkctlResult, OptionExt};
    ///
    /// let none_value: Option<String> = None;
    /// let result: ForkctlResult<String> = none_value.ok_or_internal_error("Value not found");
    /// assert!(result.is_err());
    /// ```
    fn ok_or_internal_error(self, message: impl Into<String>) -> ForkctlResult<T>;

    /// Turn `None` into an [`ForkctlError::ValidationError`] for `field`.
    fn ok_or_validation_error(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> ForkctlResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_internal_error(self, message: impl Into<String>) -> ForkctlResult<T> {
        self.ok_or_else(|| ForkctlError::internal_error(message))
    }

    fn ok_or_validation_error(
        self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> ForkctlResult<T> {
        self.ok_or_else(|| ForkctlError::validation_error(field, message, None))
    }
}

/// Conversions from foreign `Result`s into [`ForkctlResult`].
pub trait ResultExt<T, E> {
    /// Attach a message and the offending path to an I/O failure.
    ///
    /// ```
    /// use forkctl::common::result::{ForkctlResult, ResultExt};
    ///
    /// let result: Result<String, std::io::Error> = Err(std::io::Error::new(
    ///     std::io::ErrorKind::NotFound, "file not found"
    /// ));
    /// let converted: ForkctlResult<String> = result.with_filesystem_error("read failed", None);
    /// assert!(converted.is_err());
    /// ```
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> ForkctlResult<T>
    where
        E: Into<std::io::Error>;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn with_filesystem_error(
        self,
        message: impl Into<String>,
        path: Option<std::path::PathBuf>,
    ) -> ForkctlResult<T>
    where
        E: Into<std::io::Error>,
    {
        self.map_err(|e| ForkctlError::filesystem_error_with_source(message, path, e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_option_ext_ok_or_internal_error() {
        let none_value: Option<String> = None;
        let result = none_value.ok_or_internal_error("test error");

        if let Err(ForkctlError::InternalError { message, .. }) = result {
            assert_eq!(message, "test error");
        } else {
            panic!("Expected InternalError");
        }

        assert_eq!(Some(3).ok_or_internal_error("unused").unwrap(), 3);
    }

    #[test]
    fn test_option_ext_ok_or_validation_error() {
        let none_value: Option<String> = None;
        let result = none_value.ok_or_validation_error("field", "required");

        if let Err(ForkctlError::ValidationError { field, message, .. }) = result {
            assert_eq!(field, "field");
            assert_eq!(message, "required");
        } else {
            panic!("Expected ValidationError");
        }
    }

    #[test]
    fn test_result_ext_with_filesystem_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let result: Result<String, std::io::Error> = Err(io_error);
        let path = Some(PathBuf::from("/test/path"));

        match result.with_filesystem_error("test operation", path.clone()) {
            Err(ForkctlError::FileSystemError {
                message,
                path: p,
                source,
            }) => {
                assert_eq!(message, "test operation");
                assert_eq!(p, path);
                assert!(source.is_some());
            }
            other => panic!("Expected FileSystemError, got {:?}", other),
        }
    }
}
