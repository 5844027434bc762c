/// General helper macros for internal use;
/// these should not be exposed externally.

/// A macro which wraps a `ValidationError` variant as an `Err` of
/// `ClientError`. So writing `validation_err!(EmptyName)` is the same as:
/// ```ignore
/// Err(
///     ClientError::Validation(ValidationError::EmptyName)
/// )
/// ```
///
/// Struct and tuple variants are accepted too:
/// `validation_err!(ArityMismatch { expected: 2, actual: 1 })`
#[doc(hidden)]
#[macro_export]
macro_rules! validation_err {
    ($($variant:tt)+) => {
        Err($crate::ClientError::Validation(
            $crate::ValidationError::$($variant)+,
        ))
    };
}
