//! Unified error system for the offer desk
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`FieldError`]: Field-scoped validation result, returned as data
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Offer errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode, FieldError};
//!
//! // Create a simple error
//! let err = AppError::new(ErrorCode::OfferNotFound);
//!
//! // Create an error with details
//! let err = AppError::validation("Missing required field")
//!     .with_detail("field", "importe");
//!
//! // Pack form errors into one error for a commit path
//! let err = AppError::from_field_errors(&[FieldError::required("importe")]);
//! assert_eq!(err.code, ErrorCode::ValidationFailed);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, FieldError};
