//! Unified error codes for the catalog workspace
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 6xxx: Catalog taxonomy errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 6xxx: Catalog ====================
    /// Catalog item not found
    CatalogItemNotFound = 6001,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category key already exists
    CategoryKeyExists = 6102,
    /// No parent category was selected
    CategoryNotSelected = 6103,
    /// Category key has no identifier-safe characters
    InvalidCategoryKey = 6104,
    /// Subcategory not found
    SubcategoryNotFound = 6201,
    /// Subcategory key already exists in its category
    SubcategoryKeyExists = 6202,
    /// Subcategory key has no identifier-safe characters
    InvalidSubcategoryKey = 6203,

    // ==================== 9xxx: System ====================
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
    /// Taxonomy could not be loaded
    TaxonomyLoadFailed = 9101,
    /// Cascading rename did not complete
    RenameFailed = 9102,
    /// Single write operation failed
    WriteFailed = 9103,
}

impl ErrorCode {
    /// Get the numeric value of this error code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",

            // Catalog
            ErrorCode::CatalogItemNotFound => "Catalog item not found",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryKeyExists => "Category with this key already exists",
            ErrorCode::CategoryNotSelected => "Please select a category first",
            ErrorCode::InvalidCategoryKey => "Category key is invalid",
            ErrorCode::SubcategoryNotFound => "Subcategory not found",
            ErrorCode::SubcategoryKeyExists => "Subcategory with this key already exists",
            ErrorCode::InvalidSubcategoryKey => "Subcategory key is invalid",

            // System
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
            ErrorCode::TaxonomyLoadFailed => "Failed to load category configuration",
            ErrorCode::RenameFailed => "Rename did not complete, reload and audit the catalog",
            ErrorCode::WriteFailed => "Write operation failed",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),

            // Catalog
            6001 => Ok(ErrorCode::CatalogItemNotFound),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryKeyExists),
            6103 => Ok(ErrorCode::CategoryNotSelected),
            6104 => Ok(ErrorCode::InvalidCategoryKey),
            6201 => Ok(ErrorCode::SubcategoryNotFound),
            6202 => Ok(ErrorCode::SubcategoryKeyExists),
            6203 => Ok(ErrorCode::InvalidSubcategoryKey),

            // System
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),
            9101 => Ok(ErrorCode::TaxonomyLoadFailed),
            9102 => Ok(ErrorCode::RenameFailed),
            9103 => Ok(ErrorCode::WriteFailed),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
