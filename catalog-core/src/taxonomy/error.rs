//! Taxonomy error type

use crate::db::repository::RepoError;
use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Errors surfaced by the loader, mutators, orderer and browser
///
/// Validation variants are raised before any write and have no side effects.
#[derive(Debug, Error)]
pub enum TaxonomyError {
    /// `parent` is set for subcategory keys
    #[error("Key '{key}' already exists")]
    DuplicateKey { key: String, parent: Option<String> },

    #[error("Category '{key}' not found")]
    CategoryNotFound { key: String },

    #[error("Subcategory '{category}:{key}' not found")]
    SubcategoryNotFound { category: String, key: String },

    #[error("No parent category selected")]
    CategoryNotSelected,

    #[error("Catalog item {id} not found")]
    ItemNotFound { id: i64 },

    /// Nothing identifier-safe left after normalization
    #[error("'{raw}' is not a usable key")]
    InvalidKey { raw: String, parent: Option<String> },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to load taxonomy: {source}")]
    LoadFailed {
        #[source]
        source: RepoError,
    },

    #[error("Rename '{from}' -> '{to}' failed, reload and audit the catalog: {source}")]
    RenameFailed {
        from: String,
        to: String,
        #[source]
        source: RepoError,
    },

    #[error("Failed to {operation}: {source}")]
    WriteFailed {
        operation: String,
        #[source]
        source: RepoError,
    },
}

impl TaxonomyError {
    pub fn duplicate(key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            key: key.into(),
            parent: None,
        }
    }

    pub fn duplicate_in(parent: impl Into<String>, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            key: key.into(),
            parent: Some(parent.into()),
        }
    }

    pub fn category_not_found(key: impl Into<String>) -> Self {
        Self::CategoryNotFound { key: key.into() }
    }

    pub fn subcategory_not_found(category: impl Into<String>, key: impl Into<String>) -> Self {
        Self::SubcategoryNotFound {
            category: category.into(),
            key: key.into(),
        }
    }

    pub fn load(source: RepoError) -> Self {
        Self::LoadFailed { source }
    }

    pub fn write(operation: impl Into<String>, source: RepoError) -> Self {
        Self::WriteFailed {
            operation: operation.into(),
            source,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::DuplicateKey { parent: None, .. } => ErrorCode::CategoryKeyExists,
            Self::DuplicateKey { parent: Some(_), .. } => ErrorCode::SubcategoryKeyExists,
            Self::CategoryNotFound { .. } => ErrorCode::CategoryNotFound,
            Self::SubcategoryNotFound { .. } => ErrorCode::SubcategoryNotFound,
            Self::CategoryNotSelected => ErrorCode::CategoryNotSelected,
            Self::ItemNotFound { .. } => ErrorCode::CatalogItemNotFound,
            Self::InvalidKey { parent: None, .. } => ErrorCode::InvalidCategoryKey,
            Self::InvalidKey { parent: Some(_), .. } => ErrorCode::InvalidSubcategoryKey,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::LoadFailed { .. } => ErrorCode::TaxonomyLoadFailed,
            Self::RenameFailed { .. } => ErrorCode::RenameFailed,
            Self::WriteFailed { .. } => ErrorCode::WriteFailed,
        }
    }

    /// True for errors raised before any write was attempted
    pub fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::LoadFailed { .. } | Self::RenameFailed { .. } | Self::WriteFailed { .. }
        )
    }
}

impl From<TaxonomyError> for AppError {
    fn from(err: TaxonomyError) -> Self {
        let app = AppError::with_message(err.code(), err.to_string());
        match err {
            TaxonomyError::DuplicateKey { key, parent } => match parent {
                Some(category) => app.with_detail("category", category).with_detail("key", key),
                None => app.with_detail("key", key),
            },
            TaxonomyError::CategoryNotFound { key } => app.with_detail("key", key),
            TaxonomyError::InvalidKey { raw, parent } => match parent {
                Some(category) => app.with_detail("category", category).with_detail("key", raw),
                None => app.with_detail("key", raw),
            },
            TaxonomyError::SubcategoryNotFound { category, key } => app
                .with_detail("category", category)
                .with_detail("key", key),
            TaxonomyError::ItemNotFound { id } => app.with_detail("id", id),
            TaxonomyError::RenameFailed { from, to, .. } => {
                app.with_detail("from", from).with_detail("to", to)
            }
            TaxonomyError::WriteFailed { operation, .. } => app.with_detail("operation", operation),
            _ => app,
        }
    }
}

/// Result type for taxonomy operations
pub type TaxonomyResult<T> = Result<T, TaxonomyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_to_catalog_codes() {
        assert_eq!(TaxonomyError::duplicate("a").code().code(), 6102);
        assert_eq!(TaxonomyError::duplicate_in("a", "b").code().code(), 6202);
        let invalid = |parent: Option<&str>| TaxonomyError::InvalidKey {
            raw: "--".into(),
            parent: parent.map(str::to_string),
        };
        assert_eq!(invalid(None).code().code(), 6104);
        assert_eq!(invalid(Some("a")).code().code(), 6203);
        assert_eq!(TaxonomyError::category_not_found("a").code().code(), 6101);
        assert_eq!(TaxonomyError::CategoryNotSelected.code().code(), 6103);
        assert_eq!(
            TaxonomyError::load(RepoError::Database("x".into())).code(),
            ErrorCode::TaxonomyLoadFailed
        );
    }

    #[test]
    fn app_error_carries_details() {
        let err: AppError = TaxonomyError::RenameFailed {
            from: "a".into(),
            to: "b".into(),
            source: RepoError::Database("disk full".into()),
        }
        .into();
        assert_eq!(err.code, ErrorCode::RenameFailed);
        assert!(err.message.contains("reload and audit"));
        let details = err.details.unwrap();
        assert_eq!(details["from"], "a");
        assert_eq!(details["to"], "b");
    }

    #[test]
    fn rejections_are_side_effect_free_kinds() {
        assert!(TaxonomyError::CategoryNotSelected.is_rejection());
        assert!(TaxonomyError::Validation("empty".into()).is_rejection());
        assert!(
            !TaxonomyError::write("delete category", RepoError::Database("x".into())).is_rejection()
        );
    }
}
