//! Category / subcategory taxonomy
//!
//! - [`TaxonomyLoader`] builds a [`TaxonomyStore`] from the backend
//! - [`CategoryMutator`] and [`SubcategoryMutator`] write through the backend
//!   and always return a freshly loaded store

mod category;
mod error;
mod key;
mod loader;
mod store;
mod subcategory;

pub use category::CategoryMutator;
pub use error::{TaxonomyError, TaxonomyResult};
pub use key::{normalize_key, normalize_label};
pub use loader::TaxonomyLoader;
pub use store::{CategoryEntry, SubcategoryEntry, TaxonomyStore};
pub use subcategory::SubcategoryMutator;
