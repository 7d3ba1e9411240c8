//! Study content: loading the bundled collections and deriving the list that
//! the current filters select.

mod loader;
mod selector;

pub use loader::{load_bundled, load_dataset};
pub use selector::{select, Filters, Item, ItemKey, VocabularyPolicy};
