//! Data-driven bootstrap and the file-backed saved-item provider.

pub mod loader;
pub mod saved;
pub mod schema;

pub use loader::{Bridge, DataLoadError, build_bridge, load_bridge};
pub use saved::{SaveError, SavedItemProvider};
