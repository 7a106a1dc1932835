mod errors;
mod store;

pub use errors::MappingError;
pub use store::{LoadSummary, MappingStore};
