pub mod provider;
pub mod sources;
pub mod types;

pub use provider::{PageRequest, PageSource, SourceError};
pub use sources::{MemoryPageSource, RestPageSource};
pub use types::Vehicle;
