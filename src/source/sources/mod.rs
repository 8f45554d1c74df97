pub mod memory;
pub mod rest;

pub use memory::MemoryPageSource;
pub use rest::RestPageSource;
