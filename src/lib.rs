//! Fleetpick library exports for testing

use clap::ValueEnum;

pub mod core;
pub mod driver;
pub mod source;
pub mod tui;

#[cfg(test)]
pub mod test_support;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    #[default]
    Memory,
    Rest,
}

impl SourceKind {
    /// Name used in the config file and `FLEETPICK_SOURCE`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Memory => "memory",
            SourceKind::Rest => "rest",
        }
    }
}
