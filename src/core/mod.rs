//! # Core Selector Logic
//!
//! This module contains the searchable vehicle selector's business logic.
//! It knows nothing about any specific UI technology or transport.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • SearchState          │
//!                    │  • QueryCoordinator     │
//!                    │  • Action → update()    │
//!                    │    → Effect             │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │   driver   │  spawns fetches/timers   │    TUI     │
//!     │  (tokio)   │ ───── Action ─────────►  │  Adapter   │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `SearchState`, one search generation
//! - [`coordinator`]: `QueryCoordinator`, the paging/search state machine
//! - [`action`]: the `Action` / `Effect` vocabulary and `update()`
//! - [`config`]: settings file, env and CLI resolution

pub mod action;
pub mod config;
pub mod coordinator;
pub mod state;
