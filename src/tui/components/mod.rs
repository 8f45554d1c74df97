//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Simple display components that receive all data as props:
//! - `TitleBar`: Top status bar showing the page source and status
//! - `VehicleField`: The closed selector showing the chosen vehicle
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `VehiclePickerState` / `VehiclePicker`: the searchable, incrementally
//!   loaded vehicle list overlay
//! - `VisibilityTrigger`: decides when the picker's sentinel row asks for more
//!
//! Each component file keeps its state types, event types, rendering and
//! tests together.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── title_bar.rs       (Top status bar)
//! ├── vehicle_field.rs   (Closed selector)
//! ├── vehicle_picker.rs  (Search + infinite list overlay)
//! └── visibility.rs      (Sentinel visibility trigger)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod vehicle_field;
pub mod vehicle_picker;
pub mod visibility;
pub use vehicle_field::VehicleField;
pub use vehicle_picker::{PickerEvent, VehiclePicker, VehiclePickerState};
